use std::net::SocketAddr;

use hyper::{Body, Client, Method, Request, StatusCode};
use mcp_kernel::{ErrorResponse, InvokeResponse, RunningServer, ToolServer};
use mcp_primitives::{ParamSpec, ParamType, ParameterSchema};
use mcp_tools::{
    CapabilitiesResponse, CompositeTool, FnTool, Params, Tool, ToolError, ToolRegistry,
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};

fn query_leaf(name: &'static str) -> impl Tool + 'static {
    let schema = ParameterSchema::builder()
        .param("query", ParamSpec::required(ParamType::String))
        .unwrap()
        .build();
    FnTool::new(name, "Answers a query", schema, move |params: Params| {
        std::future::ready(match params.get("query").and_then(Value::as_str) {
            Some(query) => Ok(format!("{name} results for {query}")),
            None => Err(ToolError::execution("query is required")),
        })
    })
    .unwrap()
}

fn registry() -> ToolRegistry {
    let web = CompositeTool::builder("WebTools", "A collection of web-related tools")
        .unwrap()
        .child(query_leaf("BraveSearch"))
        .unwrap()
        .build();
    let finance = CompositeTool::builder("FinanceTools", "A collection of financial tools")
        .unwrap()
        .child(query_leaf("YahooStockPrice"))
        .unwrap()
        .build();

    ToolRegistry::builder()
        .with_tool(web)
        .and_then(|builder| builder.with_tool(finance))
        .unwrap()
        .freeze()
}

fn start() -> RunningServer {
    let addr: SocketAddr = "127.0.0.1:0".parse().unwrap();
    ToolServer::new(registry(), addr).spawn().unwrap()
}

async fn request<T: DeserializeOwned>(
    server: &RunningServer,
    method: Method,
    route: &str,
    body: Option<Value>,
) -> (StatusCode, T) {
    let uri = format!("http://{}{route}", server.addr());
    let body = body.map_or_else(Body::empty, |value| Body::from(value.to_string()));
    let request = Request::builder().method(method).uri(uri).body(body).unwrap();

    let response = Client::new().request(request).await.unwrap();
    let status = response.status();
    let bytes = hyper::body::to_bytes(response.into_body()).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

async fn invoke(server: &RunningServer, tool: &str, parameters: Value) -> (StatusCode, Value) {
    request(
        server,
        Method::POST,
        "/invoke",
        Some(json!({ "tool": tool, "parameters": parameters })),
    )
    .await
}

#[tokio::test]
async fn discovery_returns_each_composite_with_its_child() {
    let server = start();
    let (status, capabilities): (_, CapabilitiesResponse) =
        request(&server, Method::GET, "/tools", None).await;

    assert_eq!(status, StatusCode::OK);
    let names: Vec<_> = capabilities.tools.iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names, ["FinanceTools", "WebTools"]);
    for tool in &capabilities.tools {
        assert_eq!(tool.subtools.len(), 1);
    }
    assert!(capabilities.tools[1].subtool("BraveSearch").is_some());

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn path_and_operation_addressing_agree() {
    let server = start();

    let (status, by_path) =
        invoke(&server, "WebTools.BraveSearch", json!({ "query": "acme corp" })).await;
    assert_eq!(status, StatusCode::OK);

    let (status, by_operation) = invoke(
        &server,
        "WebTools",
        json!({ "operation": "BraveSearch", "query": "acme corp" }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let by_path: InvokeResponse = serde_json::from_value(by_path).unwrap();
    let by_operation: InvokeResponse = serde_json::from_value(by_operation).unwrap();
    assert_eq!(by_path.result, "BraveSearch results for acme corp");
    assert_eq!(by_path.result, by_operation.result);

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn unknown_segments_are_reported_with_context() {
    let server = start();

    let (status, body) = invoke(&server, "WebTools.Nonexistent", json!({})).await;
    let body: ErrorResponse = serde_json::from_value(body).unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.code, "sub_tool_not_found");
    assert!(body.error.contains("WebTools.Nonexistent"));

    let (status, body) = invoke(&server, "GhostTools.Anything", json!({})).await;
    let body: ErrorResponse = serde_json::from_value(body).unwrap();
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body.code, "tool_not_found");
    assert!(body.error.contains("GhostTools"));

    server.shutdown().await.unwrap();
}

#[tokio::test]
async fn failures_do_not_stop_the_server() {
    let server = start();

    let (status, _) = invoke(&server, "WebTools..BraveSearch", json!({})).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, body) = invoke(&server, "WebTools", json!({ "operation": "bravesearch" })).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "unknown_operation");

    let (status, body) = invoke(&server, "FinanceTools.YahooStockPrice", json!({})).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["code"], "execution_failed");

    let params = json!({ "query": "ACME" });
    let (status, body) = invoke(&server, "FinanceTools.YahooStockPrice", params).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["result"], "YahooStockPrice results for ACME");

    server.shutdown().await.unwrap();
}
