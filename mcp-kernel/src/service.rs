//! Request routing for the discovery and invocation endpoints.

use std::sync::Arc;

use hyper::body::HttpBody;
use hyper::header::{ALLOW, CONTENT_TYPE, HeaderValue};
use hyper::{Body, Method, Request, Response, StatusCode};
use mcp_tools::{ToolError, ToolRegistry};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::wire::{ErrorResponse, InvokeRequest, InvokeResponse};

/// Path serving the capability tree.
pub const TOOLS_ROUTE: &str = "/tools";
/// Path accepting invocation requests.
pub const INVOKE_ROUTE: &str = "/invoke";
/// Liveness check path.
pub const HEALTH_ROUTE: &str = "/health";
/// Default cap on the size of an invocation body.
pub const DEFAULT_MAX_BODY_BYTES: usize = 1024 * 1024;

#[derive(Debug)]
enum BodyError {
    TooLarge(usize),
    Read(hyper::Error),
}

async fn read_body(mut body: Body, limit: usize) -> Result<Vec<u8>, BodyError> {
    if body.size_hint().lower() > u64::try_from(limit).unwrap_or(u64::MAX) {
        return Err(BodyError::TooLarge(limit));
    }

    let mut buffer = Vec::new();
    while let Some(chunk) = body.data().await {
        let chunk = chunk.map_err(BodyError::Read)?;
        if buffer.len() + chunk.len() > limit {
            return Err(BodyError::TooLarge(limit));
        }
        buffer.extend_from_slice(&chunk);
    }
    Ok(buffer)
}

/// Maps a tool failure onto the HTTP status reported to the caller.
#[must_use]
pub fn status_for(err: &ToolError) -> StatusCode {
    match err {
        ToolError::InvalidPath { .. }
        | ToolError::MissingOperation { .. }
        | ToolError::UnknownOperation { .. } => StatusCode::BAD_REQUEST,
        ToolError::ToolNotFound { .. } | ToolError::SubToolNotFound { .. } => {
            StatusCode::NOT_FOUND
        }
        ToolError::InvalidDefinition { .. }
        | ToolError::DuplicateTool { .. }
        | ToolError::Execution { .. } => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Routes HTTP requests onto a frozen [`ToolRegistry`].
#[derive(Debug, Clone)]
pub struct ToolService {
    registry: Arc<ToolRegistry>,
    max_body_bytes: usize,
}

impl ToolService {
    /// Creates a service over a shared registry.
    #[must_use]
    pub fn new(registry: Arc<ToolRegistry>) -> Self {
        Self {
            registry,
            max_body_bytes: DEFAULT_MAX_BODY_BYTES,
        }
    }

    /// Overrides the largest accepted invocation body.
    #[must_use]
    pub fn with_max_body_bytes(mut self, limit: usize) -> Self {
        self.max_body_bytes = limit;
        self
    }

    /// Returns the registry backing this service.
    #[must_use]
    pub fn registry(&self) -> &ToolRegistry {
        &self.registry
    }

    /// Handles one request. Failures are rendered into the response.
    pub async fn handle(&self, request: Request<Body>) -> Response<Body> {
        let method = request.method().clone();
        let path = request.uri().path().to_owned();
        debug!(%method, %path, "received request");

        match path.as_str() {
            TOOLS_ROUTE if method == Method::GET => self.capabilities(),
            INVOKE_ROUTE if method == Method::POST => self.invoke(request).await,
            HEALTH_ROUTE if method == Method::GET => text_response(StatusCode::OK, "ok"),
            TOOLS_ROUTE | HEALTH_ROUTE => method_not_allowed(&Method::GET),
            INVOKE_ROUTE => method_not_allowed(&Method::POST),
            _ => error_response(
                StatusCode::NOT_FOUND,
                &ErrorResponse::new(format!("no route for {path}"), "not_found"),
            ),
        }
    }

    fn capabilities(&self) -> Response<Body> {
        let capabilities = self.registry.capabilities();
        debug!(tools = capabilities.tools.len(), "serving capabilities");
        json_response(StatusCode::OK, &capabilities)
    }

    async fn invoke(&self, request: Request<Body>) -> Response<Body> {
        let body = match read_body(request.into_body(), self.max_body_bytes).await {
            Ok(body) => body,
            Err(BodyError::TooLarge(limit)) => {
                warn!(limit, "rejected oversized request body");
                return error_response(
                    StatusCode::PAYLOAD_TOO_LARGE,
                    &ErrorResponse::new(
                        format!("request body exceeds {limit} bytes"),
                        "payload_too_large",
                    ),
                );
            }
            Err(BodyError::Read(err)) => {
                warn!(%err, "failed to read request body");
                return error_response(
                    StatusCode::BAD_REQUEST,
                    &ErrorResponse::new(format!("failed to read request body: {err}"), "bad_request"),
                );
            }
        };

        let request: InvokeRequest = match serde_json::from_slice(&body) {
            Ok(request) => request,
            Err(err) => {
                warn!(%err, "rejected malformed invocation");
                return error_response(
                    StatusCode::BAD_REQUEST,
                    &ErrorResponse::new(format!("invalid request format: {err}"), "bad_request"),
                );
            }
        };

        match self.registry.invoke(&request.tool, &request.parameters).await {
            Ok(result) => {
                info!(tool = %request.tool, "tool invocation succeeded");
                json_response(StatusCode::OK, &InvokeResponse { result })
            }
            Err(err) => {
                let status = status_for(&err);
                warn!(tool = %request.tool, code = err.code(), %err, "tool invocation failed");
                error_response(status, &ErrorResponse::from(&err))
            }
        }
    }
}

fn json_response<T: Serialize>(status: StatusCode, payload: &T) -> Response<Body> {
    match serde_json::to_vec_pretty(payload) {
        Ok(bytes) => {
            let mut response = Response::new(Body::from(bytes));
            *response.status_mut() = status;
            response
                .headers_mut()
                .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
            response
        }
        Err(err) => {
            warn!(%err, "failed to encode response");
            text_response(StatusCode::INTERNAL_SERVER_ERROR, "failed to encode response")
        }
    }
}

fn error_response(status: StatusCode, payload: &ErrorResponse) -> Response<Body> {
    json_response(status, payload)
}

fn text_response(status: StatusCode, body: &'static str) -> Response<Body> {
    let mut response = Response::new(Body::from(body));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("text/plain; charset=utf-8"));
    response
}

fn method_not_allowed(allowed: &Method) -> Response<Body> {
    let mut response = error_response(
        StatusCode::METHOD_NOT_ALLOWED,
        &ErrorResponse::new("method not allowed", "method_not_allowed"),
    );
    if let Ok(value) = HeaderValue::from_str(allowed.as_str()) {
        response.headers_mut().insert(ALLOW, value);
    }
    response
}
