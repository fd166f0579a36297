//! Brave Search leaf tool.

use std::fmt::{self, Write as _};
use std::time::Duration;

use async_trait::async_trait;
use html_escape::decode_html_entities;
use hyper::header::ACCEPT;
use hyper::{Body, Request, Uri};
use mcp_primitives::{ParamSpec, ParamType, ParameterSchema};
use mcp_tools::{Params, Tool, ToolResult, lenient_optional, parse_params};
use serde::Deserialize;
use tracing::debug;

use crate::error::{AdapterError, AdapterResult};
use crate::http_client::{HyperClient, build_https_client, fetch};

/// Name under which the tool is addressed.
pub const BRAVE_SEARCH: &str = "BraveSearch";

const DEFAULT_BASE_URL: &str = "https://api.search.brave.com/res/v1/";
const TOKEN_HEADER: &str = "X-Subscription-Token";
const MAX_RESULTS: usize = 3;

/// Configuration for [`BraveSearchTool`].
#[derive(Clone)]
pub struct BraveConfig {
    api_key: String,
    base_url: String,
    timeout: Duration,
}

impl fmt::Debug for BraveConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BraveConfig")
            .field("base_url", &self.base_url)
            .field("timeout", &self.timeout)
            .finish_non_exhaustive()
    }
}

impl BraveConfig {
    /// Creates a configuration using the supplied subscription token.
    #[must_use]
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: DEFAULT_BASE_URL.to_owned(),
            timeout: Duration::from_secs(30),
        }
    }

    /// Overrides the API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] if the URL is not absolute
    /// http(s).
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> AdapterResult<Self> {
        self.base_url = sanitize_base_url(base_url.as_ref())?;
        Ok(self)
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

/// Kind of Brave search to run.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchType {
    /// General web results.
    #[default]
    Web,
    /// Image results.
    #[serde(alias = "images")]
    Image,
    /// Video results.
    #[serde(alias = "videos")]
    Video,
    /// News articles.
    News,
}

impl SearchType {
    fn endpoint(self) -> &'static str {
        match self {
            Self::Web => "web",
            Self::Image => "images",
            Self::Video => "videos",
            Self::News => "news",
        }
    }

    fn heading(self) -> &'static str {
        match self {
            Self::Web => "## Brave Web Search Results",
            Self::Image => "## Brave Image Search Results",
            Self::Video => "## Brave Video Search Results",
            Self::News => "## Brave News Search Results",
        }
    }
}

#[derive(Debug, Deserialize)]
struct SearchInput {
    query: String,
    #[serde(default, deserialize_with = "lenient_optional")]
    api_key: Option<String>,
    #[serde(default, deserialize_with = "lenient_optional")]
    search_type: Option<SearchType>,
    #[serde(default, deserialize_with = "lenient_optional")]
    safesearch: Option<String>,
    #[serde(default, deserialize_with = "lenient_optional")]
    count: Option<u32>,
    #[serde(default, deserialize_with = "lenient_optional")]
    search_lang: Option<String>,
    #[serde(default, deserialize_with = "lenient_optional")]
    country: Option<String>,
    #[serde(default, deserialize_with = "lenient_optional")]
    spellcheck: Option<bool>,
}

/// Leaf tool that queries the Brave Search API and renders Markdown.
pub struct BraveSearchTool {
    client: HyperClient,
    config: BraveConfig,
    parameters: ParameterSchema,
}

impl fmt::Debug for BraveSearchTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BraveSearchTool")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl BraveSearchTool {
    /// Creates the tool from its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Definition`] if the parameter schema cannot be
    /// built.
    pub fn new(config: BraveConfig) -> AdapterResult<Self> {
        let parameters = ParameterSchema::builder()
            .param("query", ParamSpec::required(ParamType::String))?
            .param(
                "api_key",
                ParamSpec::optional(ParamType::String)
                    .with_description("Overrides the configured subscription token"),
            )?
            .param(
                "search_type",
                ParamSpec::optional(ParamType::String)
                    .with_description("Type of search: web, image, video, news"),
            )?
            .param(
                "safesearch",
                ParamSpec::optional(ParamType::String)
                    .with_description("Safe search level: strict, moderate, or off"),
            )?
            .param(
                "count",
                ParamSpec::optional(ParamType::Int).with_description("Number of results to return"),
            )?
            .param(
                "search_lang",
                ParamSpec::optional(ParamType::String)
                    .with_description("Language for the search results"),
            )?
            .param(
                "country",
                ParamSpec::optional(ParamType::String)
                    .with_description("Country for the search results"),
            )?
            .param(
                "spellcheck",
                ParamSpec::optional(ParamType::Bool)
                    .with_description("Enable or disable spellcheck"),
            )?
            .build();

        Ok(Self {
            client: build_https_client(),
            config,
            parameters,
        })
    }

    async fn search(&self, input: SearchInput) -> AdapterResult<String> {
        let api_key = input
            .api_key
            .as_deref()
            .filter(|key| !key.is_empty())
            .unwrap_or(&self.config.api_key);
        if api_key.is_empty() {
            return Err(AdapterError::configuration("Brave API key not configured"));
        }

        let search_type = input.search_type.unwrap_or_default();
        let uri = build_search_uri(&self.config.base_url, search_type, &input)?;
        debug!(%uri, "querying Brave Search");

        let request = Request::get(uri)
            .header(ACCEPT, "application/json")
            .header(TOKEN_HEADER, api_key)
            .body(Body::empty())
            .map_err(|err| {
                AdapterError::invalid_request(format!("failed to build Brave request: {err}"))
            })?;

        let body = fetch(&self.client, request, self.config.timeout, "Brave Search").await?;
        render_results(search_type, &body)
    }
}

#[async_trait]
impl Tool for BraveSearchTool {
    fn name(&self) -> &str {
        BRAVE_SEARCH
    }

    fn description(&self) -> &str {
        "Search the web using the Brave Search API and return results in Markdown format"
    }

    fn parameters(&self) -> &ParameterSchema {
        &self.parameters
    }

    async fn execute(&self, params: &Params) -> ToolResult<String> {
        let input: SearchInput = parse_params(params)?;
        Ok(self.search(input).await?)
    }
}

fn build_search_uri(
    base_url: &str,
    search_type: SearchType,
    input: &SearchInput,
) -> AdapterResult<Uri> {
    let mut uri = format!(
        "{base_url}{}/search?q={}",
        search_type.endpoint(),
        urlencoding::encode(&input.query)
    );

    let optional = [
        ("safesearch", input.safesearch.as_deref()),
        ("search_lang", input.search_lang.as_deref()),
        ("country", input.country.as_deref()),
    ];
    for (key, value) in optional {
        if let Some(value) = value.filter(|v| !v.is_empty()) {
            let _ = write!(uri, "&{key}={}", urlencoding::encode(value));
        }
    }
    if let Some(count) = input.count.filter(|count| *count > 0) {
        let _ = write!(uri, "&count={count}");
    }
    let _ = write!(
        uri,
        "&spellcheck={}",
        u8::from(input.spellcheck.unwrap_or(false))
    );

    uri.parse::<Uri>()
        .map_err(|err| AdapterError::invalid_request(format!("invalid Brave URL: {err}")))
}

#[derive(Debug, Default, Deserialize)]
struct SearchResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Default, Deserialize)]
struct ResultList {
    #[serde(default)]
    results: Vec<SearchResult>,
}

#[derive(Debug, Default, Deserialize)]
struct WebSearchResponse {
    #[serde(default)]
    web: ResultList,
}

fn render_results(search_type: SearchType, body: &[u8]) -> AdapterResult<String> {
    let decode_err =
        |err: serde_json::Error| AdapterError::response(format!("failed to parse response: {err}"));

    let results = match search_type {
        SearchType::Web => {
            let mut response: WebSearchResponse =
                serde_json::from_slice(body).map_err(decode_err)?;
            for result in &mut response.web.results {
                result.description = decode_html_entities(&result.description).into_owned();
            }
            response.web.results
        }
        SearchType::Image | SearchType::Video | SearchType::News => {
            serde_json::from_slice::<ResultList>(body)
                .map_err(decode_err)?
                .results
        }
    };

    Ok(render_markdown(search_type.heading(), &results))
}

fn render_markdown(heading: &str, results: &[SearchResult]) -> String {
    let mut markdown = heading.to_owned();
    for (index, result) in results.iter().take(MAX_RESULTS).enumerate() {
        if index > 0 {
            markdown.push('\n');
        }
        let _ = write!(
            markdown,
            "\n- **{}**\n  {}\n  {}",
            result.title, result.url, result.description
        );
    }
    if results.is_empty() {
        markdown.push_str("\nNo results found.");
    }
    markdown
}

fn sanitize_base_url(input: &str) -> AdapterResult<String> {
    let trimmed = input.trim();
    if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
        return Err(AdapterError::configuration(format!(
            "base URL must be absolute http(s): {trimmed}"
        )));
    }
    let mut url = trimmed.to_owned();
    if !url.ends_with('/') {
        url.push('/');
    }
    Ok(url)
}
