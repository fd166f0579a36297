//! Yahoo Finance historical price leaf tool.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use hyper::header::{ACCEPT, USER_AGENT};
use hyper::{Body, Request, Uri};
use mcp_primitives::{ParamSpec, ParamType, ParameterSchema};
use mcp_tools::{Params, Tool, ToolResult, lenient_optional, parse_params};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::debug;

use crate::error::{AdapterError, AdapterResult};
use crate::http_client::{HyperClient, build_https_client, fetch};

/// Name under which the tool is addressed.
pub const YAHOO_STOCK_PRICE: &str = "YahooStockPrice";

const DEFAULT_BASE_URL: &str = "https://query1.finance.yahoo.com/v8/finance/chart/";
const DEFAULT_PERIOD: &str = "1mo";
const MAX_ENTRIES: usize = 5;

/// Configuration for [`YahooStockPriceTool`].
#[derive(Clone, Debug)]
pub struct YahooConfig {
    base_url: String,
    user_agent: String,
    timeout: Duration,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_BASE_URL.to_owned(),
            user_agent: concat!("mcp-adapters/", env!("CARGO_PKG_VERSION")).to_owned(),
            timeout: Duration::from_secs(30),
        }
    }
}

impl YahooConfig {
    /// Overrides the chart API base URL.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] if the URL is not absolute
    /// http(s).
    pub fn with_base_url(mut self, base_url: impl AsRef<str>) -> AdapterResult<Self> {
        let trimmed = base_url.as_ref().trim();
        if !(trimmed.starts_with("https://") || trimmed.starts_with("http://")) {
            return Err(AdapterError::configuration(format!(
                "base URL must be absolute http(s): {trimmed}"
            )));
        }
        self.base_url = if trimmed.ends_with('/') {
            trimmed.to_owned()
        } else {
            format!("{trimmed}/")
        };
        Ok(self)
    }

    /// Sets the per-request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }
}

#[derive(Debug, Deserialize)]
struct PriceInput {
    ticker: String,
    interval: String,
    #[serde(default, deserialize_with = "lenient_optional")]
    period: Option<String>,
}

/// One day of price data.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockPriceEntry {
    /// Trading date, `YYYY-MM-DD` in UTC.
    pub date: String,
    /// Opening price.
    pub open: f64,
    /// Highest price.
    pub high: f64,
    /// Lowest price.
    pub low: f64,
    /// Closing price.
    pub close: f64,
    /// Traded volume.
    pub volume: i64,
}

/// Structured output of [`YahooStockPriceTool`].
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StockPriceResponse {
    /// Requested ticker symbol.
    pub ticker: String,
    /// Sampling interval, e.g. `1d`.
    pub interval: String,
    /// Covered range, e.g. `1mo`.
    pub period: String,
    /// Price entries in chronological order.
    pub prices: Vec<StockPriceEntry>,
}

/// Leaf tool that fetches historical prices from the Yahoo Finance chart API.
pub struct YahooStockPriceTool {
    client: HyperClient,
    config: YahooConfig,
    parameters: ParameterSchema,
}

impl fmt::Debug for YahooStockPriceTool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("YahooStockPriceTool")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl YahooStockPriceTool {
    /// Creates the tool from its configuration.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Definition`] if the parameter schema cannot be
    /// built.
    pub fn new(config: YahooConfig) -> AdapterResult<Self> {
        let parameters = ParameterSchema::builder()
            .param("ticker", ParamSpec::required(ParamType::String))?
            .param(
                "interval",
                ParamSpec::required(ParamType::String).with_description("e.g. 1d, 1wk, 1mo"),
            )?
            .param(
                "period",
                ParamSpec::optional(ParamType::String)
                    .with_description("e.g. 1mo, 3mo, 1y (default 1mo)"),
            )?
            .build();

        Ok(Self {
            client: build_https_client(),
            config,
            parameters,
        })
    }

    async fn prices(&self, input: PriceInput) -> AdapterResult<String> {
        let period = input
            .period
            .filter(|period| !period.is_empty())
            .unwrap_or_else(|| DEFAULT_PERIOD.to_owned());

        let uri = format!(
            "{}{}?interval={}&range={}&includePrePost=false",
            self.config.base_url,
            urlencoding::encode(&input.ticker),
            urlencoding::encode(&input.interval),
            urlencoding::encode(&period),
        )
        .parse::<Uri>()
        .map_err(|err| AdapterError::invalid_request(format!("invalid Yahoo URL: {err}")))?;
        debug!(%uri, "querying Yahoo Finance");

        let request = Request::get(uri)
            .header(ACCEPT, "application/json")
            .header(USER_AGENT, self.config.user_agent.as_str())
            .body(Body::empty())
            .map_err(|err| {
                AdapterError::invalid_request(format!("failed to build Yahoo request: {err}"))
            })?;

        let body = fetch(&self.client, request, self.config.timeout, "Yahoo Finance").await?;
        let response = parse_chart(&body, input.ticker, input.interval, period)?;

        serde_json::to_string(&response).map_err(|err| {
            AdapterError::response(format!("failed to marshal structured response: {err}"))
        })
    }
}

#[async_trait]
impl Tool for YahooStockPriceTool {
    fn name(&self) -> &str {
        YAHOO_STOCK_PRICE
    }

    fn description(&self) -> &str {
        "Fetch historical stock prices from Yahoo Finance with a specified interval in structured JSON format"
    }

    fn parameters(&self) -> &ParameterSchema {
        &self.parameters
    }

    async fn execute(&self, params: &Params) -> ToolResult<String> {
        let input: PriceInput = parse_params(params)?;
        Ok(self.prices(input).await?)
    }
}

#[derive(Debug, Deserialize)]
struct ChartEnvelope {
    chart: Chart,
}

#[derive(Debug, Deserialize)]
struct Chart {
    #[serde(default)]
    result: Option<Vec<ChartResult>>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Debug, Deserialize)]
struct ChartResult {
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: Indicators,
}

#[derive(Debug, Default, Deserialize)]
struct Indicators {
    #[serde(default)]
    quote: Vec<Quote>,
}

#[derive(Debug, Default, Deserialize)]
struct Quote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<i64>>,
}

fn value_at<T: Copy + Default>(series: &[Option<T>], index: usize) -> T {
    series.get(index).copied().flatten().unwrap_or_default()
}

fn parse_chart(
    body: &[u8],
    ticker: String,
    interval: String,
    period: String,
) -> AdapterResult<StockPriceResponse> {
    let envelope: ChartEnvelope = serde_json::from_slice(body)
        .map_err(|err| AdapterError::response(format!("failed to parse response: {err}")))?;

    let chart = envelope.chart;
    let result = match (chart.result, chart.error) {
        (Some(results), None) => results.into_iter().next(),
        _ => None,
    }
    .ok_or_else(|| AdapterError::response(format!("no stock data found for ticker {ticker}")))?;

    let Some(quote) = result.indicators.quote.first() else {
        return Err(AdapterError::response(format!(
            "no historical data available for ticker {ticker}"
        )));
    };
    if result.timestamp.is_empty() {
        return Err(AdapterError::response(format!(
            "no historical data available for ticker {ticker}"
        )));
    }

    let prices = result
        .timestamp
        .iter()
        .take(MAX_ENTRIES)
        .enumerate()
        .map(|(index, timestamp)| StockPriceEntry {
            date: DateTime::<Utc>::from_timestamp(*timestamp, 0)
                .map(|date| date.format("%Y-%m-%d").to_string())
                .unwrap_or_default(),
            open: value_at(&quote.open, index),
            high: value_at(&quote.high, index),
            low: value_at(&quote.low, index),
            close: value_at(&quote.close, index),
            volume: value_at(&quote.volume, index),
        })
        .collect();

    Ok(StockPriceResponse {
        ticker,
        interval,
        period,
        prices,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    use serde_json::json;

    fn chart(timestamps: &[i64]) -> Vec<u8> {
        json!({
            "chart": {
                "result": [{
                    "meta": { "currency": "USD", "symbol": "ACME", "regularMarketPrice": 12.5 },
                    "timestamp": timestamps,
                    "indicators": { "quote": [{
                        "open":   [1.0, 2.0, null, 4.0, 5.0, 6.0],
                        "high":   [1.5, 2.5, 3.5, 4.5, 5.5, 6.5],
                        "low":    [0.5, 1.5, 2.5, 3.5, 4.5, 5.5],
                        "close":  [1.2, 2.2, 3.2, 4.2, 5.2, 6.2],
                        "volume": [100, 200, 300, 400, 500, 600],
                    }]}
                }],
                "error": null
            }
        })
        .to_string()
        .into_bytes()
    }

    fn parse(body: &[u8]) -> AdapterResult<StockPriceResponse> {
        parse_chart(body, "ACME".into(), "1d".into(), "1mo".into())
    }

    #[test]
    fn limits_entries_and_formats_dates() {
        let day = 86_400;
        let timestamps: Vec<i64> = (0..6).map(|i| 1_704_067_200 + i * day).collect();
        let response = parse(&chart(&timestamps)).unwrap();

        assert_eq!(response.prices.len(), MAX_ENTRIES);
        assert_eq!(response.prices[0].date, "2024-01-01");
        assert_eq!(response.prices[4].date, "2024-01-05");
        assert_eq!(response.prices[1].volume, 200);
        assert!(response.prices[2].open.abs() < f64::EPSILON);
    }

    #[test]
    fn serializes_structured_output() {
        let response = parse(&chart(&[1_704_067_200])).unwrap();
        let value = serde_json::to_value(&response).unwrap();

        assert_eq!(
            value,
            json!({
                "ticker": "ACME",
                "interval": "1d",
                "period": "1mo",
                "prices": [{
                    "date": "2024-01-01",
                    "open": 1.0, "high": 1.5, "low": 0.5, "close": 1.2, "volume": 100
                }]
            })
        );
    }

    #[test]
    fn mistyped_period_falls_back_to_default() {
        let params = json!({ "ticker": "ACME", "interval": "1d", "period": 3 });
        let input: PriceInput = parse_params(params.as_object().unwrap()).unwrap();
        assert_eq!(input.ticker, "ACME");
        assert_eq!(input.period, None);

        let params = json!({ "ticker": "ACME", "interval": 1 });
        assert!(parse_params::<PriceInput>(params.as_object().unwrap()).is_err());
    }

    #[test]
    fn chart_error_is_reported() {
        let body = json!({
            "chart": { "result": null, "error": { "code": "Not Found", "description": "No data found" } }
        });
        let err = parse(body.to_string().as_bytes()).unwrap_err();
        assert!(matches!(err, AdapterError::Response { reason } if reason.contains("ACME")));
    }

    #[test]
    fn empty_history_is_reported() {
        let err = parse(&chart(&[])).unwrap_err();
        assert!(
            matches!(err, AdapterError::Response { reason } if reason.contains("no historical data"))
        );
    }
}
