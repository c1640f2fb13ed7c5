use std::sync::{Arc, Mutex};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use time::{OffsetDateTime, UtcOffset};
use tracing::debug;

use crate::http_client::{
    HttpClient, HttpRequest, HttpResponse, ReqwestHttpClient, DEFAULT_USER_AGENT,
};
use crate::provider::{
    BulkQuotes, MarketDataProvider, ProviderBar, ProviderFuture, ProviderMetadata, SourceError,
};
use crate::{Period, Symbol};

const SOURCE_TAG: &str = "yfinance";
const REFERER: &str = "https://finance.yahoo.com/";
const SUMMARY_MODULES: &str =
    "price,summaryProfile,summaryDetail,defaultKeyStatistics,financialData";

/// Endpoints and transport settings for [`YahooProvider`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct YahooConfig {
    /// Page visited first so the cookie jar holds a session cookie.
    pub cookie_url: String,
    /// Crumb endpoints, tried in order.
    pub crumb_urls: Vec<String>,
    /// Base URL of the query API (`/v7`, `/v8`, `/v10` paths).
    pub query_url: String,
    pub user_agent: String,
    pub timeout_ms: u64,
}

impl Default for YahooConfig {
    fn default() -> Self {
        Self {
            cookie_url: String::from("https://fc.yahoo.com"),
            crumb_urls: vec![
                String::from("https://query1.finance.yahoo.com/v1/test/getcrumb"),
                String::from("https://query2.finance.yahoo.com/v1/test/getcrumb"),
            ],
            query_url: String::from("https://query1.finance.yahoo.com"),
            user_agent: String::from(DEFAULT_USER_AGENT),
            timeout_ms: 10_000,
        }
    }
}

impl YahooConfig {
    pub fn with_timeout_ms(mut self, timeout_ms: u64) -> Self {
        self.timeout_ms = timeout_ms;
        self
    }
}

// ============================================================================
// Session - cookie + crumb handshake
// ============================================================================

/// Holds the crumb obtained for the current cookie session.
///
/// Yahoo's query API expects:
/// 1. a session cookie set by `fc.yahoo.com` (kept by the transport's jar)
/// 2. a crumb from `/v1/test/getcrumb` passed as a query parameter
#[derive(Debug, Default)]
struct YahooSession {
    crumb: Mutex<Option<String>>,
}

impl YahooSession {
    fn cached(&self) -> Option<String> {
        self.crumb
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    fn store(&self, crumb: String) {
        *self
            .crumb
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(crumb);
    }

    async fn crumb(
        &self,
        http_client: &dyn HttpClient,
        config: &YahooConfig,
    ) -> Result<String, SourceError> {
        if let Some(crumb) = self.cached() {
            return Ok(crumb);
        }

        // fc.yahoo.com answers 404 but still sets the session cookie.
        let cookie_request = HttpRequest::get(config.cookie_url.as_str())
            .with_header("referer", REFERER)
            .with_timeout_ms(config.timeout_ms);
        http_client.execute(cookie_request).await.map_err(|e| {
            SourceError::unavailable(format!("failed to open yahoo session: {}", e.message()))
        })?;

        for endpoint in &config.crumb_urls {
            let crumb_request = HttpRequest::get(endpoint.as_str())
                .with_header("referer", REFERER)
                .with_timeout_ms(config.timeout_ms);

            let response = match http_client.execute(crumb_request).await {
                Ok(response) if response.is_success() => response,
                Ok(response) => {
                    debug!(
                        endpoint = %endpoint,
                        status = response.status,
                        "crumb endpoint refused"
                    );
                    continue;
                }
                Err(error) => {
                    debug!(endpoint = %endpoint, error = %error, "crumb endpoint unreachable");
                    continue;
                }
            };

            let body = response.body.trim();
            if body.to_ascii_lowercase().contains("too many requests") {
                return Err(SourceError::unavailable(
                    "yahoo rate limited while fetching crumb",
                ));
            }
            if is_plausible_crumb(body) {
                self.store(body.to_owned());
                return Ok(body.to_owned());
            }
        }

        Err(SourceError::unavailable(
            "failed to fetch yahoo crumb from all endpoints",
        ))
    }
}

fn is_plausible_crumb(body: &str) -> bool {
    !body.is_empty()
        && body.len() < 100
        && !body.contains(char::is_whitespace)
        && !body.contains('<')
}

// ============================================================================
// Yahoo provider
// ============================================================================

/// Yahoo Finance implementation of [`MarketDataProvider`].
#[derive(Clone)]
pub struct YahooProvider {
    http_client: Arc<dyn HttpClient>,
    config: YahooConfig,
    session: Arc<YahooSession>,
}

impl YahooProvider {
    pub fn new(config: YahooConfig) -> Self {
        let http_client = Arc::new(ReqwestHttpClient::new(&config.user_agent));
        Self::with_http_client(http_client, config)
    }

    pub fn with_http_client(http_client: Arc<dyn HttpClient>, config: YahooConfig) -> Self {
        Self {
            http_client,
            config,
            session: Arc::new(YahooSession::default()),
        }
    }

    /// GET `path_and_query` on the query API with the session crumb appended.
    async fn query(&self, path_and_query: &str) -> Result<HttpResponse, SourceError> {
        let crumb = self
            .session
            .crumb(self.http_client.as_ref(), &self.config)
            .await?;
        let url = format!(
            "{}{}&crumb={}",
            self.config.query_url.trim_end_matches('/'),
            path_and_query,
            urlencoding::encode(&crumb)
        );
        debug!(path = path_and_query, "yahoo request");

        let request = HttpRequest::get(url)
            .with_header("referer", REFERER)
            .with_timeout_ms(self.config.timeout_ms);

        self.http_client
            .execute(request)
            .await
            .map_err(|e| {
                SourceError::unavailable(format!("yahoo transport error: {}", e.message()))
            })
    }

    async fn fetch_metadata(&self, symbol: &Symbol) -> Result<ProviderMetadata, SourceError> {
        let path = format!(
            "/v10/finance/quoteSummary/{}?modules={}",
            urlencoding::encode(symbol.as_str()),
            SUMMARY_MODULES
        );
        let response = self.query(&path).await?;
        let summary: YahooQuoteSummaryResponse = decode(&response, "quote summary")?;
        if let Some(error) = summary.quote_summary.error {
            return Err(error.into_source_error());
        }

        summary
            .quote_summary
            .result
            .unwrap_or_default()
            .into_iter()
            .next()
            .map(YahooQuoteSummaryResult::into_metadata)
            .ok_or_else(|| SourceError::not_found(format!("Quote not found for symbol: {symbol}")))
    }

    async fn fetch_bars(
        &self,
        symbol: &Symbol,
        period: Period,
    ) -> Result<Vec<ProviderBar>, SourceError> {
        let path = format!(
            "/v8/finance/chart/{}?range={}&interval=1d&includePrePost=false",
            urlencoding::encode(symbol.as_str()),
            period.as_str()
        );
        let response = self.query(&path).await?;
        let chart: YahooChartResponse = decode(&response, "chart")?;
        if let Some(error) = chart.chart.error {
            return Err(error.into_source_error());
        }

        match chart.chart.result.unwrap_or_default().into_iter().next() {
            Some(result) => result.into_bars(),
            None => Ok(Vec::new()),
        }
    }

    async fn fetch_bulk_quotes(&self, symbols: &[Symbol]) -> Result<BulkQuotes, SourceError> {
        if symbols.is_empty() {
            return Err(SourceError::invalid_request(
                "bulk quote request requires at least one symbol",
            ));
        }

        let symbols_param = symbols
            .iter()
            .map(Symbol::as_str)
            .collect::<Vec<_>>()
            .join(",");
        let path = format!(
            "/v7/finance/quote?symbols={}",
            urlencoding::encode(&symbols_param)
        );
        let response = self.query(&path).await?;
        let quotes: YahooQuoteResponse = decode(&response, "quote")?;
        if let Some(error) = quotes.quote_response.error {
            return Err(error.into_source_error());
        }

        let bulk: BulkQuotes = quotes
            .quote_response
            .result
            .unwrap_or_default()
            .into_iter()
            .map(|quote| (quote.symbol.clone(), quote.into_metadata()))
            .collect();
        if bulk.is_empty() {
            debug!(symbols = %symbols_param, "bulk quote matched no symbols");
        }
        Ok(bulk)
    }
}

impl MarketDataProvider for YahooProvider {
    fn source_tag(&self) -> &'static str {
        SOURCE_TAG
    }

    fn metadata<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, ProviderMetadata> {
        Box::pin(self.fetch_metadata(symbol))
    }

    fn bars<'a>(
        &'a self,
        symbol: &'a Symbol,
        period: Period,
    ) -> ProviderFuture<'a, Vec<ProviderBar>> {
        Box::pin(self.fetch_bars(symbol, period))
    }

    fn bulk_quotes<'a>(&'a self, symbols: &'a [Symbol]) -> ProviderFuture<'a, BulkQuotes> {
        Box::pin(self.fetch_bulk_quotes(symbols))
    }
}

/// Decode a Yahoo JSON body. Error responses usually still carry a JSON
/// `error` object, so the body is decoded before the status is judged.
fn decode<T: DeserializeOwned>(response: &HttpResponse, what: &str) -> Result<T, SourceError> {
    match serde_json::from_str::<T>(&response.body) {
        Ok(value) => Ok(value),
        Err(error) if response.is_success() => Err(SourceError::invalid_response(format!(
            "failed to parse yahoo {what} response: {error}"
        ))),
        Err(_) => Err(status_error(response.status)),
    }
}

fn status_error(status: u16) -> SourceError {
    match status {
        404 => SourceError::not_found("yahoo returned status 404"),
        400 => SourceError::invalid_request("yahoo returned status 400"),
        _ => SourceError::unavailable(format!("yahoo returned status {status}")),
    }
}

fn finite(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite())
}

fn whole(value: Option<f64>) -> Option<i64> {
    finite(value).map(|v| v.round() as i64)
}

// ============================================================================
// Yahoo API response structures
// ============================================================================

#[derive(Debug, Clone, Deserialize)]
struct YahooApiError {
    code: String,
    #[serde(default)]
    description: Option<String>,
}

impl YahooApiError {
    fn into_source_error(self) -> SourceError {
        let message = match self.description {
            Some(description) if !description.is_empty() => description,
            _ => self.code.clone(),
        };
        if self.code.eq_ignore_ascii_case("Not Found") {
            SourceError::not_found(message)
        } else if self.code.eq_ignore_ascii_case("Bad Request") {
            SourceError::invalid_request(message)
        } else {
            SourceError::unavailable(format!("yahoo API error: {message}"))
        }
    }
}

/// Yahoo wraps most numbers as `{"raw": 1.5, "fmt": "1.50"}`, or `{}` when
/// the figure is unknown. `raw` is occasionally a string such as
/// `"Infinity"`, which is treated as unknown.
#[derive(Debug, Clone, Default, Deserialize)]
struct YahooRawValue {
    #[serde(default)]
    raw: Option<serde_json::Value>,
}

impl YahooRawValue {
    fn value(&self) -> Option<f64> {
        finite(self.raw.as_ref().and_then(serde_json::Value::as_f64))
    }
}

fn raw(value: &Option<YahooRawValue>) -> Option<f64> {
    value.as_ref().and_then(YahooRawValue::value)
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteResponse {
    #[serde(rename = "quoteResponse")]
    quote_response: YahooQuoteData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteData {
    #[serde(default)]
    result: Option<Vec<YahooQuoteResult>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct YahooQuoteResult {
    symbol: String,
    #[serde(default)]
    short_name: Option<String>,
    #[serde(default)]
    long_name: Option<String>,
    #[serde(default)]
    currency: Option<String>,
    #[serde(default)]
    market_cap: Option<f64>,
}

impl YahooQuoteResult {
    fn into_metadata(self) -> ProviderMetadata {
        ProviderMetadata {
            symbol: Some(self.symbol),
            short_name: self.short_name,
            long_name: self.long_name,
            currency: self.currency,
            market_cap: whole(self.market_cap),
            ..ProviderMetadata::default()
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResponse {
    chart: YahooChartData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartData {
    #[serde(default)]
    result: Option<Vec<YahooChartResult>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooChartResult {
    #[serde(default)]
    meta: YahooChartMeta,
    #[serde(default)]
    timestamp: Vec<i64>,
    #[serde(default)]
    indicators: YahooChartIndicators,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartMeta {
    /// Exchange offset from UTC in seconds (19800 for NSE).
    #[serde(default)]
    gmtoffset: i32,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartIndicators {
    #[serde(default)]
    quote: Vec<YahooChartQuote>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct YahooChartQuote {
    #[serde(default)]
    open: Vec<Option<f64>>,
    #[serde(default)]
    high: Vec<Option<f64>>,
    #[serde(default)]
    low: Vec<Option<f64>>,
    #[serde(default)]
    close: Vec<Option<f64>>,
    #[serde(default)]
    volume: Vec<Option<f64>>,
}

impl YahooChartResult {
    fn into_bars(self) -> Result<Vec<ProviderBar>, SourceError> {
        let offset = UtcOffset::from_whole_seconds(self.meta.gmtoffset).unwrap_or(UtcOffset::UTC);
        let Some(quote) = self.indicators.quote.into_iter().next() else {
            return Ok(Vec::new());
        };
        let at = |series: &[Option<f64>], i: usize| finite(series.get(i).copied().flatten());

        let mut bars = Vec::with_capacity(self.timestamp.len());
        for (i, &ts) in self.timestamp.iter().enumerate() {
            // Rows with a missing price are padding for halted sessions.
            let (Some(open), Some(high), Some(low), Some(close)) = (
                at(&quote.open, i),
                at(&quote.high, i),
                at(&quote.low, i),
                at(&quote.close, i),
            ) else {
                continue;
            };

            let date = OffsetDateTime::from_unix_timestamp(ts)
                .map_err(|e| {
                    SourceError::invalid_response(format!("invalid bar timestamp {ts}: {e}"))
                })?
                .to_offset(offset)
                .date();

            bars.push(ProviderBar {
                date,
                open,
                high,
                low,
                close,
                volume: at(&quote.volume, i).unwrap_or(f64::NAN),
            });
        }

        Ok(bars)
    }
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteSummaryResponse {
    #[serde(rename = "quoteSummary")]
    quote_summary: YahooQuoteSummaryData,
}

#[derive(Debug, Clone, Deserialize)]
struct YahooQuoteSummaryData {
    #[serde(default)]
    result: Option<Vec<YahooQuoteSummaryResult>>,
    #[serde(default)]
    error: Option<YahooApiError>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct YahooQuoteSummaryResult {
    price: Option<YahooPriceModule>,
    summary_profile: Option<YahooSummaryProfileModule>,
    summary_detail: Option<YahooSummaryDetailModule>,
    default_key_statistics: Option<YahooKeyStatisticsModule>,
    financial_data: Option<YahooFinancialDataModule>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct YahooPriceModule {
    symbol: Option<String>,
    short_name: Option<String>,
    long_name: Option<String>,
    currency: Option<String>,
    market_cap: Option<YahooRawValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct YahooSummaryProfileModule {
    sector: Option<String>,
    industry: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct YahooSummaryDetailModule {
    #[serde(rename = "trailingPE")]
    trailing_pe: Option<YahooRawValue>,
    #[serde(rename = "forwardPE")]
    forward_pe: Option<YahooRawValue>,
    #[serde(rename = "priceToSalesTrailing12Months")]
    price_to_sales: Option<YahooRawValue>,
    beta: Option<YahooRawValue>,
    #[serde(rename = "dividendYield")]
    dividend_yield: Option<YahooRawValue>,
    #[serde(rename = "payoutRatio")]
    payout_ratio: Option<YahooRawValue>,
    #[serde(rename = "marketCap")]
    market_cap: Option<YahooRawValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct YahooKeyStatisticsModule {
    #[serde(rename = "enterpriseValue")]
    enterprise_value: Option<YahooRawValue>,
    #[serde(rename = "forwardPE")]
    forward_pe: Option<YahooRawValue>,
    #[serde(rename = "pegRatio")]
    peg_ratio: Option<YahooRawValue>,
    #[serde(rename = "priceToBook")]
    price_to_book: Option<YahooRawValue>,
    #[serde(rename = "enterpriseToRevenue")]
    enterprise_to_revenue: Option<YahooRawValue>,
    #[serde(rename = "enterpriseToEbitda")]
    enterprise_to_ebitda: Option<YahooRawValue>,
    #[serde(rename = "trailingEps")]
    trailing_eps: Option<YahooRawValue>,
    beta: Option<YahooRawValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase", default)]
struct YahooFinancialDataModule {
    total_revenue: Option<YahooRawValue>,
    gross_margins: Option<YahooRawValue>,
    operating_margins: Option<YahooRawValue>,
    profit_margins: Option<YahooRawValue>,
    return_on_equity: Option<YahooRawValue>,
    return_on_assets: Option<YahooRawValue>,
    debt_to_equity: Option<YahooRawValue>,
    current_ratio: Option<YahooRawValue>,
    quick_ratio: Option<YahooRawValue>,
}

impl YahooQuoteSummaryResult {
    fn into_metadata(self) -> ProviderMetadata {
        let price = self.price.unwrap_or_default();
        let profile = self.summary_profile.unwrap_or_default();
        let detail = self.summary_detail.unwrap_or_default();
        let stats = self.default_key_statistics.unwrap_or_default();
        let financial = self.financial_data.unwrap_or_default();

        ProviderMetadata {
            symbol: price.symbol,
            short_name: price.short_name,
            long_name: price.long_name,
            sector: profile.sector,
            industry: profile.industry,
            currency: price.currency,
            market_cap: whole(raw(&price.market_cap).or_else(|| raw(&detail.market_cap))),
            enterprise_value: whole(raw(&stats.enterprise_value)),
            trailing_pe: raw(&detail.trailing_pe),
            forward_pe: raw(&stats.forward_pe).or_else(|| raw(&detail.forward_pe)),
            peg_ratio: raw(&stats.peg_ratio),
            price_to_sales: raw(&detail.price_to_sales),
            price_to_book: raw(&stats.price_to_book),
            enterprise_to_revenue: raw(&stats.enterprise_to_revenue),
            enterprise_to_ebitda: raw(&stats.enterprise_to_ebitda),
            beta: raw(&detail.beta).or_else(|| raw(&stats.beta)),
            trailing_eps: raw(&stats.trailing_eps),
            total_revenue: whole(raw(&financial.total_revenue)),
            gross_margins: raw(&financial.gross_margins),
            operating_margins: raw(&financial.operating_margins),
            profit_margins: raw(&financial.profit_margins),
            return_on_equity: raw(&financial.return_on_equity),
            return_on_assets: raw(&financial.return_on_assets),
            debt_to_equity: raw(&financial.debt_to_equity),
            current_ratio: raw(&financial.current_ratio),
            quick_ratio: raw(&financial.quick_ratio),
            dividend_yield: raw(&detail.dividend_yield),
            payout_ratio: raw(&detail.payout_ratio),
        }
    }
}
