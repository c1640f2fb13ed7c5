//! Contract tests every `MarketDataProvider` implementation must satisfy.
//!
//! The same checks run against the scripted test provider and against the
//! Yahoo adapter wired to a canned HTTP transport, so no network is used.

#[path = "../support/mod.rs"]
mod support;

use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use quotefeed_core::{
    HttpClient, HttpError, HttpRequest, HttpResponse, MarketDataProvider, Normalizer, Period,
    ProviderMetadata, SourceErrorKind, Symbol, YahooConfig, YahooProvider,
};
use support::{daily_bars, ScriptedProvider};

/// Serves fixed bodies by URL fragment; anything else is a 404.
struct CannedHttpClient {
    routes: Vec<(&'static str, u16, &'static str)>,
}

impl HttpClient for CannedHttpClient {
    fn execute<'a>(
        &'a self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, HttpError>> + Send + 'a>> {
        let response = self
            .routes
            .iter()
            .find(|(fragment, _, _)| request.url.contains(fragment))
            .map(|(_, status, body)| HttpResponse::with_status(*status, *body))
            .unwrap_or_else(|| HttpResponse::with_status(404, ""));
        Box::pin(async move { Ok(response) })
    }
}

const NOT_FOUND_SUMMARY: &str = r#"{"quoteSummary":{"result":null,"error":{"code":"Not Found","description":"Quote not found for symbol: NOPE.NS"}}}"#;

fn yahoo_provider() -> YahooProvider {
    let client = CannedHttpClient {
        routes: vec![
            ("fc.yahoo.com", 404, ""),
            ("getcrumb", 200, "crumb-1"),
            (
                "/v10/finance/quoteSummary/TCS.NS",
                200,
                r#"{"quoteSummary":{"result":[{"price":{"symbol":"TCS.NS","shortName":"TCS","longName":"Tata Consultancy Services Limited","marketCap":{"raw":14100000000000}}}],"error":null}}"#,
            ),
            ("/v10/finance/quoteSummary/NOPE.NS", 404, NOT_FOUND_SUMMARY),
            (
                "/v8/finance/chart/TCS.NS",
                200,
                r#"{"chart":{"result":[{"meta":{"gmtoffset":19800},"timestamp":[1714621500,1714707900],"indicators":{"quote":[{"open":[3850.0,3870.0],"high":[3890.0,3900.0],"low":[3840.0,3860.0],"close":[3880.0,3895.0],"volume":[1000,2000]}]}}],"error":null}}"#,
            ),
            (
                "/v7/finance/quote",
                200,
                r#"{"quoteResponse":{"result":[{"symbol":"TCS.NS","longName":"Tata Consultancy Services Limited","marketCap":14100000000000}],"error":null}}"#,
            ),
        ],
    };
    YahooProvider::with_http_client(Arc::new(client), YahooConfig::default())
}

fn scripted_provider() -> ScriptedProvider {
    ScriptedProvider::new()
        .with_metadata(
            "TCS.NS",
            ProviderMetadata {
                symbol: Some(String::from("TCS.NS")),
                long_name: Some(String::from("Tata Consultancy Services Limited")),
                market_cap: Some(14_100_000_000_000),
                ..ProviderMetadata::default()
            },
        )
        .with_bars("TCS.NS", daily_bars(&[3880.0, 3895.0]))
}

fn symbol(raw: &str) -> Symbol {
    Symbol::parse(raw).expect("valid symbol")
}

async fn assert_provider_contract<P: MarketDataProvider>(provider: &P) {
    let tcs = symbol("TCS.NS");

    // Known symbols are identified.
    let metadata = provider.metadata(&tcs).await.expect("metadata for TCS.NS");
    assert!(metadata.is_identified());
    assert_eq!(metadata.display_name(), Some("Tata Consultancy Services Limited"));

    // Unknown symbols fail with NotFound.
    let error = provider
        .metadata(&symbol("NOPE.NS"))
        .await
        .expect_err("unknown symbol should fail");
    assert_eq!(error.kind(), SourceErrorKind::NotFound);

    // Bars come back oldest first.
    let bars = provider.bars(&tcs, Period::FiveDays).await.expect("bars for TCS.NS");
    assert_eq!(bars.len(), 2);
    assert!(bars[0].date < bars[1].date);

    // Bulk lookups index by symbol and omit unknown ones.
    let requested = [tcs.clone(), symbol("NOPE.NS")];
    let bulk = provider.bulk_quotes(&requested).await.expect("bulk quote");
    assert_eq!(bulk.get(&tcs).and_then(|m| m.market_cap), Some(14_100_000_000_000));
    assert!(bulk.get(&requested[1]).is_none());

    assert_eq!(provider.source_tag(), "yfinance");
}

#[tokio::test]
async fn scripted_provider_honours_the_contract() {
    assert_provider_contract(&scripted_provider()).await;
}

#[tokio::test]
async fn yahoo_provider_honours_the_contract() {
    assert_provider_contract(&yahoo_provider()).await;
}

#[tokio::test]
async fn normalizer_accepts_a_shared_trait_object() {
    // Given: The Yahoo adapter behind a shared trait object
    let provider: Arc<dyn MarketDataProvider> = Arc::new(yahoo_provider());

    // When: A quote is produced through it
    let outcome = Normalizer::new(Arc::clone(&provider)).quote("tcs.ns").await;

    // Then: Chart and summary data are combined into one quote
    let quote = outcome.ok().expect("quote should succeed");
    assert_eq!(quote.symbol.as_str(), "TCS.NS");
    assert_eq!(quote.price, 3895.0);
    assert_eq!(quote.previous_close, 3880.0);
    assert_eq!(quote.volume, 2_000);
    assert_eq!(quote.market_cap, Some(14_100_000_000_000));
}

#[test]
fn default_yahoo_config_targets_public_endpoints() {
    let config = YahooConfig::default();
    assert_eq!(config.cookie_url, "https://fc.yahoo.com");
    assert_eq!(config.crumb_urls.len(), 2);
    assert!(config.crumb_urls[0].starts_with("https://query1."));
    assert!(config.crumb_urls[1].starts_with("https://query2."));
    assert_eq!(config.timeout_ms, 10_000);
    assert_eq!(YahooConfig::default().with_timeout_ms(250).timeout_ms, 250);
}
