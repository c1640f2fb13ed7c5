//! Scripted market data provider shared by the behavior tests.

#![allow(dead_code)]

use std::collections::BTreeMap;
use std::sync::Mutex;

use quotefeed_core::{
    BulkQuotes, MarketDataProvider, Period, ProviderBar, ProviderFuture, ProviderMetadata,
    SourceError, Symbol,
};
use time::{Date, Duration};

/// Answers from in-memory tables and records every call it receives.
///
/// Unknown symbols answer `NotFound` for metadata and an empty series for
/// bars, mirroring how Yahoo treats delisted tickers.
#[derive(Default)]
pub struct ScriptedProvider {
    metadata: BTreeMap<String, Result<ProviderMetadata, SourceError>>,
    bars: BTreeMap<String, Result<Vec<ProviderBar>, SourceError>>,
    bulk_failure: Option<SourceError>,
    calls: Mutex<Vec<String>>,
}

impl ScriptedProvider {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_metadata(mut self, symbol: &str, metadata: ProviderMetadata) -> Self {
        self.metadata.insert(symbol.to_owned(), Ok(metadata));
        self
    }

    pub fn with_metadata_error(mut self, symbol: &str, error: SourceError) -> Self {
        self.metadata.insert(symbol.to_owned(), Err(error));
        self
    }

    pub fn with_bars(mut self, symbol: &str, bars: Vec<ProviderBar>) -> Self {
        self.bars.insert(symbol.to_owned(), Ok(bars));
        self
    }

    pub fn with_bars_error(mut self, symbol: &str, error: SourceError) -> Self {
        self.bars.insert(symbol.to_owned(), Err(error));
        self
    }

    pub fn with_bulk_failure(mut self, error: SourceError) -> Self {
        self.bulk_failure = Some(error);
        self
    }

    pub fn calls(&self) -> Vec<String> {
        self.calls.lock().expect("call log should not be poisoned").clone()
    }

    fn record(&self, call: String) {
        self.calls
            .lock()
            .expect("call log should not be poisoned")
            .push(call);
    }
}

impl MarketDataProvider for ScriptedProvider {
    fn source_tag(&self) -> &'static str {
        "yfinance"
    }

    fn metadata<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, ProviderMetadata> {
        self.record(format!("metadata:{symbol}"));
        let answer = self.metadata.get(symbol.as_str()).cloned().unwrap_or_else(|| {
            Err(SourceError::not_found(format!(
                "Quote not found for symbol: {symbol}"
            )))
        });
        Box::pin(async move { answer })
    }

    fn bars<'a>(
        &'a self,
        symbol: &'a Symbol,
        period: Period,
    ) -> ProviderFuture<'a, Vec<ProviderBar>> {
        self.record(format!("bars:{symbol}:{period}"));
        let answer = self
            .bars
            .get(symbol.as_str())
            .cloned()
            .unwrap_or_else(|| Ok(Vec::new()));
        Box::pin(async move { answer })
    }

    fn bulk_quotes<'a>(&'a self, symbols: &'a [Symbol]) -> ProviderFuture<'a, BulkQuotes> {
        let joined = symbols
            .iter()
            .map(Symbol::as_str)
            .collect::<Vec<_>>()
            .join(",");
        self.record(format!("bulk:{joined}"));

        let answer = match &self.bulk_failure {
            Some(error) => Err(error.clone()),
            None => Ok(symbols
                .iter()
                .filter_map(|symbol| match self.metadata.get(symbol.as_str()) {
                    Some(Ok(metadata)) => Some((symbol.to_string(), metadata.clone())),
                    _ => None,
                })
                .collect()),
        };
        Box::pin(async move { answer })
    }
}

/// Metadata carrying only names.
pub fn named(short_name: Option<&str>, long_name: Option<&str>) -> ProviderMetadata {
    ProviderMetadata {
        short_name: short_name.map(str::to_owned),
        long_name: long_name.map(str::to_owned),
        ..ProviderMetadata::default()
    }
}

/// Consecutive daily bars starting 2024-05-02, one per close.
pub fn daily_bars(closes: &[f64]) -> Vec<ProviderBar> {
    let start = Date::from_calendar_date(2024, time::Month::May, 2).expect("valid date");
    closes
        .iter()
        .enumerate()
        .map(|(i, &close)| ProviderBar {
            date: start + Duration::days(i as i64),
            open: close - 1.0,
            high: close + 2.0,
            low: close - 2.0,
            close,
            volume: 1_000.0 * (i as f64 + 1.0),
        })
        .collect()
}

pub fn approx_eq(left: f64, right: f64) -> bool {
    (left - right).abs() < 1e-9
}
