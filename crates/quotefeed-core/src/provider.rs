//! Market data provider contract and the raw shapes it returns.
//!
//! The normalizer and the symbol catalog only talk to a provider through
//! [`MarketDataProvider`], so both run offline against a scripted fake in
//! tests and against [`YahooProvider`](crate::YahooProvider) in production.
//!
//! # Capabilities
//!
//! | Method | Response | Used by |
//! |--------|----------|---------|
//! | [`metadata`](MarketDataProvider::metadata) | [`ProviderMetadata`] | quote, fundamentals, validation |
//! | [`bars`](MarketDataProvider::bars) | `Vec<`[`ProviderBar`]`>` | quote, quotes, historical |
//! | [`bulk_quotes`](MarketDataProvider::bulk_quotes) | [`BulkQuotes`] | quotes |

use std::collections::BTreeMap;
use std::fmt::{Display, Formatter};
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;

use time::Date;

use crate::{Period, Symbol};

/// Provider-level error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceErrorKind {
    InvalidRequest,
    NotFound,
    Unavailable,
    InvalidResponse,
    Internal,
}

/// Structured provider call error.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceError {
    kind: SourceErrorKind,
    message: String,
}

impl SourceError {
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidRequest,
            message: message.into(),
        }
    }

    pub fn not_found(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::NotFound,
            message: message.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Unavailable,
            message: message.into(),
        }
    }

    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::InvalidResponse,
            message: message.into(),
        }
    }

    pub fn internal(message: impl Into<String>) -> Self {
        Self {
            kind: SourceErrorKind::Internal,
            message: message.into(),
        }
    }

    pub const fn kind(&self) -> SourceErrorKind {
        self.kind
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn code(&self) -> &'static str {
        match self.kind {
            SourceErrorKind::InvalidRequest => "source.invalid_request",
            SourceErrorKind::NotFound => "source.not_found",
            SourceErrorKind::Unavailable => "source.unavailable",
            SourceErrorKind::InvalidResponse => "source.invalid_response",
            SourceErrorKind::Internal => "source.internal",
        }
    }
}

impl Display for SourceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.message, self.code())
    }
}

impl std::error::Error for SourceError {}

/// Descriptive metadata and ratios for one symbol, exactly as far as the
/// provider reported them.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct ProviderMetadata {
    pub symbol: Option<String>,
    pub short_name: Option<String>,
    pub long_name: Option<String>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub currency: Option<String>,
    pub market_cap: Option<i64>,
    pub enterprise_value: Option<i64>,
    pub trailing_pe: Option<f64>,
    pub forward_pe: Option<f64>,
    pub peg_ratio: Option<f64>,
    pub price_to_sales: Option<f64>,
    pub price_to_book: Option<f64>,
    pub enterprise_to_revenue: Option<f64>,
    pub enterprise_to_ebitda: Option<f64>,
    pub beta: Option<f64>,
    pub trailing_eps: Option<f64>,
    pub total_revenue: Option<i64>,
    pub gross_margins: Option<f64>,
    pub operating_margins: Option<f64>,
    pub profit_margins: Option<f64>,
    pub return_on_equity: Option<f64>,
    pub return_on_assets: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub current_ratio: Option<f64>,
    pub quick_ratio: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub payout_ratio: Option<f64>,
}

impl ProviderMetadata {
    /// Whether the provider recognised the symbol at all.
    pub fn is_identified(&self) -> bool {
        self.symbol.is_some() || self.short_name.is_some()
    }

    /// Long name, then short name.
    pub fn display_name(&self) -> Option<&str> {
        self.long_name.as_deref().or(self.short_name.as_deref())
    }
}

/// One daily bar. `volume` is `NaN` when the provider has no figure.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ProviderBar {
    pub date: Date,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: f64,
}

impl ProviderBar {
    pub fn volume_or_zero(&self) -> u64 {
        if self.volume.is_finite() && self.volume > 0.0 {
            self.volume as u64
        } else {
            0
        }
    }
}

/// Metadata for many symbols gathered by a single bulk request.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BulkQuotes {
    entries: BTreeMap<String, ProviderMetadata>,
}

impl BulkQuotes {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, symbol: &str, metadata: ProviderMetadata) {
        self.entries.insert(symbol.to_ascii_uppercase(), metadata);
    }

    pub fn get(&self, symbol: &Symbol) -> Option<&ProviderMetadata> {
        self.entries.get(symbol.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl FromIterator<(String, ProviderMetadata)> for BulkQuotes {
    fn from_iter<I: IntoIterator<Item = (String, ProviderMetadata)>>(iter: I) -> Self {
        let mut bulk = Self::new();
        for (symbol, metadata) in iter {
            bulk.insert(&symbol, metadata);
        }
        bulk
    }
}

pub type ProviderFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, SourceError>> + Send + 'a>>;

/// Capability interface over an external market data service.
///
/// Implementations must be `Send + Sync`; callers await each call to
/// completion before issuing the next one.
pub trait MarketDataProvider: Send + Sync {
    /// Tag written into the `source` field of every record.
    fn source_tag(&self) -> &'static str;

    /// Fetches descriptive metadata and financial ratios for one symbol.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the symbol is unknown, the provider is
    /// unreachable or the response cannot be decoded.
    fn metadata<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, ProviderMetadata>;

    /// Fetches the daily bar series for `period`, oldest bar first.
    ///
    /// An empty vector is a valid answer; callers decide whether that is an
    /// error.
    fn bars<'a>(
        &'a self,
        symbol: &'a Symbol,
        period: Period,
    ) -> ProviderFuture<'a, Vec<ProviderBar>>;

    /// Fetches metadata for every symbol in one round trip.
    ///
    /// Symbols the provider does not know are simply absent from the result.
    fn bulk_quotes<'a>(&'a self, symbols: &'a [Symbol]) -> ProviderFuture<'a, BulkQuotes>;
}

impl<T: MarketDataProvider + ?Sized> MarketDataProvider for &T {
    fn source_tag(&self) -> &'static str {
        (**self).source_tag()
    }

    fn metadata<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, ProviderMetadata> {
        (**self).metadata(symbol)
    }

    fn bars<'a>(
        &'a self,
        symbol: &'a Symbol,
        period: Period,
    ) -> ProviderFuture<'a, Vec<ProviderBar>> {
        (**self).bars(symbol, period)
    }

    fn bulk_quotes<'a>(&'a self, symbols: &'a [Symbol]) -> ProviderFuture<'a, BulkQuotes> {
        (**self).bulk_quotes(symbols)
    }
}

impl<T: MarketDataProvider + ?Sized> MarketDataProvider for Arc<T> {
    fn source_tag(&self) -> &'static str {
        (**self).source_tag()
    }

    fn metadata<'a>(&'a self, symbol: &'a Symbol) -> ProviderFuture<'a, ProviderMetadata> {
        (**self).metadata(symbol)
    }

    fn bars<'a>(
        &'a self,
        symbol: &'a Symbol,
        period: Period,
    ) -> ProviderFuture<'a, Vec<ProviderBar>> {
        (**self).bars(symbol, period)
    }

    fn bulk_quotes<'a>(&'a self, symbols: &'a [Symbol]) -> ProviderFuture<'a, BulkQuotes> {
        (**self).bulk_quotes(symbols)
    }
}
