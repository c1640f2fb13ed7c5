use thiserror::Error;

use crate::provider::SourceError;

/// Validation errors for user-supplied symbols and periods.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ValidationError {
    #[error("symbol cannot be empty")]
    EmptySymbol,
    #[error("symbol length {len} exceeds max {max}")]
    SymbolTooLong { len: usize, max: usize },
    #[error("symbol must start with an ASCII letter, digit or '^': '{ch}'")]
    SymbolInvalidStart { ch: char },
    #[error("symbol contains invalid character '{ch}' at index {index}")]
    SymbolInvalidChar { ch: char, index: usize },

    #[error(
        "invalid period '{value}', expected one of 1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max"
    )]
    InvalidPeriod { value: String },
}

/// Failure taxonomy of the normalizer.
///
/// Every variant is recovered at the normalizer boundary and rendered as an
/// error record; only [`CollectError::BulkFetch`] replaces a whole batch.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CollectError {
    #[error("{0}")]
    InvalidSymbol(#[from] ValidationError),

    #[error("{message}")]
    NoData { symbol: String, message: String },

    #[error("{0}")]
    ProviderCall(SourceError),

    #[error("Bulk fetch failed: {0}")]
    BulkFetch(SourceError),
}

impl CollectError {
    pub fn no_data(symbol: impl Into<String>) -> Self {
        let symbol = symbol.into();
        Self::NoData {
            message: format!("No data found for {symbol}"),
            symbol,
        }
    }

    pub fn no_historical_data(symbol: impl Into<String>) -> Self {
        let symbol = symbol.into();
        Self::NoData {
            message: format!("No historical data found for {symbol}"),
            symbol,
        }
    }
}

impl From<SourceError> for CollectError {
    fn from(value: SourceError) -> Self {
        Self::ProviderCall(value)
    }
}
