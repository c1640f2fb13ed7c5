//! # Domain Models
//!
//! Canonical output records and the validated inputs used to request them.
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Quote`] | Latest session price with change versus the previous close |
//! | [`HistoricalSeries`] | Daily OHLCV rows for a lookback [`Period`] |
//! | [`DailyBar`] | One row of a historical series |
//! | [`Fundamentals`] | Valuation, profitability and leverage metrics |
//! | [`Instrument`] | Catalog symbol enriched with provider metadata |
//! | [`ErrorRecord`] | Per-symbol failure marker |
//! | [`Outcome`] | A record or the error record replacing it |
//! | [`Symbol`] | Validated ticker |
//! | [`UtcDateTime`] | UTC timestamp |
//!
//! Output records serialize with fixed key sets. Optional metrics are
//! written as `null` rather than omitted so consumers can tell "unknown"
//! from zero.

mod models;
mod period;
mod symbol;
mod timestamp;

pub use models::{
    price_change, DailyBar, ErrorRecord, Fundamentals, HistoricalSeries, Instrument, Outcome,
    Quote,
};
pub use period::Period;
pub use symbol::Symbol;
pub use timestamp::UtcDateTime;
