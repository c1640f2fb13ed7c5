use serde::Serialize;
use time::Date;

use crate::provider::{ProviderBar, ProviderMetadata};
use crate::{CollectError, Period, Symbol, UtcDateTime};

use super::timestamp::iso_date;

/// Instrument metadata produced by catalog validation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Instrument {
    pub symbol: Symbol,
    pub yahoo_symbol: Symbol,
    pub name: String,
    pub sector: String,
    pub industry: String,
    pub currency: String,
    pub exchange: String,
    pub country: String,
}

/// Canonical latest-session quote.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Quote {
    pub symbol: Symbol,
    pub name: String,
    pub price: f64,
    pub change: f64,
    pub change_percent: f64,
    pub volume: u64,
    pub high: f64,
    pub low: f64,
    pub open: f64,
    pub previous_close: f64,
    pub market_cap: Option<i64>,
    pub timestamp: UtcDateTime,
    pub source: String,
}

impl Quote {
    /// Build a quote from the latest bar and the bar before it.
    ///
    /// Pass the same bar twice when only one session is available; change
    /// and percent change are then zero.
    #[allow(clippy::too_many_arguments)]
    pub fn from_sessions(
        symbol: Symbol,
        name: impl Into<String>,
        latest: &ProviderBar,
        previous: &ProviderBar,
        market_cap: Option<i64>,
        timestamp: UtcDateTime,
        source: impl Into<String>,
    ) -> Self {
        let (change, change_percent) = price_change(latest.close, previous.close);
        Self {
            symbol,
            name: name.into(),
            price: latest.close,
            change,
            change_percent,
            volume: latest.volume_or_zero(),
            high: latest.high,
            low: latest.low,
            open: latest.open,
            previous_close: previous.close,
            market_cap,
            timestamp,
            source: source.into(),
        }
    }
}

/// Absolute and percent change; a zero previous close yields a zero percent.
pub fn price_change(price: f64, previous_close: f64) -> (f64, f64) {
    let change = price - previous_close;
    let change_percent = if previous_close == 0.0 {
        0.0
    } else {
        change / previous_close * 100.0
    };
    (change, change_percent)
}

/// One daily OHLCV row.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyBar {
    #[serde(with = "iso_date")]
    pub date: Date,
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    pub volume: u64,
}

impl From<&ProviderBar> for DailyBar {
    fn from(bar: &ProviderBar) -> Self {
        Self {
            date: bar.date,
            open: bar.open,
            high: bar.high,
            low: bar.low,
            close: bar.close,
            volume: bar.volume_or_zero(),
        }
    }
}

/// Daily bar series for one symbol and lookback period.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistoricalSeries {
    pub symbol: Symbol,
    pub period: Period,
    pub interval: String,
    pub data: Vec<DailyBar>,
    pub source: String,
}

impl HistoricalSeries {
    pub const DAILY_INTERVAL: &'static str = "1d";

    pub fn new(
        symbol: Symbol,
        period: Period,
        bars: &[ProviderBar],
        source: impl Into<String>,
    ) -> Self {
        Self {
            symbol,
            period,
            interval: String::from(Self::DAILY_INTERVAL),
            data: bars.iter().map(DailyBar::from).collect(),
            source: source.into(),
        }
    }
}

/// Canonical fundamentals snapshot.
///
/// Missing metrics serialize as `null`; a reported zero stays zero.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Fundamentals {
    pub symbol: Symbol,
    pub market_cap: Option<i64>,
    pub enterprise_value: Option<i64>,
    pub pe_ratio: Option<f64>,
    #[serde(rename = "forwardPE")]
    pub forward_pe: Option<f64>,
    pub peg_ratio: Option<f64>,
    pub ps_ratio: Option<f64>,
    pub pb_ratio: Option<f64>,
    pub ev_to_revenue: Option<f64>,
    pub ev_to_ebitda: Option<f64>,
    pub beta: Option<f64>,
    pub eps: Option<f64>,
    pub revenue: Option<i64>,
    pub gross_margin: Option<f64>,
    pub operating_margin: Option<f64>,
    pub profit_margin: Option<f64>,
    pub roe: Option<f64>,
    pub roa: Option<f64>,
    pub debt_to_equity: Option<f64>,
    pub current_ratio: Option<f64>,
    pub quick_ratio: Option<f64>,
    pub dividend_yield: Option<f64>,
    pub payout_ratio: Option<f64>,
    pub sector: Option<String>,
    pub industry: Option<String>,
    pub last_updated: UtcDateTime,
    pub source: String,
}

impl Fundamentals {
    pub fn from_metadata(
        symbol: Symbol,
        metadata: &ProviderMetadata,
        last_updated: UtcDateTime,
        source: impl Into<String>,
    ) -> Self {
        Self {
            symbol,
            market_cap: metadata.market_cap,
            enterprise_value: metadata.enterprise_value,
            pe_ratio: metadata.trailing_pe,
            forward_pe: metadata.forward_pe,
            peg_ratio: metadata.peg_ratio,
            ps_ratio: metadata.price_to_sales,
            pb_ratio: metadata.price_to_book,
            ev_to_revenue: metadata.enterprise_to_revenue,
            ev_to_ebitda: metadata.enterprise_to_ebitda,
            beta: metadata.beta,
            eps: metadata.trailing_eps,
            revenue: metadata.total_revenue,
            gross_margin: metadata.gross_margins,
            operating_margin: metadata.operating_margins,
            profit_margin: metadata.profit_margins,
            roe: metadata.return_on_equity,
            roa: metadata.return_on_assets,
            debt_to_equity: metadata.debt_to_equity,
            current_ratio: metadata.current_ratio,
            quick_ratio: metadata.quick_ratio,
            dividend_yield: metadata.dividend_yield,
            payout_ratio: metadata.payout_ratio,
            sector: metadata.sector.clone(),
            industry: metadata.industry.clone(),
            last_updated,
            source: source.into(),
        }
    }
}

/// Structured failure marker standing in for one result.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorRecord {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub symbol: Option<String>,
}

impl ErrorRecord {
    pub fn for_symbol(symbol: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            symbol: Some(symbol.into()),
        }
    }

    /// Record not attributable to a single symbol (bulk collapse).
    pub fn batch(error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            symbol: None,
        }
    }
}

/// Either a normalized record or the error record replacing it.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Outcome<T> {
    Ok(T),
    Err(ErrorRecord),
}

impl<T> Outcome<T> {
    /// Fold a per-symbol result into an outcome, attributing failures to `symbol`.
    pub fn from_result(symbol: &str, result: Result<T, CollectError>) -> Self {
        match result {
            Ok(value) => Self::Ok(value),
            Err(error @ CollectError::BulkFetch(_)) => {
                Self::Err(ErrorRecord::batch(error.to_string()))
            }
            Err(error) => Self::Err(ErrorRecord::for_symbol(symbol, error.to_string())),
        }
    }

    pub const fn is_ok(&self) -> bool {
        matches!(self, Self::Ok(_))
    }

    pub fn ok(&self) -> Option<&T> {
        match self {
            Self::Ok(value) => Some(value),
            Self::Err(_) => None,
        }
    }

    pub fn err(&self) -> Option<&ErrorRecord> {
        match self {
            Self::Ok(_) => None,
            Self::Err(record) => Some(record),
        }
    }
}
