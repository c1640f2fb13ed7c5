//! CLI argument definitions for the two quotefeed binaries.
//!
//! | Binary | Arguments |
//! |--------|-----------|
//! | `quotefeed` | `<ACTION> --symbols S... [--period P]` |
//! | `nse-symbols` | `[--mode popular\|all\|validate]` |
//!
//! # Global Options
//!
//! | Option | Default | Description |
//! |--------|---------|-------------|
//! | `--timeout-ms` | `10000` | Per-request timeout in ms |
//! | `--log-level` | `warn` | Diagnostic filter for stderr logging |
//!
//! # Examples
//!
//! ```bash
//! quotefeed quote --symbols TCS.NS
//! quotefeed quotes --symbols TCS.NS INFY.NS RELIANCE.NS
//! quotefeed historical --symbols ^NSEI --period 6mo
//! nse-symbols --mode validate --log-level info
//! ```

use clap::{Args, Parser, ValueEnum};

/// Fetch quotes, history and fundamentals as JSON.
#[derive(Debug, Parser)]
#[command(name = "quotefeed", version, about = "Fetch market data from Yahoo Finance as JSON")]
pub struct QuotefeedCli {
    /// Action to perform.
    #[arg(value_enum)]
    pub action: Action,

    /// Stock symbols to fetch (e.g. TCS.NS RELIANCE.NS).
    ///
    /// `quote`, `historical` and `fundamentals` use the first symbol only.
    #[arg(long, required = true, num_args = 1..)]
    pub symbols: Vec<String>,

    /// Period for historical data (1d, 5d, 1mo, 3mo, 6mo, 1y, 2y, 5y, 10y, ytd, max).
    #[arg(long, default_value = "1y")]
    pub period: String,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// List or validate curated NSE symbols as JSON.
#[derive(Debug, Parser)]
#[command(name = "nse-symbols", version, about = "Fetch NSE symbols")]
pub struct SymbolsCli {
    /// popular (30 symbols), all (full catalog), validate (check 10 symbols).
    #[arg(long, value_enum, default_value_t = Mode::Popular)]
    pub mode: Mode,

    #[command(flatten)]
    pub common: CommonArgs,
}

/// Options shared by both binaries.
#[derive(Debug, Clone, Args)]
pub struct CommonArgs {
    /// Request timeout in milliseconds.
    #[arg(long, default_value_t = 10_000)]
    pub timeout_ms: u64,

    /// Log filter for diagnostics on stderr (e.g. warn, info, quotefeed_core=debug).
    #[arg(long, default_value = "warn")]
    pub log_level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Action {
    Quote,
    Quotes,
    Historical,
    Fundamentals,
}

impl Action {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Quote => "quote",
            Self::Quotes => "quotes",
            Self::Historical => "historical",
            Self::Fundamentals => "fundamentals",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Mode {
    Popular,
    All,
    Validate,
}

impl Mode {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Popular => "popular",
            Self::All => "all",
            Self::Validate => "validate",
        }
    }
}
