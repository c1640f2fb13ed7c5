use quotefeed_core::{catalog, Instrument, MarketDataProvider, NSE};
use serde::Serialize;
use tracing::debug;

use crate::cli::Mode;

/// Number of popular symbols checked by `--mode validate`.
pub const VALIDATE_SAMPLE: usize = 10;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum SymbolsReport {
    Listing {
        mode: &'static str,
        count: usize,
        symbols: Vec<&'static str>,
        exchange: &'static str,
        suffix: &'static str,
    },
    Validation {
        mode: &'static str,
        requested: usize,
        validated: usize,
        instruments: Vec<Instrument>,
    },
}

pub async fn run<P: MarketDataProvider>(mode: Mode, provider: &P) -> SymbolsReport {
    debug!(mode = mode.as_str(), "running symbols mode");
    match mode {
        Mode::Popular => listing(mode, catalog::list_popular()),
        Mode::All => listing(mode, catalog::list_all()),
        Mode::Validate => {
            let sample: Vec<&str> = catalog::list_popular()
                .into_iter()
                .take(VALIDATE_SAMPLE)
                .collect();
            let instruments = catalog::validate(provider, &sample).await;
            SymbolsReport::Validation {
                mode: mode.as_str(),
                requested: sample.len(),
                validated: instruments.len(),
                instruments,
            }
        }
    }
}

fn listing(mode: Mode, symbols: Vec<&'static str>) -> SymbolsReport {
    SymbolsReport::Listing {
        mode: mode.as_str(),
        count: symbols.len(),
        symbols,
        exchange: NSE.code,
        suffix: NSE.suffix,
    }
}
