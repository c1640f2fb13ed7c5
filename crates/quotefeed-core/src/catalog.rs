//! Curated NSE symbol lists and provider-backed validation.
//!
//! Listing never touches the network. [`validate`] is the only operation
//! that calls the provider and it degrades per symbol: failures are logged
//! and skipped, so the caller compares input and output lengths to detect
//! partial results.

use std::collections::BTreeSet;

use tracing::{info, warn};

use crate::provider::MarketDataProvider;
use crate::{Instrument, Symbol};

/// Listing venue the catalog describes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Exchange {
    pub code: &'static str,
    /// Provider ticker suffix appended during validation.
    pub suffix: &'static str,
    pub country: &'static str,
    pub currency: &'static str,
}

pub const NSE: Exchange = Exchange {
    code: "NSE",
    suffix: ".NS",
    country: "India",
    currency: "INR",
};

const UNKNOWN: &str = "Unknown";
const PROGRESS_EVERY: usize = 20;

/// Most traded NSE names, in authored order.
pub const POPULAR: &[&str] = &[
    "RELIANCE", "TCS", "HDFCBANK", "INFY", "HINDUNILVR", "ICICIBANK", "KOTAKBANK",
    "BHARTIARTL", "ITC", "SBIN", "LT", "ASIANPAINT", "AXISBANK", "MARUTI", "HCLTECH",
    "BAJFINANCE", "WIPRO", "ULTRACEMCO", "NESTLEIND", "ONGC", "TATAMOTORS", "SUNPHARMA",
    "NTPC", "POWERGRID", "M&M", "TECHM", "TITAN", "COALINDIA", "INDUSINDBK", "ADANIPORTS",
];

/// Sector groups making up the full catalog. Groups overlap.
pub const SECTOR_GROUPS: &[(&str, &[&str])] = &[
    (
        "Banking & Financial Services",
        &[
            "HDFCBANK", "ICICIBANK", "SBIN", "KOTAKBANK", "AXISBANK", "INDUSINDBK",
            "BANDHANBNK", "FEDERALBNK", "IDFCFIRSTB", "PNB", "BANKBARODA", "CANBK",
            "UNIONBANK", "INDIANB", "RBLBANK", "YESBANK", "AUBANK", "EQUITASBNK",
        ],
    ),
    (
        "IT & Technology",
        &[
            "TCS", "INFY", "WIPRO", "HCLTECH", "TECHM", "LTIM", "MINDTREE", "COFORGE",
            "MPHASIS", "PERSISTENT", "LTTS", "OFSS", "HEXAWARE", "CYIENT", "SONACOMS",
        ],
    ),
    (
        "Oil & Gas",
        &[
            "RELIANCE", "ONGC", "IOC", "BPCL", "HINDPETRO", "GAIL", "OIL", "MGL", "IGL",
            "PETRONET", "GSPL", "ATGL",
        ],
    ),
    (
        "Automobiles",
        &[
            "MARUTI", "TATAMOTORS", "M&M", "BAJAJ-AUTO", "HEROMOTOCO", "EICHERMOT",
            "TVSMOTOR", "ASHOKLEY", "BALKRISIND", "MRF", "APOLLOTYRE", "CEAT",
        ],
    ),
    (
        "Pharmaceuticals",
        &[
            "SUNPHARMA", "DRREDDY", "CIPLA", "DIVISLAB", "LUPIN", "BIOCON", "CADILAHC",
            "AUROPHARMA", "TORNTPHARM", "GLENMARK", "ALKEM", "LALPATHLAB", "METROPOLIS",
        ],
    ),
    (
        "Consumer Goods",
        &[
            "HINDUNILVR", "ITC", "NESTLEIND", "BRITANNIA", "DABUR", "MARICO", "GODREJCP",
            "COLPAL", "EMAMILTD", "BAJAJCON", "VBL", "RADICO", "UBL", "JUBLFOOD",
        ],
    ),
    (
        "Metals & Mining",
        &[
            "TATASTEEL", "JSWSTEEL", "HINDALCO", "VEDL", "COALINDIA", "NMDC", "SAIL",
            "JINDALSTEL", "RATNAMANI", "WELCORP", "MOIL", "MANGALAM",
        ],
    ),
    (
        "Infrastructure & Construction",
        &[
            "LT", "ULTRACEMCO", "SHREECEM", "AMBUJACEM", "ACC", "RAMCOCEM", "HEIDELBERG",
            "JKCEMENT", "ORIENTCEM", "PRISMCEM", "BANGALOREPO", "DLF", "OBEROIRLTY",
            "PRESTIGE", "GODREJPROP", "BRIGADE", "SOBHA", "MAHLIFE",
        ],
    ),
    (
        "Power & Utilities",
        &[
            "NTPC", "POWERGRID", "ADANIGREEN", "ADANITRANS", "TATAPOWER", "NHPC", "SJVN",
            "PFC", "RECLTD", "IREDA",
        ],
    ),
    ("Telecom", &["BHARTIARTL", "INDUS", "GTPL", "TEJAS"]),
    (
        "Retail & E-commerce",
        &[
            "ZOMATO", "NYKAA", "POLICYBZR", "PAYTM", "TRENT", "ADITYADAYA", "WESTLIFE",
            "JUBILANT", "SPENCERS", "SHOPERSTOP",
        ],
    ),
    ("Airlines & Travel", &["INDIGO", "SPICEJET", "IRCTC"]),
    (
        "Entertainment & Media",
        &["ZEEL", "SUNTV", "PVRINOX", "INOXLEISUR", "EROS", "BALAJITELE"],
    ),
    (
        "Healthcare Services",
        &["APOLLOHOSP", "FORTIS", "MAXHEALTH", "NARAYANAHEM", "RAINBOWHTN"],
    ),
    (
        "Chemicals & Fertilizers",
        &[
            "UPL", "SRF", "PIDILITIND", "DEEPAKNTR", "TATACHEM", "BASF", "AKZOINDIA",
            "NOCIL", "ALKYLAMINE", "CLEAN", "CAMS",
        ],
    ),
    (
        "Agriculture & Food Processing",
        &["BRITANNIA", "GODREJAGRO", "RALLIS", "PI", "CHAMBLFERT", "COROMANDEL"],
    ),
    (
        "Textiles",
        &["GRASIM", "VARDHMAN", "RSWM", "TRIDENT", "WELSPUN", "PAGEIND"],
    ),
    (
        "Diversified",
        &["ADANIENT", "IPCALAB", "DIXON", "VOLTAS", "BLUEDART", "CONCOR"],
    ),
];

/// The popular list, authored order preserved.
pub fn list_popular() -> Vec<&'static str> {
    POPULAR.to_vec()
}

/// Union of every sector group, deduplicated and sorted ascending.
pub fn list_all() -> Vec<&'static str> {
    SECTOR_GROUPS
        .iter()
        .flat_map(|(_, symbols)| symbols.iter().copied())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

/// Checks each symbol against the provider and enriches it into an
/// [`Instrument`].
///
/// Symbols the provider does not identify are dropped silently; symbols
/// whose lookup fails are dropped with a warning. One provider call per
/// symbol, issued sequentially.
pub async fn validate<P, S>(provider: &P, symbols: &[S]) -> Vec<Instrument>
where
    P: MarketDataProvider + ?Sized,
    S: AsRef<str>,
{
    info!(count = symbols.len(), exchange = NSE.code, "validating symbols");

    let mut instruments = Vec::with_capacity(symbols.len());
    for (i, raw) in symbols.iter().enumerate() {
        let raw = raw.as_ref();
        match validate_one(provider, raw).await {
            Ok(Some(instrument)) => instruments.push(instrument),
            Ok(None) => {}
            Err(error) => warn!(symbol = raw, error = %error, "failed to validate symbol"),
        }

        if (i + 1) % PROGRESS_EVERY == 0 {
            info!("validated {}/{} symbols", i + 1, symbols.len());
        }
    }

    info!(
        "successfully validated {} symbols out of {}",
        instruments.len(),
        symbols.len()
    );
    instruments
}

async fn validate_one<P>(
    provider: &P,
    raw: &str,
) -> Result<Option<Instrument>, crate::CollectError>
where
    P: MarketDataProvider + ?Sized,
{
    let symbol = Symbol::parse(raw)?;
    let yahoo_symbol = symbol.with_suffix(NSE.suffix)?;
    let metadata = provider.metadata(&yahoo_symbol).await?;

    if !metadata.is_identified() {
        return Ok(None);
    }

    let name = metadata
        .short_name
        .clone()
        .or_else(|| metadata.long_name.clone())
        .unwrap_or_else(|| symbol.to_string());

    Ok(Some(Instrument {
        symbol,
        yahoo_symbol,
        name,
        sector: metadata.sector.unwrap_or_else(|| String::from(UNKNOWN)),
        industry: metadata.industry.unwrap_or_else(|| String::from(UNKNOWN)),
        currency: metadata
            .currency
            .unwrap_or_else(|| String::from(NSE.currency)),
        exchange: String::from(NSE.code),
        country: String::from(NSE.country),
    }))
}
