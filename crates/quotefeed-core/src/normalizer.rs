//! Maps provider responses onto the canonical output records.
//!
//! Every operation returns an [`Outcome`]: failures are captured per symbol
//! as error records instead of being propagated, so one bad ticker never
//! aborts a batch. The single exception is [`Normalizer::quotes`], whose
//! bulk metadata call failing collapses the whole batch into one record.

use tracing::{debug, warn};

use crate::provider::{BulkQuotes, MarketDataProvider, ProviderBar, ProviderMetadata};
use crate::{
    CollectError, ErrorRecord, Fundamentals, HistoricalSeries, Outcome, Period, Quote, Symbol,
    UtcDateTime,
};

/// Window requested for quotes; only the last two sessions are used.
const QUOTE_WINDOW: Period = Period::FiveDays;

/// Quote, history and fundamentals front end over a [`MarketDataProvider`].
#[derive(Debug, Clone)]
pub struct Normalizer<P> {
    provider: P,
}

impl<P: MarketDataProvider> Normalizer<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    /// Latest quote for one symbol.
    pub async fn quote(&self, symbol: &str) -> Outcome<Quote> {
        let result = self.try_quote(symbol).await;
        record(symbol, result)
    }

    /// Quotes for many symbols, one entry per input symbol in input order.
    ///
    /// Metadata for the whole batch comes from one bulk call. If that call
    /// fails the result is a single error record without a symbol.
    pub async fn quotes<S: AsRef<str>>(&self, symbols: &[S]) -> Vec<Outcome<Quote>> {
        let bulk = match self.bulk_metadata(symbols).await {
            Ok(bulk) => bulk,
            Err(error) => {
                warn!(count = symbols.len(), error = %error, "bulk quote request failed");
                return vec![Outcome::Err(ErrorRecord::batch(error.to_string()))];
            }
        };
        debug!(requested = symbols.len(), returned = bulk.len(), "bulk metadata received");

        let mut quotes = Vec::with_capacity(symbols.len());
        for raw in symbols {
            let raw = raw.as_ref();
            let result = self.try_batch_quote(raw, &bulk).await;
            quotes.push(record(raw, result));
        }
        quotes
    }

    /// Daily bar series for one symbol over `period`.
    pub async fn historical(&self, symbol: &str, period: Period) -> Outcome<HistoricalSeries> {
        let result = self.try_historical(symbol, period).await;
        record(symbol, result)
    }

    /// Fundamentals snapshot for one symbol.
    pub async fn fundamentals(&self, symbol: &str) -> Outcome<Fundamentals> {
        let result = self.try_fundamentals(symbol).await;
        record(symbol, result)
    }

    async fn try_quote(&self, raw: &str) -> Result<Quote, CollectError> {
        let symbol = Symbol::parse(raw)?;
        let metadata = self.provider.metadata(&symbol).await?;
        let bars = self.provider.bars(&symbol, QUOTE_WINDOW).await?;
        self.build_quote(symbol, Some(&metadata), &bars)
    }

    async fn bulk_metadata<S: AsRef<str>>(
        &self,
        symbols: &[S],
    ) -> Result<BulkQuotes, CollectError> {
        // Unparseable symbols are reported individually afterwards.
        let parsed: Vec<Symbol> = symbols
            .iter()
            .filter_map(|raw| Symbol::parse(raw.as_ref()).ok())
            .collect();
        if parsed.is_empty() {
            return Ok(BulkQuotes::new());
        }

        self.provider
            .bulk_quotes(&parsed)
            .await
            .map_err(CollectError::BulkFetch)
    }

    async fn try_batch_quote(&self, raw: &str, bulk: &BulkQuotes) -> Result<Quote, CollectError> {
        let symbol = Symbol::parse(raw)?;
        let bars = self.provider.bars(&symbol, QUOTE_WINDOW).await?;
        let metadata = bulk.get(&symbol);
        self.build_quote(symbol, metadata, &bars)
    }

    fn build_quote(
        &self,
        symbol: Symbol,
        metadata: Option<&ProviderMetadata>,
        bars: &[ProviderBar],
    ) -> Result<Quote, CollectError> {
        let Some((latest, earlier)) = bars.split_last() else {
            return Err(CollectError::no_data(symbol.as_str()));
        };
        let previous = earlier.last().unwrap_or(latest);

        let name = metadata
            .and_then(ProviderMetadata::display_name)
            .map(str::to_owned)
            .unwrap_or_else(|| symbol.to_string());
        let market_cap = metadata.and_then(|m| m.market_cap);

        Ok(Quote::from_sessions(
            symbol,
            name,
            latest,
            previous,
            market_cap,
            UtcDateTime::now(),
            self.provider.source_tag(),
        ))
    }

    async fn try_historical(
        &self,
        raw: &str,
        period: Period,
    ) -> Result<HistoricalSeries, CollectError> {
        let symbol = Symbol::parse(raw)?;
        let bars = self.provider.bars(&symbol, period).await?;
        if bars.is_empty() {
            return Err(CollectError::no_historical_data(symbol.as_str()));
        }

        Ok(HistoricalSeries::new(
            symbol,
            period,
            &bars,
            self.provider.source_tag(),
        ))
    }

    async fn try_fundamentals(&self, raw: &str) -> Result<Fundamentals, CollectError> {
        let symbol = Symbol::parse(raw)?;
        let metadata = self.provider.metadata(&symbol).await?;

        Ok(Fundamentals::from_metadata(
            symbol,
            &metadata,
            UtcDateTime::now(),
            self.provider.source_tag(),
        ))
    }
}

fn record<T>(symbol: &str, result: Result<T, CollectError>) -> Outcome<T> {
    if let Err(error) = &result {
        warn!(symbol, error = %error, "symbol failed");
    }
    Outcome::from_result(symbol, result)
}
