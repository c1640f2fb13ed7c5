//! Core contracts for quotefeed.
//!
//! This crate contains:
//! - Canonical output records and validated inputs
//! - The market data provider contract and its Yahoo Finance adapter
//! - The curated NSE symbol catalog with provider validation
//! - The normalizer turning provider data into quotes, history and fundamentals

pub mod adapters;
pub mod catalog;
pub mod domain;
pub mod error;
pub mod http_client;
pub mod normalizer;
pub mod provider;

pub use adapters::{YahooConfig, YahooProvider};
pub use catalog::{list_all, list_popular, validate, Exchange, NSE};
pub use domain::{
    price_change, DailyBar, ErrorRecord, Fundamentals, HistoricalSeries, Instrument, Outcome,
    Period, Quote, Symbol, UtcDateTime,
};
pub use error::{CollectError, ValidationError};
pub use http_client::{HttpClient, HttpError, HttpRequest, HttpResponse, ReqwestHttpClient};
pub use normalizer::Normalizer;
pub use provider::{
    BulkQuotes, MarketDataProvider, ProviderBar, ProviderFuture, ProviderMetadata, SourceError,
    SourceErrorKind,
};
