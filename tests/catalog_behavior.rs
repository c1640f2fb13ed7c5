//! Behavior-driven tests for the NSE symbol catalog.
//!
//! Listing is static and offline; validation talks to a scripted provider
//! and must degrade one symbol at a time.

mod support;

use quotefeed_core::{catalog, ProviderMetadata, SourceError};
use support::{named, ScriptedProvider};

// =============================================================================
// Catalog: Static Listings
// =============================================================================

#[test]
fn when_listing_all_symbols_duplicates_are_collapsed_and_sorted() {
    // Given: Sector groups that list some symbols more than once

    // When: The full catalog is requested
    let all = catalog::list_all();

    // Then: Every symbol appears once, in ascending order
    assert!(all.windows(2).all(|pair| pair[0] < pair[1]), "not strictly ascending");
    assert_eq!(all.iter().filter(|s| **s == "BRITANNIA").count(), 1);
    assert!(all.contains(&"M&M"));
    assert!(all.contains(&"BAJAJ-AUTO"));
}

#[test]
fn when_listing_popular_symbols_authored_order_is_kept() {
    // Given / When: The popular list is requested twice
    let first = catalog::list_popular();
    let second = catalog::list_popular();

    // Then: The same 30 symbols come back in the same, unsorted order
    assert_eq!(first, second);
    assert_eq!(first.len(), 30);
    assert_eq!(&first[..4], &["RELIANCE", "TCS", "HDFCBANK", "INFY"]);
    assert!(first.windows(2).any(|pair| pair[0] > pair[1]), "list should not be sorted");
}

#[test]
fn exchange_describes_the_nse_listing() {
    assert_eq!(catalog::NSE.suffix, ".NS");
    assert_eq!(catalog::NSE.code, "NSE");
}

// =============================================================================
// Catalog: Validation
// =============================================================================

#[tokio::test]
async fn when_one_lookup_fails_only_the_other_symbol_is_returned() {
    // Given: X fails at the provider while Y is known
    let provider = ScriptedProvider::new()
        .with_metadata_error("X.NS", SourceError::unavailable("connection reset"))
        .with_metadata("Y.NS", named(Some("Y LTD"), None));

    // When: Both are validated
    let instruments = catalog::validate(&provider, &["X", "Y"]).await;

    // Then: Only Y survives, and both were attempted with the suffix
    assert_eq!(instruments.len(), 1);
    assert_eq!(instruments[0].symbol.as_str(), "Y");
    assert_eq!(instruments[0].yahoo_symbol.as_str(), "Y.NS");
    assert_eq!(provider.calls(), vec!["metadata:X.NS", "metadata:Y.NS"]);
}

#[tokio::test]
async fn when_provider_does_not_identify_a_symbol_it_is_dropped_silently() {
    // Given: Metadata with neither a short name nor a symbol field
    let provider = ScriptedProvider::new()
        .with_metadata("GHOST.NS", named(None, Some("Only A Long Name")))
        .with_metadata(
            "TCS.NS",
            ProviderMetadata {
                symbol: Some(String::from("TCS.NS")),
                ..ProviderMetadata::default()
            },
        );

    // When: Both are validated
    let instruments = catalog::validate(&provider, &["GHOST", "TCS"]).await;

    // Then: Only the identified symbol is enriched
    assert_eq!(instruments.len(), 1);
    assert_eq!(instruments[0].symbol.as_str(), "TCS");
}

#[tokio::test]
async fn validated_instrument_uses_defaults_for_missing_fields() {
    // Given: A provider that only knows the short name
    let provider = ScriptedProvider::new().with_metadata(
        "INFY.NS",
        named(Some("INFOSYS LIMITED"), Some("Infosys Limited")),
    );

    // When: The symbol is validated
    let instruments = catalog::validate(&provider, &["INFY"]).await;

    // Then: The record uses the short name and documented defaults
    let value = serde_json::to_value(&instruments[0]).expect("serializes");
    assert_eq!(
        value,
        serde_json::json!({
            "symbol": "INFY",
            "yahoo_symbol": "INFY.NS",
            "name": "INFOSYS LIMITED",
            "sector": "Unknown",
            "industry": "Unknown",
            "currency": "INR",
            "exchange": "NSE",
            "country": "India",
        })
    );
}

#[tokio::test]
async fn validated_instrument_keeps_provider_sector_and_currency() {
    // Given: Full metadata for an identified symbol
    let provider = ScriptedProvider::new().with_metadata(
        "M&M.NS",
        ProviderMetadata {
            symbol: Some(String::from("M&M.NS")),
            long_name: Some(String::from("Mahindra & Mahindra Limited")),
            sector: Some(String::from("Consumer Cyclical")),
            industry: Some(String::from("Auto Manufacturers")),
            currency: Some(String::from("USD")),
            ..ProviderMetadata::default()
        },
    );

    // When: The symbol is validated
    let instruments = catalog::validate(&provider, &["M&M"]).await;

    // Then: Provider values win; the long name stands in for a missing short name
    let instrument = &instruments[0];
    assert_eq!(instrument.name, "Mahindra & Mahindra Limited");
    assert_eq!(instrument.sector, "Consumer Cyclical");
    assert_eq!(instrument.industry, "Auto Manufacturers");
    assert_eq!(instrument.currency, "USD");
}

#[tokio::test]
async fn unparseable_catalog_input_is_skipped_without_a_provider_call() {
    // Given: An input that is not a valid ticker
    let provider = ScriptedProvider::new().with_metadata("SBIN.NS", named(Some("SBI"), None));

    // When: It is validated alongside a valid one
    let instruments = catalog::validate(&provider, &["BAD TICKER", "SBIN"]).await;

    // Then: Only the valid symbol reaches the provider
    assert_eq!(instruments.len(), 1);
    assert_eq!(provider.calls(), vec!["metadata:SBIN.NS"]);
}

#[tokio::test]
async fn validation_is_sequential_and_preserves_input_order() {
    // Given: Twenty-five known symbols, enough to cross a progress checkpoint
    let symbols: Vec<String> = (0..25).map(|i| format!("SYM{i:02}")).collect();
    let provider = symbols.iter().fold(ScriptedProvider::new(), |provider, symbol| {
        provider.with_metadata(&format!("{symbol}.NS"), named(Some(symbol.as_str()), None))
    });

    // When: All are validated
    let instruments = catalog::validate(&provider, &symbols).await;

    // Then: Every symbol is returned in input order
    let returned: Vec<&str> = instruments.iter().map(|i| i.symbol.as_str()).collect();
    assert_eq!(returned, symbols.iter().map(String::as_str).collect::<Vec<_>>());
    assert_eq!(provider.calls().len(), 25);
}
