use quotefeed_core::{MarketDataProvider, Normalizer, Period};
use tracing::debug;

use crate::cli::{Action, QuotefeedCli};
use crate::error::CliError;
use crate::output::to_pretty_json;

/// Dispatch one `quotefeed` action and return its rendered JSON body.
///
/// Records are serialized straight from their types so keys keep their
/// declared order. Per-symbol failures are part of the body; only argument
/// problems such as an unknown period surface as [`CliError`].
pub async fn run<P: MarketDataProvider>(
    cli: &QuotefeedCli,
    normalizer: &Normalizer<P>,
) -> Result<String, CliError> {
    let first = cli
        .symbols
        .first()
        .ok_or_else(|| CliError::Command(String::from("at least one symbol is required")))?;

    debug!(action = cli.action.as_str(), symbols = cli.symbols.len(), "running action");
    match cli.action {
        Action::Quote => to_pretty_json(&normalizer.quote(first).await),
        Action::Quotes => to_pretty_json(&normalizer.quotes(&cli.symbols).await),
        Action::Historical => {
            let period: Period = cli.period.parse()?;
            to_pretty_json(&normalizer.historical(first, period).await)
        }
        Action::Fundamentals => to_pretty_json(&normalizer.fundamentals(first).await),
    }
}
