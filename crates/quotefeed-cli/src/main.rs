use std::process::ExitCode;

use clap::Parser;
use quotefeed_cli::cli::QuotefeedCli;
use quotefeed_cli::{commands, logging, output, CliError};
use quotefeed_core::{Normalizer, YahooConfig, YahooProvider};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match QuotefeedCli::try_parse() {
        Ok(cli) => cli,
        Err(error) if !error.use_stderr() => {
            // --help / --version
            let _ = error.print();
            return ExitCode::SUCCESS;
        }
        Err(error) => return fail(&CliError::from(error), None, &[]),
    };

    logging::init(&cli.common.log_level);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => fail(&error, Some(cli.action.as_str()), &cli.symbols),
    }
}

async fn run(cli: &QuotefeedCli) -> Result<(), CliError> {
    let config = YahooConfig::default().with_timeout_ms(cli.common.timeout_ms);
    let normalizer = Normalizer::new(YahooProvider::new(config));

    let payload = commands::collect::run(cli, &normalizer).await?;
    output::emit(&payload)
}

fn fail(error: &CliError, action: Option<&str>, symbols: &[String]) -> ExitCode {
    if let Err(render_error) = output::render(&error.action_report(action, symbols)) {
        eprintln!("error: {error} (while reporting: {render_error})");
    }
    ExitCode::from(error.exit_code())
}
