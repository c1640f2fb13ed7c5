use std::process::ExitCode;

use clap::Parser;
use quotefeed_cli::cli::SymbolsCli;
use quotefeed_cli::{commands, logging, output, CliError};
use quotefeed_core::{YahooConfig, YahooProvider};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match SymbolsCli::try_parse() {
        Ok(cli) => cli,
        Err(error) if !error.use_stderr() => {
            let _ = error.print();
            return ExitCode::SUCCESS;
        }
        Err(error) => return fail(&CliError::from(error), None),
    };

    logging::init(&cli.common.log_level);

    let config = YahooConfig::default().with_timeout_ms(cli.common.timeout_ms);
    let provider = YahooProvider::new(config);
    let report = commands::symbols::run(cli.mode, &provider).await;

    match output::render(&report) {
        Ok(()) => ExitCode::SUCCESS,
        Err(error) => fail(&error, Some(cli.mode.as_str())),
    }
}

fn fail(error: &CliError, mode: Option<&str>) -> ExitCode {
    if let Err(render_error) = output::render(&error.mode_report(mode)) {
        eprintln!("error: {error} (while reporting: {render_error})");
    }
    ExitCode::from(error.exit_code())
}
