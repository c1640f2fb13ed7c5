use serde::Serialize;
use thiserror::Error;

/// Top-level CLI failures. Each one is rendered as a JSON object on stdout.
#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Validation(#[from] quotefeed_core::ValidationError),

    #[error("{}", headline(.0))]
    Arguments(#[from] clap::Error),

    #[error("command error: {0}")]
    Command(String),

    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    #[error(transparent)]
    Io(#[from] std::io::Error),
}

impl CliError {
    /// Every top-level failure exits with status 1.
    pub const fn exit_code(&self) -> u8 {
        1
    }

    /// Failure body for `quotefeed`.
    pub fn action_report(&self, action: Option<&str>, symbols: &[String]) -> ActionFailure {
        ActionFailure {
            error: self.to_string(),
            action: action.map(str::to_owned),
            symbols: symbols.to_vec(),
        }
    }

    /// Failure body for `nse-symbols`.
    pub fn mode_report(&self, mode: Option<&str>) -> ModeFailure {
        ModeFailure {
            error: self.to_string(),
            mode: mode.map(str::to_owned),
        }
    }
}

/// clap renders the problem, a usage block and a help hint; keep the problem
/// on one line.
fn headline(error: &clap::Error) -> String {
    let rendered = error.to_string();
    let problem: Vec<&str> = rendered
        .lines()
        .take_while(|line| !line.starts_with("Usage:"))
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();
    let joined = problem.join(" ");
    joined.strip_prefix("error: ").unwrap_or(&joined).to_owned()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionFailure {
    pub error: String,
    pub action: Option<String>,
    pub symbols: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModeFailure {
    pub error: String,
    pub mode: Option<String>,
}
