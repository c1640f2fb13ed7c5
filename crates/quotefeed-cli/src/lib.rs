//! Shell around `quotefeed-core` shared by the `quotefeed` and
//! `nse-symbols` binaries: argument parsing, command dispatch, JSON output
//! and stderr logging.

pub mod cli;
pub mod commands;
pub mod error;
pub mod logging;
pub mod output;

pub use error::CliError;
