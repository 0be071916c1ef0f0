//! Interactive front ends for the Strava CSV exporter: the menu shell,
//! the prompt-driven extractor and the connection checker.

pub mod error;
pub mod extract;
pub mod logging;
pub mod prompt;
pub mod render;
pub mod report;
pub mod shell;
mod test_utils;

pub use error::{CliError, CliResult};
pub use prompt::{DialoguerPrompter, Prompter};
pub use shell::{Outcome, Shell, ShellSettings, ShellState};
