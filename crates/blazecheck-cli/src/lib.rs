//! blazecheck CLI library
//!
//! Argument parsing, progress output and the scenario runner behind the
//! `blazecheck` binary.

#![warn(missing_docs)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::missing_errors_doc)]

mod commands;
mod config;
mod error;
mod output;
mod runner;

pub use commands::{
    Cli, ColorArg, Commands, ConfigArgs, FilterArgs, HarnessArgs, ListArgs, ReportFormatArg,
    RunArgs,
};
pub use config::{CliConfig, ColorChoice, ReportKind, Verbosity};
pub use error::{CliError, CliResult};
pub use output::{ProgressReporter, ProgressSink};
pub use runner::{RunOutcome, ScenarioRunner};
