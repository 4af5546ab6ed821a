//! Command-line interface and orchestration for calcgen
//!
//! This module parses the command line, loads the tool configuration and drives the
//! regeneration pipeline.
//!
//! # Commands
//!
//! - **generate**: run one regeneration cycle and print a summary
//! - **watch**: generate, then poll the documents and regenerate on every change until
//!   the process is interrupted
//! - **init**: write the default `calcgen.toml`
//! - **validate**: parse every document in strict mode and report anything that would
//!   break the generated calculator
//!
//! Every command reports through a [`Host`], so tests can capture output and exit codes.
//!
//! Configuration lives in a TOML file (`calcgen.toml` in the project root by default). It
//! names the three documents, the artifact path, extra watched paths and the polling
//! interval.

mod common;
mod config;
mod generate;
mod host;
mod init;
mod run;
mod validate;
mod watch;

#[cfg(debug_assertions)]
pub use config::Config;

pub use generate::{GenerateArgs, generate_script};
pub use host::Host;
pub use init::{InitArgs, init_config};
pub use run::run;
pub use validate::{ValidateArgs, validate_project};
pub use watch::{WatchArgs, watch_documents};
