//! Options and setup shared by every subcommand.

use super::config::Config;
use crate::Result;
use camino::Utf8PathBuf;
use clap::{Args, ValueEnum};

/// Log level for diagnostic output
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogLevel {
    /// No logging output
    None,

    /// Only error messages
    Error,

    /// Warning and error messages
    Warn,

    /// Info, warning, and error messages
    Info,

    /// Debug, info, warning, and error messages
    Debug,

    /// Trace, debug, info, warning, and error messages
    Trace,
}

/// Arguments shared by every subcommand
#[derive(Args, Debug, Clone)]
pub struct CommonArgs {
    /// Project root that relative paths are resolved against
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub root: Utf8PathBuf,

    /// Path to configuration file (default is `calcgen.toml` in the project root)
    #[arg(long, short = 'c', value_name = "PATH")]
    pub config: Option<Utf8PathBuf>,

    /// Set the logging level for diagnostic output
    #[arg(long, value_name = "LEVEL", default_value = "info", global = true)]
    pub log_level: LogLevel,
}

impl CommonArgs {
    /// Install the global logger, unless one is already installed.
    pub fn init_logging(&self) {
        let level = match self.log_level {
            LogLevel::None => return,
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        };

        let env = env_logger::Env::default().filter_or("RUST_LOG", level);

        let _ = env_logger::Builder::from_env(env)
            .format_timestamp(None)
            .format_module_path(false)
            .format_target(matches!(self.log_level, LogLevel::Debug | LogLevel::Trace))
            .try_init();
    }

    /// Load the project configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration file cannot be read, parsed, or validated
    pub fn load_config(&self) -> Result<Config> {
        Config::load(&self.root, self.config.as_ref())
    }
}
