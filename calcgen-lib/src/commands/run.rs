//! Command dispatch logic for calcgen

use super::{GenerateArgs, InitArgs, ValidateArgs, WatchArgs, generate_script, init_config, validate_project, watch_documents};
use crate::{Host, Result};
use clap::builder::Styles;
use clap::builder::styling::{AnsiColor, Effects};
use clap::{Parser, Subcommand};

const CLAP_STYLES: Styles = Styles::styled()
    .header(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .usage(AnsiColor::Green.on_default().effects(Effects::BOLD))
    .literal(AnsiColor::Cyan.on_default().effects(Effects::BOLD))
    .placeholder(AnsiColor::Cyan.on_default());

#[derive(Parser, Debug)]
#[command(name = "calcgen", version, author, long_about = None)]
#[command(about = "Keep a generated metric calculator script in sync with its data documents")]
#[command(styles = CLAP_STYLES)]
struct Cli {
    #[command(subcommand)]
    command: CalcgenSubcommand,
}

#[derive(Subcommand, Debug)]
enum CalcgenSubcommand {
    /// Generate the calculator script once
    Generate(GenerateArgs),
    /// Generate the calculator script and regenerate it whenever a document changes
    Watch(WatchArgs),
    /// Generate a default configuration file
    Init(InitArgs),
    /// Check the configuration and every document for problems
    Validate(ValidateArgs),
}

/// Dispatch command-line arguments to the appropriate handler
///
/// # Arguments
///
/// * `args` - An iterator of command-line arguments (typically from `std::env::args()`)
///
/// # Errors
///
/// Returns an error if command parsing fails or if the executed command fails
pub async fn run<I, T, H>(host: &mut H, args: I) -> Result<()>
where
    I: IntoIterator<Item = T>,
    T: Into<std::ffi::OsString> + Clone,
    H: Host,
{
    match &Cli::parse_from(args).command {
        CalcgenSubcommand::Generate(generate_args) => generate_script(host, generate_args),
        CalcgenSubcommand::Watch(watch_args) => watch_documents(host, watch_args).await,
        CalcgenSubcommand::Init(init_args) => init_config(host, init_args),
        CalcgenSubcommand::Validate(validate_args) => validate_project(host, validate_args),
    }
}
