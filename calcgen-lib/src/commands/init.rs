use super::Host;
use super::config::{CONFIG_FILE_NAME, Config};
use crate::Result;
use camino::Utf8PathBuf;
use clap::Parser;
use ohno::bail;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct InitArgs {
    /// Output configuration file path (default is `calcgen.toml` in the project root)
    #[arg(value_name = "PATH")]
    pub output: Option<Utf8PathBuf>,

    /// Project root the configuration file is written to
    #[arg(long, default_value = ".", value_name = "DIR")]
    pub root: Utf8PathBuf,

    /// Overwrite an existing configuration file
    #[arg(long)]
    pub force: bool,
}

/// Write the default configuration file.
///
/// # Errors
///
/// Returns an error if the file already exists and `--force` was not given, or if it cannot
/// be written
pub fn init_config<H: Host>(host: &mut H, args: &InitArgs) -> Result<()> {
    let output = args.output.clone().unwrap_or_else(|| args.root.join(CONFIG_FILE_NAME));

    if output.exists() && !args.force {
        bail!("'{output}' already exists, pass --force to overwrite it");
    }

    Config::save_default(&output)?;
    let _ = writeln!(host.output(), "Generated default configuration file: {output}");
    Ok(())
}
