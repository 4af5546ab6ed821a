use super::Host;
use super::common::CommonArgs;
use crate::Result;
use clap::Parser;
use std::io::Write;

#[derive(Parser, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Regenerate the calculator script once.
///
/// # Errors
///
/// Returns an error if the configuration or a document cannot be loaded, or if the script
/// cannot be written
pub fn generate_script<H: Host>(host: &mut H, args: &GenerateArgs) -> Result<()> {
    args.common.init_logging();

    let config = args.common.load_config()?;
    let summary = config.pipeline(&args.common.root).regenerate()?;

    let _ = writeln!(host.output(), "{summary}");
    Ok(())
}
