use super::Host;
use super::common::CommonArgs;
use crate::Result;
use crate::documents::{DocumentKind, DocumentSources};
use crate::model::{DataSet, DisplayFormat, duplicate_card_ids};
use clap::Parser;
use ohno::app_err;
use std::io::Write;
use strum::{IntoEnumIterator, VariantNames};

#[derive(Parser, Debug)]
pub struct ValidateArgs {
    #[command(flatten)]
    pub common: CommonArgs,
}

/// Load every document in strict mode and list what would break the generated calculator.
fn find_problems(common: &CommonArgs) -> Result<(DataSet, Vec<String>)> {
    let config = common.load_config()?;
    let sources = DocumentSources {
        strict: true,
        ..config.document_sources(&common.root)
    };

    let problems: Vec<String> = DocumentKind::iter()
        .filter_map(|kind| sources.load(kind).err())
        .map(|e| e.to_string())
        .collect();
    if !problems.is_empty() {
        return Ok((DataSet::default(), problems));
    }

    let data = DataSet::load(&sources)?;
    let mut problems: Vec<String> = duplicate_card_ids(&data.cards)
        .into_iter()
        .map(|id| format!("card id '{id}' is used by more than one card"))
        .collect();

    for card in &data.cards {
        for control in &card.controls {
            let id = control.id().unwrap_or_default();
            for (name, value) in [("min", control.min()), ("max", control.max()), ("default", control.default_value())] {
                if value.is_none() {
                    problems.push(format!("control '{id}' in card '{}' has no {name}", card.id));
                }
            }
        }

        for result in &card.results {
            let id = result.id().unwrap_or_default();
            if result.format().is_none() {
                let format = result.format_raw().map(ToString::to_string).unwrap_or_default();
                problems.push(format!(
                    "result '{id}' in card '{}' has unknown format '{format}' (expected one of: {})",
                    card.id,
                    DisplayFormat::VARIANTS.join(", ")
                ));
            }

            if let Some(key) = result.benchmark()
                && !data.benchmarks.resolves(key)
            {
                problems.push(format!("result '{id}' in card '{}' refers to missing benchmark '{key}'", card.id));
            }
        }
    }

    Ok((data, problems))
}

/// Check the project's documents and report every problem found.
///
/// Problems are written to the host's error stream and the process exits with code 1.
///
/// # Errors
///
/// Returns an error if the configuration cannot be loaded or any problem is found
pub fn validate_project<H: Host>(host: &mut H, args: &ValidateArgs) -> Result<()> {
    args.common.init_logging();

    match find_problems(&args.common) {
        Ok((data, problems)) if problems.is_empty() => {
            let _ = writeln!(
                host.output(),
                "Project is valid: {} card(s), {} control(s), {} result(s), {} benchmark(s)",
                data.cards.len(),
                data.control_count(),
                data.result_count(),
                data.benchmarks.len()
            );
            Ok(())
        }
        Ok((_, problems)) => {
            for problem in &problems {
                let _ = writeln!(host.error(), "❌ {problem}");
            }
            host.exit(1);
            Err(app_err!("validation found {} problem(s)", problems.len()))
        }
        Err(e) => {
            let _ = writeln!(host.error(), "❌ Validation failed: {e}");
            host.exit(1);
            Err(e)
        }
    }
}
