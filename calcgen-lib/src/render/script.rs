use super::card_markup::card_markup;
use crate::Result;
use crate::documents::SimpleMapping;
use crate::model::{Benchmarks, MetricCard};
use core::fmt::Write;
use serde::Serialize;

/// DOM wiring, calculations, formatting and benchmark lookup shared by every artifact.
const CALCULATOR_LOGIC: &str = include_str!("calculator.js");

/// Render the calculator script.
///
/// The data is embedded as JSON constants ahead of the fixed logic. The output depends only
/// on the inputs, so identical inputs produce identical text.
pub fn generate<W: Write>(site: &SimpleMapping, cards: &[MetricCard], benchmarks: &Benchmarks, writer: &mut W) -> Result<()> {
    writeln!(writer, "// Generated by calcgen from the project's data documents. Do not edit by hand.")?;
    write_constant(writer, "siteData", site)?;
    write_constant(writer, "metricsData", cards)?;
    write_constant(writer, "benchmarks", benchmarks)?;
    write_constant(writer, "cardMarkup", &card_markup(cards)?)?;
    write!(writer, "{CALCULATOR_LOGIC}")?;
    Ok(())
}

fn write_constant<W: Write, T: Serialize + ?Sized>(writer: &mut W, name: &str, value: &T) -> Result<()> {
    writeln!(writer, "const {name} = {};", serde_json::to_string_pretty(value)?)?;
    Ok(())
}
