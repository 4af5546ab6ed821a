//! The card-oriented model the generator renders
//!
//! Parsed documents are flat: a metrics document is a sequence of records where cards,
//! controls and results sit side by side. This module regroups them.
//!
//! # Implementation Model
//!
//! [`structure`] makes a single pass over the flat records. A record with a `title`
//! and an `icon` opens a [`MetricCard`]; the records that follow are attached to it as a
//! [`Control`] when they have `type: range`, or as a [`MetricResult`] when they have a
//! `format`. The relative order of everything is preserved.
//!
//! [`BenchmarkTable`] turns benchmark records into typed three-tier ranges and embeds them
//! as a tree keyed by the dot-separated segments of each benchmark key.
//!
//! [`DataSet`] bundles the site settings, cards and benchmarks read from a project's
//! documents. It is rebuilt from scratch on every regeneration.

mod benchmark;
mod data_set;
mod metric_card;

pub use benchmark::{BenchmarkRange, BenchmarkTable, Benchmarks, Tier};
pub use data_set::DataSet;
pub use metric_card::{Control, DisplayFormat, MetricCard, MetricResult, duplicate_card_ids, structure};
