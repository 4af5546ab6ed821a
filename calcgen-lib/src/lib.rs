#![doc(hidden)]
#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core library for calcgen
//!
//! This library consolidates all functionality for the calcgen tool, which keeps a
//! generated calculator script synchronized with hand-edited data documents.
//!
//! # Module Organization
//!
//! - [`commands`]: Command-line interface and orchestration
//! - [`documents`]: Scalar coercion and the line-oriented document parser
//! - [`model`]: Regrouping parsed records into metric cards and benchmark tables
//! - [`render`]: Generation of the calculator script
//! - [`watch`]: Modification-time polling and batched regeneration
//! - [`pipeline`]: One full parse, structure, generate, and write cycle

pub type Result<T, E = ohno::AppError> = core::result::Result<T, E>;

#[cfg(any(debug_assertions, test))]
pub mod commands;
#[cfg(not(any(debug_assertions, test)))]
mod commands;

#[cfg(any(debug_assertions, test))]
pub mod documents;
#[cfg(not(any(debug_assertions, test)))]
mod documents;

#[cfg(any(debug_assertions, test))]
pub mod model;
#[cfg(not(any(debug_assertions, test)))]
mod model;

#[cfg(any(debug_assertions, test))]
pub mod pipeline;
#[cfg(not(any(debug_assertions, test)))]
mod pipeline;

#[cfg(any(debug_assertions, test))]
pub mod render;
#[cfg(not(any(debug_assertions, test)))]
mod render;

#[cfg(any(debug_assertions, test))]
pub mod watch;
#[cfg(not(any(debug_assertions, test)))]
mod watch;

pub use crate::commands::{Host, run};
