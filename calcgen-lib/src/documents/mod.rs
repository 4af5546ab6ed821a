//! Reading the hand-edited data documents
//!
//! Documents use a constrained YAML-like format: either top-level `key: value` pairs,
//! or a list of records where each record is opened by a `- id:` line. There is no
//! general grammar and no arbitrary nesting.
//!
//! # Implementation Model
//!
//! Every scalar goes through [`coerce`], which is total: quoted text stays a string,
//! then integers, floats and boolean literals are recognized, and anything else is kept
//! as trimmed text.
//!
//! The parser folds an explicit state value over the significant lines of a document:
//!
//! - **Key/value**: unindented `key: value` lines start a key and indented lines continue
//!   its value. Values are coerced once complete.
//! - **Record list**: `- id:` lines open records, `key: value` lines set fields, and fields
//!   named in [`ParseOptions::list_fields`] collect the `- ` items that follow them.
//!
//! Malformed lines are skipped unless strict parsing is requested, in which case the
//! first one is reported as a [`ParseError`].
//!
//! [`DocumentSources`] maps each [`DocumentKind`] to its path and shape so that the
//! pipeline never has to guess how to read a known document.

mod catalog;
mod fields;
mod parser;
mod raw_value;
mod shape;

pub use catalog::{BENCHMARK_TIERS, DocumentKind, DocumentSources};
pub use fields::{FieldValue, Fields, FlatRecord, NestedItem, SimpleMapping};
pub use parser::{MalformedLine, ParseError, ParseOptions, parse, parse_as, parse_key_value, parse_record_list};
pub use raw_value::{RawValue, coerce, unquote};
pub use shape::{Document, DocumentShape};
