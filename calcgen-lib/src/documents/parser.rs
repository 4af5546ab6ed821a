//! Line-oriented parser for the constrained document format.
//!
//! Both algorithms fold an explicit state value over a stream of significant lines.
//! Blank lines and `#` comments never reach the state machines.

use super::{Document, DocumentShape, FieldValue, FlatRecord, NestedItem, RawValue, SimpleMapping, coerce, unquote};
use compact_str::CompactString;
use core::fmt::{Display, Formatter, Result as FmtResult};

const LOG_TARGET: &str = "    parser";

/// Marker that opens a new record in a list-of-objects document.
const RECORD_START: &str = "- id:";

/// Marker that opens an item of a nested list.
const LIST_ITEM: &str = "- ";

/// Controls how documents are parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseOptions {
    /// Field names whose value is a nested list rather than a scalar.
    pub list_fields: Vec<CompactString>,

    /// Fail on the first malformed line instead of skipping it.
    pub strict: bool,
}

impl ParseOptions {
    #[must_use]
    pub fn with_list_fields<I, S>(list_fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<CompactString>,
    {
        Self {
            list_fields: list_fields.into_iter().map(Into::into).collect(),
            strict: false,
        }
    }

    #[must_use]
    pub const fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    fn is_list_field(&self, key: &str) -> bool {
        self.list_fields.iter().any(|field| field == key)
    }
}

impl Default for ParseOptions {
    fn default() -> Self {
        Self::with_list_fields(["controls", "results"])
    }
}

/// Why a line could not be classified.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
pub enum MalformedLine {
    #[strum(to_string = "indented line before any key")]
    ContinuationBeforeKey,

    #[strum(to_string = "top-level line without a ':' separator")]
    MissingSeparator,

    #[strum(to_string = "empty key")]
    EmptyKey,

    #[strum(to_string = "field before the first '- id:' record")]
    FieldOutsideRecord,

    #[strum(to_string = "list item outside a nested list")]
    StrayListItem,
}

/// A malformed line reported in strict mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ParseError {
    /// 1-based line number.
    pub line: usize,
    pub reason: MalformedLine,
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        write!(f, "line {}: {}", self.line, self.reason)
    }
}

impl core::error::Error for ParseError {}

/// A significant line of a document.
#[derive(Debug, Clone, Copy)]
struct Line<'a> {
    number: usize,
    indent: usize,
    text: &'a str,
}

impl Line<'_> {
    /// Split `key: value` at the first colon, trimming both halves.
    fn key_value(&self) -> Option<(&str, &str)> {
        self.text.split_once(':').map(|(key, value)| (key.trim(), value.trim()))
    }

    /// Skip this line, or fail with `reason` in strict mode.
    fn reject(&self, reason: MalformedLine, options: &ParseOptions) -> Result<(), ParseError> {
        if options.strict {
            return Err(ParseError { line: self.number, reason });
        }

        log::debug!(target: LOG_TARGET, "Skipping line {}: {reason}", self.number);
        Ok(())
    }
}

fn significant_lines(text: &str) -> impl Iterator<Item = Line<'_>> {
    text.lines().enumerate().filter_map(|(index, raw)| {
        let trimmed = raw.trim();
        if trimmed.is_empty() || trimmed.starts_with('#') {
            return None;
        }

        Some(Line {
            number: index + 1,
            indent: raw.chars().take_while(|c| c.is_whitespace()).count(),
            text: trimmed,
        })
    })
}

/// Parse a document, choosing the algorithm by sniffing its content.
///
/// # Errors
///
/// Returns an error for the first malformed line when `options.strict` is set.
pub fn parse(text: &str, options: &ParseOptions) -> Result<Document, ParseError> {
    parse_as(text, DocumentShape::sniff(text), options)
}

/// Parse a document with an explicitly chosen algorithm.
///
/// # Errors
///
/// Returns an error for the first malformed line when `options.strict` is set.
pub fn parse_as(text: &str, shape: DocumentShape, options: &ParseOptions) -> Result<Document, ParseError> {
    match shape {
        DocumentShape::KeyValue => parse_key_value(text, options).map(Document::Mapping),
        DocumentShape::RecordList => parse_record_list(text, options).map(Document::Records),
    }
}

/// Parse a plain key/value document.
///
/// # Errors
///
/// Returns an error for the first malformed line when `options.strict` is set.
pub fn parse_key_value(text: &str, options: &ParseOptions) -> Result<SimpleMapping, ParseError> {
    significant_lines(text)
        .try_fold(KeyValueState::default(), |state, line| state.step(&line, options))
        .map(KeyValueState::finish)
}

/// Parse a list-of-objects document into flat records.
///
/// # Errors
///
/// Returns an error for the first malformed line when `options.strict` is set.
pub fn parse_record_list(text: &str, options: &ParseOptions) -> Result<Vec<FlatRecord>, ParseError> {
    significant_lines(text)
        .try_fold(RecordListState::default(), |state, line| state.step(&line, options))
        .map(RecordListState::finish)
}

#[derive(Debug, Default)]
struct KeyValueState {
    mapping: SimpleMapping,
    pending: Option<(CompactString, String)>,
}

impl KeyValueState {
    fn step(mut self, line: &Line<'_>, options: &ParseOptions) -> Result<Self, ParseError> {
        let starts_key = if line.indent == 0 { line.key_value() } else { None };
        let Some((key, value)) = starts_key else {
            let Some((_, value)) = &mut self.pending else {
                let reason = if line.indent > 0 {
                    MalformedLine::ContinuationBeforeKey
                } else {
                    MalformedLine::MissingSeparator
                };
                return line.reject(reason, options).map(|()| self);
            };

            if !value.is_empty() {
                value.push(' ');
            }
            value.push_str(line.text);
            return Ok(self);
        };

        if key.is_empty() {
            return line.reject(MalformedLine::EmptyKey, options).map(|()| self);
        }

        self.finalize_pending();
        self.pending = Some((key.into(), value.to_owned()));
        Ok(self)
    }

    // values are coerced only once every continuation line has been seen
    fn finalize_pending(&mut self) {
        if let Some((key, value)) = self.pending.take() {
            let _ = self.mapping.insert(key, coerce(&value));
        }
    }

    fn finish(mut self) -> SimpleMapping {
        self.finalize_pending();
        self.mapping
    }
}

/// A nested list being collected under a list-valued field.
#[derive(Debug)]
struct NestedCollection {
    key: CompactString,
    items: Vec<NestedItem>,

    /// Indentation of the most recent `- ` item marker.
    item_indent: Option<usize>,
}

impl NestedCollection {
    fn new(key: &str) -> Self {
        Self {
            key: key.into(),
            items: Vec::new(),
            item_indent: None,
        }
    }

    fn push_item(&mut self, content: &str, indent: usize) {
        let item = match content.split_once(':') {
            Some((key, value)) => NestedItem::Record([(key.trim(), coerce(value))].into_iter().collect()),
            None => NestedItem::Value(coerce(content)),
        };

        self.items.push(item);
        self.item_indent = Some(indent);
    }

    /// Add a field to the most recent item if the line continues it.
    ///
    /// Returns `false` when the line belongs to the enclosing record instead.
    fn extend_last(&mut self, line: &Line<'_>, key: &str, value: &str) -> bool {
        let continues = self.item_indent.is_some_and(|item_indent| line.indent > item_indent);
        match self.items.last_mut() {
            Some(NestedItem::Record(fields)) if continues => {
                let _ = fields.insert(key, coerce(value));
                true
            }
            _ => false,
        }
    }

    fn flush_into(self, record: &mut FlatRecord) {
        if !self.items.is_empty() {
            let _ = record.insert(self.key, FieldValue::List(self.items));
        }
    }
}

#[derive(Debug, Default)]
struct RecordListState {
    records: Vec<FlatRecord>,
    current: Option<FlatRecord>,
    nested: Option<NestedCollection>,
}

impl RecordListState {
    fn step(mut self, line: &Line<'_>, options: &ParseOptions) -> Result<Self, ParseError> {
        if let Some(id) = line.text.strip_prefix(RECORD_START) {
            self.close_record();
            let mut record = FlatRecord::new();
            let _ = record.insert("id", FieldValue::Scalar(RawValue::String(unquote(id))));
            self.current = Some(record);
            return Ok(self);
        }

        if let Some(content) = line.text.strip_prefix(LIST_ITEM) {
            let Some(nested) = &mut self.nested else {
                return line.reject(MalformedLine::StrayListItem, options).map(|()| self);
            };

            nested.push_item(content, line.indent);
            return Ok(self);
        }

        let Some((key, value)) = line.key_value() else {
            return line.reject(MalformedLine::MissingSeparator, options).map(|()| self);
        };

        if key.is_empty() {
            return line.reject(MalformedLine::EmptyKey, options).map(|()| self);
        }

        let Some(record) = &mut self.current else {
            return line.reject(MalformedLine::FieldOutsideRecord, options).map(|()| self);
        };

        if let Some(nested) = &mut self.nested
            && nested.extend_last(line, key, value)
        {
            return Ok(self);
        }

        if let Some(nested) = self.nested.take() {
            nested.flush_into(record);
        }

        if options.is_list_field(key) {
            self.nested = Some(NestedCollection::new(key));
        } else {
            let _ = record.insert(key, FieldValue::Scalar(coerce(value)));
        }

        Ok(self)
    }

    fn close_record(&mut self) {
        if let Some(mut record) = self.current.take() {
            if let Some(nested) = self.nested.take() {
                nested.flush_into(&mut record);
            }
            self.records.push(record);
        }
    }

    fn finish(mut self) -> Vec<FlatRecord> {
        self.close_record();
        self.records
    }
}
