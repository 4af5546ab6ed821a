use super::{FlatRecord, SimpleMapping};
use serde::Serialize;

/// The two document layouts the parser understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "kebab-case")]
pub enum DocumentShape {
    /// Top-level `key: value` pairs.
    KeyValue,

    /// A sequence of records, each opened by `- id:`.
    RecordList,
}

impl DocumentShape {
    /// Guess the shape of a document from its content.
    ///
    /// Text containing both `id:` and `title:` is taken to be a record list. This can misfire
    /// on key/value documents that happen to mention those substrings, so documents with a
    /// known role are dispatched through [`DocumentKind::shape`](super::DocumentKind::shape)
    /// instead.
    #[must_use]
    pub fn sniff(text: &str) -> Self {
        if text.contains("id:") && text.contains("title:") {
            Self::RecordList
        } else {
            Self::KeyValue
        }
    }

    /// Structural probe: a record list if any line opens a `- id:` record.
    #[must_use]
    pub fn probe(text: &str) -> Self {
        if text.lines().any(|line| line.trim_start().starts_with("- id:")) {
            Self::RecordList
        } else {
            Self::KeyValue
        }
    }
}

/// A parsed document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Document {
    Mapping(SimpleMapping),
    Records(Vec<FlatRecord>),
}

impl Document {
    #[must_use]
    pub const fn shape(&self) -> DocumentShape {
        match self {
            Self::Mapping(_) => DocumentShape::KeyValue,
            Self::Records(_) => DocumentShape::RecordList,
        }
    }

    #[must_use]
    pub fn into_mapping(self) -> Option<SimpleMapping> {
        match self {
            Self::Mapping(mapping) => Some(mapping),
            Self::Records(_) => None,
        }
    }

    #[must_use]
    pub fn into_records(self) -> Option<Vec<FlatRecord>> {
        match self {
            Self::Records(records) => Some(records),
            Self::Mapping(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sniff_needs_both_markers() {
        assert_eq!(DocumentShape::sniff("- id: a\n  title: A\n"), DocumentShape::RecordList);
        assert_eq!(DocumentShape::sniff("- id: a\n"), DocumentShape::KeyValue);
        assert_eq!(DocumentShape::sniff("title: Home\n"), DocumentShape::KeyValue);
    }

    #[test]
    fn test_sniff_false_positive() {
        // a site document that merely mentions both markers
        let text = "analytics_id: UA-1\npage_title: Home\n";
        assert_eq!(DocumentShape::sniff(text), DocumentShape::RecordList);
    }

    #[test]
    fn test_probe_looks_for_record_markers() {
        assert_eq!(DocumentShape::probe("# ranges\n- id: ratio\n"), DocumentShape::RecordList);
        assert_eq!(DocumentShape::probe("  - id: nested\n"), DocumentShape::RecordList);
        assert_eq!(DocumentShape::probe("id: 1\ntitle: x\n"), DocumentShape::KeyValue);
        assert_eq!(DocumentShape::probe(""), DocumentShape::KeyValue);
    }

    #[test]
    fn test_empty_documents_serialize_as_empty_containers() {
        let mapping = Document::Mapping(SimpleMapping::new());
        let records = Document::Records(Vec::new());
        assert_eq!(mapping.shape(), DocumentShape::KeyValue);
        assert_eq!(serde_json::to_string(&mapping).unwrap(), "{}");
        assert_eq!(serde_json::to_string(&records).unwrap(), "[]");
    }

    #[test]
    fn test_shape_display() {
        assert_eq!(DocumentShape::RecordList.to_string(), "record-list");
    }
}
