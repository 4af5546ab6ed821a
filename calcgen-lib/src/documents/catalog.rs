//! The fixed set of documents a project is built from, and how each one is read.

use super::{Document, DocumentShape, ParseOptions, parse_as};
use crate::Result;
use camino::{Utf8Path, Utf8PathBuf};
use ohno::IntoAppError;
use std::fs;
use std::io;

const LOG_TARGET: &str = " documents";

/// Fields of a benchmark record that hold a nested tier list.
pub const BENCHMARK_TIERS: [&str; 3] = ["healthy", "warning", "critical"];

/// The role a document plays in a project.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum DocumentKind {
    /// Site-wide settings.
    Site,

    /// The metric card list.
    Metrics,

    /// Reference ranges for results.
    Benchmarks,
}

impl DocumentKind {
    /// The shape a document of this kind is parsed as.
    ///
    /// Benchmarks have no fixed shape: a benchmark document made of `- id:` records is
    /// read as a table, anything else as an opaque mapping.
    #[must_use]
    pub const fn shape(self) -> Option<DocumentShape> {
        match self {
            Self::Site => Some(DocumentShape::KeyValue),
            Self::Metrics => Some(DocumentShape::RecordList),
            Self::Benchmarks => None,
        }
    }

    /// The shape to parse `text` as, probing the content when the kind has no fixed shape.
    #[must_use]
    pub fn shape_of(self, text: &str) -> DocumentShape {
        self.shape().unwrap_or_else(|| DocumentShape::probe(text))
    }
}

/// Where each document of a project lives, and how its records are shaped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocumentSources {
    pub site: Utf8PathBuf,
    pub metrics: Utf8PathBuf,
    pub benchmarks: Utf8PathBuf,

    /// List-valued fields of the metrics document.
    pub metrics_list_fields: Vec<String>,

    /// Fail on malformed lines instead of skipping them.
    pub strict: bool,
}

impl DocumentSources {
    #[must_use]
    pub fn path(&self, kind: DocumentKind) -> &Utf8Path {
        match kind {
            DocumentKind::Site => &self.site,
            DocumentKind::Metrics => &self.metrics,
            DocumentKind::Benchmarks => &self.benchmarks,
        }
    }

    /// Parse options for a document of the given kind.
    #[must_use]
    pub fn options(&self, kind: DocumentKind) -> ParseOptions {
        let options = match kind {
            DocumentKind::Site => ParseOptions::with_list_fields(Vec::<String>::new()),
            DocumentKind::Metrics => ParseOptions::with_list_fields(self.metrics_list_fields.iter().map(String::as_str)),
            DocumentKind::Benchmarks => ParseOptions::with_list_fields(BENCHMARK_TIERS),
        };

        options.strict(self.strict)
    }

    /// Read and parse one document.
    ///
    /// Returns `Ok(None)` when the document does not exist.
    ///
    /// # Errors
    ///
    /// Returns an error if the document exists but cannot be read, or if it contains a
    /// malformed line in strict mode.
    pub fn load(&self, kind: DocumentKind) -> Result<Option<Document>> {
        let path = self.path(kind);
        let text = match fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                log::debug!(target: LOG_TARGET, "No {kind} document at '{path}', using empty data");
                return Ok(None);
            }
            Err(e) => return Err(e).into_app_err_with(|| format!("reading {kind} document '{path}'")),
        };

        let document = parse_as(&text, kind.shape_of(&text), &self.options(kind))
            .into_app_err_with(|| format!("parsing {kind} document '{path}'"))?;

        log::debug!(target: LOG_TARGET, "Parsed {kind} document '{path}' as {}", document.shape());
        Ok(Some(document))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::RawValue;
    use strum::IntoEnumIterator;

    fn sources(dir: &Utf8Path) -> DocumentSources {
        DocumentSources {
            site: dir.join("site.yml"),
            metrics: dir.join("metrics.yml"),
            benchmarks: dir.join("benchmarks.yml"),
            metrics_list_fields: vec!["controls".into(), "results".into()],
            strict: false,
        }
    }

    fn temp_dir() -> (tempfile::TempDir, Utf8PathBuf) {
        let tmp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        (tmp, path)
    }

    #[test]
    fn test_missing_documents_load_as_none() {
        let (_tmp, dir) = temp_dir();
        let sources = sources(&dir);
        for kind in DocumentKind::iter() {
            assert!(sources.load(kind).unwrap().is_none(), "{kind}");
        }
    }

    #[test]
    fn test_site_is_always_key_value() {
        let (_tmp, dir) = temp_dir();
        let sources = sources(&dir);
        // would be sniffed as a record list
        fs::write(&sources.site, "tracking_id: 7\npage_title: Home\n").unwrap();

        let Some(Document::Mapping(site)) = sources.load(DocumentKind::Site).unwrap() else {
            panic!("site should parse as a mapping");
        };
        assert_eq!(site.get("tracking_id"), Some(&RawValue::Integer(7)));
    }

    #[test]
    fn test_metrics_is_always_a_record_list() {
        let (_tmp, dir) = temp_dir();
        let sources = sources(&dir);
        fs::write(&sources.metrics, "- id: a\n").unwrap();

        let doc = sources.load(DocumentKind::Metrics).unwrap();
        assert!(matches!(doc, Some(Document::Records(records)) if records.len() == 1));
    }

    #[test]
    fn test_benchmarks_shape_is_probed() {
        let (_tmp, dir) = temp_dir();
        let sources = sources(&dir);

        fs::write(&sources.benchmarks, "- id: ratio\n  healthy:\n    - min: 1\n      max: 2\n").unwrap();
        let doc = sources.load(DocumentKind::Benchmarks).unwrap();
        let Some(Document::Records(records)) = doc else {
            panic!("expected records");
        };
        assert!(records[0].list("healthy").is_some());

        fs::write(&sources.benchmarks, "ratio: opaque\n").unwrap();
        let doc = sources.load(DocumentKind::Benchmarks).unwrap();
        assert!(matches!(doc, Some(Document::Mapping(_))));
    }

    #[test]
    fn test_strict_errors_name_the_document() {
        let (_tmp, dir) = temp_dir();
        let sources = DocumentSources { strict: true, ..sources(&dir) };
        fs::write(&sources.site, "name: Acme\nbroken line\n").unwrap();

        let err = sources.load(DocumentKind::Site).unwrap_err().to_string();
        assert!(err.contains("line 2"), "{err}");
        assert!(err.contains("site document"), "{err}");
    }

    #[test]
    fn test_unreadable_document_is_an_error() {
        let (_tmp, dir) = temp_dir();
        let sources = sources(&dir);
        // a directory cannot be read as text
        fs::create_dir(&sources.metrics).unwrap();
        assert!(sources.load(DocumentKind::Metrics).is_err());
    }
}
