//! One full regeneration cycle
//!
//! A cycle reads the current text of every document, rebuilds the model from scratch,
//! renders the calculator script and replaces the artifact. Nothing carries over between
//! cycles. If any step fails the artifact keeps its previous content.

use crate::Result;
use crate::documents::DocumentSources;
use crate::model::DataSet;
use crate::render::generate;
use camino::{Utf8Path, Utf8PathBuf};
use core::fmt::{self, Display, Formatter};
use ohno::IntoAppError;
use std::fs;
use std::io::Write;
use tempfile::NamedTempFile;

const LOG_TARGET: &str = "  pipeline";

/// What a successful cycle produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RegenerationSummary {
    pub cards: usize,
    pub controls: usize,
    pub results: usize,
    pub benchmarks: usize,
    pub artifact: Utf8PathBuf,
}

impl Display for RegenerationSummary {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Generated '{}' with {} card(s), {} control(s), {} result(s) and {} benchmark(s)",
            self.artifact, self.cards, self.controls, self.results, self.benchmarks
        )
    }
}

/// The documents a project is built from and the script they are rendered to.
#[derive(Debug, Clone)]
pub struct Pipeline {
    sources: DocumentSources,
    artifact: Utf8PathBuf,
}

impl Pipeline {
    #[must_use]
    pub const fn new(sources: DocumentSources, artifact: Utf8PathBuf) -> Self {
        Self { sources, artifact }
    }

    #[must_use]
    pub const fn sources(&self) -> &DocumentSources {
        &self.sources
    }

    #[must_use]
    pub fn artifact(&self) -> &Utf8Path {
        &self.artifact
    }

    /// Run one cycle: load, structure, render and write.
    ///
    /// # Errors
    ///
    /// Returns an error if a document cannot be read or parsed, or if the artifact cannot be
    /// written. The artifact is left untouched in every error case.
    pub fn regenerate(&self) -> Result<RegenerationSummary> {
        let data = DataSet::load(&self.sources)?;

        let mut script = String::new();
        generate(&data.site, &data.cards, &data.benchmarks, &mut script)?;
        write_artifact(&self.artifact, &script)?;

        let summary = RegenerationSummary {
            cards: data.cards.len(),
            controls: data.control_count(),
            results: data.result_count(),
            benchmarks: data.benchmarks.len(),
            artifact: self.artifact.clone(),
        };

        log::debug!(target: LOG_TARGET, "{summary}");
        Ok(summary)
    }
}

/// Replace `path` with `contents` so that readers see either the old or the new file.
fn write_artifact(path: &Utf8Path, contents: &str) -> Result<()> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_str().is_empty() => parent,
        _ => Utf8Path::new("."),
    };

    fs::create_dir_all(dir).into_app_err_with(|| format!("creating directory '{dir}'"))?;

    let mut file = NamedTempFile::new_in(dir).into_app_err_with(|| format!("creating a temporary file in '{dir}'"))?;
    file.write_all(contents.as_bytes())
        .into_app_err_with(|| format!("writing the new contents of '{path}'"))?;
    file.flush().into_app_err_with(|| format!("writing the new contents of '{path}'"))?;

    if let Some(permissions) = artifact_permissions(path) {
        file.as_file()
            .set_permissions(permissions)
            .into_app_err_with(|| format!("setting permissions for '{path}'"))?;
    }

    let _ = file.persist(path).into_app_err_with(|| format!("replacing '{path}'"))?;
    Ok(())
}

/// Permissions for the replacement file: those of the current artifact, or world-readable
/// for a new one. Temporary files are created owner-only.
fn artifact_permissions(path: &Utf8Path) -> Option<fs::Permissions> {
    if let Ok(metadata) = fs::metadata(path) {
        return Some(metadata.permissions());
    }

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        Some(fs::Permissions::from_mode(0o644))
    }

    #[cfg(not(unix))]
    {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SITE: &str = "name: Acme\ntagline: \"Secure by default\"\n";

    const METRICS: &str = "\
- id: security-org-size
  title: Organization Size
  icon: tenancy
  controls:
    - id: security-headcount
      type: range
      min: 1
      max: 500
      default: 10
  results:
    - id: security-vs-eng-percent
      format: percentage
      benchmark: security_team_ratio.engineering
";

    const BENCHMARKS: &str = "\
- id: security_team_ratio.engineering
  healthy:
    - min: 1.0
      max: 2.5
";

    fn project() -> (tempfile::TempDir, Pipeline) {
        let tmp = tempfile::tempdir().unwrap();
        let dir = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        let sources = DocumentSources {
            site: dir.join("_data/site.yml"),
            metrics: dir.join("_data/metrics.yml"),
            benchmarks: dir.join("_data/benchmarks.yml"),
            metrics_list_fields: vec!["controls".into(), "results".into()],
            strict: false,
        };
        (tmp, Pipeline::new(sources, dir.join("script.js")))
    }

    fn write_documents(pipeline: &Pipeline) {
        let sources = pipeline.sources();
        fs::create_dir_all(sources.site.parent().unwrap()).unwrap();
        fs::write(&sources.site, SITE).unwrap();
        fs::write(&sources.metrics, METRICS).unwrap();
        fs::write(&sources.benchmarks, BENCHMARKS).unwrap();
    }

    #[test]
    fn test_regenerate_writes_artifact() {
        let (_tmp, pipeline) = project();
        write_documents(&pipeline);

        let summary = pipeline.regenerate().unwrap();
        assert_eq!(summary.cards, 1);
        assert_eq!(summary.controls, 1);
        assert_eq!(summary.results, 1);
        assert_eq!(summary.benchmarks, 1);
        assert_eq!(summary.artifact.as_path(), pipeline.artifact());

        let script = fs::read_to_string(pipeline.artifact()).unwrap();
        assert!(script.contains("\"tagline\": \"Secure by default\""));
        assert!(script.contains("\"security-headcount\""));
    }

    #[test]
    fn test_missing_documents_still_produce_an_artifact() {
        let (_tmp, pipeline) = project();

        let summary = pipeline.regenerate().unwrap();
        assert_eq!(summary.cards, 0);

        let script = fs::read_to_string(pipeline.artifact()).unwrap();
        assert!(script.contains("const siteData = {};"));
        assert!(script.contains("const metricsData = [];"));
        assert!(script.contains("const benchmarks = {};"));
        assert!(script.contains("const cardMarkup = [];"));
    }

    #[test]
    fn test_replacing_leaves_a_complete_artifact() {
        let (tmp, pipeline) = project();
        write_documents(&pipeline);
        let _ = pipeline.regenerate().unwrap();
        let first = fs::read_to_string(pipeline.artifact()).unwrap();

        fs::write(&pipeline.sources().site, "name: Globex\n").unwrap();
        let _ = pipeline.regenerate().unwrap();
        let second = fs::read_to_string(pipeline.artifact()).unwrap();

        assert_ne!(first, second);
        assert!(second.contains("\"name\": \"Globex\""));
        assert!(second.contains("function getBenchmark"));

        // no temporary files are left behind
        let entries: Vec<_> = fs::read_dir(tmp.path()).unwrap().map(|entry| entry.unwrap().file_name()).collect();
        assert_eq!(entries.len(), 2, "{entries:?}");
    }

    #[test]
    fn test_read_failure_leaves_artifact_untouched() {
        let (_tmp, pipeline) = project();
        write_documents(&pipeline);
        let _ = pipeline.regenerate().unwrap();
        let before = fs::read_to_string(pipeline.artifact()).unwrap();

        // a directory in place of the document cannot be read
        fs::remove_file(&pipeline.sources().metrics).unwrap();
        fs::create_dir(&pipeline.sources().metrics).unwrap();

        assert!(pipeline.regenerate().is_err());
        assert_eq!(fs::read_to_string(pipeline.artifact()).unwrap(), before);
    }

    #[test]
    fn test_strict_parse_failure_leaves_artifact_untouched() {
        let (_tmp, pipeline) = project();
        write_documents(&pipeline);
        let _ = pipeline.regenerate().unwrap();
        let before = fs::read_to_string(pipeline.artifact()).unwrap();

        let strict = Pipeline::new(
            DocumentSources {
                strict: true,
                ..pipeline.sources().clone()
            },
            pipeline.artifact().to_path_buf(),
        );
        fs::write(&strict.sources().site, "name: Acme\nnot a pair\n").unwrap();

        assert!(strict.regenerate().is_err());
        assert_eq!(fs::read_to_string(pipeline.artifact()).unwrap(), before);
    }

    #[test]
    fn test_creates_the_artifact_directory() {
        let (tmp, pipeline) = project();
        let nested = Utf8PathBuf::try_from(tmp.path().join("assets/js/script.js")).unwrap();
        let pipeline = Pipeline::new(pipeline.sources().clone(), nested.clone());

        let _ = pipeline.regenerate().unwrap();
        assert!(nested.is_file());
    }

    #[test]
    fn test_summary_display() {
        let summary = RegenerationSummary {
            cards: 5,
            controls: 20,
            results: 19,
            benchmarks: 12,
            artifact: Utf8PathBuf::from("script.js"),
        };
        assert_eq!(
            summary.to_string(),
            "Generated 'script.js' with 5 card(s), 20 control(s), 19 result(s) and 12 benchmark(s)"
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_new_artifact_is_world_readable() {
        use std::os::unix::fs::PermissionsExt;

        let (_tmp, pipeline) = project();
        let _ = pipeline.regenerate().unwrap();

        let mode = fs::metadata(pipeline.artifact()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o644);
    }

    #[cfg(unix)]
    #[test]
    fn test_replacing_keeps_artifact_permissions() {
        use std::os::unix::fs::PermissionsExt;

        let (_tmp, pipeline) = project();
        write_documents(&pipeline);
        let _ = pipeline.regenerate().unwrap();

        fs::set_permissions(pipeline.artifact(), fs::Permissions::from_mode(0o664)).unwrap();
        fs::write(&pipeline.sources().site, "name: Globex\n").unwrap();
        let _ = pipeline.regenerate().unwrap();

        let mode = fs::metadata(pipeline.artifact()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o664);
    }
}
