use crate::Result;
use crate::documents::DocumentSources;
use crate::pipeline::Pipeline;
use camino::{Utf8Path, Utf8PathBuf};
use core::time::Duration;
use ohno::{IntoAppError, app_err};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io;

/// The default configuration TOML content, embedded from `default_config.toml`
pub const DEFAULT_CONFIG_TOML: &str = include_str!("../../default_config.toml");

/// Name of the configuration file looked up in the project root
pub const CONFIG_FILE_NAME: &str = "calcgen.toml";

const MAX_POLL_INTERVAL_MS: u64 = 60 * 60 * 1000;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// Key/value document with site-wide settings
    #[serde(default = "default_site_document")]
    pub site_document: Utf8PathBuf,

    /// List-of-objects document with the metric cards
    #[serde(default = "default_metrics_document")]
    pub metrics_document: Utf8PathBuf,

    /// Document with the benchmark ranges
    #[serde(default = "default_benchmarks_document")]
    pub benchmarks_document: Utf8PathBuf,

    /// Fields of a metric record whose value is a nested list
    #[serde(default = "default_metrics_list_fields")]
    pub metrics_list_fields: Vec<String>,

    /// Where the generated script is written
    #[serde(default = "default_artifact_path")]
    pub artifact_path: Utf8PathBuf,

    /// Extra paths that trigger a regeneration when they change
    #[serde(default)]
    pub watched_paths: Vec<Utf8PathBuf>,

    /// How often the watcher checks for changes
    #[serde(default = "default_poll_interval_ms")]
    pub poll_interval_ms: u64,

    /// Fail on malformed lines instead of skipping them
    #[serde(default)]
    pub strict: bool,
}

fn default_site_document() -> Utf8PathBuf {
    Utf8PathBuf::from("_data/site.yml")
}

fn default_metrics_document() -> Utf8PathBuf {
    Utf8PathBuf::from("_data/metrics.yml")
}

fn default_benchmarks_document() -> Utf8PathBuf {
    Utf8PathBuf::from("_data/benchmarks.yml")
}

fn default_metrics_list_fields() -> Vec<String> {
    vec!["controls".to_string(), "results".to_string()]
}

fn default_artifact_path() -> Utf8PathBuf {
    Utf8PathBuf::from("script.js")
}

const fn default_poll_interval_ms() -> u64 {
    1000
}

impl Config {
    /// Load configuration from a file or use defaults
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, parsed, or fails validation
    pub fn load(root: &Utf8Path, config_path: Option<&Utf8PathBuf>) -> Result<Self> {
        let (final_path, text) = if let Some(path) = config_path {
            let text = fs::read_to_string(path).into_app_err_with(|| format!("reading calcgen configuration file '{path}'"))?;
            (path.clone(), text)
        } else {
            let path = root.join(CONFIG_FILE_NAME);
            match fs::read_to_string(&path) {
                Ok(text) => (path, text),
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
                Err(e) => return Err(e).into_app_err_with(|| format!("reading calcgen configuration file '{path}'")),
            }
        };

        let config: Self = toml::from_str(&text).into_app_err_with(|| format!("parsing configuration file '{final_path}'"))?;
        config.validate()?;

        Ok(config)
    }

    /// Save the default configuration to a TOML file
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written
    pub fn save_default(output_path: &Utf8Path) -> Result<()> {
        fs::write(output_path, DEFAULT_CONFIG_TOML).into_app_err_with(|| format!("writing default configuration to {output_path}"))?;
        Ok(())
    }

    /// Validate configuration values
    ///
    /// # Errors
    ///
    /// Returns an error if the polling interval is out of range, a list field name is empty,
    /// or the artifact would overwrite one of the documents
    fn validate(&self) -> Result<()> {
        if !(1..=MAX_POLL_INTERVAL_MS).contains(&self.poll_interval_ms) {
            return Err(app_err!(
                "poll_interval_ms must be between 1 and {MAX_POLL_INTERVAL_MS}, got {}",
                self.poll_interval_ms
            ));
        }

        if self.metrics_list_fields.iter().any(|field| field.trim().is_empty()) {
            return Err(app_err!("metrics_list_fields must not contain empty names"));
        }

        let documents = [&self.site_document, &self.metrics_document, &self.benchmarks_document];
        if documents.contains(&&self.artifact_path) {
            return Err(app_err!(
                "artifact_path '{}' must not be one of the data documents",
                self.artifact_path
            ));
        }

        Ok(())
    }

    /// The data documents of a project rooted at `root`.
    #[must_use]
    pub fn document_sources(&self, root: &Utf8Path) -> DocumentSources {
        DocumentSources {
            site: root.join(&self.site_document),
            metrics: root.join(&self.metrics_document),
            benchmarks: root.join(&self.benchmarks_document),
            metrics_list_fields: self.metrics_list_fields.clone(),
            strict: self.strict,
        }
    }

    #[must_use]
    pub fn artifact(&self, root: &Utf8Path) -> Utf8PathBuf {
        root.join(&self.artifact_path)
    }

    #[must_use]
    pub fn pipeline(&self, root: &Utf8Path) -> Pipeline {
        Pipeline::new(self.document_sources(root), self.artifact(root))
    }

    /// Every path whose change triggers a regeneration: the three documents followed by the
    /// extra watched paths, without duplicates.
    #[must_use]
    pub fn watched_paths(&self, root: &Utf8Path) -> Vec<Utf8PathBuf> {
        let mut paths: Vec<Utf8PathBuf> = Vec::new();
        let candidates = [&self.site_document, &self.metrics_document, &self.benchmarks_document]
            .into_iter()
            .chain(&self.watched_paths);

        for path in candidates.map(|path| root.join(path)) {
            if !paths.contains(&path) {
                paths.push(path);
            }
        }

        paths
    }

    #[must_use]
    pub const fn poll_interval(&self) -> Duration {
        Duration::from_millis(self.poll_interval_ms)
    }
}

impl Default for Config {
    fn default() -> Self {
        toml::from_str(DEFAULT_CONFIG_TOML).expect("default_config.toml should be valid TOML that deserializes to Config")
    }
}
