use camino::{Utf8Path, Utf8PathBuf};
use rustc_hash::FxHashMap;
use std::fs;
use std::time::SystemTime;

const LOG_TARGET: &str = "   watcher";

/// What the watcher knows about one path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PathState {
    /// The path has not been seen yet.
    Unseen,

    /// The modification time observed most recently.
    Baselined(SystemTime),
}

/// Detects modification-time changes on a fixed set of paths.
#[derive(Debug)]
pub struct Watcher {
    paths: Vec<Utf8PathBuf>,
    states: FxHashMap<Utf8PathBuf, PathState>,
}

impl Watcher {
    /// Create a watcher for the given paths, ignoring duplicates.
    ///
    /// Nothing is read from disk until the first [`poll`](Self::poll).
    #[must_use]
    pub fn new(paths: impl IntoIterator<Item = Utf8PathBuf>) -> Self {
        let mut watched = Vec::new();
        let mut states = FxHashMap::default();

        for path in paths {
            if states.insert(path.clone(), PathState::Unseen).is_none() {
                watched.push(path);
            }
        }

        Self { paths: watched, states }
    }

    /// Create a watcher and capture the baseline of every path that exists now.
    ///
    /// Edits made after this call are reported by the next [`poll`](Self::poll).
    #[must_use]
    pub fn baselined(paths: impl IntoIterator<Item = Utf8PathBuf>) -> Self {
        let mut watcher = Self::new(paths);
        let _ = watcher.poll();
        watcher
    }

    #[must_use]
    pub fn paths(&self) -> &[Utf8PathBuf] {
        &self.paths
    }

    #[must_use]
    pub fn state(&self, path: &Utf8Path) -> Option<PathState> {
        self.states.get(path).copied()
    }

    /// Re-stat every path and return the ones that changed since the last poll.
    ///
    /// A path seen for the first time only records its baseline. A path that is missing or
    /// cannot be stat'ed keeps its state and is not reported. Only a strictly newer
    /// modification time counts as a change.
    pub fn poll(&mut self) -> Vec<Utf8PathBuf> {
        let mut changed = Vec::new();

        for path in &self.paths {
            let Some(modified) = modified_time(path) else {
                continue;
            };

            let state = self.states.entry(path.clone()).or_insert(PathState::Unseen);
            match *state {
                PathState::Unseen => {
                    log::debug!(target: LOG_TARGET, "Captured baseline for '{path}'");
                    *state = PathState::Baselined(modified);
                }
                PathState::Baselined(previous) if modified > previous => {
                    *state = PathState::Baselined(modified);
                    changed.push(path.clone());
                }
                PathState::Baselined(_) => {}
            }
        }

        changed
    }
}

fn modified_time(path: &Utf8Path) -> Option<SystemTime> {
    fs::metadata(path).and_then(|metadata| metadata.modified()).ok()
}

#[cfg(test)]
pub(super) mod tests {
    use super::*;
    use core::time::Duration;
    use std::fs::File;

    pub fn temp_dir() -> (tempfile::TempDir, Utf8PathBuf) {
        let tmp = tempfile::tempdir().unwrap();
        let path = Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap();
        (tmp, path)
    }

    /// Move a file's modification time by `offset_secs` relative to its current value.
    pub fn touch(path: &Utf8Path, offset_secs: i64) {
        let current = fs::metadata(path).unwrap().modified().unwrap();
        let offset = Duration::from_secs(offset_secs.unsigned_abs());
        let target = if offset_secs >= 0 { current + offset } else { current - offset };
        File::options().write(true).open(path).unwrap().set_modified(target).unwrap();
    }

    #[test]
    fn test_first_sighting_only_baselines() {
        let (_tmp, dir) = temp_dir();
        let path = dir.join("site.yml");
        fs::write(&path, "name: Acme\n").unwrap();

        let mut watcher = Watcher::new([path.clone()]);
        assert_eq!(watcher.state(&path), Some(PathState::Unseen));
        assert!(watcher.poll().is_empty());
        assert!(matches!(watcher.state(&path), Some(PathState::Baselined(_))));
    }

    #[test]
    fn test_reports_newer_modification_once() {
        let (_tmp, dir) = temp_dir();
        let path = dir.join("metrics.yml");
        fs::write(&path, "- id: a\n").unwrap();

        let mut watcher = Watcher::new([path.clone()]);
        assert!(watcher.poll().is_empty());

        touch(&path, 5);
        assert_eq!(watcher.poll(), [path.clone()]);
        assert!(watcher.poll().is_empty());
    }

    #[test]
    fn test_untouched_paths_never_change() {
        let (_tmp, dir) = temp_dir();
        let path = dir.join("site.yml");
        fs::write(&path, "name: Acme\n").unwrap();

        let mut watcher = Watcher::new([path]);
        for _ in 0..20 {
            assert!(watcher.poll().is_empty());
        }
    }

    #[test]
    fn test_older_modification_is_not_a_change() {
        let (_tmp, dir) = temp_dir();
        let path = dir.join("site.yml");
        fs::write(&path, "name: Acme\n").unwrap();

        let mut watcher = Watcher::new([path.clone()]);
        assert!(watcher.poll().is_empty());

        touch(&path, -60);
        assert!(watcher.poll().is_empty());
    }

    #[test]
    fn test_missing_paths_are_unchanged() {
        let (_tmp, dir) = temp_dir();
        let path = dir.join("benchmarks.yml");

        let mut watcher = Watcher::new([path.clone()]);
        assert!(watcher.poll().is_empty());
        assert_eq!(watcher.state(&path), Some(PathState::Unseen));

        // appearing later only captures the baseline
        fs::write(&path, "- id: a\n").unwrap();
        assert!(watcher.poll().is_empty());
        let baseline = watcher.state(&path);
        assert!(matches!(baseline, Some(PathState::Baselined(_))));

        // disappearing keeps the baseline
        fs::remove_file(&path).unwrap();
        assert!(watcher.poll().is_empty());
        assert_eq!(watcher.state(&path), baseline);
    }

    #[test]
    fn test_duplicate_paths_are_watched_once() {
        let (_tmp, dir) = temp_dir();
        let path = dir.join("site.yml");
        fs::write(&path, "name: Acme\n").unwrap();

        let mut watcher = Watcher::new([path.clone(), dir.join("other.yml"), path.clone()]);
        assert_eq!(watcher.paths().len(), 2);

        assert!(watcher.poll().is_empty());
        touch(&path, 5);
        assert_eq!(watcher.poll(), [path]);
    }

    #[test]
    fn test_baselined_reports_edits_made_after_creation() {
        let (_tmp, dir) = temp_dir();
        let path = dir.join("site.yml");
        fs::write(&path, "name: Acme\n").unwrap();

        let mut watcher = Watcher::baselined([path.clone()]);
        assert!(matches!(watcher.state(&path), Some(PathState::Baselined(_))));

        touch(&path, 5);
        assert_eq!(watcher.poll(), [path]);
    }
}
