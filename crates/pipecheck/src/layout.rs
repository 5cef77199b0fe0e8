//! Log directory layout and test discovery.

use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

/// Suffix of every simulator log.
pub const LOG_SUFFIX: &str = ".txt";

/// Where the two simulators write their logs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogLayout {
    /// Directory holding the pipelined simulator's logs.
    pub pipeline_dir: PathBuf,
    /// Directory holding the single-cycle reference simulator's logs.
    pub reference_dir: PathBuf,
}

impl Default for LogLayout {
    fn default() -> Self {
        Self::under(PathBuf::from("logs"))
    }
}

impl LogLayout {
    /// Standard `pipeline/` and `single_cycle/` directories under `root`.
    #[must_use]
    pub fn under(root: impl AsRef<Path>) -> Self {
        let root = root.as_ref();
        Self {
            pipeline_dir: root.join("pipeline"),
            reference_dir: root.join("single_cycle"),
        }
    }

    /// Path of a test's pipelined log.
    #[must_use]
    pub fn pipeline_log(&self, name: &str) -> PathBuf {
        self.pipeline_dir.join(name)
    }

    /// Path of a test's reference log.
    #[must_use]
    pub fn reference_log(&self, name: &str) -> PathBuf {
        self.reference_dir.join(name)
    }

    /// Resolve a user-supplied test name to a log file name.
    ///
    /// Names are used verbatim unless they lack the log suffix and no file of
    /// that exact name exists, in which case the suffix is appended.
    #[must_use]
    pub fn resolve_name(&self, name: &str) -> String {
        if name.ends_with(LOG_SUFFIX) || self.pipeline_log(name).is_file() {
            name.to_string()
        } else {
            format!("{name}{LOG_SUFFIX}")
        }
    }
}

/// Outcome of looking for tests.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Discovery {
    /// Sorted names present in both directories.
    Found(Vec<String>),
    /// A log directory does not exist.
    MissingDirectory(PathBuf),
    /// Both directories exist but share no log.
    Empty,
}

impl Discovery {
    /// The discovered names; empty unless tests were found.
    #[must_use]
    pub fn tests(&self) -> &[String] {
        match self {
            Self::Found(tests) => tests,
            Self::MissingDirectory(_) | Self::Empty => &[],
        }
    }
}

/// Find tests that have a log from both simulators.
#[must_use]
pub fn discover_tests(layout: &LogLayout) -> Discovery {
    let pipeline = match list_logs(&layout.pipeline_dir) {
        Some(names) => names,
        None => return Discovery::MissingDirectory(layout.pipeline_dir.clone()),
    };
    let reference = match list_logs(&layout.reference_dir) {
        Some(names) => names,
        None => return Discovery::MissingDirectory(layout.reference_dir.clone()),
    };

    let common: Vec<String> = pipeline.intersection(&reference).cloned().collect();
    debug!(
        pipeline = pipeline.len(),
        reference = reference.len(),
        common = common.len(),
        "discovered logs"
    );

    if common.is_empty() {
        Discovery::Empty
    } else {
        Discovery::Found(common)
    }
}

/// Log file names in `dir`, or `None` if it cannot be listed.
fn list_logs(dir: &Path) -> Option<BTreeSet<String>> {
    let entries = fs::read_dir(dir).ok()?;

    let names = entries
        .flatten()
        .filter(|entry| entry.path().is_file())
        .filter_map(|entry| entry.file_name().into_string().ok())
        .filter(|name| name.ends_with(LOG_SUFFIX))
        .collect();
    Some(names)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn touch(dir: &Path, name: &str) {
        fs::create_dir_all(dir).unwrap();
        fs::write(dir.join(name), "CYCLE 0\n").unwrap();
    }

    #[test]
    fn test_default_layout() {
        let layout = LogLayout::default();
        assert_eq!(layout.pipeline_dir, Path::new("logs/pipeline"));
        assert_eq!(layout.reference_dir, Path::new("logs/single_cycle"));
        assert_eq!(
            layout.pipeline_log("T.txt"),
            Path::new("logs/pipeline/T.txt")
        );
    }

    #[test]
    fn test_intersection_sorted() {
        let root = tempfile::tempdir().unwrap();
        let layout = LogLayout::under(root.path());
        for name in ["b.txt", "a.txt", "only_pipe.txt", "notes.md"] {
            touch(&layout.pipeline_dir, name);
        }
        for name in ["a.txt", "b.txt", "only_single.txt"] {
            touch(&layout.reference_dir, name);
        }

        assert_eq!(
            discover_tests(&layout),
            Discovery::Found(vec!["a.txt".to_string(), "b.txt".to_string()])
        );
    }

    #[test]
    fn test_no_common_names() {
        let root = tempfile::tempdir().unwrap();
        let layout = LogLayout::under(root.path());
        touch(&layout.pipeline_dir, "a.txt");
        touch(&layout.reference_dir, "b.txt");

        let discovery = discover_tests(&layout);
        assert_eq!(discovery, Discovery::Empty);
        assert!(discovery.tests().is_empty());
    }

    #[test]
    fn test_missing_directory() {
        let root = tempfile::tempdir().unwrap();
        let layout = LogLayout::under(root.path());
        touch(&layout.pipeline_dir, "a.txt");

        assert_eq!(
            discover_tests(&layout),
            Discovery::MissingDirectory(layout.reference_dir.clone())
        );
    }

    #[test]
    fn test_directories_named_like_logs_skipped() {
        let root = tempfile::tempdir().unwrap();
        let layout = LogLayout::under(root.path());
        fs::create_dir_all(layout.pipeline_dir.join("dir.txt")).unwrap();
        fs::create_dir_all(layout.reference_dir.join("dir.txt")).unwrap();

        assert_eq!(discover_tests(&layout), Discovery::Empty);
    }

    #[test]
    fn test_resolve_name() {
        let root = tempfile::tempdir().unwrap();
        let layout = LogLayout::under(root.path());
        touch(&layout.pipeline_dir, "raw");

        assert_eq!(layout.resolve_name("T.txt"), "T.txt");
        assert_eq!(layout.resolve_name("T"), "T.txt");
        assert_eq!(layout.resolve_name("raw"), "raw");
    }
}
