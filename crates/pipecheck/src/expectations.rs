//! Expected total cycle counts for the pipelined simulator.
//!
//! The built-in table covers the course test suite. Other suites supply their
//! own table as TOML:
//!
//! ```toml
//! [cycles]
//! "MIPSPipeline-branch.txt" = 138
//! ```

use std::path::Path;

use rustc_hash::FxHashMap;
use serde::Deserialize;

use crate::{Error, Result};

/// Cycle counts shipped with the tool, keyed by exact log file name.
const BUILTIN_CYCLES: &[(&str, u64)] = &[
    ("MIPSPipeline-branch.txt", 138),
    ("MIPSPipeline-dependent_stores.txt", 142),
    ("MIPSPipeline-false_dependency.txt", 78),
    ("MIPSPipeline-forward_to_rs.txt", 78),
    ("MIPSPipeline-forward_to_rt.txt", 79),
    ("MIPSPipeline-hidden.txt", 264),
    ("MIPSPipeline-load_use.txt", 150),
    ("MIPSPipeline-raw_dependency.txt", 78),
    ("MIPSPipeline-reg_file_fowarding.txt", 70),
    ("MIPSPipeline-simple_no_branch_no_dep.txt", 154),
    ("SpeculativeMIPS-3bit_011.txt", 390),
    ("SpeculativeMIPS-3bit_100.txt", 382),
    ("SpeculativeMIPS-3bit_double.txt", 510),
    ("SpeculativeMIPS-hidden.txt", 16069),
    ("SpeculativeMIPS-one_backward_beq.txt", 3074),
    ("SpeculativeMIPS-one_backward_bne.txt", 2569),
    ("SpeculativeMIPS-one_forward_beq.txt", 3575),
    ("SpeculativeMIPS-one_forward_bne.txt", 4083),
    ("SpeculativeMIPS-static_branch.txt", 390),
    ("SpeculativeMIPS-test_case_local.txt", 4070),
];

/// Mapping from test file name to expected total cycles.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ExpectedCycles {
    #[serde(default)]
    cycles: FxHashMap<String, u64>,
}

impl ExpectedCycles {
    /// The table shipped with the tool.
    #[must_use]
    pub fn builtin() -> Self {
        BUILTIN_CYCLES
            .iter()
            .map(|&(name, cycles)| (name.to_string(), cycles))
            .collect()
    }

    /// Parse a TOML table with a `[cycles]` section.
    ///
    /// # Errors
    ///
    /// Returns the TOML error if the text is malformed or a count is not a
    /// non-negative integer.
    pub fn from_toml_str(text: &str) -> std::result::Result<Self, toml::de::Error> {
        toml::from_str(text)
    }

    /// Load a table from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ExpectationsIo`] if the file cannot be read and
    /// [`Error::ExpectationsFormat`] if it is not a valid table.
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| Error::ExpectationsIo {
            path: path.to_path_buf(),
            source,
        })?;
        let table = Self::from_toml_str(&text).map_err(|source| Error::ExpectationsFormat {
            path: path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %path.display(), entries = table.len(), "loaded expected cycles");
        Ok(table)
    }

    /// Expected cycles for an exact file name.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<u64> {
        self.cycles.get(name).copied()
    }

    /// Add or replace an entry.
    pub fn insert(&mut self, name: impl Into<String>, cycles: u64) {
        self.cycles.insert(name.into(), cycles);
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.cycles.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cycles.is_empty()
    }
}

impl FromIterator<(String, u64)> for ExpectedCycles {
    fn from_iter<I: IntoIterator<Item = (String, u64)>>(iter: I) -> Self {
        Self {
            cycles: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_table() {
        let table = ExpectedCycles::builtin();
        assert_eq!(table.len(), 20);
        assert_eq!(table.get("MIPSPipeline-branch.txt"), Some(138));
        assert_eq!(table.get("SpeculativeMIPS-hidden.txt"), Some(16069));
        // Lookups use the exact file name.
        assert_eq!(table.get("MIPSPipeline-branch"), None);
        assert_eq!(table.get("branch.txt"), None);
    }

    #[test]
    fn test_from_toml() {
        let table = ExpectedCycles::from_toml_str(
            r#"
            [cycles]
            "T.txt" = 12
            "U.txt" = 7
            "#,
        )
        .unwrap();
        assert_eq!(table.len(), 2);
        assert_eq!(table.get("T.txt"), Some(12));
        assert_eq!(table.get("MIPSPipeline-branch.txt"), None);
    }

    #[test]
    fn test_from_toml_empty() {
        let table = ExpectedCycles::from_toml_str("").unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_from_toml_requires_cycles_section() {
        // Entries outside `[cycles]` must not silently yield an empty table.
        assert!(ExpectedCycles::from_toml_str("\"T.txt\" = 12\n").is_err());
        assert!(ExpectedCycles::from_toml_str("[cycle]\n\"T.txt\" = 12\n").is_err());
    }

    #[test]
    fn test_from_toml_rejects_negative() {
        assert!(ExpectedCycles::from_toml_str("[cycles]\n\"T.txt\" = -3\n").is_err());
        assert!(ExpectedCycles::from_toml_str("[cycles]\n\"T.txt\" = \"many\"\n").is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = ExpectedCycles::load(Path::new("no/such/table.toml")).unwrap_err();
        assert!(matches!(err, Error::ExpectationsIo { .. }));
    }

    #[test]
    fn test_load_flat_table_is_format_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("expected.toml");
        std::fs::write(&path, "\"T.txt\" = 12\n").unwrap();

        let err = ExpectedCycles::load(&path).unwrap_err();
        assert!(matches!(err, Error::ExpectationsFormat { .. }));
    }

    #[test]
    fn test_insert_overrides() {
        let mut table = ExpectedCycles::builtin();
        table.insert("MIPSPipeline-branch.txt", 1);
        assert_eq!(table.get("MIPSPipeline-branch.txt"), Some(1));
    }
}
