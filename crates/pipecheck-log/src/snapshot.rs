use std::collections::BTreeMap;

/// Register file contents captured from one cycle block.
///
/// Indices are kept as printed; nothing restricts them to the architectural
/// range at this level.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RegisterSnapshot {
    values: BTreeMap<u32, i64>,
}

impl RegisterSnapshot {
    /// Create an empty snapshot.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a register value. A later write to the same index wins.
    pub fn set(&mut self, index: u32, value: i64) {
        self.values.insert(index, value);
    }

    /// Value of a register, if the block printed it.
    #[must_use]
    pub fn get(&self, index: u32) -> Option<i64> {
        self.values.get(&index).copied()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Iterate `(index, value)` pairs in ascending index order.
    pub fn iter(&self) -> impl Iterator<Item = (u32, i64)> + '_ {
        self.values.iter().map(|(&index, &value)| (index, value))
    }
}

impl FromIterator<(u32, i64)> for RegisterSnapshot {
    fn from_iter<I: IntoIterator<Item = (u32, i64)>>(iter: I) -> Self {
        let mut snapshot = Self::new();
        for (index, value) in iter {
            snapshot.set(index, value);
        }
        snapshot
    }
}
