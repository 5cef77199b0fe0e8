use std::collections::BTreeMap;
use std::fmt;

use crate::RegisterSnapshot;

/// Number of architectural registers compared.
pub const REGISTER_COUNT: u32 = 32;

/// Disagreement on a single register.
///
/// `None` means the register was not printed in that log's final block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RegisterMismatch {
    pub left: Option<i64>,
    pub right: Option<i64>,
}

/// Mismatching registers keyed by index, ascending.
pub type Differences = BTreeMap<u32, RegisterMismatch>;

/// Compare two snapshots over registers `0..REGISTER_COUNT`.
///
/// A register present in only one snapshot is a difference; one missing from
/// both is not. Values are reported in argument order.
#[must_use]
pub fn compare_registers(left: &RegisterSnapshot, right: &RegisterSnapshot) -> Differences {
    (0..REGISTER_COUNT)
        .filter_map(|index| {
            let mismatch = RegisterMismatch {
                left: left.get(index),
                right: right.get(index),
            };
            (mismatch.left != mismatch.right).then_some((index, mismatch))
        })
        .collect()
}

/// Formats a possibly missing register value.
pub(crate) struct Value(pub Option<i64>);

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0 {
            Some(value) => write!(f, "{value}"),
            None => write!(f, "missing"),
        }
    }
}

impl RegisterMismatch {
    /// Left value for display, `missing` when absent.
    #[must_use]
    pub fn left_display(&self) -> impl fmt::Display {
        Value(self.left)
    }

    /// Right value for display, `missing` when absent.
    #[must_use]
    pub fn right_display(&self) -> impl fmt::Display {
        Value(self.right)
    }
}
