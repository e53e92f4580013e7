//! Three-valued logic.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Value of a node during propagation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TriState {
    /// Known to be TRUE.
    True,
    /// Known to be FALSE.
    False,
    /// Not determined (yet).
    #[default]
    Unknown,
}

impl TriState {
    /// The boolean value, if known.
    #[inline]
    pub fn to_bool(self) -> Option<bool> {
        match self {
            TriState::True => Some(true),
            TriState::False => Some(false),
            TriState::Unknown => None,
        }
    }

    /// Check whether the value is TRUE or FALSE.
    #[inline]
    pub fn is_known(self) -> bool {
        self != TriState::Unknown
    }
}

impl From<bool> for TriState {
    fn from(value: bool) -> Self {
        if value { TriState::True } else { TriState::False }
    }
}

impl fmt::Display for TriState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TriState::True => write!(f, "1"),
            TriState::False => write!(f, "0"),
            TriState::Unknown => write!(f, "x"),
        }
    }
}
