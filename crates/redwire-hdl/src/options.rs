//! Compiler options.

use serde::{Deserialize, Serialize};

/// Options for DSL compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct HdlOptions {
    /// Reject argument count and width mismatches.
    pub strict: bool,
}

impl Default for HdlOptions {
    fn default() -> Self {
        Self { strict: true }
    }
}

impl HdlOptions {
    /// Options that tolerate count and width mismatches.
    pub fn lax() -> Self {
        Self { strict: false }
    }
}
