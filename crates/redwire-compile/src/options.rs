//! Trim configuration.

use serde::{Deserialize, Serialize};

/// Selects which trim passes run.
///
/// Every field defaults to `true`, so an empty configuration section turns
/// everything on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrimOptions {
    /// Remove nodes that cannot influence any output.
    pub prune_unreachable: bool,
    /// Remove nodes whose value does not depend on the inputs.
    pub fold_constants: bool,
    /// Collapse double inversions along lonely edges.
    pub forward_edges: bool,
}

impl Default for TrimOptions {
    fn default() -> Self {
        Self {
            prune_unreachable: true,
            fold_constants: true,
            forward_edges: true,
        }
    }
}

impl TrimOptions {
    /// Options with every pass disabled; trimming only renumbers.
    pub fn none() -> Self {
        Self {
            prune_unreachable: false,
            fold_constants: false,
            forward_edges: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_config_keeps_defaults() {
        let options: TrimOptions = serde_json::from_str(r#"{"forward_edges": false}"#).unwrap();
        assert!(options.prune_unreachable);
        assert!(options.fold_constants);
        assert!(!options.forward_edges);
    }
}
