//! Error types for the sim crate.

use redwire_ir::NodeId;
use thiserror::Error;

/// Errors produced while evaluating a circuit.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum SimError {
    /// The number of input values does not match the circuit.
    #[error("Circuit has {expected} inputs but {got} values were supplied")]
    InputCountMismatch {
        /// Number of declared inputs.
        expected: usize,
        /// Number of supplied values.
        got: usize,
    },

    /// An output did not settle to TRUE or FALSE.
    #[error("Output {index} (node {node}) is unresolved after propagation")]
    UnresolvedOutput {
        /// Position in the output list.
        index: usize,
        /// The output node.
        node: NodeId,
    },

    /// Propagation tried to assign both values to one node.
    #[error("Propagation reached a contradiction at node {node}")]
    Contradiction {
        /// The node assigned both values.
        node: NodeId,
    },
}

/// Result type for simulation.
pub type SimResult<T> = Result<T, SimError>;
