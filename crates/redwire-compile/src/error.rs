//! Error types for the compilation crate.

use redwire_ir::NodeId;
use thiserror::Error;

/// Errors that can occur while optimizing a circuit.
///
/// Apart from [`CompileError::TooManyInputs`], every variant signals a bug
/// in the optimizer or simulator rather than bad input.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum CompileError {
    /// Error from the IR crate.
    #[error("IR error: {0}")]
    Ir(#[from] redwire_ir::IrError),

    /// Error from the simulator.
    #[error("Simulation error: {0}")]
    Sim(#[from] redwire_sim::SimError),

    /// Renumbering produced a graph that is not a valid circuit.
    #[error("Trim produced an invalid node graph: {0}")]
    InvalidNodeGraph(String),

    /// A constant-TRUE output has no constant-FALSE predecessor to keep.
    #[error("Output node {node} is constant TRUE but has no FALSE predecessor")]
    ConstantOutputWithoutSource {
        /// The output node.
        node: NodeId,
    },

    /// Pass execution failed.
    #[error("Pass '{name}' failed: {reason}")]
    PassFailed { name: String, reason: String },

    /// Exhaustive verification refused a circuit with too many inputs.
    #[error("Cannot verify exhaustively: {inputs} inputs exceed the limit of {max}")]
    TooManyInputs { inputs: usize, max: usize },

    /// Two circuits disagree on some input vector.
    #[error("Circuits differ on inputs {inputs}: expected {expected}, got {actual}")]
    NotEquivalent {
        inputs: String,
        expected: String,
        actual: String,
    },
}

/// Result type for compilation operations.
pub type CompileResult<T> = Result<T, CompileError>;
