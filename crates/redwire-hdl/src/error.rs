//! Error types for the DSL compiler.

use redwire_ir::IrError;
use thiserror::Error;

/// Errors that can occur while parsing or lowering DSL source.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum HdlError {
    /// Lexer error (invalid token).
    #[error("Lexer error at line {line}: {message}")]
    Lexer { line: usize, message: String },

    /// Malformed line.
    #[error("Syntax error at line {line}: {message}")]
    Syntax { line: usize, message: String },

    /// A referenced circuit is not registered.
    ///
    /// Recoverable: register `name` and compile again.
    #[error("Missing dependency '{name}' at line {line}")]
    MissingDependency { name: String, line: usize },

    /// A name was used before it was bound.
    #[error("Unbound name '{name}' at line {line}")]
    UnboundName { name: String, line: usize },

    /// Argument count or width mismatch in strict mode.
    #[error("Strict check failed at line {line}: {message}")]
    StrictCheck { line: usize, message: String },

    /// The output line must name exactly one port.
    #[error("Expected exactly one output port at line {line}, found {found}")]
    OutputCount { line: usize, found: usize },

    /// A circuit name was registered twice.
    #[error("Circuit '{0}' is already registered")]
    DuplicateRegistration(String),

    /// A bundled cell failed to build.
    #[error("Failed to build standard cell '{name}': {source}")]
    Stdlib {
        name: String,
        #[source]
        source: Box<HdlError>,
    },

    /// Error while assembling the circuit.
    #[error("Circuit error: {0}")]
    Ir(#[from] IrError),
}

impl HdlError {
    /// Whether registering a circuit and retrying can resolve this error.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, HdlError::MissingDependency { .. })
    }

    /// Name of the missing circuit, if this is a missing dependency.
    pub fn missing_dependency(&self) -> Option<&str> {
        match self {
            HdlError::MissingDependency { name, .. } => Some(name),
            _ => None,
        }
    }
}

/// Result type for DSL operations.
pub type HdlResult<T> = Result<T, HdlError>;
