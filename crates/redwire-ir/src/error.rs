//! Error types for the IR crate.

use thiserror::Error;

use crate::graph::NodeId;

/// Which side of a circuit a port list belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortSide {
    /// The input port list.
    Input,
    /// The output port list.
    Output,
}

impl std::fmt::Display for PortSide {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PortSide::Input => write!(f, "input"),
            PortSide::Output => write!(f, "output"),
        }
    }
}

/// Errors that can occur in IR operations.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum IrError {
    /// A node id does not exist in the graph.
    #[error("Node {node} out of range for graph of size {size}")]
    NodeOutOfRange {
        /// The offending node id.
        node: NodeId,
        /// Number of nodes in the graph.
        size: usize,
    },

    /// An edge connects a node to itself.
    #[error("Self-loop on node {0}")]
    SelfLoop(NodeId),

    /// The graph contains a cycle through the given node.
    #[error("Feedback loop through node {0}")]
    FeedbackLoop(NodeId),

    /// A node appears twice in the input port list.
    #[error("Node {0} is declared as an input more than once")]
    DuplicateInput(NodeId),

    /// Port group widths do not add up to the flat port count.
    #[error("{side} groups cover {grouped} bits but the circuit has {actual} {side} ports")]
    PortSizeMismatch {
        /// Input or output side.
        side: PortSide,
        /// Sum of the group widths.
        grouped: usize,
        /// Length of the flat port list.
        actual: usize,
    },

    /// A port group index does not exist.
    #[error("No {side} group {group} (circuit has {count})")]
    GroupOutOfRange {
        /// Input or output side.
        side: PortSide,
        /// Requested group index.
        group: usize,
        /// Number of groups.
        count: usize,
    },

    /// An instance id does not exist in the builder.
    #[error("Unknown instance {0}")]
    UnknownInstance(usize),

    /// Strict mode: more plugs than the consumer has input groups.
    #[error("Instance {consumer} has {groups} input groups but was plugged {plugs} times")]
    TooManyPlugs {
        /// The consuming instance.
        consumer: usize,
        /// Declared input group count.
        groups: usize,
        /// Attempted plug count.
        plugs: usize,
    },

    /// Strict mode: producer width does not match the consumer's input group.
    #[error(
        "Plug width mismatch on instance {consumer} group {group}: expected {expected} bits, got {got}"
    )]
    PlugWidthMismatch {
        /// The consuming instance.
        consumer: usize,
        /// Input group being plugged.
        group: usize,
        /// Width of that group.
        expected: usize,
        /// Total output width of the producer.
        got: usize,
    },

    /// Plug chain does not terminate.
    #[error("Plug chain through instance {0} does not terminate")]
    PlugCycle(usize),

    /// Two instances were given the same debug name.
    #[error("Instance name '{0}' is already in use")]
    DuplicateName(String),

    /// Merge-layer precondition failed.
    #[error("Edge {from} -> {to} cannot be forwarded: {reason}")]
    NotForwardable {
        /// Edge source.
        from: NodeId,
        /// Edge target.
        to: NodeId,
        /// Which precondition failed.
        reason: &'static str,
    },

    /// Internal consistency check failed.
    #[error("Internal invariant violated: {0}")]
    Internal(String),
}

/// Result type for IR operations.
pub type IrResult<T> = Result<T, IrError>;
