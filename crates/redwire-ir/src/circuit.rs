//! Flat wire-level circuits.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::error::{IrError, IrResult};
use crate::graph::{GraphBuilder, NodeId, TwoWayGraph};

/// A flat circuit: a graph plus ordered input and output node lists.
///
/// Each node computes the OR of the negations of its predecessors; a node
/// without predecessors that is not an input is constant FALSE. A circuit is
/// validated when it is constructed and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "CircuitRepr", into = "CircuitRepr")]
pub struct Circuit {
    graph: TwoWayGraph,
    inputs: Vec<NodeId>,
    outputs: Vec<NodeId>,
}

impl Circuit {
    /// Create a circuit, checking every structural invariant.
    ///
    /// Fails if a port is out of range, an input is listed twice, an edge
    /// is a self-loop, or the graph contains a feedback loop.
    pub fn new(graph: TwoWayGraph, inputs: Vec<NodeId>, outputs: Vec<NodeId>) -> IrResult<Self> {
        let size = graph.size();
        for &node in inputs.iter().chain(&outputs) {
            if node >= size {
                return Err(IrError::NodeOutOfRange { node, size });
            }
        }

        let mut seen = FxHashSet::default();
        for &node in &inputs {
            if !seen.insert(node) {
                return Err(IrError::DuplicateInput(node));
            }
        }

        if let Some((node, _)) = graph.edges().find(|(from, to)| from == to) {
            return Err(IrError::SelfLoop(node));
        }
        if let Some(node) = graph.find_cycle() {
            return Err(IrError::FeedbackLoop(node));
        }

        Ok(Self {
            graph,
            inputs,
            outputs,
        })
    }

    /// Freeze a builder's graph into a circuit.
    pub fn from_builder(
        builder: &GraphBuilder,
        inputs: Vec<NodeId>,
        outputs: Vec<NodeId>,
    ) -> IrResult<Self> {
        Self::new(builder.build(), inputs, outputs)
    }

    /// `width` isolated nodes, each both an input and an output.
    pub(crate) fn passthrough(width: usize) -> Self {
        let mut builder = GraphBuilder::with_capacity(width, 0);
        builder.ensure_size(width);
        let nodes: Vec<NodeId> = (0..width).collect();
        Self {
            graph: builder.build(),
            inputs: nodes.clone(),
            outputs: nodes,
        }
    }

    /// Get the underlying graph.
    #[inline]
    pub fn graph(&self) -> &TwoWayGraph {
        &self.graph
    }

    /// Number of nodes.
    #[inline]
    pub fn size(&self) -> usize {
        self.graph.size()
    }

    /// Number of distinct edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterate over all edges.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.graph.edges()
    }

    /// Ordered input nodes.
    #[inline]
    pub fn inputs(&self) -> &[NodeId] {
        &self.inputs
    }

    /// Ordered output nodes.
    #[inline]
    pub fn outputs(&self) -> &[NodeId] {
        &self.outputs
    }

    /// The `index`-th input node.
    #[inline]
    pub fn input(&self, index: usize) -> Option<NodeId> {
        self.inputs.get(index).copied()
    }

    /// The `index`-th output node.
    #[inline]
    pub fn output(&self, index: usize) -> Option<NodeId> {
        self.outputs.get(index).copied()
    }

    /// Number of input ports.
    #[inline]
    pub fn num_inputs(&self) -> usize {
        self.inputs.len()
    }

    /// Number of output ports.
    #[inline]
    pub fn num_outputs(&self) -> usize {
        self.outputs.len()
    }

    /// Check whether `node` is a declared input.
    pub fn is_input(&self, node: NodeId) -> bool {
        self.inputs.contains(&node)
    }

    /// Check whether `node` is a declared output.
    pub fn is_output(&self, node: NodeId) -> bool {
        self.outputs.contains(&node)
    }

    /// Per-node flags for declared inputs.
    pub fn input_mask(&self) -> Vec<bool> {
        mask(self.size(), &self.inputs)
    }

    /// Per-node flags for declared outputs.
    pub fn output_mask(&self) -> Vec<bool> {
        mask(self.size(), &self.outputs)
    }
}

fn mask(size: usize, nodes: &[NodeId]) -> Vec<bool> {
    let mut flags = vec![false; size];
    for &node in nodes {
        flags[node] = true;
    }
    flags
}

/// Serialized form of a [`Circuit`].
#[derive(Serialize, Deserialize)]
struct CircuitRepr {
    size: usize,
    edges: Vec<(NodeId, NodeId)>,
    inputs: Vec<NodeId>,
    outputs: Vec<NodeId>,
}

impl TryFrom<CircuitRepr> for Circuit {
    type Error = IrError;

    fn try_from(repr: CircuitRepr) -> IrResult<Self> {
        let graph = TwoWayGraph::from_edges(repr.size, repr.edges)?;
        Circuit::new(graph, repr.inputs, repr.outputs)
    }
}

impl From<Circuit> for CircuitRepr {
    fn from(circuit: Circuit) -> Self {
        CircuitRepr {
            size: circuit.size(),
            edges: circuit.edges().collect(),
            inputs: circuit.inputs,
            outputs: circuit.outputs,
        }
    }
}
