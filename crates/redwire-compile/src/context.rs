//! Shared state threaded through the trim passes.

use serde::Serialize;

use redwire_ir::{Circuit, GraphMerger, NodeId};

/// Counters collected while trimming.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct TrimStats {
    /// Node count of the input circuit.
    pub nodes_before: usize,
    /// Edge count of the input circuit.
    pub edges_before: usize,
    /// Node count of the trimmed circuit.
    pub nodes_after: usize,
    /// Edge count of the trimmed circuit.
    pub edges_after: usize,
    /// Nodes marked because no output depends on them.
    pub pruned: usize,
    /// Nodes marked because their value is constant.
    pub folded: usize,
    /// Lonely edges collapsed.
    pub forwarded: usize,
}

/// Working state of one trim run.
///
/// Analysis passes mark nodes for deletion. The first pass that asks for the
/// [`GraphMerger`] materializes it from the circuit and deletes every marked
/// node; nodes marked after that are removed immediately.
pub struct TrimContext<'c> {
    circuit: &'c Circuit,
    is_port: Vec<bool>,
    marked: Vec<bool>,
    merger: Option<GraphMerger>,
    /// Counters for the final report.
    pub stats: TrimStats,
}

impl<'c> TrimContext<'c> {
    /// Start trimming `circuit`.
    pub fn new(circuit: &'c Circuit) -> Self {
        let mut is_port = circuit.input_mask();
        for &node in circuit.outputs() {
            is_port[node] = true;
        }
        Self {
            circuit,
            is_port,
            marked: vec![false; circuit.size()],
            merger: None,
            stats: TrimStats {
                nodes_before: circuit.size(),
                edges_before: circuit.edge_count(),
                ..TrimStats::default()
            },
        }
    }

    /// The circuit being trimmed.
    #[inline]
    pub fn circuit(&self) -> &'c Circuit {
        self.circuit
    }

    /// Check whether `node` is a declared input or output.
    #[inline]
    pub fn is_port(&self, node: NodeId) -> bool {
        self.is_port[node]
    }

    /// Check whether `node` has been marked for deletion.
    #[inline]
    pub fn is_marked(&self, node: NodeId) -> bool {
        self.marked[node]
    }

    /// Number of nodes marked so far.
    pub fn marked_count(&self) -> usize {
        self.marked.iter().filter(|&&m| m).count()
    }

    /// Mark `node` for deletion. Returns `false` if it was already marked.
    pub fn mark(&mut self, node: NodeId) -> bool {
        if self.marked[node] {
            return false;
        }
        self.marked[node] = true;
        if let Some(merger) = &mut self.merger {
            merger.remove_node(node);
        }
        true
    }

    /// Check whether the merger has been materialized.
    pub fn has_merger(&self) -> bool {
        self.merger.is_some()
    }

    /// The live graph, materialized on first use.
    pub fn merger(&mut self) -> &mut GraphMerger {
        let circuit = self.circuit;
        let marked = &self.marked;
        self.merger
            .get_or_insert_with(|| materialize(circuit, marked))
    }

    /// Finish, handing out the live graph and the counters.
    pub fn finish(self) -> (GraphMerger, TrimStats) {
        let merger = match self.merger {
            Some(merger) => merger,
            None => materialize(self.circuit, &self.marked),
        };
        (merger, self.stats)
    }
}

fn materialize(circuit: &Circuit, marked: &[bool]) -> GraphMerger {
    let mut merger = GraphMerger::new(circuit.graph());
    for node in (0..marked.len()).filter(|&node| marked[node]) {
        merger.remove_node(node);
    }
    merger
}
