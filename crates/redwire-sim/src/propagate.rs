//! Constraint propagation over OR-of-negations semantics.
//!
//! A node is TRUE as soon as one predecessor is FALSE, and FALSE once every
//! predecessor is TRUE. Propagation starts from the known nodes and pushes
//! values forward until nothing changes.

use redwire_ir::{Circuit, NodeId};
use rustc_hash::FxHashSet;
use tracing::trace;

use crate::error::{SimError, SimResult};
use crate::tristate::TriState;

/// Tri-state propagation engine for one circuit.
///
/// Declared inputs are only ever set by [`Propagator::assign`]; values that
/// propagation derives for them are ignored.
#[derive(Debug, Clone)]
pub struct Propagator<'c> {
    circuit: &'c Circuit,
    states: Vec<TriState>,
    is_input: Vec<bool>,
    stack: Vec<(NodeId, bool)>,
    recheck: FxHashSet<NodeId>,
}

impl<'c> Propagator<'c> {
    /// Create a propagator where every node is unknown.
    ///
    /// Non-input nodes without predecessors are queued as FALSE.
    pub fn new(circuit: &'c Circuit) -> Self {
        let is_input = circuit.input_mask();
        let stack = (0..circuit.size())
            .filter(|&node| !is_input[node] && circuit.graph().in_neighbors(node).is_empty())
            .map(|node| (node, false))
            .collect();
        Self {
            circuit,
            states: vec![TriState::Unknown; circuit.size()],
            is_input,
            stack,
            recheck: FxHashSet::default(),
        }
    }

    /// Current state of `node`.
    #[inline]
    pub fn state(&self, node: NodeId) -> TriState {
        self.states[node]
    }

    /// Current state of every node.
    pub fn states(&self) -> &[TriState] {
        &self.states
    }

    /// Take the final node states.
    pub fn into_states(self) -> Vec<TriState> {
        self.states
    }

    /// Fix the value of `node` from outside, inputs included.
    pub fn assign(&mut self, node: NodeId, value: bool) -> SimResult<()> {
        self.apply(node, value)
    }

    fn push(&mut self, node: NodeId, value: bool) {
        if !self.is_input[node] {
            self.stack.push((node, value));
        }
    }

    fn apply(&mut self, node: NodeId, value: bool) -> SimResult<()> {
        match self.states[node].to_bool() {
            Some(current) if current == value => return Ok(()),
            Some(_) => return Err(SimError::Contradiction { node }),
            None => {}
        }
        self.states[node] = TriState::from(value);
        let circuit = self.circuit;
        let successors = circuit.graph().out_neighbors(node);
        if value {
            self.recheck.extend(successors.iter().copied());
        } else {
            for &succ in successors {
                self.push(succ, true);
            }
        }
        Ok(())
    }

    /// Propagate until no more values can be derived.
    pub fn run(&mut self) -> SimResult<()> {
        let mut round = 0usize;
        loop {
            while let Some((node, value)) = self.stack.pop() {
                self.apply(node, value)?;
            }
            if self.recheck.is_empty() {
                break;
            }

            round += 1;
            let pending: Vec<NodeId> = self.recheck.drain().collect();
            trace!(round, pending = pending.len(), "rechecking nodes");
            for node in pending {
                if self.is_input[node] || self.states[node].is_known() {
                    continue;
                }
                let all_true = self
                    .circuit
                    .graph()
                    .in_neighbors(node)
                    .iter()
                    .all(|&pred| self.states[pred] == TriState::True);
                // An unknown predecessor re-queues this node once it turns TRUE,
                // and a FALSE one has already pushed TRUE here.
                if all_true {
                    self.push(node, false);
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redwire_ir::TwoWayGraph;

    #[test]
    fn test_orphan_nodes_are_false() {
        let graph = TwoWayGraph::from_edges(3, [(1, 2)]).unwrap();
        let circuit = Circuit::new(graph, vec![0], vec![2]).unwrap();
        let mut prop = Propagator::new(&circuit);
        prop.run().unwrap();
        assert_eq!(prop.state(0), TriState::Unknown);
        assert_eq!(prop.state(1), TriState::False);
        assert_eq!(prop.state(2), TriState::True);
    }

    #[test]
    fn test_unknown_input_blocks_nand() {
        // node 2 = NAND(0, 1), node 1 constant FALSE, so node 2 is TRUE
        // regardless of input 0.
        let graph = TwoWayGraph::from_edges(3, [(0, 2), (1, 2)]).unwrap();
        let circuit = Circuit::new(graph, vec![0], vec![2]).unwrap();
        let mut prop = Propagator::new(&circuit);
        prop.run().unwrap();
        assert_eq!(prop.state(2), TriState::True);

        // A NAND of two inputs stays unknown.
        let graph = TwoWayGraph::from_edges(3, [(0, 2), (1, 2)]).unwrap();
        let circuit = Circuit::new(graph, vec![0, 1], vec![2]).unwrap();
        let mut prop = Propagator::new(&circuit);
        prop.run().unwrap();
        assert_eq!(prop.state(2), TriState::Unknown);
    }

    #[test]
    fn test_contradicting_assignment() {
        let graph = TwoWayGraph::from_edges(2, [(0, 1)]).unwrap();
        let circuit = Circuit::new(graph, vec![], vec![1]).unwrap();
        let mut prop = Propagator::new(&circuit);
        prop.run().unwrap();
        assert_eq!(prop.state(1), TriState::True);
        assert!(matches!(
            prop.assign(1, false),
            Err(SimError::Contradiction { node: 1 })
        ));
    }
}
