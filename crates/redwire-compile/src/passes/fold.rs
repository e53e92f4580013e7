//! Removal of input-independent logic.

use redwire_sim::{TriState, constant_states};
use tracing::debug;

use crate::context::TrimContext;
use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};

/// Marks every node whose value is the same for all inputs.
///
/// Ports are never marked. A constant-FALSE output loses its predecessors
/// and falls back to the implicit FALSE of a node without inputs. A
/// constant-TRUE output keeps its first FALSE predecessor, which becomes a
/// bare FALSE source once its own predecessors are gone.
pub struct ConstantFold;

impl Pass for ConstantFold {
    fn name(&self) -> &'static str {
        "constant_fold"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, ctx: &mut TrimContext<'_>) -> CompileResult<()> {
        let circuit = ctx.circuit();
        let states = constant_states(circuit)?;

        let mut keep = vec![false; circuit.size()];
        for &output in circuit.outputs() {
            if circuit.is_input(output) || states[output] != TriState::True {
                continue;
            }
            let source = circuit
                .graph()
                .in_neighbors(output)
                .iter()
                .copied()
                .find(|&pred| states[pred] == TriState::False)
                .ok_or(CompileError::ConstantOutputWithoutSource { node: output })?;
            keep[source] = true;
        }

        let mut folded = 0;
        for (node, state) in states.iter().enumerate() {
            if state.is_known() && !ctx.is_port(node) && !keep[node] && ctx.mark(node) {
                folded += 1;
            }
        }
        debug!(folded, "constant nodes marked");
        ctx.stats.folded += folded;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redwire_ir::{Circuit, TwoWayGraph};

    #[test]
    fn test_constant_chain_marked() {
        // 1 is a bare FALSE source, 2 = NOT 1 = TRUE, 3 = NAND(0, 2) = NOT 0.
        let graph = TwoWayGraph::from_edges(4, [(1, 2), (0, 3), (2, 3)]).unwrap();
        let circuit = Circuit::new(graph, vec![0], vec![3]).unwrap();
        let mut ctx = TrimContext::new(&circuit);
        ConstantFold.run(&mut ctx).unwrap();

        assert!(ctx.is_marked(1));
        assert!(ctx.is_marked(2));
        assert!(!ctx.is_marked(0));
        assert!(!ctx.is_marked(3));
    }

    #[test]
    fn test_true_output_keeps_false_source() {
        // 0 is a bare FALSE source, 1 = NOT 0 = TRUE (output).
        let graph = TwoWayGraph::from_edges(2, [(0, 1)]).unwrap();
        let circuit = Circuit::new(graph, vec![], vec![1]).unwrap();
        let mut ctx = TrimContext::new(&circuit);
        ConstantFold.run(&mut ctx).unwrap();
        assert!(!ctx.is_marked(0));
        assert_eq!(ctx.stats.folded, 0);
    }

    #[test]
    fn test_false_output_drops_sources() {
        // 0 FALSE, 1 = TRUE, 2 = NOT 1 = FALSE (output).
        let graph = TwoWayGraph::from_edges(3, [(0, 1), (1, 2)]).unwrap();
        let circuit = Circuit::new(graph, vec![], vec![2]).unwrap();
        let mut ctx = TrimContext::new(&circuit);
        ConstantFold.run(&mut ctx).unwrap();
        assert!(ctx.is_marked(0));
        assert!(ctx.is_marked(1));
        assert!(!ctx.is_marked(2));
    }
}
