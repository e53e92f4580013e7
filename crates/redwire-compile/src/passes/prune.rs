//! Removal of logic that cannot reach an output.

use tracing::debug;

use crate::context::TrimContext;
use crate::error::CompileResult;
use crate::pass::{Pass, PassKind};

/// Marks every node without a path to some output.
///
/// Paths through nodes that are already marked do not count, so running the
/// pass again after [`ConstantFold`](super::ConstantFold) sweeps up logic that
/// only fed folded constants. Declared inputs are kept even when nothing
/// reads them, so the trimmed circuit has the same ports as the original.
pub struct ReachabilityPrune;

impl Pass for ReachabilityPrune {
    fn name(&self) -> &'static str {
        "reachability_prune"
    }

    fn kind(&self) -> PassKind {
        PassKind::Analysis
    }

    fn run(&self, ctx: &mut TrimContext<'_>) -> CompileResult<()> {
        let circuit = ctx.circuit();
        let graph = circuit.graph();

        let mut live = vec![false; circuit.size()];
        let mut stack = Vec::new();
        for &output in circuit.outputs() {
            if !live[output] {
                live[output] = true;
                stack.push(output);
            }
        }
        while let Some(node) = stack.pop() {
            for &pred in graph.in_neighbors(node) {
                if !live[pred] && !ctx.is_marked(pred) {
                    live[pred] = true;
                    stack.push(pred);
                }
            }
        }

        let mut pruned = 0;
        for (node, &reaches_output) in live.iter().enumerate() {
            if !reaches_output && !circuit.is_input(node) && ctx.mark(node) {
                pruned += 1;
            }
        }
        debug!(pruned, "unreachable nodes marked");
        ctx.stats.pruned += pruned;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redwire_ir::{Circuit, TwoWayGraph};

    #[test]
    fn test_dead_branch_marked() {
        // 0 -> 1 (output), 0 -> 2 -> 3 (dangling)
        let graph = TwoWayGraph::from_edges(4, [(0, 1), (0, 2), (2, 3)]).unwrap();
        let circuit = Circuit::new(graph, vec![0], vec![1]).unwrap();
        let mut ctx = TrimContext::new(&circuit);
        ReachabilityPrune.run(&mut ctx).unwrap();

        assert!(!ctx.is_marked(0));
        assert!(!ctx.is_marked(1));
        assert!(ctx.is_marked(2));
        assert!(ctx.is_marked(3));
        assert_eq!(ctx.stats.pruned, 2);
    }

    #[test]
    fn test_paths_through_marked_nodes_ignored() {
        // 0 -> 2 -> 3 (output), 1 -> 2; once 2 is marked, 1 feeds nothing.
        let graph = TwoWayGraph::from_edges(4, [(0, 2), (1, 2), (2, 3)]).unwrap();
        let circuit = Circuit::new(graph, vec![0], vec![3]).unwrap();
        let mut ctx = TrimContext::new(&circuit);
        ctx.mark(2);
        ReachabilityPrune.run(&mut ctx).unwrap();
        assert!(ctx.is_marked(1));
        assert!(!ctx.is_marked(0));
    }

    #[test]
    fn test_unused_input_kept() {
        let graph = TwoWayGraph::from_edges(3, [(0, 2)]).unwrap();
        let circuit = Circuit::new(graph, vec![0, 1], vec![2]).unwrap();
        let mut ctx = TrimContext::new(&circuit);
        ReachabilityPrune.run(&mut ctx).unwrap();
        assert!(!ctx.is_marked(1));
    }
}
