//! Collapsing of double inversions.

use std::collections::VecDeque;

use redwire_ir::NodeId;
use tracing::{debug, trace};

use crate::context::TrimContext;
use crate::error::{CompileError, CompileResult};
use crate::pass::{Pass, PassKind};

/// Forwards lonely edges until none is left.
///
/// An edge `start -> end` is lonely when it is the only edge out of `start`
/// and the only edge into `end`. Then `end` is just `NOT start`, and every
/// successor of `end` can read the predecessors of `start` directly. Ports
/// are never forwarded away. To bound edge growth, a collapse that would
/// connect more than two predecessors to more than two successors is skipped.
pub struct LonelyEdgeForwarding;

impl LonelyEdgeForwarding {
    fn worth_forwarding(fan_in: usize, fan_out: usize) -> bool {
        fan_in > 0 && (fan_in <= 1 || fan_out <= 1 || (fan_in == 2 && fan_out == 2))
    }
}

impl Pass for LonelyEdgeForwarding {
    fn name(&self) -> &'static str {
        "lonely_edge_forwarding"
    }

    fn kind(&self) -> PassKind {
        PassKind::Transformation
    }

    fn run(&self, ctx: &mut TrimContext<'_>) -> CompileResult<()> {
        let ports: Vec<bool> = (0..ctx.circuit().size()).map(|n| ctx.is_port(n)).collect();
        let merger = ctx.merger();

        let mut forwarded = 0;
        let mut sweep = 0;
        loop {
            sweep += 1;
            let mut queue: VecDeque<(NodeId, NodeId)> = merger.live_edges().into();
            let mut progress = 0;

            while let Some((start, end)) = queue.pop_front() {
                let (Some(start), Some(end)) = (merger.canonical(start), merger.canonical(end))
                else {
                    continue;
                };
                if ports[start] || ports[end] || !merger.has_edge(start, end) {
                    continue;
                }
                if merger.out_degree(start) != 1 || merger.in_degree(end) != 1 {
                    continue;
                }
                let fan_in = merger.in_degree(start);
                let fan_out = merger.out_degree(end);
                if !Self::worth_forwarding(fan_in, fan_out) {
                    continue;
                }

                let predecessors = merger.predecessors(start);
                let successors = merger.successors(end);
                merger
                    .forward_edge(start, end)
                    .map_err(|e| CompileError::PassFailed {
                        name: self.name().to_string(),
                        reason: e.to_string(),
                    })?;
                trace!(start, end, fan_in, fan_out, "forwarded edge");
                progress += 1;

                for &pred in &predecessors {
                    for &succ in &successors {
                        queue.push_back((pred, succ));
                    }
                }
            }

            debug!(sweep, forwarded = progress, "forwarding sweep finished");
            forwarded += progress;
            if progress == 0 {
                break;
            }
        }

        ctx.stats.forwarded += forwarded;
        Ok(())
    }
}
