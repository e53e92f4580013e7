//! Pass manager for orchestrating trim passes.

use tracing::{debug, info, instrument};

use crate::context::TrimContext;
use crate::error::CompileResult;
use crate::options::TrimOptions;
use crate::pass::Pass;
use crate::passes::{ConstantFold, LonelyEdgeForwarding, ReachabilityPrune};

/// Manages and executes a sequence of trim passes.
pub struct PassManager {
    /// The passes to execute, in order.
    passes: Vec<Box<dyn Pass>>,
}

impl PassManager {
    /// Create a new empty pass manager.
    pub fn new() -> Self {
        Self { passes: vec![] }
    }

    /// Add a pass to the manager.
    pub fn add_pass(&mut self, pass: impl Pass + 'static) {
        self.passes.push(Box::new(pass));
    }

    /// Names of the registered passes, in order.
    pub fn pass_names(&self) -> Vec<&str> {
        self.passes.iter().map(|p| p.name()).collect()
    }

    /// Run all passes on the given context.
    #[instrument(skip(self, ctx))]
    pub fn run(&self, ctx: &mut TrimContext<'_>) -> CompileResult<()> {
        info!(
            "Running pass manager with {} passes on circuit with {} nodes",
            self.passes.len(),
            ctx.circuit().size()
        );

        for pass in &self.passes {
            if pass.should_run(ctx) {
                debug!("Running pass: {}", pass.name());
                pass.run(ctx)?;
                debug!(
                    "Pass {} completed, marked: {}",
                    pass.name(),
                    ctx.marked_count()
                );
            } else {
                debug!("Skipping pass: {}", pass.name());
            }
        }

        info!(
            "Pass manager completed, pruned: {}, folded: {}, forwarded: {}",
            ctx.stats.pruned, ctx.stats.folded, ctx.stats.forwarded
        );

        Ok(())
    }

    /// Get the number of passes.
    pub fn len(&self) -> usize {
        self.passes.len()
    }

    /// Check if the manager has no passes.
    pub fn is_empty(&self) -> bool {
        self.passes.is_empty()
    }
}

impl Default for PassManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Builder for the standard trim pipeline.
pub struct PassManagerBuilder {
    options: TrimOptions,
}

impl PassManagerBuilder {
    /// Create a new builder with every pass enabled.
    pub fn new() -> Self {
        Self {
            options: TrimOptions::default(),
        }
    }

    /// Select passes from options.
    #[must_use]
    pub fn with_options(mut self, options: TrimOptions) -> Self {
        self.options = options;
        self
    }

    /// Build the pass manager.
    pub fn build(self) -> PassManager {
        let mut pm = PassManager::new();

        if self.options.prune_unreachable {
            pm.add_pass(ReachabilityPrune);
        }
        if self.options.fold_constants {
            pm.add_pass(ConstantFold);
            // Logic that only fed folded constants is dead now.
            if self.options.prune_unreachable {
                pm.add_pass(ReachabilityPrune);
            }
        }
        // Forwarding works on the live graph, so it always comes after the
        // marking passes.
        if self.options.forward_edges {
            pm.add_pass(LonelyEdgeForwarding);
        }

        pm
    }
}

impl Default for PassManagerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redwire_ir::{Circuit, TwoWayGraph};

    #[test]
    fn test_empty_pass_manager() {
        let pm = PassManager::new();
        assert!(pm.is_empty());
        assert_eq!(pm.len(), 0);
    }

    #[test]
    fn test_pass_manager_run() {
        let pm = PassManagerBuilder::new().build();
        let graph = TwoWayGraph::from_edges(3, [(0, 1), (0, 2)]).unwrap();
        let circuit = Circuit::new(graph, vec![0], vec![1]).unwrap();
        let mut ctx = TrimContext::new(&circuit);
        pm.run(&mut ctx).unwrap();
        assert!(ctx.is_marked(2));
    }

    #[test]
    fn test_pass_manager_builder() {
        let pm = PassManagerBuilder::new().build();
        assert_eq!(
            pm.pass_names(),
            vec![
                "reachability_prune",
                "constant_fold",
                "reachability_prune",
                "lonely_edge_forwarding"
            ]
        );

        let options = TrimOptions {
            fold_constants: false,
            ..TrimOptions::default()
        };
        let pm = PassManagerBuilder::new().with_options(options).build();
        assert_eq!(pm.len(), 2);
        assert!(PassManagerBuilder::new()
            .with_options(TrimOptions::none())
            .build()
            .is_empty());
    }
}
