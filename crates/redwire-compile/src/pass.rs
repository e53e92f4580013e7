//! Pass trait and types for trim passes.

use crate::context::TrimContext;
use crate::error::CompileResult;

/// The kind of trim pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PassKind {
    /// Reads the circuit and marks nodes for deletion.
    Analysis,
    /// Rewrites the live graph.
    Transformation,
}

/// A pass that operates on a [`TrimContext`].
///
/// Analysis passes only mark nodes; transformation passes work on the
/// context's merger and must leave the circuit's external behavior intact.
pub trait Pass: Send + Sync {
    /// Get the name of this pass.
    fn name(&self) -> &str;

    /// Get the kind of this pass.
    fn kind(&self) -> PassKind;

    /// Run the pass.
    fn run(&self, ctx: &mut TrimContext<'_>) -> CompileResult<()>;

    /// Check if this pass should run based on current state.
    fn should_run(&self, _ctx: &TrimContext<'_>) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct TestPass;

    impl Pass for TestPass {
        fn name(&self) -> &'static str {
            "test"
        }

        fn kind(&self) -> PassKind {
            PassKind::Transformation
        }

        fn run(&self, _ctx: &mut TrimContext<'_>) -> CompileResult<()> {
            Ok(())
        }
    }

    #[test]
    fn test_pass_kind() {
        let pass = TestPass;
        assert_eq!(pass.kind(), PassKind::Transformation);
        assert_eq!(pass.name(), "test");
    }
}
