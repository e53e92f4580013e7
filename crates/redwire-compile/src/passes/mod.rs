//! Built-in trim passes.
//!
//! The default pipeline runs them in this order:
//! - [`ReachabilityPrune`]: drop nodes no output depends on
//! - [`ConstantFold`]: drop nodes whose value ignores the inputs
//! - [`LonelyEdgeForwarding`]: collapse double inversions

mod fold;
mod forward;
mod prune;

pub use fold::ConstantFold;
pub use forward::LonelyEdgeForwarding;
pub use prune::ReachabilityPrune;
