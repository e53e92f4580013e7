//! Redwire Trim Optimizer
//!
//! This crate removes dead and constant structure from wire-level circuits
//! while keeping their external behavior exactly the same. It follows a
//! pass-based architecture: analysis passes mark nodes, transformation passes
//! rewrite the live graph, and a final renumbering produces a fresh circuit.
//!
//! # Architecture
//!
//! ```text
//! Input Circuit
//!       |
//!       v
//! +-------------+
//! | PassManager | <-- TrimContext (marks, live graph, stats)
//! +-------------+
//!       |
//!       |-- ReachabilityPrune
//!       |-- ConstantFold
//!       '-- LonelyEdgeForwarding
//!       |
//!       v
//! renumber + rebuild
//!       |
//!       v
//! Trimmed { circuit, mapping, stats }
//! ```
//!
//! # Example
//!
//! ```rust
//! use redwire_compile::{Trim, verify_equivalence};
//! use redwire_ir::{Circuit, TwoWayGraph};
//!
//! // Input 0, a double inversion 1 -> 2, output 3 and a dead node 4.
//! let graph = TwoWayGraph::from_edges(5, [(0, 1), (1, 2), (2, 3), (0, 4)]).unwrap();
//! let circuit = Circuit::new(graph, vec![0], vec![3]).unwrap();
//!
//! let trimmed = circuit.trim().unwrap();
//! assert_eq!(trimmed.circuit.size(), 2);
//! assert_eq!(trimmed.mapping[4], None);
//! verify_equivalence(&circuit, &trimmed.circuit).unwrap();
//! ```
//!
//! # Custom Passes
//!
//! Implement the [`Pass`] trait to add a pass to a [`PassManager`]:
//!
//! ```rust
//! use redwire_compile::{CompileResult, Pass, PassKind, TrimContext};
//!
//! struct MarkNothing;
//!
//! impl Pass for MarkNothing {
//!     fn name(&self) -> &str { "mark_nothing" }
//!     fn kind(&self) -> PassKind { PassKind::Analysis }
//!
//!     fn run(&self, _ctx: &mut TrimContext<'_>) -> CompileResult<()> {
//!         Ok(())
//!     }
//! }
//! ```

pub mod context;
pub mod error;
pub mod manager;
pub mod options;
pub mod pass;
pub mod rebuild;
pub mod trim;
pub mod verify;

// Built-in passes
pub mod passes;

pub use context::{TrimContext, TrimStats};
pub use error::{CompileError, CompileResult};
pub use manager::{PassManager, PassManagerBuilder};
pub use options::TrimOptions;
pub use pass::{Pass, PassKind};
pub use rebuild::{NodeMapping, rebuild, renumber};
pub use trim::{Trim, Trimmed, trim, trim_with};
pub use verify::{MAX_EXHAUSTIVE_INPUTS, bits, verify_equivalence};
