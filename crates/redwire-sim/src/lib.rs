//! `redwire-sim`: tri-state evaluation of wire-level circuits.
//!
//! Every node of a circuit computes the OR of the negations of its
//! predecessors. The simulator assigns TRUE, FALSE or UNKNOWN to each node by
//! constraint propagation:
//!
//! - a node with a FALSE predecessor is TRUE
//! - a node whose predecessors are all TRUE is FALSE
//! - a non-input node without predecessors is FALSE
//!
//! With every input fixed, an acyclic circuit always settles completely. With
//! inputs left unknown, propagation finds the nodes that are constant, which
//! the optimizer removes.
//!
//! # Quick start
//!
//! ```rust
//! use redwire_ir::{Circuit, TwoWayGraph};
//! use redwire_sim::simulate;
//!
//! // A single NAND gate.
//! let graph = TwoWayGraph::from_edges(3, [(0, 2), (1, 2)]).unwrap();
//! let nand = Circuit::new(graph, vec![0, 1], vec![2]).unwrap();
//!
//! assert_eq!(simulate(&nand, &[true, false]).unwrap(), vec![true]);
//! assert_eq!(simulate(&nand, &[true, true]).unwrap(), vec![false]);
//! ```

pub mod error;
pub mod propagate;
pub mod simulator;
pub mod tristate;

pub use error::{SimError, SimResult};
pub use propagate::Propagator;
pub use simulator::{Simulation, Simulator, constant_states, simulate};
pub use tristate::TriState;
