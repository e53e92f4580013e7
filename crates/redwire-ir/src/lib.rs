//! Redwire Wire-Level Circuit Representation
//!
//! This crate provides the core data structures for wire-level logic circuits
//! in Redwire. It forms the foundation of the compiler, simulator and optimizer.
//!
//! # Overview
//!
//! A circuit is a directed graph over dense node ids. Every node computes the
//! OR of the negations of its predecessors, so a node with one predecessor is
//! an inverter and a node with several is a NAND gate. A non-input node
//! without predecessors is constant FALSE.
//!
//! # Core Components
//!
//! - **Graphs**: [`GraphBuilder`] for construction, [`TwoWayGraph`] for
//!   read-only forward and backward adjacency
//! - **Merging**: [`UnionMerge`] and [`GraphMerger`] for optimizer rewrites
//! - **Circuits**: [`Circuit`] (flat ports) and [`AnnotatedCircuit`]
//!   (multi-bit port groups)
//! - **Hierarchy**: [`CircuitBuilder`] flattens instances of smaller circuits,
//!   [`DebugCircuit`] remembers where each instance landed
//!
//! # Example: Chaining Two Inverters
//!
//! ```rust
//! use std::sync::Arc;
//! use redwire_ir::{AnnotatedCircuit, Circuit, CircuitBuilder, TwoWayGraph};
//!
//! let graph = TwoWayGraph::from_edges(2, [(0, 1)]).unwrap();
//! let not = Circuit::new(graph, vec![0], vec![1]).unwrap();
//! let not = Arc::new(AnnotatedCircuit::from_widths(not, &[1], &[1]).unwrap());
//!
//! let mut builder = CircuitBuilder::new();
//! let input = builder.add_instance(Arc::new(AnnotatedCircuit::identity(1)));
//! let first = builder.add_instance(not.clone());
//! let second = builder.add_instance(not);
//! builder.plug(first, input).unwrap();
//! builder.plug(second, first).unwrap();
//! builder.mark_input(input).unwrap();
//! builder.mark_output(second).unwrap();
//!
//! let flat = builder.to_circuit().unwrap();
//! assert_eq!(flat.circuit().size(), 3);
//! ```

pub mod annotated;
pub mod builder;
pub mod circuit;
pub mod debug;
pub mod error;
pub mod graph;
pub mod merge;

pub use annotated::{AnnotatedCircuit, PortGroup};
pub use builder::{CircuitBuilder, InstanceId};
pub use circuit::Circuit;
pub use debug::DebugCircuit;
pub use error::{IrError, IrResult, PortSide};
pub use graph::{GraphBuilder, NodeId, TwoWayGraph};
pub use merge::{GraphMerger, MergeState, UnionMerge};

/// Re-exported for [`TwoWayGraph::trace`] callers.
pub use petgraph::Direction;
