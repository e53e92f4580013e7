//! Directed multigraph over dense node ids.
//!
//! Graphs are built with a mutable [`GraphBuilder`] and then frozen into a
//! [`TwoWayGraph`], which materializes both the forward and the backward
//! adjacency so that predecessor queries are as cheap as successor queries.

use petgraph::Direction;
use petgraph::algo::toposort;
use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;

use crate::error::{IrError, IrResult};

/// Dense node identity within one graph.
pub type NodeId = usize;

/// Mutable, generative graph builder.
///
/// Node ids are handed out densely starting at zero. Parallel edges are
/// allowed; they collapse when the graph is frozen.
#[derive(Debug, Clone, Default)]
pub struct GraphBuilder {
    graph: DiGraph<(), (), u32>,
}

impl GraphBuilder {
    /// Create an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty builder with preallocated storage.
    pub fn with_capacity(nodes: usize, edges: usize) -> Self {
        Self {
            graph: DiGraph::with_capacity(nodes, edges),
        }
    }

    /// Allocate a fresh node.
    pub fn add_node(&mut self) -> NodeId {
        self.graph.add_node(()).index()
    }

    /// Allocate nodes until at least `size` ids exist.
    pub fn ensure_size(&mut self, size: usize) {
        while self.graph.node_count() < size {
            self.graph.add_node(());
        }
    }

    /// Add the edge `from -> to`.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> IrResult<()> {
        let size = self.graph.node_count();
        for node in [from, to] {
            if node >= size {
                return Err(IrError::NodeOutOfRange { node, size });
            }
        }
        self.graph
            .add_edge(NodeIndex::new(from), NodeIndex::new(to), ());
        Ok(())
    }

    /// Number of allocated nodes.
    #[inline]
    pub fn node_count(&self) -> usize {
        self.graph.node_count()
    }

    /// Number of edges added so far, parallel edges included.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.graph.edge_count()
    }

    /// Iterate over all edges in insertion order.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.graph
            .edge_references()
            .map(|e| (e.source().index(), e.target().index()))
    }

    /// Iterate over the successors of `node`.
    pub fn out_neighbors(&self, node: NodeId) -> impl Iterator<Item = NodeId> + '_ {
        self.graph
            .neighbors_directed(NodeIndex::new(node), Direction::Outgoing)
            .map(|n| n.index())
    }

    /// Freeze into a read-optimized two-way view.
    pub fn build(&self) -> TwoWayGraph {
        TwoWayGraph::assemble(self.node_count(), self.edges())
    }
}

/// Read-only graph with forward and backward adjacency.
///
/// Neighbor lists are sorted and free of duplicates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TwoWayGraph {
    forward: Vec<Vec<NodeId>>,
    backward: Vec<Vec<NodeId>>,
    edge_count: usize,
}

impl TwoWayGraph {
    /// Build a graph of `size` nodes from an edge list, checking every endpoint.
    pub fn from_edges(
        size: usize,
        edges: impl IntoIterator<Item = (NodeId, NodeId)>,
    ) -> IrResult<Self> {
        let edges: Vec<_> = edges.into_iter().collect();
        for &(from, to) in &edges {
            for node in [from, to] {
                if node >= size {
                    return Err(IrError::NodeOutOfRange { node, size });
                }
            }
        }
        Ok(Self::assemble(size, edges))
    }

    /// Endpoints must already be known to be in range.
    fn assemble(size: usize, edges: impl IntoIterator<Item = (NodeId, NodeId)>) -> Self {
        let mut forward = vec![Vec::new(); size];
        for (from, to) in edges {
            forward[from].push(to);
        }
        let mut edge_count = 0;
        for targets in &mut forward {
            targets.sort_unstable();
            targets.dedup();
            edge_count += targets.len();
        }

        // Sources are visited in ascending order, so each list ends up sorted.
        let mut backward = vec![Vec::new(); size];
        for (from, targets) in forward.iter().enumerate() {
            for &to in targets {
                backward[to].push(from);
            }
        }

        Self {
            forward,
            backward,
            edge_count,
        }
    }

    /// Number of nodes.
    #[inline]
    pub fn size(&self) -> usize {
        self.forward.len()
    }

    /// Number of distinct edges.
    #[inline]
    pub fn edge_count(&self) -> usize {
        self.edge_count
    }

    /// Successors of `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a node of this graph.
    #[inline]
    pub fn out_neighbors(&self, node: NodeId) -> &[NodeId] {
        &self.forward[node]
    }

    /// Predecessors of `node`.
    ///
    /// # Panics
    ///
    /// Panics if `node` is not a node of this graph.
    #[inline]
    pub fn in_neighbors(&self, node: NodeId) -> &[NodeId] {
        &self.backward[node]
    }

    /// Neighbors of `node` in the given direction.
    #[inline]
    pub fn neighbors(&self, node: NodeId, direction: Direction) -> &[NodeId] {
        match direction {
            Direction::Outgoing => self.out_neighbors(node),
            Direction::Incoming => self.in_neighbors(node),
        }
    }

    /// Iterate over all edges, ordered by source then target.
    pub fn edges(&self) -> impl Iterator<Item = (NodeId, NodeId)> + '_ {
        self.forward
            .iter()
            .enumerate()
            .flat_map(|(from, targets)| targets.iter().map(move |&to| (from, to)))
    }

    /// Mark every node reachable from `roots`, roots included.
    ///
    /// `Direction::Outgoing` follows edges forward, `Direction::Incoming`
    /// walks them backward.
    pub fn trace(&self, roots: impl IntoIterator<Item = NodeId>, direction: Direction) -> Vec<bool> {
        let mut seen = vec![false; self.size()];
        let mut stack = Vec::new();
        for root in roots {
            if !seen[root] {
                seen[root] = true;
                stack.push(root);
            }
        }
        while let Some(node) = stack.pop() {
            for &next in self.neighbors(node, direction) {
                if !seen[next] {
                    seen[next] = true;
                    stack.push(next);
                }
            }
        }
        seen
    }

    /// Find a node that lies on a cycle, if any.
    pub fn find_cycle(&self) -> Option<NodeId> {
        let mut graph: DiGraph<(), (), u32> = DiGraph::with_capacity(self.size(), self.edge_count);
        for _ in 0..self.size() {
            graph.add_node(());
        }
        for (from, to) in self.edges() {
            graph.add_edge(NodeIndex::new(from), NodeIndex::new(to), ());
        }
        toposort(&graph, None)
            .err()
            .map(|cycle| cycle.node_id().index())
    }
}
