//! Union-merge canonicalization and the live graph built on top of it.

use rustc_hash::FxHashSet;

use crate::error::{IrError, IrResult};
use crate::graph::{NodeId, TwoWayGraph};

/// Per-node state inside a [`UnionMerge`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeState {
    /// The node represents its own class.
    Canonical,
    /// The node was merged into another node's class.
    MergedInto(NodeId),
    /// The node is the root of a deleted class.
    Deleted,
}

/// Union-find over node ids with a deletion state.
///
/// Every node resolves either to a canonical representative or to "deleted".
/// Once any member of a class is deleted the whole class is deleted.
#[derive(Debug, Clone)]
pub struct UnionMerge {
    states: Vec<MergeState>,
}

impl UnionMerge {
    /// Create a structure where every node of `0..size` is canonical.
    pub fn new(size: usize) -> Self {
        Self {
            states: vec![MergeState::Canonical; size],
        }
    }

    /// Number of tracked nodes.
    #[inline]
    pub fn len(&self) -> usize {
        self.states.len()
    }

    /// Check whether the structure tracks no nodes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    /// Raw state of a node, without resolving chains.
    #[inline]
    pub fn state(&self, node: NodeId) -> MergeState {
        self.states[node]
    }

    /// Find the root of `node`'s class, compressing the path walked.
    fn root(&mut self, node: NodeId) -> NodeId {
        let mut root = node;
        while let MergeState::MergedInto(next) = self.states[root] {
            root = next;
        }
        let mut current = node;
        while let MergeState::MergedInto(next) = self.states[current] {
            if next != root {
                self.states[current] = MergeState::MergedInto(root);
            }
            current = next;
        }
        root
    }

    /// Resolve `node` to its canonical representative, or `None` if deleted.
    pub fn get_mapping(&mut self, node: NodeId) -> Option<NodeId> {
        let root = self.root(node);
        match self.states[root] {
            MergeState::Deleted => None,
            _ => Some(root),
        }
    }

    /// Resolve without compressing.
    pub fn resolve(&self, node: NodeId) -> Option<NodeId> {
        let mut root = node;
        loop {
            match self.states[root] {
                MergeState::Canonical => return Some(root),
                MergeState::Deleted => return None,
                MergeState::MergedInto(next) => root = next,
            }
        }
    }

    /// Check whether `node`'s class has been deleted.
    pub fn is_deleted(&mut self, node: NodeId) -> bool {
        self.get_mapping(node).is_none()
    }

    /// Union the classes of `a` and `b`, mapping `a`'s class onto `b`'s.
    ///
    /// Merging with a deleted class deletes the other class as well.
    pub fn merge(&mut self, a: NodeId, b: NodeId) {
        let ra = self.root(a);
        let rb = self.root(b);
        if ra == rb {
            return;
        }
        match (self.states[ra], self.states[rb]) {
            (MergeState::Deleted, MergeState::Deleted) => {
                self.states[ra] = MergeState::MergedInto(rb);
            }
            (MergeState::Deleted, _) => {
                self.states[rb] = MergeState::MergedInto(ra);
            }
            _ => {
                self.states[ra] = MergeState::MergedInto(rb);
            }
        }
    }

    /// Delete the whole class of `node`.
    pub fn delete(&mut self, node: NodeId) {
        let root = self.root(node);
        self.states[root] = MergeState::Deleted;
    }

    /// Canonical images of `nodes`, deleted classes skipped.
    pub fn reduce(&mut self, nodes: impl IntoIterator<Item = NodeId>) -> FxHashSet<NodeId> {
        nodes
            .into_iter()
            .filter_map(|node| self.get_mapping(node))
            .collect()
    }

    /// Canonical images of `nodes` in order, deleted classes as `None`.
    pub fn images(&mut self, nodes: impl IntoIterator<Item = NodeId>) -> Vec<Option<NodeId>> {
        nodes
            .into_iter()
            .map(|node| self.get_mapping(node))
            .collect()
    }

    /// Nodes that currently represent a live class, ascending.
    pub fn canonical_nodes(&self) -> impl Iterator<Item = NodeId> + '_ {
        self.states
            .iter()
            .enumerate()
            .filter(|(_, state)| matches!(state, MergeState::Canonical))
            .map(|(node, _)| node)
    }
}

/// Live adjacency keyed by canonical ids.
///
/// Forward and backward sets are kept symmetric; a violation is a bug in the
/// caller's rewrite and panics.
#[derive(Debug, Clone)]
pub struct GraphMerger {
    merge: UnionMerge,
    forward: Vec<FxHashSet<NodeId>>,
    backward: Vec<FxHashSet<NodeId>>,
}

impl GraphMerger {
    /// Start from a frozen graph where every node is live and canonical.
    pub fn new(graph: &TwoWayGraph) -> Self {
        let forward = (0..graph.size())
            .map(|node| graph.out_neighbors(node).iter().copied().collect())
            .collect();
        let backward = (0..graph.size())
            .map(|node| graph.in_neighbors(node).iter().copied().collect())
            .collect();
        Self {
            merge: UnionMerge::new(graph.size()),
            forward,
            backward,
        }
    }

    /// Number of node ids, live or not.
    #[inline]
    pub fn size(&self) -> usize {
        self.merge.len()
    }

    /// Canonical representative of `node`, `None` if deleted.
    pub fn canonical(&mut self, node: NodeId) -> Option<NodeId> {
        self.merge.get_mapping(node)
    }

    /// Check whether `node` is itself a live canonical node.
    pub fn is_live(&self, node: NodeId) -> bool {
        matches!(self.merge.state(node), MergeState::Canonical)
    }

    /// Access the underlying union-merge structure.
    pub fn union_merge(&self) -> &UnionMerge {
        &self.merge
    }

    /// Mutable access to the underlying union-merge structure.
    pub fn union_merge_mut(&mut self) -> &mut UnionMerge {
        &mut self.merge
    }

    fn live(&mut self, node: NodeId) -> IrResult<NodeId> {
        self.canonical(node)
            .ok_or_else(|| IrError::Internal(format!("node {node} is deleted")))
    }

    /// Successors of `node`'s class, ascending.
    pub fn successors(&mut self, node: NodeId) -> Vec<NodeId> {
        match self.canonical(node) {
            Some(node) => sorted(&self.forward[node]),
            None => Vec::new(),
        }
    }

    /// Predecessors of `node`'s class, ascending.
    pub fn predecessors(&mut self, node: NodeId) -> Vec<NodeId> {
        match self.canonical(node) {
            Some(node) => sorted(&self.backward[node]),
            None => Vec::new(),
        }
    }

    /// Out-degree of `node`'s class; zero if deleted.
    pub fn out_degree(&mut self, node: NodeId) -> usize {
        self.canonical(node).map_or(0, |n| self.forward[n].len())
    }

    /// In-degree of `node`'s class; zero if deleted.
    pub fn in_degree(&mut self, node: NodeId) -> usize {
        self.canonical(node).map_or(0, |n| self.backward[n].len())
    }

    /// Check whether the live edge `from -> to` exists.
    pub fn has_edge(&mut self, from: NodeId, to: NodeId) -> bool {
        match (self.canonical(from), self.canonical(to)) {
            (Some(from), Some(to)) => self.forward[from].contains(&to),
            _ => false,
        }
    }

    /// Add the live edge `from -> to` between canonical classes.
    pub fn add_edge(&mut self, from: NodeId, to: NodeId) -> IrResult<()> {
        let from = self.live(from)?;
        let to = self.live(to)?;
        if from == to {
            return Err(IrError::SelfLoop(from));
        }
        self.forward[from].insert(to);
        self.backward[to].insert(from);
        Ok(())
    }

    /// Live nodes, ascending.
    pub fn live_nodes(&self) -> Vec<NodeId> {
        self.merge.canonical_nodes().collect()
    }

    /// Live edges, ordered by source then target.
    pub fn live_edges(&self) -> Vec<(NodeId, NodeId)> {
        self.merge
            .canonical_nodes()
            .flat_map(|from| sorted(&self.forward[from]).into_iter().map(move |to| (from, to)))
            .collect()
    }

    /// Merge `a`'s class into `b`'s class.
    ///
    /// The union inherits the edges of both; edges between the two are dropped.
    pub fn merge_nodes(&mut self, a: NodeId, b: NodeId) -> IrResult<()> {
        let a = self.live(a)?;
        let b = self.live(b)?;
        if a == b {
            return Ok(());
        }

        let successors = std::mem::take(&mut self.forward[a]);
        for succ in successors {
            self.unlink_backward(succ, a);
            if succ != b {
                self.forward[b].insert(succ);
                self.backward[succ].insert(b);
            }
        }
        let predecessors = std::mem::take(&mut self.backward[a]);
        for pred in predecessors {
            self.unlink_forward(pred, a);
            if pred != b {
                self.backward[b].insert(pred);
                self.forward[pred].insert(b);
            }
        }
        self.forward[b].remove(&a);
        self.backward[b].remove(&a);

        self.merge.merge(a, b);
        Ok(())
    }

    /// Delete `node`'s class together with all incident edges.
    pub fn remove_node(&mut self, node: NodeId) {
        let Some(node) = self.canonical(node) else {
            return;
        };
        for succ in std::mem::take(&mut self.forward[node]) {
            self.unlink_backward(succ, node);
        }
        for pred in std::mem::take(&mut self.backward[node]) {
            self.unlink_forward(pred, node);
        }
        self.merge.delete(node);
    }

    /// Collapse the lonely edge `from -> to`.
    ///
    /// Every predecessor of `from` is connected to every successor of `to`,
    /// then both nodes are deleted. `to` computes `NOT from`, so each successor
    /// of `to` receives exactly the disjuncts that made up `from`.
    pub fn forward_edge(&mut self, from: NodeId, to: NodeId) -> IrResult<()> {
        let from = self.live(from)?;
        let to = self.live(to)?;
        if !self.forward[from].contains(&to) {
            return Err(IrError::NotForwardable {
                from,
                to,
                reason: "no such edge",
            });
        }
        if self.forward[from].len() != 1 || self.backward[to].len() != 1 {
            return Err(IrError::NotForwardable {
                from,
                to,
                reason: "edge is not lonely",
            });
        }
        if self.backward[from].is_empty() {
            return Err(IrError::NotForwardable {
                from,
                to,
                reason: "source has no predecessors",
            });
        }

        let predecessors = sorted(&self.backward[from]);
        let successors = sorted(&self.forward[to]);
        self.remove_node(from);
        self.remove_node(to);

        for &pred in &predecessors {
            for &succ in &successors {
                self.add_edge(pred, succ)?;
            }
        }
        Ok(())
    }

    fn unlink_forward(&mut self, from: NodeId, to: NodeId) {
        assert!(
            self.forward[from].remove(&to),
            "adjacency desynchronized: {from} -> {to} missing from forward set"
        );
    }

    fn unlink_backward(&mut self, to: NodeId, from: NodeId) {
        assert!(
            self.backward[to].remove(&from),
            "adjacency desynchronized: {from} -> {to} missing from backward set"
        );
    }
}

fn sorted(set: &FxHashSet<NodeId>) -> Vec<NodeId> {
    let mut nodes: Vec<_> = set.iter().copied().collect();
    nodes.sort_unstable();
    nodes
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_biases_onto_second_class() {
        let mut merge = UnionMerge::new(4);
        merge.merge(0, 1);
        assert_eq!(merge.get_mapping(0), Some(1));
        assert_eq!(merge.get_mapping(1), Some(1));
        merge.merge(1, 3);
        assert_eq!(merge.get_mapping(0), Some(3));
    }

    #[test]
    fn test_delete_spreads_to_class() {
        let mut merge = UnionMerge::new(4);
        merge.merge(0, 1);
        merge.delete(0);
        assert!(merge.is_deleted(1));
        assert!(!merge.is_deleted(2));

        // Joining a deleted class deletes the newcomer too.
        merge.merge(2, 1);
        assert!(merge.is_deleted(2));
    }

    #[test]
    fn test_long_chain_compresses() {
        let size = 100_000;
        let mut merge = UnionMerge::new(size);
        for node in 0..size - 1 {
            merge.merge(node, node + 1);
        }
        assert_eq!(merge.get_mapping(0), Some(size - 1));
        assert_eq!(merge.state(0), MergeState::MergedInto(size - 1));
    }

    #[test]
    fn test_reduce_and_images() {
        let mut merge = UnionMerge::new(5);
        merge.merge(0, 1);
        merge.delete(4);
        let reduced = merge.reduce([0, 1, 2, 4]);
        assert_eq!(reduced.len(), 2);
        assert!(reduced.contains(&1) && reduced.contains(&2));
        assert_eq!(merge.images([0, 4]), vec![Some(1), None]);
    }

    fn chain(size: usize) -> TwoWayGraph {
        TwoWayGraph::from_edges(size, (0..size - 1).map(|n| (n, n + 1))).unwrap()
    }

    #[test]
    fn test_remove_node_drops_edges() {
        let mut merger = GraphMerger::new(&chain(3));
        merger.remove_node(1);
        assert!(!merger.is_live(1));
        assert_eq!(merger.out_degree(0), 0);
        assert_eq!(merger.in_degree(2), 0);
        assert_eq!(merger.live_nodes(), vec![0, 2]);
        assert!(merger.live_edges().is_empty());
    }

    #[test]
    fn test_forward_edge_reconnects() {
        // 0 -> 2 <- 1, 2 -> 3, 3 -> 4, 3 -> 5
        let graph =
            TwoWayGraph::from_edges(6, [(0, 2), (1, 2), (2, 3), (3, 4), (3, 5)]).unwrap();
        let mut merger = GraphMerger::new(&graph);
        merger.forward_edge(2, 3).unwrap();
        assert_eq!(
            merger.live_edges(),
            vec![(0, 4), (0, 5), (1, 4), (1, 5)]
        );
        assert!(!merger.is_live(2));
        assert!(!merger.is_live(3));
    }

    #[test]
    fn test_forward_edge_requires_lonely_edge() {
        let graph = TwoWayGraph::from_edges(4, [(0, 1), (1, 2), (1, 3)]).unwrap();
        let mut merger = GraphMerger::new(&graph);
        assert!(matches!(
            merger.forward_edge(1, 2),
            Err(IrError::NotForwardable { .. })
        ));
        assert!(matches!(
            merger.forward_edge(0, 2),
            Err(IrError::NotForwardable { .. })
        ));
    }

    #[test]
    fn test_merge_nodes_unions_adjacency() {
        let graph = TwoWayGraph::from_edges(4, [(0, 1), (1, 3), (2, 3), (0, 2)]).unwrap();
        let mut merger = GraphMerger::new(&graph);
        merger.merge_nodes(1, 2).unwrap();
        assert_eq!(merger.canonical(1), Some(2));
        assert_eq!(merger.predecessors(1), vec![0]);
        assert_eq!(merger.successors(2), vec![3]);
        assert_eq!(merger.live_edges(), vec![(0, 2), (2, 3)]);
    }
}
