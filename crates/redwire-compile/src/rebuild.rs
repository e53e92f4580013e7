//! Renumbering the live graph into a fresh circuit.

use redwire_ir::{Circuit, GraphBuilder, GraphMerger, NodeId};

use crate::error::{CompileError, CompileResult};

/// `mapping[old]` is the new id of node `old`, or `None` if it was deleted.
pub type NodeMapping = Vec<Option<NodeId>>;

/// Assign dense new ids to the live canonical nodes, in ascending old order.
///
/// Merged nodes map to the new id of their canonical representative.
pub fn renumber(merger: &mut GraphMerger) -> NodeMapping {
    let mut fresh = vec![None; merger.size()];
    for (new, old) in merger.live_nodes().into_iter().enumerate() {
        fresh[old] = Some(new);
    }
    (0..merger.size())
        .map(|old| merger.canonical(old).and_then(|c| fresh[c]))
        .collect()
}

/// Build the circuit described by the live graph under `mapping`.
pub fn rebuild(
    original: &Circuit,
    merger: &GraphMerger,
    mapping: &[Option<NodeId>],
) -> CompileResult<Circuit> {
    let size = merger.live_nodes().len();
    let translate = |node: NodeId| -> CompileResult<NodeId> {
        let new = mapping
            .get(node)
            .copied()
            .flatten()
            .ok_or_else(|| CompileError::InvalidNodeGraph(format!("node {node} was deleted")))?;
        if new >= size {
            return Err(CompileError::InvalidNodeGraph(format!(
                "node {node} renumbered to {new}, beyond size {size}"
            )));
        }
        Ok(new)
    };

    let mut graph = GraphBuilder::with_capacity(size, 0);
    graph.ensure_size(size);
    for (from, to) in merger.live_edges() {
        let (from, to) = (translate(from)?, translate(to)?);
        if from == to {
            return Err(CompileError::InvalidNodeGraph(format!(
                "self-loop on node {from}"
            )));
        }
        graph.add_edge(from, to)?;
    }

    let inputs = original
        .inputs()
        .iter()
        .map(|&n| translate(n))
        .collect::<CompileResult<Vec<_>>>()?;
    let outputs = original
        .outputs()
        .iter()
        .map(|&n| translate(n))
        .collect::<CompileResult<Vec<_>>>()?;

    Circuit::from_builder(&graph, inputs, outputs)
        .map_err(|e| CompileError::InvalidNodeGraph(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use redwire_ir::TwoWayGraph;

    #[test]
    fn test_renumber_is_order_preserving() {
        let graph = TwoWayGraph::from_edges(4, [(0, 1), (1, 3)]).unwrap();
        let mut merger = GraphMerger::new(&graph);
        merger.remove_node(2);
        let mapping = renumber(&mut merger);
        assert_eq!(mapping, vec![Some(0), Some(1), None, Some(2)]);
    }

    #[test]
    fn test_rebuild_after_merge() {
        let graph = TwoWayGraph::from_edges(4, [(0, 1), (0, 2), (1, 3), (2, 3)]).unwrap();
        let circuit = Circuit::new(graph.clone(), vec![0], vec![3]).unwrap();
        let mut merger = GraphMerger::new(&graph);
        merger.merge_nodes(1, 2).unwrap();

        let mapping = renumber(&mut merger);
        assert_eq!(mapping[1], mapping[2]);
        assert_eq!(mapping, vec![Some(0), Some(1), Some(1), Some(2)]);

        let rebuilt = rebuild(&circuit, &merger, &mapping).unwrap();
        assert_eq!(rebuilt.size(), 3);
        assert_eq!(rebuilt.edges().collect::<Vec<_>>(), vec![(0, 1), (1, 2)]);
        assert_eq!(rebuilt.inputs(), &[0]);
        assert_eq!(rebuilt.outputs(), &[2]);
    }

    #[test]
    fn test_rebuild_rejects_deleted_port() {
        let graph = TwoWayGraph::from_edges(2, [(0, 1)]).unwrap();
        let circuit = Circuit::new(graph.clone(), vec![0], vec![1]).unwrap();
        let mut merger = GraphMerger::new(&graph);
        merger.remove_node(1);
        let mapping = renumber(&mut merger);
        assert!(matches!(
            rebuild(&circuit, &merger, &mapping),
            Err(CompileError::InvalidNodeGraph(_))
        ));
    }
}
