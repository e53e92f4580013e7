//! Trim entry points.

use redwire_ir::{AnnotatedCircuit, Circuit, DebugCircuit};
use tracing::info;

use crate::context::{TrimContext, TrimStats};
use crate::error::CompileResult;
use crate::manager::PassManagerBuilder;
use crate::options::TrimOptions;
use crate::rebuild::{NodeMapping, rebuild, renumber};

/// A trimmed circuit with the map from old to new node ids.
#[derive(Debug, Clone)]
pub struct Trimmed<C> {
    /// The optimized circuit.
    pub circuit: C,
    /// `mapping[old]` is the new id of `old`, or `None` if it was removed.
    pub mapping: NodeMapping,
    /// What the passes did.
    pub stats: TrimStats,
}

/// Trim `circuit` with every pass enabled.
pub fn trim(circuit: &Circuit) -> CompileResult<Trimmed<Circuit>> {
    trim_with(circuit, &TrimOptions::default())
}

/// Trim `circuit` with the selected passes.
///
/// The input is not modified. The result has the same inputs and outputs,
/// in the same order, and computes the same function.
pub fn trim_with(circuit: &Circuit, options: &TrimOptions) -> CompileResult<Trimmed<Circuit>> {
    let pm = PassManagerBuilder::new().with_options(*options).build();
    let mut ctx = TrimContext::new(circuit);
    pm.run(&mut ctx)?;

    let (mut merger, mut stats) = ctx.finish();
    let mapping = renumber(&mut merger);
    let trimmed = rebuild(circuit, &merger, &mapping)?;

    stats.nodes_after = trimmed.size();
    stats.edges_after = trimmed.edge_count();
    info!(
        "Trimmed circuit from {} to {} nodes, {} to {} edges",
        stats.nodes_before, stats.nodes_after, stats.edges_before, stats.edges_after
    );

    Ok(Trimmed {
        circuit: trimmed,
        mapping,
        stats,
    })
}

/// Trimming for every circuit flavor.
pub trait Trim: Sized {
    /// Trim with the selected passes.
    fn trim_with(&self, options: &TrimOptions) -> CompileResult<Trimmed<Self>>;

    /// Trim with every pass enabled.
    fn trim(&self) -> CompileResult<Trimmed<Self>> {
        self.trim_with(&TrimOptions::default())
    }
}

impl Trim for Circuit {
    fn trim_with(&self, options: &TrimOptions) -> CompileResult<Trimmed<Self>> {
        trim_with(self, options)
    }
}

impl Trim for AnnotatedCircuit {
    fn trim_with(&self, options: &TrimOptions) -> CompileResult<Trimmed<Self>> {
        let Trimmed {
            circuit,
            mapping,
            stats,
        } = trim_with(self.circuit(), options)?;
        Ok(Trimmed {
            circuit: self.with_circuit(circuit)?,
            mapping,
            stats,
        })
    }
}

impl Trim for DebugCircuit {
    fn trim_with(&self, options: &TrimOptions) -> CompileResult<Trimmed<Self>> {
        let Trimmed {
            circuit,
            mapping,
            stats,
        } = self.circuit().trim_with(options)?;
        Ok(Trimmed {
            circuit: self.remap(circuit, &mapping),
            mapping,
            stats,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use redwire_ir::{PortGroup, TwoWayGraph};

    #[test]
    fn test_annotated_trim_keeps_groups() {
        let graph = TwoWayGraph::from_edges(5, [(0, 2), (1, 2), (2, 3), (3, 4), (0, 4)]).unwrap();
        let circuit = Circuit::new(graph, vec![0, 1], vec![4]).unwrap();
        let annotated = AnnotatedCircuit::new(
            circuit,
            vec![PortGroup::new("ab", 2)],
            vec![PortGroup::new("y", 1)],
        )
        .unwrap();

        let trimmed = annotated.trim().unwrap();
        assert_eq!(trimmed.circuit.input_groups(), annotated.input_groups());
        assert_eq!(trimmed.circuit.output_groups(), annotated.output_groups());
        assert_eq!(trimmed.stats.nodes_before, 5);
        // 2 -> 3 is lonely with one predecessor set of size 2 and one successor.
        assert_eq!(trimmed.stats.forwarded, 1);
        assert_eq!(trimmed.circuit.circuit().size(), 3);
    }

    #[test]
    fn test_disabled_passes_only_renumber() {
        let graph = TwoWayGraph::from_edges(3, [(0, 1), (0, 2)]).unwrap();
        let circuit = Circuit::new(graph, vec![0], vec![1]).unwrap();
        let trimmed = trim_with(&circuit, &TrimOptions::none()).unwrap();
        assert_eq!(trimmed.circuit, circuit);
        assert_eq!(trimmed.mapping, vec![Some(0), Some(1), Some(2)]);
    }
}
