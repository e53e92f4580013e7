//! Flattened circuits that remember where their instances ended up.

use rustc_hash::FxHashMap;

use crate::annotated::AnnotatedCircuit;
use crate::builder::InstanceId;
use crate::graph::NodeId;

/// An [`AnnotatedCircuit`] together with per-instance probe points.
///
/// Every instance of the builder that produced the circuit keeps the flat
/// positions of its output bits, so intermediate values can be inspected
/// after simulation. Named instances are addressable by name. After
/// trimming, positions of deleted nodes become `None`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DebugCircuit {
    circuit: AnnotatedCircuit,
    by_name: FxHashMap<String, InstanceId>,
    names: Vec<Option<String>>,
    probes: Vec<Vec<Option<NodeId>>>,
}

impl DebugCircuit {
    pub(crate) fn new(
        circuit: AnnotatedCircuit,
        names: Vec<Option<String>>,
        probes: Vec<Vec<Option<NodeId>>>,
    ) -> Self {
        let by_name = names
            .iter()
            .enumerate()
            .filter_map(|(i, name)| name.clone().map(|n| (n, InstanceId(i))))
            .collect();
        Self {
            circuit,
            by_name,
            names,
            probes,
        }
    }

    /// Get the flattened circuit.
    #[inline]
    pub fn circuit(&self) -> &AnnotatedCircuit {
        &self.circuit
    }

    /// Take the flattened circuit.
    pub fn into_circuit(self) -> AnnotatedCircuit {
        self.circuit
    }

    /// Number of instances that were flattened.
    pub fn num_instances(&self) -> usize {
        self.probes.len()
    }

    /// Look up an instance by name.
    pub fn instance(&self, name: &str) -> Option<InstanceId> {
        self.by_name.get(name).copied()
    }

    /// Name of an instance, if it has one.
    pub fn name(&self, id: InstanceId) -> Option<&str> {
        self.names.get(id.0)?.as_deref()
    }

    /// Iterate over all named instances in instance order.
    pub fn named_instances(&self) -> impl Iterator<Item = (&str, InstanceId)> + '_ {
        self.names
            .iter()
            .enumerate()
            .filter_map(|(i, name)| name.as_deref().map(|n| (n, InstanceId(i))))
    }

    /// Flat positions of an instance's output bits.
    pub fn outputs_of(&self, id: InstanceId) -> Option<&[Option<NodeId>]> {
        self.probes.get(id.0).map(Vec::as_slice)
    }

    /// Flat positions of a named instance's output bits.
    pub fn probe(&self, name: &str) -> Option<&[Option<NodeId>]> {
        self.outputs_of(self.instance(name)?)
    }

    /// Carry the probe points over to a renumbered circuit.
    ///
    /// `mapping[old]` is the new id of `old`, or `None` if it was deleted.
    pub fn remap(&self, circuit: AnnotatedCircuit, mapping: &[Option<NodeId>]) -> Self {
        let probes = self
            .probes
            .iter()
            .map(|bits| {
                bits.iter()
                    .map(|bit| bit.and_then(|old| mapping.get(old).copied().flatten()))
                    .collect()
            })
            .collect();
        Self {
            circuit,
            by_name: self.by_name.clone(),
            names: self.names.clone(),
            probes,
        }
    }
}
