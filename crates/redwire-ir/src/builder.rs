//! Hierarchical circuit construction.
//!
//! A [`CircuitBuilder`] holds instances of previously built
//! [`AnnotatedCircuit`]s, wires them together by plugging producers into
//! consumers, and flattens the result into a single circuit.

use std::fmt;
use std::sync::Arc;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::annotated::{AnnotatedCircuit, PortGroup};
use crate::circuit::Circuit;
use crate::debug::DebugCircuit;
use crate::error::{IrError, IrResult};
use crate::graph::{GraphBuilder, NodeId};

/// Identifier of an instance within one builder.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct InstanceId(pub usize);

impl fmt::Display for InstanceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i{}", self.0)
    }
}

#[derive(Debug, Clone)]
struct Instance {
    circuit: Arc<AnnotatedCircuit>,
    plugs: Vec<InstanceId>,
    name: Option<String>,
}

/// Builder for composite circuits.
///
/// Plugging order fixes which input bits a producer feeds: the `k`-th plug
/// of a consumer starts at the sum of the total output widths of the plugs
/// before it. In strict mode every plug must match one input group exactly.
/// Designated input and output instances are concatenated, in designation
/// order, into the composite's ports.
#[derive(Debug, Clone)]
pub struct CircuitBuilder {
    instances: Vec<Instance>,
    names: FxHashMap<String, InstanceId>,
    inputs: Vec<InstanceId>,
    outputs: Vec<InstanceId>,
    strict: bool,
}

impl Default for CircuitBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl CircuitBuilder {
    /// Create an empty builder in strict mode.
    pub fn new() -> Self {
        Self {
            instances: vec![],
            names: FxHashMap::default(),
            inputs: vec![],
            outputs: vec![],
            strict: true,
        }
    }

    /// Enable or disable strict plug checks.
    #[must_use]
    pub fn strict(mut self, strict: bool) -> Self {
        self.strict = strict;
        self
    }

    /// Whether strict plug checks are enabled.
    pub fn is_strict(&self) -> bool {
        self.strict
    }

    /// Number of instances added so far.
    pub fn num_instances(&self) -> usize {
        self.instances.len()
    }

    /// Add an instance of `circuit`.
    pub fn add_instance(&mut self, circuit: Arc<AnnotatedCircuit>) -> InstanceId {
        let id = InstanceId(self.instances.len());
        self.instances.push(Instance {
            circuit,
            plugs: vec![],
            name: None,
        });
        id
    }

    /// Add an instance of `circuit` under a debug name.
    pub fn add_named_instance(
        &mut self,
        circuit: Arc<AnnotatedCircuit>,
        name: impl Into<String>,
    ) -> IrResult<InstanceId> {
        let name = name.into();
        if self.names.contains_key(&name) {
            return Err(IrError::DuplicateName(name));
        }
        let id = self.add_instance(circuit);
        self.set_name(id, name)?;
        Ok(id)
    }

    /// Give an instance a (new) debug name, releasing its previous one.
    pub fn set_name(&mut self, id: InstanceId, name: impl Into<String>) -> IrResult<()> {
        let name = name.into();
        self.check(id)?;
        match self.names.get(&name) {
            Some(&owner) if owner == id => return Ok(()),
            Some(_) => return Err(IrError::DuplicateName(name)),
            None => {}
        }
        if let Some(old) = self.instances[id.0].name.take() {
            self.names.remove(&old);
        }
        self.names.insert(name.clone(), id);
        self.instances[id.0].name = Some(name);
        Ok(())
    }

    /// Look up an instance by debug name.
    pub fn instance_by_name(&self, name: &str) -> Option<InstanceId> {
        self.names.get(name).copied()
    }

    /// The circuit an instance was created from.
    pub fn instance_circuit(&self, id: InstanceId) -> Option<&Arc<AnnotatedCircuit>> {
        self.instances.get(id.0).map(|inst| &inst.circuit)
    }

    /// Number of plugs attached to `consumer` so far.
    pub fn plug_count(&self, consumer: InstanceId) -> Option<usize> {
        self.instances.get(consumer.0).map(|inst| inst.plugs.len())
    }

    /// Feed the outputs of `producer` into the next input slot of `consumer`.
    pub fn plug(&mut self, consumer: InstanceId, producer: InstanceId) -> IrResult<()> {
        self.check(consumer)?;
        self.check(producer)?;

        if self.strict {
            let target = &self.instances[consumer.0];
            let group = target.plugs.len();
            let groups = target.circuit.input_groups().len();
            if group >= groups {
                return Err(IrError::TooManyPlugs {
                    consumer: consumer.0,
                    groups,
                    plugs: group + 1,
                });
            }
            let expected = target.circuit.input_groups()[group].width;
            let got = self.instances[producer.0].circuit.total_output_width();
            if expected != got {
                return Err(IrError::PlugWidthMismatch {
                    consumer: consumer.0,
                    group,
                    expected,
                    got,
                });
            }
        }

        self.instances[consumer.0].plugs.push(producer);
        Ok(())
    }

    /// Designate an instance's inputs as the next composite inputs.
    pub fn mark_input(&mut self, id: InstanceId) -> IrResult<()> {
        self.check(id)?;
        self.inputs.push(id);
        Ok(())
    }

    /// Designate an instance's outputs as the next composite outputs.
    pub fn mark_output(&mut self, id: InstanceId) -> IrResult<()> {
        self.check(id)?;
        self.outputs.push(id);
        Ok(())
    }

    fn check(&self, id: InstanceId) -> IrResult<()> {
        if id.0 >= self.instances.len() {
            return Err(IrError::UnknownInstance(id.0));
        }
        Ok(())
    }

    /// Flatten into a single annotated circuit.
    pub fn to_circuit(&self) -> IrResult<AnnotatedCircuit> {
        let layout = Layout::new(self)?;
        layout.assemble(self)
    }

    /// Flatten, keeping the flat position of every instance's outputs.
    pub fn to_debug_circuit(&self) -> IrResult<DebugCircuit> {
        let layout = Layout::new(self)?;
        let circuit = layout.assemble(self)?;

        let mut probes = Vec::with_capacity(self.instances.len());
        for (i, inst) in self.instances.iter().enumerate() {
            let bits = inst
                .circuit
                .circuit()
                .outputs()
                .iter()
                .map(|&node| layout.resolve(self, InstanceId(i), node).map(Some))
                .collect::<IrResult<Vec<_>>>()?;
            probes.push(bits);
        }
        let names = self.instances.iter().map(|inst| inst.name.clone()).collect();

        Ok(DebugCircuit::new(circuit, names, probes))
    }
}

/// Where each instance's nodes land in the flat address space.
struct Layout {
    /// `positions[i][n]` is the flat id of local node `n`, `None` when plugged.
    positions: Vec<Vec<Option<NodeId>>>,
    /// `sources[i][n]` is the producer and output bit feeding a plugged input.
    sources: Vec<FxHashMap<NodeId, (InstanceId, usize)>>,
    /// Total number of plugged input bits across all instances.
    plugged: usize,
    size: usize,
}

impl Layout {
    fn new(builder: &CircuitBuilder) -> IrResult<Self> {
        let designated: Vec<bool> = {
            let mut flags = vec![false; builder.instances.len()];
            for id in &builder.inputs {
                flags[id.0] = true;
            }
            flags
        };

        let mut sources = Vec::with_capacity(builder.instances.len());
        for (i, inst) in builder.instances.iter().enumerate() {
            let mut plugged = FxHashMap::default();
            if designated[i] {
                if !inst.plugs.is_empty() {
                    debug!(instance = i, "ignoring plugs into a designated input");
                }
                sources.push(plugged);
                continue;
            }
            let inputs = inst.circuit.circuit().inputs();
            let mut offset = 0;
            for &producer in &inst.plugs {
                let width = builder.instances[producer.0].circuit.total_output_width();
                for bit in 0..width {
                    if let Some(&node) = inputs.get(offset + bit) {
                        plugged.insert(node, (producer, bit));
                    }
                }
                offset += width;
            }
            sources.push(plugged);
        }

        let total: usize = builder
            .instances
            .iter()
            .map(|inst| inst.circuit.circuit().size())
            .sum();
        let plugged: usize = sources.iter().map(FxHashMap::len).sum();
        let size = total - plugged;

        let mut positions = Vec::with_capacity(builder.instances.len());
        let mut base = 0;
        for (inst, plugged) in builder.instances.iter().zip(&sources) {
            let local = inst.circuit.circuit().size();
            let mut map = Vec::with_capacity(local);
            for node in 0..local {
                if plugged.contains_key(&node) {
                    map.push(None);
                } else {
                    map.push(Some(base));
                    base += 1;
                }
            }
            positions.push(map);
        }
        if base != size {
            return Err(IrError::Internal(format!(
                "layout assigned {base} nodes but memory holds {size}"
            )));
        }

        debug!(
            instances = builder.instances.len(),
            nodes = size,
            plugged,
            "flattening circuit"
        );

        Ok(Self {
            positions,
            sources,
            plugged,
            size,
        })
    }

    /// Flat id of local `node` of `instance`, following plugs to their source.
    fn resolve(
        &self,
        builder: &CircuitBuilder,
        instance: InstanceId,
        node: NodeId,
    ) -> IrResult<NodeId> {
        let mut instance = instance;
        let mut node = node;
        // An acyclic chain visits each plugged bit at most once.
        for _ in 0..=self.plugged {
            if let Some(flat) = self.positions[instance.0][node] {
                return Ok(flat);
            }
            let Some(&(producer, bit)) = self.sources[instance.0].get(&node) else {
                return Err(IrError::Internal(format!(
                    "node {node} of instance {instance} has neither storage nor source"
                )));
            };
            let outputs = builder.instances[producer.0].circuit.circuit().outputs();
            node = outputs[bit];
            instance = producer;
        }
        Err(IrError::PlugCycle(instance.0))
    }

    fn assemble(&self, builder: &CircuitBuilder) -> IrResult<AnnotatedCircuit> {
        let mut graph = GraphBuilder::with_capacity(self.size, 0);
        graph.ensure_size(self.size);

        for (i, inst) in builder.instances.iter().enumerate() {
            let id = InstanceId(i);
            for (from, to) in inst.circuit.circuit().edges() {
                let from = self.resolve(builder, id, from)?;
                let to = self.resolve(builder, id, to)?;
                if from == to {
                    return Err(IrError::SelfLoop(from));
                }
                graph.add_edge(from, to)?;
            }
        }

        let mut inputs = vec![];
        let mut input_groups = vec![];
        for &id in &builder.inputs {
            let inst = &builder.instances[id.0];
            for &node in inst.circuit.circuit().inputs() {
                inputs.push(self.resolve(builder, id, node)?);
            }
            input_groups.extend(lend_name(inst, inst.circuit.input_groups()));
        }

        let mut outputs = vec![];
        let mut output_groups = vec![];
        for &id in &builder.outputs {
            let inst = &builder.instances[id.0];
            for &node in inst.circuit.circuit().outputs() {
                outputs.push(self.resolve(builder, id, node)?);
            }
            output_groups.extend(lend_name(inst, inst.circuit.output_groups()));
        }

        let circuit = Circuit::from_builder(&graph, inputs, outputs)?;
        AnnotatedCircuit::new(circuit, input_groups, output_groups)
    }
}

/// A named single-group instance names its group after itself.
fn lend_name(inst: &Instance, groups: &[PortGroup]) -> Vec<PortGroup> {
    match (&inst.name, groups) {
        (Some(name), [group]) => vec![PortGroup::new(name.clone(), group.width)],
        _ => groups.to_vec(),
    }
}
