//! Whole-circuit evaluation on top of the propagator.

use redwire_ir::{Circuit, DebugCircuit, NodeId};
use tracing::debug;

use crate::error::{SimError, SimResult};
use crate::propagate::Propagator;
use crate::tristate::TriState;

/// Evaluates one circuit for any number of input vectors.
#[derive(Debug, Clone, Copy)]
pub struct Simulator<'c> {
    circuit: &'c Circuit,
}

impl<'c> Simulator<'c> {
    /// Create a simulator for `circuit`.
    pub fn new(circuit: &'c Circuit) -> Self {
        Self { circuit }
    }

    /// Propagate with every input fixed to the given value.
    pub fn run(&self, inputs: &[bool]) -> SimResult<Simulation> {
        let expected = self.circuit.num_inputs();
        if inputs.len() != expected {
            return Err(SimError::InputCountMismatch {
                expected,
                got: inputs.len(),
            });
        }

        let mut propagator = Propagator::new(self.circuit);
        for (&node, &value) in self.circuit.inputs().iter().zip(inputs) {
            propagator.assign(node, value)?;
        }
        propagator.run()?;

        Ok(Simulation {
            states: propagator.into_states(),
            outputs: self.circuit.outputs().to_vec(),
        })
    }

    /// Propagate with every input left unknown.
    pub fn constants(&self) -> SimResult<Simulation> {
        let mut propagator = Propagator::new(self.circuit);
        propagator.run()?;
        let states = propagator.into_states();
        debug!(
            known = states.iter().filter(|s| s.is_known()).count(),
            nodes = states.len(),
            "constant propagation finished"
        );
        Ok(Simulation {
            states,
            outputs: self.circuit.outputs().to_vec(),
        })
    }
}

/// Node states after one propagation run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Simulation {
    states: Vec<TriState>,
    outputs: Vec<NodeId>,
}

impl Simulation {
    /// State of a single node.
    #[inline]
    pub fn state(&self, node: NodeId) -> TriState {
        self.states[node]
    }

    /// State of every node.
    pub fn states(&self) -> &[TriState] {
        &self.states
    }

    /// Take the node states.
    pub fn into_states(self) -> Vec<TriState> {
        self.states
    }

    /// Output values in output order; every output must be resolved.
    pub fn outputs(&self) -> SimResult<Vec<bool>> {
        self.outputs
            .iter()
            .enumerate()
            .map(|(index, &node)| {
                self.states[node]
                    .to_bool()
                    .ok_or(SimError::UnresolvedOutput { index, node })
            })
            .collect()
    }

    /// Values of a named instance's output bits.
    ///
    /// Returns `None` if no instance has that name. Bits trimmed away read
    /// as [`TriState::Unknown`].
    pub fn probe(&self, debug: &DebugCircuit, name: &str) -> Option<Vec<TriState>> {
        let bits = debug.probe(name)?;
        Some(
            bits.iter()
                .map(|bit| bit.map_or(TriState::Unknown, |node| self.states[node]))
                .collect(),
        )
    }
}

/// Evaluate `circuit` on `inputs` and return its outputs.
pub fn simulate(circuit: &Circuit, inputs: &[bool]) -> SimResult<Vec<bool>> {
    Simulator::new(circuit).run(inputs)?.outputs()
}

/// Node states derivable without knowing any input.
pub fn constant_states(circuit: &Circuit) -> SimResult<Vec<TriState>> {
    Ok(Simulator::new(circuit).constants()?.into_states())
}
