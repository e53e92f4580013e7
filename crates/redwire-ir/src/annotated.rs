//! Circuits with multi-bit port groups.

use serde::{Deserialize, Serialize};

use crate::circuit::Circuit;
use crate::error::{IrError, IrResult, PortSide};
use crate::graph::{NodeId, TwoWayGraph};

/// A named, contiguous slice of a circuit's flat input or output list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PortGroup {
    /// Group name.
    pub name: String,
    /// Number of bits in the group.
    pub width: usize,
}

impl PortGroup {
    /// Create a port group.
    pub fn new(name: impl Into<String>, width: usize) -> Self {
        Self {
            name: name.into(),
            width,
        }
    }
}

/// A [`Circuit`] whose ports are partitioned into multi-bit groups.
///
/// Group widths always add up to the flat port counts. Bit `i` of a group
/// is the `i`-th node of its slice (little endian for arithmetic cells).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "AnnotatedRepr")]
pub struct AnnotatedCircuit {
    circuit: Circuit,
    input_groups: Vec<PortGroup>,
    output_groups: Vec<PortGroup>,
}

impl AnnotatedCircuit {
    /// Attach port groups to a circuit.
    pub fn new(
        circuit: Circuit,
        input_groups: Vec<PortGroup>,
        output_groups: Vec<PortGroup>,
    ) -> IrResult<Self> {
        check_cover(PortSide::Input, &input_groups, circuit.num_inputs())?;
        check_cover(PortSide::Output, &output_groups, circuit.num_outputs())?;
        Ok(Self {
            circuit,
            input_groups,
            output_groups,
        })
    }

    /// Attach anonymous groups of the given widths.
    pub fn from_widths(
        circuit: Circuit,
        input_widths: &[usize],
        output_widths: &[usize],
    ) -> IrResult<Self> {
        let named = |prefix: &str, widths: &[usize]| -> Vec<PortGroup> {
            widths
                .iter()
                .enumerate()
                .map(|(i, &width)| PortGroup::new(format!("{prefix}{i}"), width))
                .collect()
        };
        Self::new(
            circuit,
            named("in", input_widths),
            named("out", output_widths),
        )
    }

    /// A pass-through circuit: every node is both an input and an output.
    pub fn identity(width: usize) -> Self {
        Self {
            circuit: Circuit::passthrough(width),
            input_groups: vec![PortGroup::new("in", width)],
            output_groups: vec![PortGroup::new("out", width)],
        }
    }

    /// Replace the circuit, keeping the port groups.
    pub fn with_circuit(&self, circuit: Circuit) -> IrResult<Self> {
        Self::new(
            circuit,
            self.input_groups.clone(),
            self.output_groups.clone(),
        )
    }

    /// Get the flat circuit.
    #[inline]
    pub fn circuit(&self) -> &Circuit {
        &self.circuit
    }

    /// Take the flat circuit.
    pub fn into_circuit(self) -> Circuit {
        self.circuit
    }

    /// Input groups in order.
    #[inline]
    pub fn input_groups(&self) -> &[PortGroup] {
        &self.input_groups
    }

    /// Output groups in order.
    #[inline]
    pub fn output_groups(&self) -> &[PortGroup] {
        &self.output_groups
    }

    /// Width of input group `group`.
    pub fn input_width(&self, group: usize) -> Option<usize> {
        self.input_groups.get(group).map(|g| g.width)
    }

    /// Width of output group `group`.
    pub fn output_width(&self, group: usize) -> Option<usize> {
        self.output_groups.get(group).map(|g| g.width)
    }

    /// Total number of input bits.
    #[inline]
    pub fn total_input_width(&self) -> usize {
        self.circuit.num_inputs()
    }

    /// Total number of output bits.
    #[inline]
    pub fn total_output_width(&self) -> usize {
        self.circuit.num_outputs()
    }

    /// Nodes of input group `group`, in bit order.
    pub fn multibit_input(&self, group: usize) -> IrResult<impl Iterator<Item = NodeId> + '_> {
        let range = slice_range(PortSide::Input, &self.input_groups, group)?;
        Ok(self.circuit.inputs()[range].iter().copied())
    }

    /// Nodes of output group `group`, in bit order.
    pub fn multibit_output(&self, group: usize) -> IrResult<impl Iterator<Item = NodeId> + '_> {
        let range = slice_range(PortSide::Output, &self.output_groups, group)?;
        Ok(self.circuit.outputs()[range].iter().copied())
    }
}

fn check_cover(side: PortSide, groups: &[PortGroup], actual: usize) -> IrResult<()> {
    let grouped: usize = groups.iter().map(|g| g.width).sum();
    if grouped != actual {
        return Err(IrError::PortSizeMismatch {
            side,
            grouped,
            actual,
        });
    }
    Ok(())
}

fn slice_range(
    side: PortSide,
    groups: &[PortGroup],
    group: usize,
) -> IrResult<std::ops::Range<usize>> {
    let Some(target) = groups.get(group) else {
        return Err(IrError::GroupOutOfRange {
            side,
            group,
            count: groups.len(),
        });
    };
    let offset: usize = groups[..group].iter().map(|g| g.width).sum();
    Ok(offset..offset + target.width)
}

#[derive(Deserialize)]
struct AnnotatedRepr {
    circuit: Circuit,
    input_groups: Vec<PortGroup>,
    output_groups: Vec<PortGroup>,
}

impl TryFrom<AnnotatedRepr> for AnnotatedCircuit {
    type Error = IrError;

    fn try_from(repr: AnnotatedRepr) -> IrResult<Self> {
        AnnotatedCircuit::new(repr.circuit, repr.input_groups, repr.output_groups)
    }
}
