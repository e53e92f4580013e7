//! Bundled standard cells.
//!
//! Primitives are wired by hand; composites are written in the DSL and
//! compiled against the primitives at registry build time.

use redwire_ir::{AnnotatedCircuit, Circuit, NodeId, TwoWayGraph};

use crate::error::{HdlError, HdlResult};
use crate::options::HdlOptions;
use crate::registry::Registry;

/// DSL-defined cells in dependency order.
const COMPOSITES: &[(&str, &str)] = &[
    ("xor", include_str!("stdlib/xor.rw")),
    ("if", include_str!("stdlib/if.rw")),
    ("add1c", include_str!("stdlib/add1c.rw")),
    ("add2", include_str!("stdlib/add2.rw")),
];

/// Hand-wired cell description.
struct Cell {
    name: &'static str,
    size: usize,
    edges: &'static [(NodeId, NodeId)],
    inputs: &'static [NodeId],
    outputs: &'static [NodeId],
    input_widths: &'static [usize],
    output_widths: &'static [usize],
}

// A node with one predecessor inverts it; with two it is their NAND.
const PRIMITIVES: &[Cell] = &[
    Cell {
        name: "not",
        size: 2,
        edges: &[(0, 1)],
        inputs: &[0],
        outputs: &[1],
        input_widths: &[1],
        output_widths: &[1],
    },
    Cell {
        name: "nand",
        size: 3,
        edges: &[(0, 2), (1, 2)],
        inputs: &[0, 1],
        outputs: &[2],
        input_widths: &[1, 1],
        output_widths: &[1],
    },
    Cell {
        name: "and",
        size: 4,
        edges: &[(0, 2), (1, 2), (2, 3)],
        inputs: &[0, 1],
        outputs: &[3],
        input_widths: &[1, 1],
        output_widths: &[1],
    },
    Cell {
        name: "or",
        size: 5,
        edges: &[(0, 2), (1, 3), (2, 4), (3, 4)],
        inputs: &[0, 1],
        outputs: &[4],
        input_widths: &[1, 1],
        output_widths: &[1],
    },
    Cell {
        name: "nor",
        size: 6,
        edges: &[(0, 2), (1, 3), (2, 4), (3, 4), (4, 5)],
        inputs: &[0, 1],
        outputs: &[5],
        input_widths: &[1, 1],
        output_widths: &[1],
    },
    // Plumbing: bits pass straight through.
    Cell {
        name: "cat",
        size: 2,
        edges: &[],
        inputs: &[0, 1],
        outputs: &[0, 1],
        input_widths: &[1, 1],
        output_widths: &[2],
    },
    Cell {
        name: "lo",
        size: 2,
        edges: &[],
        inputs: &[0, 1],
        outputs: &[0],
        input_widths: &[2],
        output_widths: &[1],
    },
    Cell {
        name: "hi",
        size: 2,
        edges: &[],
        inputs: &[0, 1],
        outputs: &[1],
        input_widths: &[2],
        output_widths: &[1],
    },
];

impl Cell {
    fn build(&self) -> HdlResult<AnnotatedCircuit> {
        let graph = TwoWayGraph::from_edges(self.size, self.edges.iter().copied())?;
        let circuit = Circuit::new(graph, self.inputs.to_vec(), self.outputs.to_vec())?;
        Ok(AnnotatedCircuit::from_widths(
            circuit,
            self.input_widths,
            self.output_widths,
        )?)
    }
}

/// Build a registry holding every bundled cell.
pub fn build_default_registry() -> HdlResult<Registry> {
    let mut registry = Registry::new();
    register_stdlib(&mut registry)?;
    Ok(registry)
}

/// Add every bundled cell to `registry`.
pub fn register_stdlib(registry: &mut Registry) -> HdlResult<()> {
    let wrap = |name: &str| {
        let name = name.to_string();
        move |source: HdlError| HdlError::Stdlib {
            name,
            source: Box::new(source),
        }
    };

    for cell in PRIMITIVES {
        let circuit = cell.build().map_err(wrap(cell.name))?;
        registry.register(cell.name, circuit)?;
    }
    let options = HdlOptions::default();
    for &(name, source) in COMPOSITES {
        registry
            .register_source(name, source, &options)
            .map_err(wrap(name))?;
    }
    Ok(())
}

/// Names of the bundled cells.
pub fn stdlib_names() -> impl Iterator<Item = &'static str> {
    PRIMITIVES
        .iter()
        .map(|cell| cell.name)
        .chain(COMPOSITES.iter().map(|&(name, _)| name))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_registry_has_every_cell() {
        let registry = build_default_registry().unwrap();
        for name in stdlib_names() {
            assert!(registry.contains(name), "missing {name}");
        }
        assert_eq!(registry.len(), stdlib_names().count());
    }

    #[test]
    fn test_port_shapes() {
        let registry = build_default_registry().unwrap();
        let add2 = registry.get("add2").unwrap();
        assert_eq!(add2.input_groups().len(), 2);
        assert_eq!(add2.input_groups()[0].name, "a");
        assert_eq!(add2.total_input_width(), 4);
        assert_eq!(add2.output_groups()[0].name, "sum");
        assert_eq!(add2.total_output_width(), 2);

        let add1c = registry.get("add1c").unwrap();
        assert_eq!(add1c.total_input_width(), 3);
        assert_eq!(add1c.output_width(0), Some(2));
    }

    #[test]
    fn test_registering_twice_fails() {
        let mut registry = build_default_registry().unwrap();
        assert!(matches!(
            register_stdlib(&mut registry),
            Err(HdlError::DuplicateRegistration(_))
        ));
    }
}
