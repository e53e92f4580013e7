//! Integration tests for the tri-state simulator.

use proptest::prelude::*;
use redwire_ir::{Circuit, TwoWayGraph};
use redwire_sim::{SimError, Simulator, TriState, constant_states, simulate};

/// `and` built from a NAND followed by an inverter.
fn and_gate() -> Circuit {
    let graph = TwoWayGraph::from_edges(4, [(0, 2), (1, 2), (2, 3)]).unwrap();
    Circuit::new(graph, vec![0, 1], vec![3]).unwrap()
}

#[test]
fn test_and_truth_table() {
    let circuit = and_gate();
    for (a, b) in [(false, false), (false, true), (true, false), (true, true)] {
        assert_eq!(simulate(&circuit, &[a, b]).unwrap(), vec![a && b]);
    }
}

#[test]
fn test_input_count_mismatch() {
    let circuit = and_gate();
    assert!(matches!(
        simulate(&circuit, &[true]),
        Err(SimError::InputCountMismatch {
            expected: 2,
            got: 1
        })
    ));
}

#[test]
fn test_unconnected_output_is_false() {
    let graph = TwoWayGraph::from_edges(3, [(0, 1)]).unwrap();
    let circuit = Circuit::new(graph, vec![0], vec![1, 2]).unwrap();
    assert_eq!(simulate(&circuit, &[false]).unwrap(), vec![true, false]);
}

#[test]
fn test_constants_leave_input_logic_unknown() {
    let states = constant_states(&and_gate()).unwrap();
    assert!(states.iter().all(|s| *s == TriState::Unknown));

    let sim = Simulator::new(&and_gate()).constants().unwrap();
    assert!(matches!(
        sim.outputs(),
        Err(SimError::UnresolvedOutput { index: 0, node: 3 })
    ));
}

/// Reference evaluation in id order; edges only go from smaller to larger ids.
fn evaluate(size: usize, edges: &[(usize, usize)], inputs: &[bool]) -> Vec<bool> {
    let mut values = vec![false; size];
    for node in 0..size {
        if node < inputs.len() {
            values[node] = inputs[node];
            continue;
        }
        values[node] = edges
            .iter()
            .filter(|&&(_, to)| to == node)
            .any(|&(from, _)| !values[from]);
    }
    values
}

fn arb_dag() -> impl Strategy<Value = (usize, usize, Vec<(usize, usize)>)> {
    (2usize..12, 1usize..5).prop_flat_map(|(size, inputs)| {
        let inputs = inputs.min(size);
        (
            Just(size),
            Just(inputs),
            prop::collection::vec((0..size, 0..size), 0..size * 3),
        )
            .prop_map(|(size, inputs, raw)| {
                let edges = raw
                    .into_iter()
                    .map(|(a, b)| (a.min(b), a.max(b)))
                    .filter(|&(a, b)| a != b && b >= inputs)
                    .collect();
                (size, inputs, edges)
            })
    })
}

proptest! {
    #[test]
    fn propagation_matches_reference((size, inputs, edges) in arb_dag(), seed: u32) {
        let graph = TwoWayGraph::from_edges(size, edges.iter().copied()).unwrap();
        let circuit = Circuit::new(graph, (0..inputs).collect(), (0..size).collect()).unwrap();
        let values: Vec<bool> = (0..inputs).map(|i| seed >> i & 1 == 1).collect();

        let expected = evaluate(size, &edges, &values);
        prop_assert_eq!(simulate(&circuit, &values).unwrap(), expected);
    }
}
