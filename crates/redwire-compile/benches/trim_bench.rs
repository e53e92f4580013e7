//! Benchmarks for the trim optimizer
//!
//! Run with: cargo bench -p redwire-compile

use criterion::{BenchmarkId, Criterion, black_box, criterion_group, criterion_main};
use redwire_compile::{TrimOptions, trim, trim_with};
use redwire_ir::{Circuit, GraphBuilder, NodeId};

fn nand(graph: &mut GraphBuilder, a: NodeId, b: NodeId) -> NodeId {
    let out = graph.add_node();
    graph.add_edge(a, out).unwrap();
    graph.add_edge(b, out).unwrap();
    out
}

fn not(graph: &mut GraphBuilder, a: NodeId) -> NodeId {
    let out = graph.add_node();
    graph.add_edge(a, out).unwrap();
    out
}

/// Ripple-carry adder of NAND full adders.
///
/// The carry-in is a bare FALSE source and every carry passes through a
/// double inversion, so all three passes have work to do.
fn adder_chain(bits: usize) -> Circuit {
    let mut graph = GraphBuilder::new();
    let a: Vec<_> = (0..bits).map(|_| graph.add_node()).collect();
    let b: Vec<_> = (0..bits).map(|_| graph.add_node()).collect();
    let mut carry = graph.add_node();
    let mut outputs = Vec::with_capacity(bits + 1);

    for i in 0..bits {
        let n1 = nand(&mut graph, a[i], b[i]);
        let n2 = nand(&mut graph, a[i], n1);
        let n3 = nand(&mut graph, b[i], n1);
        let half = nand(&mut graph, n2, n3);
        let n4 = nand(&mut graph, half, carry);
        let n5 = nand(&mut graph, half, n4);
        let n6 = nand(&mut graph, carry, n4);
        outputs.push(nand(&mut graph, n5, n6));
        let cout = nand(&mut graph, n4, n1);
        let inverted = not(&mut graph, cout);
        carry = not(&mut graph, inverted);
    }
    outputs.push(carry);

    let inputs = a.into_iter().chain(b).collect();
    Circuit::from_builder(&graph, inputs, outputs).unwrap()
}

fn bench_trim(c: &mut Criterion) {
    let mut group = c.benchmark_group("trim");

    for bits in &[8, 32, 128, 512] {
        let circuit = adder_chain(*bits);
        group.bench_with_input(BenchmarkId::new("adder_chain", bits), &circuit, |b, circuit| {
            b.iter(|| trim(black_box(circuit)).unwrap());
        });
    }

    group.finish();
}

fn bench_passes(c: &mut Criterion) {
    let mut group = c.benchmark_group("trim_passes");
    let circuit = adder_chain(128);

    let only = |prune, fold, forward| TrimOptions {
        prune_unreachable: prune,
        fold_constants: fold,
        forward_edges: forward,
    };
    for (name, options) in [
        ("renumber_only", TrimOptions::none()),
        ("prune", only(true, false, false)),
        ("fold", only(false, true, false)),
        ("forward", only(false, false, true)),
    ] {
        group.bench_function(name, |b| {
            b.iter(|| trim_with(black_box(&circuit), &options).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_trim, bench_passes);
criterion_main!(benches);
