//! Fixpoint benchmarks.
//!
//! These benchmarks measure the labeling algorithms on random transition systems
//! and on long chains, which force the maximum number of fixpoint iterations.
//!
//! Run with:
//! ```bash
//! cargo bench --bench fixpoint
//! ```

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rand::prelude::*;
use rand_chacha::ChaCha8Rng;

use ctl_rs::ctl::CtlFormula;
use ctl_rs::transition::{TransitionSystem, TransitionSystemBuilder};

// ============================================================================
// Helper: Random Kripke structure
// ============================================================================

/// Build a random system with `num_states` states, on average `degree` successors per state,
/// and propositions `p` and `q` each holding with probability 1/2.
fn build_random_system(num_states: u32, degree: u32, seed: u64) -> TransitionSystem {
    let mut rng = ChaCha8Rng::seed_from_u64(seed);

    let mut builder = TransitionSystemBuilder::new().add_states(0..num_states);
    for s in 0..num_states {
        for _ in 0..rng.random_range(0..=2 * degree) {
            builder = builder.add_transition(s, rng.random_range(0..num_states));
        }
        if rng.random_bool(0.5) {
            builder = builder.add_label(s, "p");
        }
        if rng.random_bool(0.5) {
            builder = builder.add_label(s, "q");
        }
    }
    builder.build().unwrap()
}

/// Build a chain `0 -> 1 -> ... -> n-1 -> n-1` with `goal` at the end and `p` everywhere else.
fn build_chain(n: u32) -> TransitionSystem {
    let mut builder = TransitionSystemBuilder::new().add_states(0..n);
    for s in 0..n - 1 {
        builder = builder.add_transition(s, s + 1).add_label(s, "p");
    }
    builder.add_transition(n - 1, n - 1).add_label(n - 1, "goal").build().unwrap()
}

// ============================================================================
// Benchmark: Temporal operators on random systems
// ============================================================================

fn bench_random_operators(c: &mut Criterion) {
    let mut group = c.benchmark_group("ctl/random_operators");

    let ts = build_random_system(1000, 2, 42);
    let p = CtlFormula::atom("p");
    let q = CtlFormula::atom("q");

    let formulas = [
        ("EX", p.clone().ex()),
        ("EU", p.clone().eu(q.clone())),
        ("EG", p.clone().eg()),
        ("AU", p.clone().au(q.clone())),
        ("AG", p.clone().ag()),
        ("nested", p.clone().implies(q.clone().af()).ag()),
    ];

    group.throughput(Throughput::Elements(ts.num_states() as u64));
    for (name, formula) in formulas.iter() {
        group.bench_with_input(BenchmarkId::new("n=1000", name), formula, |b, formula| {
            b.iter(|| formula.label(&ts));
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Chain length scaling (worst case for iteration count)
// ============================================================================

fn bench_chain_scaling(c: &mut Criterion) {
    let mut group = c.benchmark_group("ctl/chain_scaling");
    group.sample_size(10);

    for n in [100, 200, 400, 800] {
        let ts = build_chain(n);
        let eu = CtlFormula::atom("p").eu(CtlFormula::atom("goal"));
        let au = CtlFormula::atom("p").au(CtlFormula::atom("goal"));

        group.bench_with_input(BenchmarkId::new("EU", n), &ts, |b, ts| {
            b.iter(|| eu.label(ts));
        });
        group.bench_with_input(BenchmarkId::new("AU", n), &ts, |b, ts| {
            b.iter(|| au.label(ts));
        });
    }

    group.finish();
}

// ============================================================================
// Benchmark: Construction of adjacency indices
// ============================================================================

fn bench_construction(c: &mut Criterion) {
    let mut group = c.benchmark_group("ctl/construction");

    for n in [1000, 10000] {
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::new("random", n), &n, |b, &n| {
            b.iter(|| build_random_system(n, 3, 7));
        });
    }

    group.finish();
}

criterion_group!(benches, bench_random_operators, bench_chain_scaling, bench_construction);
criterion_main!(benches);
