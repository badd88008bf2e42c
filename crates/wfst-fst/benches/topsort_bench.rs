// Criterion benchmarks for wfst-fst.
//
// Graphs are generated deterministically, so runs are comparable.
//
// Run:
//   cargo bench -p wfst-fst

use criterion::{BatchSize, Criterion, criterion_group, criterion_main};
use wfst_fst::format::{read_fst, to_bytes};
use wfst_fst::{Arc, MutableFst, StateId, VectorFst, top_sort};
use wfst_weight::{TropicalWeight, Weight};

// ---------------------------------------------------------------------------
// Graph generation
// ---------------------------------------------------------------------------

/// Layered DAG with its state ids reversed, so every arc points backwards
/// and the sort has to renumber every state.
fn reversed_dag(num_states: u32, fanout: u32) -> VectorFst<TropicalWeight> {
    let mut fst = VectorFst::with_capacity(num_states as usize);
    for _ in 0..num_states {
        fst.add_state();
    }
    let id = |k: u32| -> StateId { num_states - 1 - k };
    fst.set_start(id(0)).unwrap();
    fst.set_final(id(num_states - 1), TropicalWeight::one())
        .unwrap();
    for k in 0..num_states {
        for j in 1..=fanout {
            let target = k + j * j;
            if target < num_states {
                fst.add_arc(id(k), Arc::new(j, j, TropicalWeight::new(j as f32), id(target)))
                    .unwrap();
            }
        }
    }
    fst
}

/// Simple cycle through every state.
fn ring(num_states: u32) -> VectorFst<TropicalWeight> {
    let mut fst = VectorFst::with_capacity(num_states as usize);
    for _ in 0..num_states {
        fst.add_state();
    }
    fst.set_start(0).unwrap();
    for s in 0..num_states {
        fst.add_arc(s, Arc::new(1, 1, TropicalWeight::one(), (s + 1) % num_states))
            .unwrap();
    }
    fst
}

// ---------------------------------------------------------------------------
// Benchmarks
// ---------------------------------------------------------------------------

fn bench_top_sort(c: &mut Criterion) {
    let dag = reversed_dag(100_000, 4);
    c.bench_function("top_sort reversed dag 100k", |b| {
        b.iter_batched(
            || dag.clone(),
            |mut fst| top_sort(&mut fst).unwrap(),
            BatchSize::LargeInput,
        )
    });

    let mut sorted = dag.clone();
    top_sort(&mut sorted).unwrap();
    c.bench_function("top_sort already sorted 100k", |b| {
        b.iter_batched(
            || sorted.clone(),
            |mut fst| top_sort(&mut fst).unwrap(),
            BatchSize::LargeInput,
        )
    });

    let cyclic = ring(100_000);
    c.bench_function("top_sort ring 100k", |b| {
        b.iter_batched(
            || cyclic.clone(),
            |mut fst| top_sort(&mut fst).unwrap(),
            BatchSize::LargeInput,
        )
    });
}

fn bench_serialization(c: &mut Criterion) {
    let dag = reversed_dag(100_000, 4);
    let bytes = to_bytes(&dag).unwrap();

    c.bench_function("write 100k", |b| b.iter(|| to_bytes(&dag).unwrap()));
    c.bench_function("read 100k", |b| {
        b.iter(|| read_fst::<TropicalWeight>(&bytes).unwrap())
    });
}

criterion_group!(benches, bench_top_sort, bench_serialization);
criterion_main!(benches);
