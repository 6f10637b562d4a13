//! Benchmarks for panel packing.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use panelcut_core::solver::{Algorithm, Solver};
use panelcut_packer::{pack, pack_optimized, CutlistSolver, PackOptions, PartSpec, StockSheetSpec};

fn packer_benchmark(c: &mut Criterion) {
    let uniform = vec![PartSpec::new("P", 500.0, 300.0).with_quantity(200)];
    let sheets = vec![StockSheetSpec::new("S", 2750.0, 1830.0).with_kerf(4.0)];

    c.bench_function("guillotine_200_uniform", |b| {
        b.iter(|| {
            let result = pack(black_box(&uniform), black_box(&sheets), &PackOptions::default());
            black_box(result)
        })
    });

    let legacy = PackOptions::default().with_algorithm(Algorithm::Legacy);
    c.bench_function("legacy_200_uniform", |b| {
        b.iter(|| {
            let result = pack(black_box(&uniform), black_box(&sheets), &legacy);
            black_box(result)
        })
    });

    let mixed: Vec<PartSpec> = (0..60)
        .map(|i| {
            let length = 200.0 + ((i * 37) % 900) as f64;
            let width = 100.0 + ((i * 53) % 600) as f64;
            PartSpec::new(format!("P{}", i), length, width).with_quantity(1 + i % 3)
        })
        .collect();

    c.bench_function("multi_strategy_mixed", |b| {
        b.iter(|| {
            let result = pack_optimized(black_box(&mixed), black_box(&sheets), &PackOptions::default());
            black_box(result)
        })
    });

    let solver = CutlistSolver::default_config();
    c.bench_function("solver_default_mixed", |b| {
        b.iter(|| {
            let result = solver.solve(black_box(&mixed), black_box(&sheets));
            black_box(result)
        })
    });
}

criterion_group!(benches, packer_benchmark);
criterion_main!(benches);
