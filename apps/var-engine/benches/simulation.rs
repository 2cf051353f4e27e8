//! Simulation Benchmark
//!
//! Measures the per-asset hot path (Gaussian draws, sort, rank lookup) and a
//! full multi-asset request through the engine, sequential and fanned out.

use std::hint::black_box;

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use rand::SeedableRng;
use rand::rngs::StdRng;

use var_engine::config::EngineConfig;
use var_engine::engine::VarEngine;
use var_engine::engine::quantile;
use var_engine::engine::simulation::{AssetParams, SampleCount, simulate};
use var_engine::models::{AssetParameter, RiskRequest, Signal, TransactionType};

const ASSETS: usize = 16;

fn request(simulation_count: i64) -> RiskRequest {
    RiskRequest::new(
        simulation_count,
        TransactionType::Buy,
        vec![Signal::Active; ASSETS],
        vec![Signal::Inactive; ASSETS],
        (0..ASSETS)
            .map(|i| AssetParameter::from(0.001 * i as f64))
            .collect(),
        vec![AssetParameter::from(0.02); ASSETS],
    )
    .unwrap()
}

fn bench_single_asset(c: &mut Criterion) {
    let mut group = c.benchmark_group("single_asset");
    let params = AssetParams {
        index: 0,
        mean: 0.0005,
        std_dev: 0.02,
    };

    for n in [1_000usize, 10_000, 100_000] {
        let count = SampleCount::new(n as i64, usize::MAX).unwrap();
        group.throughput(Throughput::Elements(n as u64));
        group.bench_with_input(BenchmarkId::from_parameter(n), &count, |b, count| {
            let mut rng = StdRng::seed_from_u64(7);
            b.iter(|| {
                let samples = simulate(&params, *count, &mut rng).unwrap();
                black_box(quantile::extract(samples))
            });
        });
    }

    group.finish();
}

fn bench_request(c: &mut Criterion) {
    let mut group = c.benchmark_group("request_16_assets");
    let req = request(10_000);

    for (label, min_parallel_assets) in [("sequential", usize::MAX), ("parallel", 1)] {
        let engine = VarEngine::new(EngineConfig {
            min_parallel_assets,
            seed: Some(42),
            ..EngineConfig::default()
        })
        .unwrap();

        group.bench_function(label, |b| b.iter(|| black_box(engine.run(&req).unwrap())));
    }

    group.finish();
}

criterion_group!(benches, bench_single_asset, bench_request);
criterion_main!(benches);
