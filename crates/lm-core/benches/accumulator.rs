//! Criterion benchmarks for the aggregate log-posterior accumulator.

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use lm_config::{ComplianceGroup, ComplianceTrial};
use lm_core::models::NoncomplianceModel;
use lm_core::{LogDensity, LogPosterior, UnconstrainedPosterior};

/// Synthetic grouped trial with a fixed mix of determined and ambiguous
/// records.
fn synthetic_trial(groups: usize) -> ComplianceTrial {
    let records = (0..groups)
        .map(|i| {
            let (assigned, received) = match i % 3 {
                0 => (true, true),
                1 => (true, false),
                _ => (false, false),
            };
            ComplianceGroup {
                assigned,
                received,
                count: 40 + (i as u64 % 17),
                successes: 20 + (i as u64 % 13),
            }
        })
        .collect();
    ComplianceTrial {
        description: None,
        groups: records,
    }
}

fn bench_accumulator(c: &mut Criterion) {
    let mut group = c.benchmark_group("accumulator");
    let params = [0.6, 0.9, 0.8, 0.7];

    for size in [3usize, 30, 300] {
        let model =
            NoncomplianceModel::new(synthetic_trial(size), NoncomplianceModel::default_priors())
                .unwrap();
        let post = LogPosterior::new(model).unwrap();

        group.bench_with_input(BenchmarkId::new("log_posterior", size), &post, |b, post| {
            b.iter(|| black_box(post.log_posterior(black_box(&params))));
        });
    }

    let model =
        NoncomplianceModel::new(synthetic_trial(30), NoncomplianceModel::default_priors()).unwrap();
    let unconstrained = UnconstrainedPosterior::new(LogPosterior::new(model).unwrap());
    let at = unconstrained.unconstrain(&params);
    group.bench_function("unconstrained_log_density", |b| {
        b.iter(|| black_box(unconstrained.log_density(black_box(&at))));
    });

    group.finish();
}

criterion_group!(benches, bench_accumulator);
criterion_main!(benches);
