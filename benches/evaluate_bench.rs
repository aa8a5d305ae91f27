use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use ragscore::{build_evaluator, RagScoreConfig};

const QUESTION: &str = "What were the main causes of the French Revolution?";

const ANSWER: &str = "The French Revolution was driven by a fiscal crisis after costly wars. \
    Bread prices rose sharply after poor harvests. \
    Enlightenment ideas questioned the authority of the monarchy. \
    The Estates-General met in 1789 for the first time since 1614.";

const CHUNKS: [&str; 5] = [
    "France faced a severe fiscal crisis in the 1780s, worsened by the American war.",
    "Poor harvests in 1788 caused bread prices to soar across Paris and the provinces.",
    "Enlightenment philosophers challenged absolute monarchy and clerical privilege.",
    "Louis XVI summoned the Estates-General in May 1789, the first meeting since 1614.",
    "The storming of the Bastille on 14 July 1789 became a symbol of the revolution.",
];

fn config_for(tier: &str, parallel: bool, cache: bool) -> RagScoreConfig {
    let mut cfg = RagScoreConfig::default();
    cfg.semantic.tier = tier.into();
    cfg.evaluation.parallel = parallel;
    cfg.evaluation.cache_embeddings = cache;
    cfg
}

/// One full evaluation per iteration, across stub tiers.
fn bench_evaluate_tiers(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("evaluate_tiers");
    group.throughput(Throughput::Bytes(
        (ANSWER.len() + CHUNKS.iter().map(|c| c.len()).sum::<usize>()) as u64,
    ));

    for tier in ["fast", "balanced", "accurate"] {
        let evaluator = build_evaluator(&config_for(tier, true, true)).unwrap();
        group.bench_function(tier, |b| {
            b.iter(|| {
                runtime
                    .block_on(evaluator.evaluate(
                        black_box(QUESTION),
                        black_box(ANSWER),
                        black_box(&CHUNKS[..]),
                    ))
                    .unwrap()
            });
        });
    }

    group.finish();
}

/// Concurrency and request-scoped caching switches.
fn bench_evaluate_modes(c: &mut Criterion) {
    let runtime = tokio::runtime::Runtime::new().unwrap();
    let mut group = c.benchmark_group("evaluate_modes");

    for (name, parallel, cache) in [
        ("parallel_cached", true, true),
        ("parallel_uncached", true, false),
        ("sequential_cached", false, true),
    ] {
        let evaluator = build_evaluator(&config_for("balanced", parallel, cache)).unwrap();
        group.bench_function(name, |b| {
            b.iter(|| {
                runtime
                    .block_on(evaluator.evaluate(
                        black_box(QUESTION),
                        black_box(ANSWER),
                        black_box(&CHUNKS[..]),
                    ))
                    .unwrap()
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_evaluate_tiers, bench_evaluate_modes);
criterion_main!(benches);
