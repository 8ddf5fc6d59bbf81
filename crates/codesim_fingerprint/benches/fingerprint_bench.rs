use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};

use codesim_fingerprint::{rolling_kgram_hashes, FingerprintConfig, WinnowFilter};

fn synthetic_tokens(n: usize) -> Vec<String> {
    (0..n)
        .map(|i| match i % 7 {
            0 => "if".to_string(),
            1 => "(".to_string(),
            2 => format!("var_{}", i % 101),
            3 => "<".to_string(),
            4 => format!("{}", i % 13),
            5 => ")".to_string(),
            _ => ";".to_string(),
        })
        .collect()
}

fn bench_rolling_hash(c: &mut Criterion) {
    let cfg = FingerprintConfig::default();
    let mut group = c.benchmark_group("rolling_kgram_hashes");
    for n in [1_000usize, 10_000, 100_000] {
        let tokens = synthetic_tokens(n);
        group.bench_with_input(BenchmarkId::from_parameter(n), &tokens, |b, tokens| {
            b.iter(|| rolling_kgram_hashes(tokens, cfg.kgram_length, cfg.seed));
        });
    }
    group.finish();
}

fn bench_winnow(c: &mut Criterion) {
    let cfg = FingerprintConfig::default();
    let tokens = synthetic_tokens(100_000);
    let hashes = rolling_kgram_hashes(&tokens, cfg.kgram_length, cfg.seed);
    let filter = WinnowFilter::new(cfg.kgram_length, cfg.kgrams_in_window);

    c.bench_function("winnow_100k", |b| b.iter(|| filter.select(&hashes)));
}

criterion_group!(benches, bench_rolling_hash, bench_winnow);
criterion_main!(benches);
