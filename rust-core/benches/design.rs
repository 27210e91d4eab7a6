use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use fir_tuner::{design, DesignParameters, FilterType, TunerState};

fn bench_design(c: &mut Criterion) {
    let mut group = c.benchmark_group("design");

    for n in [7u32, 10, 12] {
        let params = DesignParameters::default()
            .with_filter_type(FilterType::Bandpass)
            .unwrap()
            .with_tap_count_exponent(n)
            .unwrap();

        group.bench_with_input(BenchmarkId::new("pure", 1usize << n), &params, |b, p| {
            b.iter(|| design(black_box(p)).unwrap())
        });

        let mut tuner = TunerState::new(params.clone()).unwrap();
        group.bench_function(BenchmarkId::new("recompute", 1usize << n), |b| {
            b.iter(|| tuner.recompute().unwrap())
        });
    }

    group.finish();
}

criterion_group!(benches, bench_design);
criterion_main!(benches);
