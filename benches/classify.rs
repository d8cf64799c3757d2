use criterion::{BenchmarkId, Criterion, Throughput, black_box, criterion_group, criterion_main};
use proxigrid::{
    BoundingBox, CategoryPolicy, ClassifierConfig, FeaturePoint, FeatureSets, classify,
    classify_parallel,
};

fn scatter(n: usize, bounds: &BoundingBox, seed: f64) -> Vec<FeaturePoint> {
    (0..n)
        .map(|i| {
            let t = i as f64 * seed;
            FeaturePoint::new(
                bounds.south + (t % bounds.height()),
                bounds.west + ((t * 1.7) % bounds.width()),
            )
        })
        .collect()
}

fn config(band_prefilter: bool) -> ClassifierConfig {
    ClassifierConfig::builder()
        .bounds(BoundingBox::new(51.308, -0.528, 51.708, 0.272))
        .cell_size(0.005)
        .tolerance("stations", 0.01)
        .tolerance("rivers", 0.005)
        .tolerance("pedestrian", 0.002)
        .policy(CategoryPolicy::three("stations", "rivers", "pedestrian"))
        .band_prefilter(band_prefilter)
        .build()
        .unwrap()
}

fn bench_band_prefilter(c: &mut Criterion) {
    let mut group = c.benchmark_group("band_prefilter");
    group.sample_size(10);

    for num_points in [100, 1000, 10000].iter() {
        let bounds = config(true).bounds;
        let features = FeatureSets::new()
            .with("stations", scatter(*num_points, &bounds, 0.0137))
            .with("rivers", scatter(*num_points, &bounds, 0.0071))
            .with("pedestrian", scatter(*num_points, &bounds, 0.0193));
        group.throughput(Throughput::Elements(*num_points as u64 * 3));

        for enabled in [true, false] {
            let config = config(enabled);
            let label = if enabled { "banded" } else { "full_scan" };
            group.bench_with_input(BenchmarkId::new(label, num_points), &features, |b, f| {
                b.iter(|| classify(black_box(&config), f).unwrap());
            });
        }
    }

    group.finish();
}

fn bench_parallel(c: &mut Criterion) {
    let mut group = c.benchmark_group("rows");
    group.sample_size(10);

    let config = config(true);
    let features = FeatureSets::new()
        .with("stations", scatter(5000, &config.bounds, 0.0137))
        .with("rivers", scatter(5000, &config.bounds, 0.0071))
        .with("pedestrian", scatter(5000, &config.bounds, 0.0193));

    group.bench_function("sequential", |b| {
        b.iter(|| classify(black_box(&config), &features).unwrap());
    });
    group.bench_function("parallel", |b| {
        b.iter(|| classify_parallel(black_box(&config), &features).unwrap());
    });

    group.finish();
}

criterion_group!(benches, bench_band_prefilter, bench_parallel);
criterion_main!(benches);
