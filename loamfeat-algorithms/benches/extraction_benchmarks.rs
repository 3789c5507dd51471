//! Benchmarks for end-to-end feature extraction and its heaviest stages

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use loamfeat_algorithms::{
    classify_features, compute_curvatures, mark_unreliable_points, partition_by_ring,
    FeatureExtractor,
};
use loamfeat_core::{ExtractionConfig, PointCloud, RingPoint};

/// A 16-ring sweep of a box room with a pillar, in acquisition order
fn generate_sweep(steps: usize) -> PointCloud<RingPoint> {
    let mut points = Vec::with_capacity(steps * 16);
    for step in 0..steps {
        let theta = 2.0 * std::f32::consts::PI * step as f32 / steps as f32;
        let (sin, cos) = theta.sin_cos();
        let mut range = (8.0 / cos.abs()).min(6.0 / sin.abs());
        if (0.5..0.55).contains(&theta) {
            range = 3.0;
        }
        for ring in 0..16u32 {
            let z = (ring as f32 - 8.0) * 0.02 * range;
            points.push(RingPoint::new(range * cos, range * sin, z, ring));
        }
    }
    PointCloud::from_points(points)
}

fn bench_extraction(c: &mut Criterion) {
    let steps = [900, 1800, 3600];
    let extractor = FeatureExtractor::new(ExtractionConfig::default()).unwrap();

    let mut group = c.benchmark_group("extraction");

    for &step_count in &steps {
        let scan = generate_sweep(step_count);

        group.bench_with_input(
            BenchmarkId::new("extract", format!("{}pts", scan.len())),
            &scan,
            |b, scan| {
                b.iter(|| {
                    let features = extractor.extract(black_box(scan)).unwrap();
                    black_box(features);
                });
            },
        );
    }

    group.finish();
}

fn bench_stages(c: &mut Criterion) {
    let config = ExtractionConfig::default();
    let thresholds = config.thresholds;
    let scan = generate_sweep(1800);
    let lines = partition_by_ring(&scan, config.ring_count).unwrap();
    let curvatures = compute_curvatures(&lines, thresholds.neighbor_margin).unwrap();
    let mask = mark_unreliable_points(&lines.cloud, &thresholds);

    let mut group = c.benchmark_group("stages");

    group.bench_function("partition", |b| {
        b.iter(|| black_box(partition_by_ring(black_box(&scan), config.ring_count).unwrap()));
    });
    group.bench_function("curvature", |b| {
        b.iter(|| {
            let curvatures = compute_curvatures(black_box(&lines), thresholds.neighbor_margin);
            black_box(curvatures.unwrap())
        });
    });
    group.bench_function("occlusion", |b| {
        b.iter(|| black_box(mark_unreliable_points(black_box(&lines.cloud), &thresholds)));
    });
    group.bench_function("classification", |b| {
        b.iter(|| {
            let result =
                classify_features(&lines.cloud, &curvatures, mask.clone(), &thresholds).unwrap();
            black_box(result);
        });
    });

    group.finish();
}

criterion_group!(benches, bench_extraction, bench_stages);
criterion_main!(benches);
