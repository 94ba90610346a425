use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use region_gen::{ComposerConfig, GenerationContext, OuterShape, RegionComposer};

fn bench_compose(c: &mut Criterion) {
    let mut group = c.benchmark_group("compose");
    let ctx = GenerationContext::default();

    for shape in [OuterShape::Square, OuterShape::Round, OuterShape::Fill] {
        let mut config = ComposerConfig {
            outer_shape: shape,
            ..ComposerConfig::default()
        };
        config.quarry.enabled = true;
        let composer = RegionComposer::new(&config);

        for size in [100u32, 200, 250, 325] {
            let id = BenchmarkId::new(format!("{shape:?}"), size);
            group.bench_with_input(id, &size, |b, &size| {
                b.iter(|| composer.compose(size, size, 42, &ctx))
            });
        }
    }

    group.finish();
}

criterion_group!(compose_benches, bench_compose);
criterion_main!(compose_benches);
