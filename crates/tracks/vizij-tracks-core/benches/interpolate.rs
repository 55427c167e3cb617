use std::hint::black_box;

use criterion::{criterion_group, criterion_main, Criterion};
use vizij_tracks_core::{
    FloatPointDefinition, ProviderContext, QuaternionPointDefinition, UpdatableProviderRegistry,
    Vector3PointDefinition,
};

fn sweep<T>(n: usize, mut f: impl FnMut(f32) -> T) {
    for i in 0..=n {
        black_box(f(i as f32 / n as f32));
    }
}

fn bench_float(c: &mut Criterion) {
    let ctx = ProviderContext::new();
    let def = FloatPointDefinition::from_json_str(
        r#"[[0.0, 0.0], [1.0, 1.0, "easeInOutSine"]]"#,
        &ctx,
        None,
    )
    .expect("float definition");

    let mut group = c.benchmark_group("float");
    for n in [1_000usize, 10_000] {
        group.bench_function(format!("float_{n}"), |b| {
            b.iter(|| sweep(n, |t| def.interpolate(t, &ctx)))
        });
    }
    group.finish();
}

fn bench_vector3(c: &mut Criterion) {
    let mut ctx = ProviderContext::new();
    ctx.set("baseHeadPosition", vec![0.0, 1.5, 0.0], false);
    let keys: Vec<String> = (0..64)
        .map(|i| format!("[{i}, {}, 0, {}, \"splineCatmullRom\"]", i % 3, i as f32 / 63.0))
        .collect();
    let json = format!("[\"baseHeadPosition\", {}]", keys.join(", "));
    let def = Vector3PointDefinition::from_json_str(&json, &ctx, None).expect("vector3 definition");

    c.bench_function("vector3_catmull_rom_64_keys", |b| {
        b.iter(|| sweep(1_000, |t| def.interpolate(t, &ctx)))
    });
}

fn bench_quaternion_updatable(c: &mut Criterion) {
    let ctx = ProviderContext::new();
    let registry = UpdatableProviderRegistry::new();
    registry.register("baseHeadRotation", |_: &ProviderContext| {
        vec![0.0, 0.38268343, 0.0, 0.9238795]
    });
    let def = QuaternionPointDefinition::from_json_str(
        r#"["baseHeadRotation", [0, 0, 0, 0], [0, 90, 0, 1, "easeOutQuad"]]"#,
        &ctx,
        Some(&registry),
    )
    .expect("quaternion definition");

    c.bench_function("quaternion_updatable_base", |b| {
        b.iter(|| sweep(1_000, |t| def.interpolate(t, &ctx)))
    });
}

criterion_group!(benches, bench_float, bench_vector3, bench_quaternion_updatable);
criterion_main!(benches);
