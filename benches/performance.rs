use criterion::{criterion_group, criterion_main};

use occumap_rs::{Ray, Tree, Vec3};

fn criterion_benchmark(c: &mut criterion::Criterion) {
    use rand::Rng;
    let mut rng = rand::thread_rng();
    let root_extent = 64.0;
    let half = root_extent / 2.0;

    let mut tree = Tree::new(Vec3::splat(0.0), root_extent, 1.0);
    for _ in 0..200_000 {
        let p = Vec3::new(
            rng.gen_range(-half..half),
            rng.gen_range(-half..half),
            rng.gen_range(-half..half),
        );
        tree.add_point(p).ok();
    }

    c.bench_function("add_point", |b| {
        b.iter(|| {
            let p = Vec3::new(
                rng.gen_range(-half..half),
                rng.gen_range(-half..half),
                rng.gen_range(-half..half),
            );
            tree.add_point(p).ok();
        });
    });

    c.bench_function("add_ray", |b| {
        b.iter(|| {
            let hit = Vec3::new(
                rng.gen_range(-half..half),
                rng.gen_range(-half..half),
                rng.gen_range(-half..half),
            );
            tree.add_ray(Vec3::splat(0.0), hit);
        });
    });

    c.bench_function("ray_intersect", |b| {
        b.iter(|| {
            let origin = Vec3::new(-half * 2.0, 0.0, 0.0);
            let dir = Vec3::new(1.0, 0.0, 0.0);
            tree.ray_intersect(&Ray::new(origin, dir))
        });
    });

    c.bench_function("encode", |b| {
        b.iter(|| tree.encode());
    });

    let encoded = tree.encode();
    c.bench_function("decode", |b| {
        b.iter(|| {
            Tree::from_bitstream(
                tree.root_center(),
                tree.root_extent(),
                tree.min_leaf_extent(),
                &encoded,
            )
            .unwrap()
        });
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
