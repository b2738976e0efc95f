use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use drapery::*;
use std::{hint::black_box, sync::Arc};

const DT: f32 = 1.0 / 60.0;

fn cloth_grid(size: usize) -> Vec<Vec3> {
    let spacing = 1.0 / size as f32;
    let mut vertices = Vec::with_capacity((size + 1) * (size + 1));
    for y in 0..=size {
        for x in 0..=size {
            vertices.push(Vec3::new(x as f32 * spacing, 1.0, y as f32 * spacing));
        }
    }
    vertices
}

fn terrain_mesh(resolution: usize) -> TriangleMesh {
    let mut vertices = Vec::new();
    let mut indices = Vec::new();
    for z in 0..=resolution {
        for x in 0..=resolution {
            let (fx, fz) = (x as f32 / resolution as f32, z as f32 / resolution as f32);
            let height = 0.1 * (fx * 6.0).sin() * (fz * 6.0).cos();
            vertices.push(Vec3::new(fx * 2.0 - 0.5, height, fz * 2.0 - 0.5));
        }
    }
    let row = (resolution + 1) as u32;
    for z in 0..resolution as u32 {
        for x in 0..resolution as u32 {
            let i = z * row + x;
            indices.push([i, i + row, i + 1]);
            indices.push([i + 1, i + row, i + row + 1]);
        }
    }
    TriangleMesh::from_indexed(&vertices, &indices, &Transform::default())
        .unwrap_or_else(|err| panic!("terrain mesh: {err}"))
}

fn prepare_solver(kind: IntegratorKind, size: usize, collisions: Option<CollisionPipeline>) -> ClothSolver {
    let mut solver = ClothSolver::new(kind, ClothParams::default(), collisions);
    solver
        .configure(&cloth_grid(size), size, size, ClothParams::default())
        .unwrap_or_else(|err| panic!("cloth setup: {err}"));
    solver
}

fn bench_integrators(c: &mut Criterion) {
    let mut group = c.benchmark_group("cloth_step");
    for &size in &[16usize, 32, 64] {
        for kind in [
            IntegratorKind::SemiImplicitEuler,
            IntegratorKind::Verlet,
            IntegratorKind::Pbd,
        ] {
            group.bench_with_input(
                BenchmarkId::new(format!("{kind:?}"), size),
                &size,
                |b, &size| {
                    let mut solver = prepare_solver(kind, size, None);
                    b.iter(|| {
                        solver.apply_spring_forces();
                        solver.integrate(black_box(DT));
                    })
                },
            );
        }
    }
    group.finish();
}

fn bench_wind(c: &mut Criterion) {
    let mut solver = prepare_solver(IntegratorKind::SemiImplicitEuler, 64, None);
    let field = UniformWind::from_direction(Vec3::new(0.4, 0.0, 1.0));
    let uvs: Vec<Vec2> = (0..solver.points().len())
        .map(|i| Vec2::new((i % 65) as f32 / 64.0, (i / 65) as f32 / 64.0))
        .collect();
    c.bench_function("wind_64", |b| {
        b.iter(|| solver.apply_wind(Some(&field), black_box(&uvs), DT))
    });
}

fn bench_bvh_build(c: &mut Criterion) {
    let mut group = c.benchmark_group("bvh_build");
    for &resolution in &[16usize, 64] {
        let mesh = terrain_mesh(resolution);
        group.bench_with_input(
            BenchmarkId::from_parameter(mesh.triangle_count()),
            &mesh,
            |b, mesh| {
                b.iter(|| {
                    let root = BvhBuilder::default().build(black_box(mesh));
                    FlatBvh::flatten(root.as_ref())
                })
            },
        );
    }
    group.finish();
}

fn bench_mesh_collisions(c: &mut Criterion) {
    let mut group = c.benchmark_group("pbd_mesh_step");
    let mesh = terrain_mesh(64);
    for &size in &[16usize, 48] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            let collider = MeshCollider::new(&mesh, Arc::new(CpuKernel::default()))
                .unwrap_or_else(|err| panic!("mesh collider: {err}"));
            let pipeline = CollisionPipeline::new().with_mesh(collider);
            let mut solver = prepare_solver(IntegratorKind::Pbd, size, Some(pipeline));
            b.iter(|| {
                solver.apply_spring_forces();
                solver.integrate(black_box(DT));
            })
        });
    }
    group.finish();
}

criterion_group!(
    benches,
    bench_integrators,
    bench_wind,
    bench_bvh_build,
    bench_mesh_collisions
);
criterion_main!(benches);
