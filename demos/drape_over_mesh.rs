use std::sync::Arc;

use drapery::*;

fn pedestal() -> (Vec<Vec3>, Vec<[u32; 3]>) {
    // Top face of a unit box, split into two triangles facing +Y.
    let vertices = vec![
        Vec3::new(-0.5, 0.0, -0.5),
        Vec3::new(-0.5, 0.0, 0.5),
        Vec3::new(0.5, 0.0, 0.5),
        Vec3::new(0.5, 0.0, -0.5),
    ];
    (vertices, vec![[0, 1, 2], [0, 2, 3]])
}

fn main() {
    let (mesh_vertices, mesh_indices) = pedestal();
    let mesh = match TriangleMesh::from_indexed(
        &mesh_vertices,
        &mesh_indices,
        &Transform::from_position(Vec3::new(0.0, 1.0, 0.0)),
    ) {
        Ok(mesh) => mesh,
        Err(err) => {
            eprintln!("Collision mesh rejected: {err}");
            return;
        }
    };

    let mut collisions = CollisionPipeline::new()
        .with_sphere(SphereCollider::new(Vec3::new(0.8, 0.4, 0.0), 0.3))
        .with_ground(GroundPlane::new(0.0));
    collisions.attach_mesh(&mesh, Arc::new(CpuKernel::default()));

    let size = 20;
    let spacing = 1.6 / size as f32;
    let mut vertices = Vec::new();
    for z in 0..=size {
        for x in 0..=size {
            vertices.push(Vec3::new(
                x as f32 * spacing - 0.8,
                1.5,
                z as f32 * spacing - 0.8,
            ));
        }
    }

    let mut solver = ClothSolver::new(IntegratorKind::Pbd, ClothParams::default(), Some(collisions));
    if let Err(err) = solver
        .set_allow_fall(true)
        .and_then(|_| solver.configure(&vertices, size, size, ClothParams::default()))
    {
        eprintln!("Cloth setup failed: {err}");
        return;
    }

    let dt = 1.0 / 60.0;
    for frame in 0..240 {
        if frame == 150 {
            if let Some(collisions) = solver.collisions_mut() {
                collisions.set_stick_to_mesh(true);
            }
        }
        solver.apply_spring_forces();
        solver.integrate(dt);
    }

    let profile = solver.profiler();
    let frozen = solver.points().iter().filter(|p| p.is_fixed).count();
    let lowest = solver
        .points()
        .iter()
        .map(|p| p.position.y)
        .fold(f32::INFINITY, f32::min);
    println!(
        "Draped {} points: {} frozen on contact, lowest at {:.3}, {} kernel points last step",
        solver.points().len(),
        frozen,
        lowest,
        profile.kernel_points
    );
}
