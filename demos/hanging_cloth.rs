use drapery::*;

fn main() {
    let (width, height) = (10, 10);
    let spacing = 0.1;
    let mut vertices = Vec::with_capacity((width + 1) * (height + 1));
    for y in 0..=height {
        for x in 0..=width {
            vertices.push(Vec3::new(x as f32 * spacing, 2.0 - y as f32 * spacing, 0.0));
        }
    }
    let uvs: Vec<Vec2> = (0..vertices.len())
        .map(|i| {
            Vec2::new(
                (i % (width + 1)) as f32 / width as f32,
                (i / (width + 1)) as f32 / height as f32,
            )
        })
        .collect();

    let mut solver = ClothSolver::new(IntegratorKind::Verlet, ClothParams::default(), None);
    if let Err(err) = solver.configure(&vertices, width, height, ClothParams::default()) {
        eprintln!("Cloth setup failed: {err}");
        return;
    }
    solver.set_wind_settings(WindSettings {
        strength: 3.0,
        scroll_speed: 0.2,
    });

    let wind = UniformWind::from_direction(Vec3::new(0.2, 0.0, 1.0));
    let mut positions = vec![Vec3::ZERO; vertices.len()];
    let dt = 1.0 / 60.0;
    for frame in 0..180 {
        solver.apply_spring_forces();
        solver.apply_wind(Some(&wind), &uvs, dt);
        solver.integrate(dt);
        solver.copy_positions(&mut positions);

        if frame % 60 == 59 {
            let corner = positions[positions.len() - 1];
            println!(
                "t = {:.1}s, bottom corner at ({:.3}, {:.3}, {:.3})",
                (frame + 1) as f32 * dt,
                corner.x,
                corner.y,
                corner.z
            );
        }
    }
}
