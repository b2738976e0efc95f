use drapery::*;

fn grid(width: usize, height: usize, spacing: f32) -> Vec<Vec3> {
    let mut vertices = Vec::with_capacity((width + 1) * (height + 1));
    for y in 0..=height {
        for x in 0..=width {
            vertices.push(Vec3::new(x as f32 * spacing, -(y as f32) * spacing, 0.1 * x as f32));
        }
    }
    vertices
}

#[test]
fn rest_lengths_match_initial_distances() {
    let mut topology = ClothTopology::new();
    topology
        .setup(&grid(4, 3, 0.25), 4, 3, &ClothParams::default(), false)
        .unwrap();

    let points = topology.points();
    for kind in [SpringKind::Structural, SpringKind::Shear, SpringKind::Bend] {
        assert!(!topology.springs(kind).is_empty());
        for spring in topology.springs(kind) {
            let distance = points[spring.index_a]
                .position
                .distance(points[spring.index_b].position);
            assert_eq!(spring.rest_length, distance);
        }
    }
}

#[test]
fn top_row_is_pinned_unless_falling() {
    let mut topology = ClothTopology::new();
    topology
        .setup(&grid(2, 2, 1.0), 2, 2, &ClothParams::default(), false)
        .unwrap();
    let fixed: Vec<bool> = topology.points().iter().map(|p| p.is_fixed).collect();
    assert_eq!(
        fixed,
        vec![true, true, true, false, false, false, false, false, false]
    );
    assert!(topology.points()[..3].iter().all(|p| p.velocity == Vec3::ZERO));

    topology
        .setup(&grid(2, 2, 1.0), 2, 2, &ClothParams::default(), true)
        .unwrap();
    assert!(topology.points().iter().all(|p| !p.is_fixed));
}

#[test]
fn parameter_updates_are_idempotent() {
    let mut topology = ClothTopology::new();
    topology
        .setup(&grid(3, 3, 0.5), 3, 3, &ClothParams::default(), false)
        .unwrap();
    let params = ClothParams::new(0.4, 800.0, 1.5);

    topology.update_parameters(&params).unwrap();
    let points_once = topology.points().to_vec();
    let springs_once: Vec<Spring> = [SpringKind::Structural, SpringKind::Shear, SpringKind::Bend]
        .iter()
        .flat_map(|&kind| topology.springs(kind).to_vec())
        .collect();

    for _ in 0..3 {
        topology.update_parameters(&params).unwrap();
    }
    let springs_again: Vec<Spring> = [SpringKind::Structural, SpringKind::Shear, SpringKind::Bend]
        .iter()
        .flat_map(|&kind| topology.springs(kind).to_vec())
        .collect();

    assert_eq!(topology.points(), points_once.as_slice());
    assert_eq!(springs_again, springs_once);
    assert!(topology.points()[..4].iter().all(|p| p.mass == ClothParams::default().mass));
    assert!(topology.points()[4..].iter().all(|p| p.mass == 0.4));
}

#[test]
fn mismatched_grid_is_rejected() {
    let mut topology = ClothTopology::new();
    let err = topology
        .setup(&grid(2, 2, 1.0), 3, 2, &ClothParams::default(), false)
        .unwrap_err();
    assert_eq!(
        err,
        ClothError::GridSizeMismatch {
            expected: 12,
            actual: 9
        }
    );
    assert!(topology.is_empty());
}

#[test]
fn non_positive_mass_is_rejected() {
    let mut topology = ClothTopology::new();
    let params = ClothParams::new(0.0, 300.0, 2.0);
    assert_eq!(
        topology.setup(&grid(1, 1, 1.0), 1, 1, &params, false),
        Err(ClothError::InvalidMass(0.0))
    );
}

#[test]
fn invalid_mass_update_is_rejected() {
    let mut topology = ClothTopology::new();
    topology
        .setup(&grid(2, 2, 1.0), 2, 2, &ClothParams::default(), true)
        .unwrap();
    assert_eq!(
        topology.update_parameters(&ClothParams::new(-0.5, 300.0, 2.0)),
        Err(ClothError::InvalidMass(-0.5))
    );
    assert!(topology
        .points()
        .iter()
        .all(|p| p.mass == ClothParams::default().mass));
}
