use glam::Vec3;

use crate::core::types::{ClothPoint, Spring};

/// Accumulates Hooke spring and axial damping forces for one spring set.
///
/// Fixed endpoints receive nothing; zero-length springs are skipped.
pub fn accumulate_spring_forces(points: &mut [ClothPoint], springs: &[Spring]) {
    for spring in springs {
        let a = points[spring.index_a];
        let b = points[spring.index_b];

        let delta = b.position - a.position;
        let distance = delta.length();
        if distance == 0.0 {
            continue;
        }

        let direction = delta / distance;
        let stretch = distance - spring.rest_length;
        let spring_force = spring.stiffness * stretch * direction;

        let relative_speed = (b.velocity - a.velocity).dot(direction);
        let damping_force = spring.damping * relative_speed * direction;

        let total = spring_force + damping_force;
        if !a.is_fixed {
            points[spring.index_a].force += total;
        }
        if !b.is_fixed {
            points[spring.index_b].force -= total;
        }
    }
}

/// Accumulates forces of every spring set in order.
pub fn accumulate_all_spring_forces(points: &mut [ClothPoint], spring_sets: &[&[Spring]]) {
    for springs in spring_sets {
        accumulate_spring_forces(points, springs);
    }
}

/// Adds `gravity * mass` to every free point.
pub fn apply_gravity(points: &mut [ClothPoint], gravity: Vec3) {
    for point in points.iter_mut().filter(|p| !p.is_fixed) {
        point.force += gravity * point.mass;
    }
}

pub fn clear_forces(points: &mut [ClothPoint]) {
    for point in points {
        point.force = Vec3::ZERO;
    }
}
