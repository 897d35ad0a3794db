use glam::Vec3;
use placekit_kernel::Scene;
use placekit_render::{Color, GizmoSink};

use crate::launcher::Launcher;

/// Seconds between trajectory samples.
pub const TRAJECTORY_STEP: f32 = 0.1;
/// Samples over one second of flight, including the start point.
pub const TRAJECTORY_SAMPLES: usize = 11;
pub const TRAJECTORY_LABEL: &str = "Estimated Position (1 sec)";

const OFFSET_DASH: f32 = 3.0;
const ESTIMATE_RADIUS: f32 = 0.125;

/// Explicit-Euler flight path: record, move, then accelerate, per step.
pub fn trajectory(start: Vec3, velocity: Vec3, gravity: Vec3) -> Vec<Vec3> {
    let mut points = Vec::with_capacity(TRAJECTORY_SAMPLES);
    let (mut position, mut velocity) = (start, velocity);
    for _ in 0..TRAJECTORY_SAMPLES {
        points.push(position);
        position += velocity * TRAJECTORY_STEP;
        velocity += gravity * TRAJECTORY_STEP;
    }
    points
}

/// Muzzle offset handle and, with a projectile template, the one-second
/// trajectory estimate.
pub fn draw_launcher_gizmos(launcher: &Launcher, scene: &Scene, gravity: Vec3, gizmos: &mut impl GizmoSink) {
    let Some(gun) = scene.world_transform(launcher.parts().gun_body) else {
        return;
    };
    let Some(muzzle) = launcher.muzzle_point(scene) else {
        return;
    };
    gizmos.dotted_line(gun.position, muzzle, OFFSET_DASH);
    gizmos.label(muzzle, "Offset");

    let Some(mass) = launcher.projectile_mass() else {
        return;
    };
    if mass <= 0.0 {
        tracing::warn!(mass, "projectile mass must be positive; no trajectory");
        return;
    }
    let velocity = gun.forward() * launcher.config().muzzle_velocity() / mass;
    let points = trajectory(muzzle, velocity, gravity);
    let Some(last) = points.last().copied() else {
        return;
    };
    gizmos.with_color(Color::YELLOW, |g| {
        g.polyline(&points);
        g.label(last, TRAJECTORY_LABEL);
        g.wire_sphere(last, ESTIMATE_RADIUS);
    });
}

/// Damage radius of every live projectile.
pub fn draw_projectile_gizmos(launcher: &Launcher, scene: &Scene, gizmos: &mut impl GizmoSink) {
    for projectile in launcher.projectiles() {
        if let Some(t) = scene.world_transform(projectile.entity) {
            gizmos.wire_sphere(t.position, projectile.damage_radius);
        }
    }
}
