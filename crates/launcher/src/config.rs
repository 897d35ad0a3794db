use glam::Vec3;
use serde::{Deserialize, Serialize};

pub const MAX_VELOCITY: f32 = 100.0;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LauncherConfig {
    /// Radius of the sphere a target must enter to be engaged.
    pub firing_range: f32,
    /// Barrel spin in degrees per second while firing.
    pub barrel_rotation_speed: f32,
    /// Muzzle speed, clamped to `0..=100`.
    pub velocity: f32,
    /// Muzzle point in the gun body's local space.
    pub offset: Vec3,
    /// Damage radius given to spawned projectiles.
    pub damage_radius: f32,
    /// Asset path of the projectile prefab.
    pub projectile: Option<String>,
}

impl Default for LauncherConfig {
    fn default() -> Self {
        Self {
            firing_range: 10.0,
            barrel_rotation_speed: 360.0,
            velocity: 10.0,
            offset: Vec3::Z,
            damage_radius: 1.0,
            projectile: None,
        }
    }
}

impl LauncherConfig {
    /// Muzzle speed after clamping.
    pub fn muzzle_velocity(&self) -> f32 {
        if self.velocity.is_nan() {
            return 0.0;
        }
        self.velocity.clamp(0.0, MAX_VELOCITY)
    }
}
