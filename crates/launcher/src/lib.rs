//! Turret gameplay: a launcher that tracks a `Player`-tagged target inside
//! its firing range, spins its barrel and fires rigid-body projectiles, plus
//! the scene-view gizmos that preview its muzzle offset and trajectory.
//!
//! # Invariants
//! - Muzzle velocity stays within `0..=100`.
//! - A projectile is destroyed on its first contact.
//! - Gizmo drawing never mutates the scene.

mod config;
mod gizmos;
mod launcher;
mod projectile;

pub use config::LauncherConfig;
pub use gizmos::{
    TRAJECTORY_LABEL, TRAJECTORY_SAMPLES, TRAJECTORY_STEP, draw_launcher_gizmos,
    draw_projectile_gizmos, trajectory,
};
pub use launcher::{Launcher, LauncherParts, LauncherTick, TriggerEdge};
pub use projectile::{PROJECTILE_BEHAVIOR, Projectile};

use placekit_common::EntityId;

/// Tag a target must carry to be engaged.
pub const PLAYER_TAG: &str = "Player";

/// Behavior attached to launcher roots.
pub const LAUNCHER_BEHAVIOR: &str = "launcher";

#[derive(Debug, thiserror::Error, PartialEq)]
pub enum LauncherError {
    #[error("launcher has no projectile template")]
    MissingProjectile,
    #[error("launcher has no target")]
    MissingTarget,
    #[error("launcher part {0:?} is not in the scene")]
    PartMissing(EntityId),
}
