//! Physics queries over the scene.
//!
//! Raycasts test colliders in world space, filtered by layer mask. The
//! stepping half integrates rigid bodies with a fixed time step and a point
//! sweep against every other collider.
//!
//! # Invariants
//! - Queries never mutate the scene.
//! - Identical scene state and inputs give bit-identical results.

pub mod raycast;
mod simulate;

pub use raycast::{Ray, RaycastHit, raycast, raycast_filtered};
pub use simulate::{Contact, PhysicsSettings, simulate};
