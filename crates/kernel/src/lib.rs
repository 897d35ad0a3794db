//! Scene kernel: the authoritative entity hierarchy the editor tools operate on.
//!
//! # Invariants
//! - All state mutations flow through explicit operations and are logged.
//! - Destroying an entity destroys its whole subtree.
//! - Reparenting keeps the world pose of the moved entity.

pub mod prefab;
pub mod scene;

pub use prefab::{Prefab, PrefabNode};
pub use scene::{EntityNode, Scene, SceneError, SceneEvent};
