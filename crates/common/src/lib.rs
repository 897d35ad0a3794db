//! Shared types for the placekit tool crates.
//!
//! Conventions used everywhere in the workspace:
//! - +Y is world up, +Z is world forward.
//! - Euler angles are given in degrees and applied Z, then X, then Y.

pub mod layer;
pub mod rotation;
pub mod types;

pub use layer::{LAYER_COUNT, LayerMask};
pub use rotation::{euler_degrees, look_rotation};
pub use types::{EntityId, Transform};
