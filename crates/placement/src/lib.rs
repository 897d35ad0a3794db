//! Surface placement tool: point at scene geometry, preview the prefab on the
//! surface under the cursor, middle-click to place a copy.
//!
//! The tool is an explicit [`PlacementSession`] value. Starting it spawns a
//! hidden preview instance; every scene-view frame casts a ray from the
//! cursor, snaps the preview to the hit and draws the placement gizmos;
//! stopping it destroys the preview.
//!
//! # Invariants
//! - At most one preview object exists per session, and only while active.
//! - The preview never intercepts the tool's own raycasts.
//! - A committed object lands at exactly `hit point + position offset`
//!   (plus `normal * OFFSET_DISTANCE` when physics is on).

mod config;
mod session;
mod view;

pub use config::PlacementConfig;
pub use session::{FrameOutcome, PlacementSession, SurfaceHit};
pub use view::SceneView;

use placekit_ecs::Material;

/// Layer the preview lives on, outside the usual placement targets.
pub const PREVIEW_LAYER: u8 = 12;

/// Distance along the surface normal of the drop marker, and of the spawn
/// lift when physics is enabled.
pub const OFFSET_DISTANCE: f32 = 3.0;

/// Radius of the wire disc drawn on the hit surface.
pub const HIT_DISC_RADIUS: f32 = 0.5;

/// Radius of the sphere marking the drop point.
pub const MARKER_RADIUS: f32 = 0.2;

/// Behavior name attached to the preview root while the tool runs.
pub const PLACEMENT_BEHAVIOR: &str = "click_spawn";

/// Material every preview renderer is switched to.
pub fn preview_material() -> Material {
    Material {
        name: "PlacementPreview".into(),
        shader: "Unlit/Transparent".into(),
    }
}

#[derive(Debug, thiserror::Error)]
pub enum PlacementError {
    #[error("no prefab selected")]
    NoPrefabSelected,
    #[error("placement tool is already active")]
    AlreadyActive,
    #[error("layer {0} is outside 0..32")]
    InvalidLayer(u8),
    #[error(transparent)]
    Asset(#[from] placekit_assets::AssetError),
}
