//! Grid tiler: lays out every placeable prefab under an asset folder on a
//! uniform grid so a tile set can be reviewed at a glance.
//!
//! A build runs in two phases. Discovery walks the folder tree, instantiates
//! each prefab, measures it with an [`ExtentPolicy`] and keeps only those that
//! fit a grid cell. Layout then assigns cell positions in discovery order.
//!
//! # Invariants
//! - Every leaf asset is visited exactly once; folders never become tiles.
//! - A rejected instance is destroyed immediately and never retried.
//! - Only the x and y extents are checked against the cell size.
//! - Builds are not transactional: a failure part way leaves earlier tiles
//!   in the scene.

mod config;
mod discover;
mod extent;
mod layout;
mod shaders;

pub use config::GridConfig;
pub use discover::{Discovery, RejectReason, RejectedAsset, accepts, discover};
pub use extent::{ExtentPolicy, TransformedBoundsUnion, UntransformedMaxExtent};
pub use layout::{GridCursor, PlacedTile, TileSetReport, build, layout};
pub use shaders::{RenderPipeline, ShaderReport, update_shaders, update_shaders_under};

/// Errors from tiler entry points. Per-asset problems are logged, not returned.
#[derive(Debug, thiserror::Error, PartialEq)]
pub enum TilerError {
    #[error("grid width must be at least 1")]
    ZeroWidth,
    #[error("maximum extent must be positive in x and y, got ({x}, {y})")]
    InvalidMaxExtent { x: f32, y: f32 },
}
