use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::TilerError;

/// Grid settings for a tile-set build.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Columns per row before wrapping.
    pub width: u32,
    /// Extra spacing added to every cell, in world units.
    pub offset: f32,
    /// Cell size; an asset must be strictly smaller in x and y to be placed.
    pub max_extent: Vec2,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            width: 8,
            offset: 0.0,
            max_extent: Vec2::new(16.0, 16.0),
        }
    }
}

impl GridConfig {
    pub fn validate(&self) -> Result<(), TilerError> {
        if self.width == 0 {
            return Err(TilerError::ZeroWidth);
        }
        if !(self.max_extent.x > 0.0 && self.max_extent.y > 0.0) {
            return Err(TilerError::InvalidMaxExtent {
                x: self.max_extent.x,
                y: self.max_extent.y,
            });
        }
        Ok(())
    }

    /// Distance between neighbouring cell origins along x and z.
    pub fn cell_pitch(&self) -> Vec2 {
        self.max_extent + Vec2::splat(self.offset)
    }
}
