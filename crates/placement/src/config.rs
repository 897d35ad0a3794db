use glam::{Quat, Vec3};
use placekit_common::{EntityId, LAYER_COUNT, LayerMask, euler_degrees};
use placekit_physics::PhysicsSettings;
use serde::{Deserialize, Serialize};

use crate::PlacementError;

/// What to place and how. Snapshotted when a session starts.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlacementConfig {
    /// Asset path of the prefab to place.
    pub prefab: Option<String>,
    /// Layer whose colliders the cursor ray can hit.
    pub layer: u8,
    /// Give placed objects a rigid body and step physics while active.
    pub physics: bool,
    pub physics_settings: PhysicsSettings,
    /// Placed objects are parented here, keeping their world pose.
    #[serde(skip)]
    pub parent: Option<EntityId>,
    /// Offset added to the hit point.
    pub position: Vec3,
    /// Euler angles in degrees.
    pub rotation: Vec3,
    pub scale: Vec3,
}

impl Default for PlacementConfig {
    fn default() -> Self {
        Self {
            prefab: None,
            layer: 0,
            physics: false,
            physics_settings: PhysicsSettings::default(),
            parent: None,
            position: Vec3::ZERO,
            rotation: Vec3::ZERO,
            scale: Vec3::ONE,
        }
    }
}

impl PlacementConfig {
    pub fn layer_mask(&self) -> LayerMask {
        LayerMask::from_layer(self.layer)
    }

    pub fn rotation_quat(&self) -> Quat {
        euler_degrees(self.rotation)
    }

    /// Check the parts a session cannot run without and return the prefab path.
    pub fn validate(&self) -> Result<&str, PlacementError> {
        if self.layer >= LAYER_COUNT {
            return Err(PlacementError::InvalidLayer(self.layer));
        }
        self.prefab
            .as_deref()
            .filter(|p| !p.is_empty())
            .ok_or(PlacementError::NoPrefabSelected)
    }
}
