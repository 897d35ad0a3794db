use glam::Vec3;
use placekit_common::{EntityId, LayerMask};
use placekit_kernel::Scene;
use serde::{Deserialize, Serialize};

use crate::raycast::{Ray, raycast_filtered};

/// Gap kept between a resting body and the surface it landed on, so the next
/// sweep starts outside that collider.
const CONTACT_SKIN: f32 = 1e-4;

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PhysicsSettings {
    pub gravity: Vec3,
    /// Seconds advanced per `simulate` call when driven by the editor tick.
    pub fixed_delta_time: f32,
}

impl Default for PhysicsSettings {
    fn default() -> Self {
        Self {
            gravity: Vec3::new(0.0, -9.81, 0.0),
            fixed_delta_time: 0.02,
        }
    }
}

/// A body that stopped against a collider during a step.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub entity: EntityId,
    pub other: EntityId,
    pub point: Vec3,
    pub normal: Vec3,
}

/// Advance every non-kinematic rigid body by `dt` seconds.
///
/// Bodies are swept as points from their world position. A body whose path
/// crosses another collider stops at the hit point with zero velocity.
/// Every body is stepped, so a resting body reports a contact each call.
/// Colliders inside the body's own subtree are ignored.
pub fn simulate(scene: &mut Scene, dt: f32, gravity: Vec3) -> Vec<Contact> {
    let _span = tracing::trace_span!("physics.simulate", dt).entered();
    let bodies: Vec<EntityId> = scene
        .components()
        .rigid_bodies()
        .iter()
        .filter(|(_, body)| !body.is_kinematic)
        .map(|(id, _)| *id)
        .collect();

    let mut contacts = Vec::new();
    for id in bodies {
        let Some(start) = scene.world_transform(id).map(|t| t.position) else {
            continue;
        };
        let Some(body) = scene.components_mut().get_rigid_body_mut(id) else {
            continue;
        };
        if body.use_gravity {
            body.velocity += gravity * dt;
        }
        let displacement = body.velocity * dt;
        let distance = displacement.length();
        let Some(ray) = Ray::new(start, displacement) else {
            continue;
        };

        let hit = raycast_filtered(scene, &ray, distance, LayerMask::ALL, |other| {
            !scene.is_ancestor_or_self(id, other)
        });
        match hit {
            Some(hit) => {
                if let Some(body) = scene.components_mut().get_rigid_body_mut(id) {
                    body.velocity = Vec3::ZERO;
                }
                scene.set_world_position(id, hit.point + hit.normal * CONTACT_SKIN);
                tracing::debug!(entity = %id.short(), other = %hit.entity.short(), "body came to rest");
                contacts.push(Contact {
                    entity: id,
                    other: hit.entity,
                    point: hit.point,
                    normal: hit.normal,
                });
            }
            None => {
                scene.set_world_position(id, start + displacement);
            }
        }
    }
    contacts
}
