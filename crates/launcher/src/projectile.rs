use placekit_common::EntityId;
use placekit_kernel::Scene;
use placekit_physics::Contact;

/// Behavior attached to every fired projectile.
pub const PROJECTILE_BEHAVIOR: &str = "projectile";

/// A live projectile fired by a launcher.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Projectile {
    pub entity: EntityId,
    pub damage_radius: f32,
}

/// Destroy every projectile that took part in a contact. Returns the
/// destroyed entities in contact order, each once.
pub fn destroy_on_contact(scene: &mut Scene, contacts: &[Contact]) -> Vec<EntityId> {
    let mut destroyed = Vec::new();
    for contact in contacts {
        let id = contact.entity;
        if destroyed.contains(&id) || !scene.components().has_behavior(id, PROJECTILE_BEHAVIOR) {
            continue;
        }
        match scene.destroy(id) {
            Ok(_) => {
                tracing::info!(projectile = %id.short(), other = %contact.other.short(), "hit and destroy");
                destroyed.push(id);
            }
            Err(err) => tracing::warn!(%err, "projectile already gone"),
        }
    }
    destroyed
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use placekit_common::Transform;

    fn contact(entity: EntityId, other: EntityId) -> Contact {
        Contact {
            entity,
            other,
            point: Vec3::ZERO,
            normal: Vec3::Y,
        }
    }

    #[test]
    fn only_projectiles_are_destroyed() {
        let mut scene = Scene::new();
        let ground = scene.spawn("Ground", Transform::default());
        let shell = scene.spawn("Shell", Transform::default());
        let crate_ = scene.spawn("Crate", Transform::default());
        scene.components_mut().attach_behavior(shell, PROJECTILE_BEHAVIOR);

        let destroyed = destroy_on_contact(
            &mut scene,
            &[contact(crate_, ground), contact(shell, ground), contact(shell, crate_)],
        );
        assert_eq!(destroyed, [shell]);
        assert!(!scene.contains(shell));
        assert!(scene.contains(crate_));
    }
}
