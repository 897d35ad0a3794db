//! Keep edits made while a simulation runs.
//!
//! [`SavedObjects::save`] snapshots an object and its subtree. When the run
//! ends, [`SavedObjects::restore_all`] puts every snapshot back in the scene:
//! onto the original entities when the hierarchy still has the same shape,
//! otherwise as a fresh instance in the original's parent and sibling slot.

use placekit_common::EntityId;
use placekit_kernel::{Prefab, Scene};

use crate::ToolsError;

#[derive(Debug, Clone)]
struct SavedObject {
    original: EntityId,
    parent: Option<EntityId>,
    prefab: Prefab,
}

/// How a saved object came back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Restored {
    /// Components and local transforms were copied onto the original
    /// entities. Ids are unchanged.
    InPlace(EntityId),
    /// The snapshot was instantiated in the original's slot and the original
    /// (if still alive) destroyed.
    Replaced { original: EntityId, copy: EntityId },
}

/// Snapshots waiting to be restored, in save order.
#[derive(Debug, Clone, Default)]
pub struct SavedObjects {
    saved: Vec<SavedObject>,
}

impl SavedObjects {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.saved.len()
    }

    pub fn is_empty(&self) -> bool {
        self.saved.is_empty()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.saved.iter().any(|s| s.original == id)
    }

    /// Snapshot `id` and its saved subtree. Saving the same entity again
    /// replaces the earlier snapshot; returns whether one was replaced.
    pub fn save(&mut self, scene: &Scene, id: EntityId) -> Result<bool, ToolsError> {
        let prefab = scene.capture_prefab(id).ok_or(ToolsError::Missing(id))?;
        tracing::info!(entity = %id.short(), name = prefab.name(), "object saved");
        let saved = SavedObject {
            original: id,
            parent: scene.parent(id),
            prefab,
        };
        match self.saved.iter_mut().find(|s| s.original == id) {
            Some(slot) => {
                *slot = saved;
                Ok(true)
            }
            None => {
                self.saved.push(saved);
                Ok(false)
            }
        }
    }

    /// Forget the snapshot of `id`.
    pub fn discard(&mut self, id: EntityId) -> bool {
        let before = self.saved.len();
        self.saved.retain(|s| s.original != id);
        self.saved.len() != before
    }

    /// Put every snapshot back and empty the ledger.
    pub fn restore_all(&mut self, scene: &mut Scene) -> Result<Vec<Restored>, ToolsError> {
        let _span = tracing::info_span!("saved.restore", count = self.saved.len()).entered();
        let saved = std::mem::take(&mut self.saved);
        let mut restored = Vec::with_capacity(saved.len());
        for object in &saved {
            restored.push(restore(scene, object)?);
        }
        Ok(restored)
    }
}

fn restore(scene: &mut Scene, saved: &SavedObject) -> Result<Restored, ToolsError> {
    let original = saved.original;
    if scene.contains(original) {
        if let Some(restored) = restore_in_place(scene, saved)? {
            return Ok(restored);
        }
    }

    let (parent, slot, name) = if scene.contains(original) {
        (
            scene.parent(original),
            scene.sibling_index(original),
            scene.name(original).map(str::to_string),
        )
    } else {
        // destroyed during the run: back under the recorded parent if it survived
        (saved.parent.filter(|p| scene.contains(*p)), None, None)
    };
    let copy = scene.instantiate_under(&saved.prefab, parent)?;
    if let Some(name) = name {
        scene.components_mut().set_name(copy, name);
    }
    if let Some(index) = slot {
        scene.set_sibling_index(copy, index)?;
    }
    if scene.contains(original) {
        scene.destroy(original)?;
    }
    tracing::debug!(original = %original.short(), copy = %copy.short(), "saved object re-instantiated");
    Ok(Restored::Replaced { original, copy })
}

/// Copy the snapshot onto the live subtree node by node. `None` when the
/// subtree no longer has the snapshot's shape.
fn restore_in_place(scene: &mut Scene, saved: &SavedObject) -> Result<Option<Restored>, ToolsError> {
    let targets = saved_shape(scene, saved.original);
    if targets.len() != saved.prefab.node_count() {
        return Ok(None);
    }
    let scratch = scene.instantiate(&saved.prefab);
    let sources = saved_shape(scene, scratch);
    let same_shape = sources
        .iter()
        .zip(&targets)
        .all(|((_, a), (_, b))| a == b);
    if same_shape {
        for ((source, _), (target, _)) in sources.iter().zip(&targets) {
            let flags = scene.components().hide_flags(*target);
            scene.components_mut().copy_components(*source, *target);
            scene.components_mut().set_hide_flags(*target, flags);
            if let Some(local) = scene.local_transform(*source) {
                scene.set_local_transform(*target, local);
            }
        }
    }
    scene.destroy(scratch)?;
    Ok(same_shape.then_some(Restored::InPlace(saved.original)))
}

/// Pre-order nodes a capture would include, each with its kept child count.
fn saved_shape(scene: &Scene, root: EntityId) -> Vec<(EntityId, usize)> {
    let mut out = Vec::new();
    let mut stack = vec![root];
    while let Some(id) = stack.pop() {
        let kept: Vec<EntityId> = scene
            .children(id)
            .iter()
            .copied()
            .filter(|c| !scene.components().hide_flags(*c).dont_save)
            .collect();
        out.push((id, kept.len()));
        stack.extend(kept.into_iter().rev());
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use placekit_common::Transform;
    use placekit_ecs::{Collider, HideFlags, RigidBody};

    fn shelf_with_crate(scene: &mut Scene) -> (EntityId, EntityId, EntityId) {
        let shelf = scene.spawn("Shelf", Transform::default());
        scene
            .spawn_child(shelf, "Left", Transform::default())
            .unwrap();
        let crate_id = scene
            .spawn_child(shelf, "Crate", Transform::from_position(Vec3::new(1.0, 2.0, 3.0)))
            .unwrap();
        scene
            .spawn_child(shelf, "Right", Transform::default())
            .unwrap();
        let lid = scene
            .spawn_child(crate_id, "Lid", Transform::from_position(Vec3::Y))
            .unwrap();
        scene.components_mut().set_collider(
            crate_id,
            Collider::Box {
                half_extents: Vec3::splat(0.5),
            },
        );
        scene.components_mut().set_layer(crate_id, 4);
        (shelf, crate_id, lid)
    }

    #[test]
    fn unchanged_shape_restores_onto_the_same_entities() {
        let mut scene = Scene::new();
        let (_, crate_id, lid) = shelf_with_crate(&mut scene);
        let mut saved = SavedObjects::new();
        assert!(!saved.save(&scene, crate_id).unwrap());

        // a simulated run moves and edits things
        scene.set_world_position(crate_id, Vec3::new(9.0, 0.0, 0.0));
        scene.set_local_transform(lid, Transform::default());
        scene.components_mut().remove_collider(crate_id);
        scene
            .components_mut()
            .set_rigid_body(crate_id, RigidBody::default());
        scene.components_mut().set_layer(crate_id, 0);
        let count = scene.entity_count();

        let restored = saved.restore_all(&mut scene).unwrap();
        assert_eq!(restored, [Restored::InPlace(crate_id)]);
        assert!(saved.is_empty());
        assert_eq!(scene.entity_count(), count);

        let c = scene.components();
        assert!(c.get_collider(crate_id).is_some());
        assert!(c.get_rigid_body(crate_id).is_none());
        assert_eq!(c.layer(crate_id), 4);
        assert_eq!(scene.local_transform(crate_id).unwrap().position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(scene.local_transform(lid).unwrap().position, Vec3::Y);
    }

    #[test]
    fn changed_shape_is_replaced_in_the_same_slot() {
        let mut scene = Scene::new();
        let (shelf, crate_id, _) = shelf_with_crate(&mut scene);
        let mut saved = SavedObjects::new();
        saved.save(&scene, crate_id).unwrap();

        scene
            .spawn_child(crate_id, "Debris", Transform::default())
            .unwrap();
        scene.components_mut().set_name(crate_id, "Crate (hit)");
        scene.set_world_position(crate_id, Vec3::ZERO);

        let restored = saved.restore_all(&mut scene).unwrap();
        let [Restored::Replaced { original, copy }] = restored[..] else {
            panic!("expected a replacement, got {restored:?}");
        };
        assert_eq!(original, crate_id);
        assert!(!scene.contains(crate_id));
        assert_eq!(scene.parent(copy), Some(shelf));
        assert_eq!(scene.sibling_index(copy), Some(1));
        assert_eq!(scene.name(copy), Some("Crate (hit)"));
        assert_eq!(scene.local_transform(copy).unwrap().position, Vec3::new(1.0, 2.0, 3.0));
        assert_eq!(scene.children(copy).len(), 1);
        assert_eq!(scene.components().layer(copy), 4);
    }

    #[test]
    fn destroyed_original_returns_under_its_parent() {
        let mut scene = Scene::new();
        let (shelf, crate_id, _) = shelf_with_crate(&mut scene);
        let mut saved = SavedObjects::new();
        saved.save(&scene, crate_id).unwrap();
        scene.destroy(crate_id).unwrap();

        let restored = saved.restore_all(&mut scene).unwrap();
        let [Restored::Replaced { copy, .. }] = restored[..] else {
            panic!("expected a replacement, got {restored:?}");
        };
        assert_eq!(scene.parent(copy), Some(shelf));
        assert_eq!(scene.name(copy), Some("Crate"));
        assert_eq!(scene.descendants(copy).len(), 2);
    }

    #[test]
    fn scratch_children_do_not_change_the_shape() {
        let mut scene = Scene::new();
        let (_, crate_id, _) = shelf_with_crate(&mut scene);
        let marker = scene
            .spawn_child(crate_id, "Marker", Transform::default())
            .unwrap();
        scene
            .components_mut()
            .set_hide_flags(marker, HideFlags::SCRATCH);
        let mut saved = SavedObjects::new();
        saved.save(&scene, crate_id).unwrap();

        let restored = saved.restore_all(&mut scene).unwrap();
        assert_eq!(restored, [Restored::InPlace(crate_id)]);
        assert!(scene.contains(marker));
    }

    #[test]
    fn ledger_bookkeeping() {
        let mut scene = Scene::new();
        let (shelf, crate_id, _) = shelf_with_crate(&mut scene);
        let mut saved = SavedObjects::new();
        assert!(matches!(
            saved.save(&scene, EntityId::new()),
            Err(ToolsError::Missing(_))
        ));
        saved.save(&scene, crate_id).unwrap();
        assert!(saved.save(&scene, crate_id).unwrap());
        saved.save(&scene, shelf).unwrap();
        assert_eq!(saved.len(), 2);
        assert!(saved.contains(crate_id));
        assert!(saved.discard(crate_id));
        assert!(!saved.discard(crate_id));
        assert_eq!(saved.len(), 1);
    }
}
