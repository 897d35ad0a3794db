use glam::{Mat4, Quat, Vec3};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use placekit_common::{EntityId, Transform};
use placekit_ecs::ComponentStore;

use crate::prefab::{Prefab, PrefabNode};

/// An event record produced by every structural mutation of the scene graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SceneEvent {
    /// Entity was created under `parent` with the given local transform.
    Spawned {
        id: EntityId,
        parent: Option<EntityId>,
        transform: Transform,
    },
    /// Entity was destroyed. Carries its last local transform.
    Despawned { id: EntityId, transform: Transform },
    /// Local transform was updated.
    TransformUpdated {
        id: EntityId,
        old: Transform,
        new: Transform,
    },
    /// Entity moved to a different parent.
    Reparented {
        id: EntityId,
        old: Option<EntityId>,
        new: Option<EntityId>,
    },
    /// The editor ticked one frame.
    FrameAdvanced { frame: u64 },
}

/// Errors from scene graph operations.
#[derive(Debug, thiserror::Error)]
pub enum SceneError {
    #[error("entity {0:?} not found")]
    EntityNotFound(EntityId),
    #[error("cannot parent {child:?} under its own descendant {parent:?}")]
    CyclicParent { child: EntityId, parent: EntityId },
}

/// Hierarchy data stored per entity.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntityNode {
    /// Transform relative to the parent (or the world for roots).
    pub transform: Transform,
    pub parent: Option<EntityId>,
    pub children: Vec<EntityId>,
}

/// The authoritative scene graph.
///
/// Owns the entity hierarchy and every entity's components. All mutations go
/// through explicit operations and are recorded in the event log; tools,
/// physics and renderers derive from it.
///
/// Uses BTreeMap for deterministic iteration order across all platforms.
/// Child and root lists keep creation order.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Scene {
    entities: BTreeMap<EntityId, EntityNode>,
    roots: Vec<EntityId>,
    components: ComponentStore,
    frame: u64,
    /// Append-only event log of all mutations.
    #[serde(skip)]
    event_log: Vec<SceneEvent>,
}

impl Scene {
    /// Create an empty scene at frame 0.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current editor frame.
    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Number of entities in the scene, hidden ones included.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    pub fn contains(&self, id: EntityId) -> bool {
        self.entities.contains_key(&id)
    }

    /// Drain and return the event log.
    pub fn drain_events(&mut self) -> Vec<SceneEvent> {
        std::mem::take(&mut self.event_log)
    }

    /// Read-only access to the event log.
    pub fn events(&self) -> &[SceneEvent] {
        &self.event_log
    }

    /// Read-only access to all entities (BTreeMap for deterministic iteration).
    pub fn entities(&self) -> &BTreeMap<EntityId, EntityNode> {
        &self.entities
    }

    /// Root entities in creation order.
    pub fn roots(&self) -> &[EntityId] {
        &self.roots
    }

    pub fn components(&self) -> &ComponentStore {
        &self.components
    }

    pub fn components_mut(&mut self) -> &mut ComponentStore {
        &mut self.components
    }

    pub fn get(&self, id: EntityId) -> Option<&EntityNode> {
        self.entities.get(&id)
    }

    pub fn parent(&self, id: EntityId) -> Option<EntityId> {
        self.entities.get(&id).and_then(|node| node.parent)
    }

    /// Direct children in creation order. Empty for unknown ids.
    pub fn children(&self, id: EntityId) -> &[EntityId] {
        self.entities
            .get(&id)
            .map(|node| node.children.as_slice())
            .unwrap_or(&[])
    }

    pub fn name(&self, id: EntityId) -> Option<&str> {
        self.components.get_name(id)
    }

    /// First entity, in id order, with the given name.
    pub fn find_by_name(&self, name: &str) -> Option<EntityId> {
        self.entities
            .keys()
            .copied()
            .find(|id| self.components.get_name(*id) == Some(name))
    }

    /// Spawn a new root entity. Returns its id.
    pub fn spawn(&mut self, name: impl Into<String>, transform: Transform) -> EntityId {
        let id = EntityId::new();
        self.insert_node(id, None, transform);
        self.components.set_name(id, name);
        id
    }

    /// Spawn a new entity under `parent` with a transform local to it.
    pub fn spawn_child(
        &mut self,
        parent: EntityId,
        name: impl Into<String>,
        transform: Transform,
    ) -> Result<EntityId, SceneError> {
        if !self.contains(parent) {
            return Err(SceneError::EntityNotFound(parent));
        }
        let id = EntityId::new();
        self.insert_node(id, Some(parent), transform);
        self.components.set_name(id, name);
        Ok(id)
    }

    fn insert_node(&mut self, id: EntityId, parent: Option<EntityId>, transform: Transform) {
        self.entities.insert(
            id,
            EntityNode {
                transform,
                parent,
                children: Vec::new(),
            },
        );
        match parent.and_then(|p| self.entities.get_mut(&p)) {
            Some(parent_node) => parent_node.children.push(id),
            None => self.roots.push(id),
        }
        self.event_log.push(SceneEvent::Spawned {
            id,
            parent,
            transform,
        });
    }

    /// Destroy an entity and its whole subtree. Returns how many entities were removed.
    pub fn destroy(&mut self, id: EntityId) -> Result<usize, SceneError> {
        if !self.contains(id) {
            return Err(SceneError::EntityNotFound(id));
        }
        self.detach_from_parent(id);
        let doomed = self.descendants(id);
        // leaves first so every Despawned event refers to a childless node
        for entity in doomed.iter().rev() {
            if let Some(node) = self.entities.remove(entity) {
                self.components.remove_entity(*entity);
                self.event_log.push(SceneEvent::Despawned {
                    id: *entity,
                    transform: node.transform,
                });
            }
        }
        Ok(doomed.len())
    }

    fn detach_from_parent(&mut self, id: EntityId) {
        match self.parent(id) {
            Some(parent) => {
                if let Some(parent_node) = self.entities.get_mut(&parent) {
                    parent_node.children.retain(|c| *c != id);
                }
            }
            None => self.roots.retain(|r| *r != id),
        }
    }

    /// The entity and all its descendants, depth-first pre-order.
    pub fn descendants(&self, id: EntityId) -> Vec<EntityId> {
        let mut out = Vec::new();
        let mut stack = vec![id];
        while let Some(current) = stack.pop() {
            let Some(node) = self.entities.get(&current) else {
                continue;
            };
            out.push(current);
            stack.extend(node.children.iter().rev().copied());
        }
        out
    }

    /// Whether `ancestor` is `id` itself or one of its parents.
    pub fn is_ancestor_or_self(&self, ancestor: EntityId, id: EntityId) -> bool {
        let mut current = Some(id);
        while let Some(entity) = current {
            if entity == ancestor {
                return true;
            }
            current = self.parent(entity);
        }
        false
    }

    pub fn local_transform(&self, id: EntityId) -> Option<Transform> {
        self.entities.get(&id).map(|node| node.transform)
    }

    /// Update an entity's local transform and log the change.
    pub fn set_local_transform(&mut self, id: EntityId, new: Transform) -> bool {
        if let Some(node) = self.entities.get_mut(&id) {
            let old = node.transform;
            node.transform = new;
            self.event_log
                .push(SceneEvent::TransformUpdated { id, old, new });
            true
        } else {
            false
        }
    }

    /// Local-to-world matrix, composed through the parent chain.
    pub fn world_matrix(&self, id: EntityId) -> Option<Mat4> {
        let node = self.entities.get(&id)?;
        let local = node.transform.to_matrix();
        match node.parent {
            Some(parent) => Some(self.world_matrix(parent)? * local),
            None => Some(local),
        }
    }

    /// World-space transform. Roots return their local transform unchanged.
    pub fn world_transform(&self, id: EntityId) -> Option<Transform> {
        let node = self.entities.get(&id)?;
        match node.parent {
            None => Some(node.transform),
            Some(_) => self.world_matrix(id).map(Transform::from_matrix),
        }
    }

    /// Set the world-space position, keeping local rotation and scale.
    pub fn set_world_position(&mut self, id: EntityId, position: Vec3) -> bool {
        let Some(mut local) = self.local_transform(id) else {
            return false;
        };
        local.position = match self.parent(id).and_then(|p| self.world_matrix(p)) {
            Some(parent_world) => parent_world.inverse().transform_point3(position),
            None => position,
        };
        self.set_local_transform(id, local)
    }

    /// Set the world-space rotation, keeping local position and scale.
    pub fn set_world_rotation(&mut self, id: EntityId, rotation: Quat) -> bool {
        let Some(mut local) = self.local_transform(id) else {
            return false;
        };
        local.rotation = match self.parent(id).and_then(|p| self.world_transform(p)) {
            Some(parent_world) => (parent_world.rotation.inverse() * rotation).normalize(),
            None => rotation,
        };
        self.set_local_transform(id, local)
    }

    /// Move `child` under `parent` (or to the root when `None`), keeping its
    /// world pose.
    pub fn set_parent(
        &mut self,
        child: EntityId,
        parent: Option<EntityId>,
    ) -> Result<(), SceneError> {
        if !self.contains(child) {
            return Err(SceneError::EntityNotFound(child));
        }
        if let Some(p) = parent {
            if !self.contains(p) {
                return Err(SceneError::EntityNotFound(p));
            }
            if self.is_ancestor_or_self(child, p) {
                return Err(SceneError::CyclicParent { child, parent: p });
            }
        }
        let old = self.parent(child);
        if old == parent {
            return Ok(());
        }

        let child_world = self
            .world_matrix(child)
            .ok_or(SceneError::EntityNotFound(child))?;
        let new_local = match parent.and_then(|p| self.world_matrix(p)) {
            Some(parent_world) => Transform::from_matrix(parent_world.inverse() * child_world),
            None => Transform::from_matrix(child_world),
        };

        self.detach_from_parent(child);
        match parent.and_then(|p| self.entities.get_mut(&p)) {
            Some(parent_node) => parent_node.children.push(child),
            None => self.roots.push(child),
        }
        if let Some(node) = self.entities.get_mut(&child) {
            node.parent = parent;
        }
        self.set_local_transform(child, new_local);
        self.event_log.push(SceneEvent::Reparented {
            id: child,
            old,
            new: parent,
        });
        Ok(())
    }

    /// Create a live subtree from a prefab. Returns the root id.
    pub fn instantiate(&mut self, prefab: &Prefab) -> EntityId {
        let root = self.instantiate_node(&prefab.root, None);
        tracing::debug!(
            prefab = prefab.name(),
            root = %root.short(),
            nodes = prefab.node_count(),
            "instantiated prefab"
        );
        root
    }

    fn instantiate_node(&mut self, node: &PrefabNode, parent: Option<EntityId>) -> EntityId {
        let id = EntityId::new();
        self.insert_node(id, parent, node.transform);
        self.components.set_name(id, node.name.clone());
        if let Some(renderer) = &node.renderer {
            self.components.set_renderer(id, renderer.clone());
        }
        if let Some(collider) = node.collider {
            self.components.set_collider(id, collider);
        }
        if let Some(body) = node.rigid_body {
            self.components.set_rigid_body(id, body);
        }
        self.components.set_layer(id, node.layer);
        self.components.set_tag(id, node.tag.clone());
        for child in &node.children {
            self.instantiate_node(child, Some(id));
        }
        id
    }

    /// Capture a live subtree as a prefab. Descendants flagged `dont_save`
    /// are left out; the root is always captured.
    pub fn capture_prefab(&self, id: EntityId) -> Option<Prefab> {
        self.capture_node(id).map(Prefab::new)
    }

    fn capture_node(&self, id: EntityId) -> Option<PrefabNode> {
        let node = self.entities.get(&id)?;
        let c = &self.components;
        let children = node
            .children
            .iter()
            .filter(|child| !c.hide_flags(**child).dont_save)
            .filter_map(|child| self.capture_node(*child))
            .collect();
        Some(PrefabNode {
            name: c.get_name(id).unwrap_or_default().to_string(),
            transform: node.transform,
            renderer: c.get_renderer(id).cloned(),
            collider: c.get_collider(id).copied(),
            rigid_body: c.get_rigid_body(id).copied(),
            layer: c.layer(id),
            tag: c.tag(id).map(str::to_string),
            children,
        })
    }

    /// Create a live subtree from a prefab under `parent`. The prefab root's
    /// transform is taken as local to the parent.
    pub fn instantiate_under(
        &mut self,
        prefab: &Prefab,
        parent: Option<EntityId>,
    ) -> Result<EntityId, SceneError> {
        if let Some(p) = parent {
            if !self.contains(p) {
                return Err(SceneError::EntityNotFound(p));
            }
        }
        Ok(self.instantiate_node(&prefab.root, parent))
    }

    /// Position of `id` among its parent's children, or among the roots.
    pub fn sibling_index(&self, id: EntityId) -> Option<usize> {
        let node = self.entities.get(&id)?;
        let siblings = match node.parent {
            Some(parent) => self.children(parent),
            None => self.roots.as_slice(),
        };
        siblings.iter().position(|s| *s == id)
    }

    /// Move `id` to `index` among its siblings, clamped to the end.
    pub fn set_sibling_index(&mut self, id: EntityId, index: usize) -> Result<(), SceneError> {
        let parent = self
            .entities
            .get(&id)
            .ok_or(SceneError::EntityNotFound(id))?
            .parent;
        let siblings = match parent.and_then(|p| self.entities.get_mut(&p)) {
            Some(parent_node) => &mut parent_node.children,
            None => &mut self.roots,
        };
        siblings.retain(|s| *s != id);
        let index = index.min(siblings.len());
        siblings.insert(index, id);
        Ok(())
    }

    /// Advance the editor frame counter.
    pub fn advance_frame(&mut self) {
        self.frame += 1;
        self.event_log
            .push(SceneEvent::FrameAdvanced { frame: self.frame });
    }

    /// Compute a deterministic hash of the hierarchy and transforms.
    /// Uses canonical (BTreeMap) iteration order.
    pub fn state_hash(&self) -> u64 {
        let mut h: u64 = 0xcbf2_9ce4_8422_2325; // FNV offset basis
        let mix = |h: &mut u64, bytes: &[u8]| {
            for &b in bytes {
                *h ^= b as u64;
                *h = h.wrapping_mul(0x0100_0000_01b3);
            }
        };
        mix(&mut h, &self.frame.to_le_bytes());
        for (id, node) in &self.entities {
            mix(&mut h, id.0.as_bytes());
            if let Some(parent) = node.parent {
                mix(&mut h, parent.0.as_bytes());
            }
            let t = node.transform;
            for f in t
                .position
                .to_array()
                .into_iter()
                .chain(t.rotation.to_array())
                .chain(t.scale.to_array())
            {
                mix(&mut h, &f.to_le_bytes());
            }
        }
        h
    }
}
