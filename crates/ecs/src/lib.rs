//! Deterministic component storage for scene entities.
//!
//! Components are stored in BTreeMap for deterministic iteration order.
//! Each component kind has its own storage keyed by EntityId.
//!
//! # Invariants
//! - Structural component mutations (add, replace, remove) produce events.
//! - Iteration order is deterministic (BTreeMap).
//! - Rigid-body velocity integration goes through `get_rigid_body_mut` and is not logged.

use glam::Vec3;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use placekit_common::EntityId;

/// Surface description attached to a renderer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Material {
    pub name: String,
    pub shader: String,
}

impl Default for Material {
    fn default() -> Self {
        Self {
            name: "default".into(),
            shader: "Standard".into(),
        }
    }
}

/// Mesh renderer: local bounds and the material used to draw it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MeshRenderer {
    /// Half-size of the mesh bounds in the entity's local space.
    pub extents: Vec3,
    #[serde(default)]
    pub material: Material,
}

/// Collision shape, centered on the entity origin in local space.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "shape", rename_all = "snake_case")]
pub enum Collider {
    Box { half_extents: Vec3 },
    Sphere { radius: f32 },
}

impl Default for Collider {
    fn default() -> Self {
        Self::Box {
            half_extents: Vec3::splat(0.5),
        }
    }
}

/// Dynamics body. Non-kinematic bodies are moved by the physics step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RigidBody {
    pub mass: f32,
    pub velocity: Vec3,
    pub is_kinematic: bool,
    pub use_gravity: bool,
}

impl Default for RigidBody {
    fn default() -> Self {
        Self {
            mass: 1.0,
            velocity: Vec3::ZERO,
            is_kinematic: false,
            use_gravity: true,
        }
    }
}

/// Editor visibility and persistence flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct HideFlags {
    /// Not listed by hierarchy views or inspector listings.
    pub hide_in_hierarchy: bool,
    /// Never written out when the scene is captured.
    pub dont_save: bool,
}

impl HideFlags {
    /// Flags for editor-owned scratch objects.
    pub const SCRATCH: Self = Self {
        hide_in_hierarchy: true,
        dont_save: true,
    };
}

/// Events produced by component mutations.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum ComponentEvent {
    NameAdded { entity: EntityId, name: String },
    NameRemoved { entity: EntityId, name: String },
    NameUpdated { entity: EntityId, old: String, new: String },
    RendererAdded { entity: EntityId, renderer: MeshRenderer },
    RendererRemoved { entity: EntityId, renderer: MeshRenderer },
    RendererUpdated { entity: EntityId, old: MeshRenderer, new: MeshRenderer },
    ColliderAdded { entity: EntityId, collider: Collider },
    ColliderRemoved { entity: EntityId, collider: Collider },
    RigidBodyAdded { entity: EntityId, body: RigidBody },
    RigidBodyRemoved { entity: EntityId, body: RigidBody },
    LayerChanged { entity: EntityId, old: u8, new: u8 },
    TagChanged { entity: EntityId, old: Option<String>, new: Option<String> },
    HideFlagsChanged { entity: EntityId, old: HideFlags, new: HideFlags },
    BehaviorAttached { entity: EntityId, behavior: String },
    BehaviorDetached { entity: EntityId, behavior: String },
}

/// Deterministic component storage for all component kinds.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ComponentStore {
    names: BTreeMap<EntityId, String>,
    renderers: BTreeMap<EntityId, MeshRenderer>,
    colliders: BTreeMap<EntityId, Collider>,
    rigid_bodies: BTreeMap<EntityId, RigidBody>,
    layers: BTreeMap<EntityId, u8>,
    tags: BTreeMap<EntityId, String>,
    hide_flags: BTreeMap<EntityId, HideFlags>,
    behaviors: BTreeMap<EntityId, BTreeSet<String>>,
    #[serde(skip)]
    events: Vec<ComponentEvent>,
}

impl ComponentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drain and return all pending component events.
    pub fn drain_events(&mut self) -> Vec<ComponentEvent> {
        std::mem::take(&mut self.events)
    }

    /// Read-only access to pending events.
    pub fn events(&self) -> &[ComponentEvent] {
        &self.events
    }

    // --- Name ---
    pub fn set_name(&mut self, entity: EntityId, name: impl Into<String>) {
        let name = name.into();
        if let Some(old) = self.names.get(&entity) {
            self.events.push(ComponentEvent::NameUpdated {
                entity,
                old: old.clone(),
                new: name.clone(),
            });
        } else {
            self.events.push(ComponentEvent::NameAdded {
                entity,
                name: name.clone(),
            });
        }
        self.names.insert(entity, name);
    }

    pub fn remove_name(&mut self, entity: EntityId) -> Option<String> {
        let removed = self.names.remove(&entity);
        if let Some(ref name) = removed {
            self.events.push(ComponentEvent::NameRemoved {
                entity,
                name: name.clone(),
            });
        }
        removed
    }

    pub fn get_name(&self, entity: EntityId) -> Option<&str> {
        self.names.get(&entity).map(String::as_str)
    }

    // --- Renderer ---
    pub fn set_renderer(&mut self, entity: EntityId, renderer: MeshRenderer) {
        if let Some(old) = self.renderers.get(&entity) {
            self.events.push(ComponentEvent::RendererUpdated {
                entity,
                old: old.clone(),
                new: renderer.clone(),
            });
        } else {
            self.events.push(ComponentEvent::RendererAdded {
                entity,
                renderer: renderer.clone(),
            });
        }
        self.renderers.insert(entity, renderer);
    }

    pub fn remove_renderer(&mut self, entity: EntityId) -> Option<MeshRenderer> {
        let removed = self.renderers.remove(&entity);
        if let Some(ref renderer) = removed {
            self.events.push(ComponentEvent::RendererRemoved {
                entity,
                renderer: renderer.clone(),
            });
        }
        removed
    }

    pub fn get_renderer(&self, entity: EntityId) -> Option<&MeshRenderer> {
        self.renderers.get(&entity)
    }

    pub fn renderers(&self) -> &BTreeMap<EntityId, MeshRenderer> {
        &self.renderers
    }

    // --- Collider ---
    pub fn set_collider(&mut self, entity: EntityId, collider: Collider) {
        self.events.push(ComponentEvent::ColliderAdded { entity, collider });
        self.colliders.insert(entity, collider);
    }

    pub fn remove_collider(&mut self, entity: EntityId) -> Option<Collider> {
        let removed = self.colliders.remove(&entity);
        if let Some(collider) = removed {
            self.events
                .push(ComponentEvent::ColliderRemoved { entity, collider });
        }
        removed
    }

    pub fn get_collider(&self, entity: EntityId) -> Option<&Collider> {
        self.colliders.get(&entity)
    }

    pub fn colliders(&self) -> &BTreeMap<EntityId, Collider> {
        &self.colliders
    }

    // --- RigidBody ---
    pub fn set_rigid_body(&mut self, entity: EntityId, body: RigidBody) {
        self.events.push(ComponentEvent::RigidBodyAdded { entity, body });
        self.rigid_bodies.insert(entity, body);
    }

    pub fn remove_rigid_body(&mut self, entity: EntityId) -> Option<RigidBody> {
        let removed = self.rigid_bodies.remove(&entity);
        if let Some(body) = removed {
            self.events
                .push(ComponentEvent::RigidBodyRemoved { entity, body });
        }
        removed
    }

    pub fn get_rigid_body(&self, entity: EntityId) -> Option<&RigidBody> {
        self.rigid_bodies.get(&entity)
    }

    pub fn get_rigid_body_mut(&mut self, entity: EntityId) -> Option<&mut RigidBody> {
        self.rigid_bodies.get_mut(&entity)
    }

    pub fn rigid_bodies(&self) -> &BTreeMap<EntityId, RigidBody> {
        &self.rigid_bodies
    }

    // --- Layer ---
    /// Layer of an entity; entities start on layer 0.
    pub fn layer(&self, entity: EntityId) -> u8 {
        self.layers.get(&entity).copied().unwrap_or(0)
    }

    pub fn set_layer(&mut self, entity: EntityId, layer: u8) {
        let old = self.layer(entity);
        if old != layer {
            self.events.push(ComponentEvent::LayerChanged {
                entity,
                old,
                new: layer,
            });
        }
        self.layers.insert(entity, layer);
    }

    // --- Tag ---
    pub fn tag(&self, entity: EntityId) -> Option<&str> {
        self.tags.get(&entity).map(String::as_str)
    }

    pub fn set_tag(&mut self, entity: EntityId, tag: Option<String>) {
        let old = self.tags.get(&entity).cloned();
        if old == tag {
            return;
        }
        self.events.push(ComponentEvent::TagChanged {
            entity,
            old,
            new: tag.clone(),
        });
        match tag {
            Some(tag) => self.tags.insert(entity, tag),
            None => self.tags.remove(&entity),
        };
    }

    /// Distinct tags in use, sorted.
    pub fn distinct_tags(&self) -> BTreeSet<&str> {
        self.tags.values().map(String::as_str).collect()
    }

    // --- HideFlags ---
    pub fn hide_flags(&self, entity: EntityId) -> HideFlags {
        self.hide_flags.get(&entity).copied().unwrap_or_default()
    }

    pub fn set_hide_flags(&mut self, entity: EntityId, flags: HideFlags) {
        let old = self.hide_flags(entity);
        if old != flags {
            self.events.push(ComponentEvent::HideFlagsChanged {
                entity,
                old,
                new: flags,
            });
        }
        self.hide_flags.insert(entity, flags);
    }

    // --- Behaviors ---
    /// Attach a named behavior. Returns false if it was already attached.
    pub fn attach_behavior(&mut self, entity: EntityId, behavior: &str) -> bool {
        let inserted = self
            .behaviors
            .entry(entity)
            .or_default()
            .insert(behavior.to_string());
        if inserted {
            tracing::debug!(entity = %entity.short(), behavior, "behavior attached");
            self.events.push(ComponentEvent::BehaviorAttached {
                entity,
                behavior: behavior.to_string(),
            });
        }
        inserted
    }

    /// Detach a named behavior. Returns false if it was not attached.
    pub fn detach_behavior(&mut self, entity: EntityId, behavior: &str) -> bool {
        let Some(set) = self.behaviors.get_mut(&entity) else {
            return false;
        };
        let removed = set.remove(behavior);
        if set.is_empty() {
            self.behaviors.remove(&entity);
        }
        if removed {
            tracing::debug!(entity = %entity.short(), behavior, "behavior detached");
            self.events.push(ComponentEvent::BehaviorDetached {
                entity,
                behavior: behavior.to_string(),
            });
        }
        removed
    }

    pub fn has_behavior(&self, entity: EntityId, behavior: &str) -> bool {
        self.behaviors
            .get(&entity)
            .is_some_and(|set| set.contains(behavior))
    }

    /// Entities carrying the named behavior, in id order.
    pub fn with_behavior(&self, behavior: &str) -> Vec<EntityId> {
        self.behaviors
            .iter()
            .filter(|(_, set)| set.contains(behavior))
            .map(|(id, _)| *id)
            .collect()
    }

    /// Remove all components for an entity.
    pub fn remove_entity(&mut self, entity: EntityId) {
        self.remove_name(entity);
        self.remove_renderer(entity);
        self.remove_collider(entity);
        self.remove_rigid_body(entity);
        self.layers.remove(&entity);
        self.tags.remove(&entity);
        self.hide_flags.remove(&entity);
        if let Some(set) = self.behaviors.remove(&entity) {
            for behavior in set {
                self.events
                    .push(ComponentEvent::BehaviorDetached { entity, behavior });
            }
        }
    }

    /// Copy every component of `from` onto `to`, replacing what `to` had.
    ///
    /// Names and behaviors are identity, not data, and are left alone.
    pub fn copy_components(&mut self, from: EntityId, to: EntityId) {
        if from == to {
            return;
        }
        match self.renderers.get(&from).cloned() {
            Some(renderer) => self.set_renderer(to, renderer),
            None => {
                self.remove_renderer(to);
            }
        }
        match self.colliders.get(&from).copied() {
            Some(collider) => self.set_collider(to, collider),
            None => {
                self.remove_collider(to);
            }
        }
        match self.rigid_bodies.get(&from).copied() {
            Some(body) => self.set_rigid_body(to, body),
            None => {
                self.remove_rigid_body(to);
            }
        }
        self.set_layer(to, self.layer(from));
        self.set_tag(to, self.tags.get(&from).cloned());
        self.set_hide_flags(to, self.hide_flags(from));
    }

    /// Replay a component event (event log replay).
    pub fn apply_event(&mut self, event: &ComponentEvent) {
        match event {
            ComponentEvent::NameAdded { entity, name } => {
                self.names.insert(*entity, name.clone());
            }
            ComponentEvent::NameRemoved { entity, .. } => {
                self.names.remove(entity);
            }
            ComponentEvent::NameUpdated { entity, new, .. } => {
                self.names.insert(*entity, new.clone());
            }
            ComponentEvent::RendererAdded { entity, renderer } => {
                self.renderers.insert(*entity, renderer.clone());
            }
            ComponentEvent::RendererRemoved { entity, .. } => {
                self.renderers.remove(entity);
            }
            ComponentEvent::RendererUpdated { entity, new, .. } => {
                self.renderers.insert(*entity, new.clone());
            }
            ComponentEvent::ColliderAdded { entity, collider } => {
                self.colliders.insert(*entity, *collider);
            }
            ComponentEvent::ColliderRemoved { entity, .. } => {
                self.colliders.remove(entity);
            }
            ComponentEvent::RigidBodyAdded { entity, body } => {
                self.rigid_bodies.insert(*entity, *body);
            }
            ComponentEvent::RigidBodyRemoved { entity, .. } => {
                self.rigid_bodies.remove(entity);
            }
            ComponentEvent::LayerChanged { entity, new, .. } => {
                self.layers.insert(*entity, *new);
            }
            ComponentEvent::TagChanged { entity, new, .. } => match new {
                Some(tag) => {
                    self.tags.insert(*entity, tag.clone());
                }
                None => {
                    self.tags.remove(entity);
                }
            },
            ComponentEvent::HideFlagsChanged { entity, new, .. } => {
                self.hide_flags.insert(*entity, *new);
            }
            ComponentEvent::BehaviorAttached { entity, behavior } => {
                self.behaviors
                    .entry(*entity)
                    .or_default()
                    .insert(behavior.clone());
            }
            ComponentEvent::BehaviorDetached { entity, behavior } => {
                if let Some(set) = self.behaviors.get_mut(entity) {
                    set.remove(behavior);
                    if set.is_empty() {
                        self.behaviors.remove(entity);
                    }
                }
            }
        }
    }
}
