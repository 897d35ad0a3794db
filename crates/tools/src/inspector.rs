use placekit_common::EntityId;
use placekit_kernel::Scene;

/// Scene inspector for developer tooling.
///
/// Read-only queries against a scene for debugging and the CLI front end.
pub struct SceneInspector;

impl SceneInspector {
    /// Produce a summary of the scene state.
    pub fn summary(scene: &Scene) -> SceneSummary {
        let components = scene.components();
        let hidden = scene
            .entities()
            .keys()
            .filter(|id| components.hide_flags(**id).hide_in_hierarchy)
            .count();
        SceneSummary {
            frame: scene.frame(),
            entity_count: scene.entity_count(),
            root_count: scene.roots().len(),
            hidden_count: hidden,
            pending_events: scene.events().len(),
        }
    }

    /// Local transform, hierarchy links and component presence for one entity.
    pub fn inspect_entity(scene: &Scene, id: EntityId) -> Option<EntityInfo> {
        let node = scene.get(id)?;
        let components = scene.components();
        let t = node.transform;
        Some(EntityInfo {
            id,
            name: scene.name(id).unwrap_or_default().to_string(),
            parent: node.parent,
            child_count: node.children.len(),
            position: t.position.to_array(),
            rotation: t.rotation.to_array(),
            scale: t.scale.to_array(),
            layer: components.layer(id),
            tag: components.tag(id).map(str::to_string),
            has_renderer: components.get_renderer(id).is_some(),
            has_collider: components.get_collider(id).is_some(),
            has_rigid_body: components.get_rigid_body(id).is_some(),
        })
    }

    /// Visible entities in id order. Scratch objects are left out.
    pub fn list_entities(scene: &Scene) -> Vec<EntityId> {
        let components = scene.components();
        scene
            .entities()
            .keys()
            .copied()
            .filter(|id| !components.hide_flags(*id).hide_in_hierarchy)
            .collect()
    }
}

/// Summary of scene state for the inspector.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SceneSummary {
    pub frame: u64,
    pub entity_count: usize,
    pub root_count: usize,
    pub hidden_count: usize,
    pub pending_events: usize,
}

impl std::fmt::Display for SceneSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "Scene: frame={} entities={} roots={} hidden={} pending_events={}",
            self.frame, self.entity_count, self.root_count, self.hidden_count, self.pending_events
        )
    }
}

/// Detailed info about a single entity.
#[derive(Debug, Clone, PartialEq)]
pub struct EntityInfo {
    pub id: EntityId,
    pub name: String,
    pub parent: Option<EntityId>,
    pub child_count: usize,
    pub position: [f32; 3],
    pub rotation: [f32; 4],
    pub scale: [f32; 3],
    pub layer: u8,
    pub tag: Option<String>,
    pub has_renderer: bool,
    pub has_collider: bool,
    pub has_rigid_body: bool,
}

impl std::fmt::Display for EntityInfo {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} [{}] layer={} tag={} pos=({:.2}, {:.2}, {:.2}) scale=({:.2}, {:.2}, {:.2})",
            self.name,
            self.id.short(),
            self.layer,
            self.tag.as_deref().unwrap_or("-"),
            self.position[0],
            self.position[1],
            self.position[2],
            self.scale[0],
            self.scale[1],
            self.scale[2],
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use placekit_common::Transform;
    use placekit_ecs::HideFlags;

    #[test]
    fn summary_empty_scene() {
        let scene = Scene::new();
        let summary = SceneInspector::summary(&scene);
        assert_eq!(summary.frame, 0);
        assert_eq!(summary.entity_count, 0);
        assert_eq!(summary.hidden_count, 0);
    }

    #[test]
    fn summary_counts_roots_and_hidden() {
        let mut scene = Scene::new();
        let root = scene.spawn("Root", Transform::default());
        scene.spawn_child(root, "Child", Transform::default()).unwrap();
        let scratch = scene.spawn("Preview", Transform::default());
        scene
            .components_mut()
            .set_hide_flags(scratch, HideFlags::SCRATCH);
        scene.advance_frame();

        let summary = SceneInspector::summary(&scene);
        assert_eq!(summary.frame, 1);
        assert_eq!(summary.entity_count, 3);
        assert_eq!(summary.root_count, 2);
        assert_eq!(summary.hidden_count, 1);
        assert!(summary.pending_events >= 4);
    }

    #[test]
    fn inspect_entity_found() {
        let mut scene = Scene::new();
        let id = scene.spawn("Crate", Transform::from_position(Vec3::new(1.0, 2.0, 3.0)));
        scene.components_mut().set_layer(id, 4);

        let info = SceneInspector::inspect_entity(&scene, id).unwrap();
        assert_eq!(info.name, "Crate");
        assert_eq!(info.position, [1.0, 2.0, 3.0]);
        assert_eq!(info.layer, 4);
        assert!(!info.has_renderer);
        assert!(format!("{info}").contains("layer=4"));
    }

    #[test]
    fn inspect_entity_not_found() {
        let scene = Scene::new();
        assert!(SceneInspector::inspect_entity(&scene, EntityId::new()).is_none());
    }

    #[test]
    fn list_entities_skips_scratch() {
        let mut scene = Scene::new();
        let a = scene.spawn("A", Transform::default());
        let hidden = scene.spawn("Preview", Transform::default());
        scene
            .components_mut()
            .set_hide_flags(hidden, HideFlags::SCRATCH);

        assert_eq!(SceneInspector::list_entities(&scene), vec![a]);
    }

    #[test]
    fn summary_display() {
        let summary = SceneInspector::summary(&Scene::new());
        assert!(format!("{summary}").contains("frame=0"));
    }
}
