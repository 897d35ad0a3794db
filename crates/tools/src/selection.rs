use glam::Quat;
use placekit_common::{EntityId, LAYER_COUNT};
use placekit_input::Action;
use placekit_kernel::Scene;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::ToolsError;

/// Tag reported for entities without one.
pub const UNTAGGED: &str = "Untagged";

/// Tags every project has, in editor order.
pub const BUILTIN_TAGS: [&str; 7] = [
    UNTAGGED,
    "Respawn",
    "Finish",
    "EditorOnly",
    "MainCamera",
    "Player",
    "GameController",
];

/// The editor selection. The first object is the active one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    objects: Vec<EntityId>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select `ids` in order, dropping duplicates.
    pub fn from_ids(ids: impl IntoIterator<Item = EntityId>) -> Self {
        let mut selection = Self::new();
        selection.set(ids);
        selection
    }

    pub fn set(&mut self, ids: impl IntoIterator<Item = EntityId>) {
        self.objects.clear();
        for id in ids {
            if !self.objects.contains(&id) {
                self.objects.push(id);
            }
        }
    }

    pub fn clear(&mut self) {
        self.objects.clear();
    }

    pub fn objects(&self) -> &[EntityId] {
        &self.objects
    }

    pub fn active(&self) -> Option<EntityId> {
        self.objects.first().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.objects.is_empty()
    }

    pub fn len(&self) -> usize {
        self.objects.len()
    }

    /// Forget entities that are no longer in `scene`.
    pub fn prune(&mut self, scene: &Scene) {
        self.objects.retain(|id| scene.contains(*id));
    }
}

/// Every visible entity on `layer` whose tag is `tag`, in id order.
/// Entities without a tag match [`UNTAGGED`].
pub fn select_by_layer_and_tag(scene: &Scene, layer: u8, tag: &str) -> Selection {
    let components = scene.components();
    let selection = Selection::from_ids(scene.entities().keys().copied().filter(|id| {
        !components.hide_flags(*id).hide_in_hierarchy
            && components.layer(*id) == layer
            && components.tag(*id).unwrap_or(UNTAGGED) == tag
    }));
    tracing::info!(layer, tag, count = selection.len(), "selection created");
    selection
}

/// How [`rename`] combines the context string with an existing name.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RenameMode {
    #[default]
    Prefix,
    Suffix,
    Replace,
}

impl RenameMode {
    pub const ALL: [Self; 3] = [Self::Prefix, Self::Suffix, Self::Replace];

    pub fn apply(&self, name: &str, context: &str) -> String {
        match self {
            Self::Prefix => format!("{context}{name}"),
            Self::Suffix => format!("{name}{context}"),
            Self::Replace => context.to_string(),
        }
    }
}

impl std::str::FromStr for RenameMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "prefix" => Ok(Self::Prefix),
            "suffix" => Ok(Self::Suffix),
            "replace" => Ok(Self::Replace),
            other => Err(format!("unknown rename mode: {other}")),
        }
    }
}

/// Rename every selected entity. Returns how many names changed.
pub fn rename(scene: &mut Scene, selection: &Selection, context: &str, mode: RenameMode) -> usize {
    let mut renamed = 0;
    for &id in selection.objects() {
        if !scene.contains(id) {
            continue;
        }
        let old = scene.name(id).unwrap_or_default().to_string();
        let new = mode.apply(&old, context);
        if new != old {
            scene.components_mut().set_name(id, new);
            renamed += 1;
        }
    }
    tracing::info!(?mode, context, renamed, "selection renamed");
    renamed
}

/// Rotate `id` by `degrees` about its own up axis.
pub fn rotate_about_up(scene: &mut Scene, id: EntityId, degrees: f32) -> Result<(), ToolsError> {
    let mut local = scene.local_transform(id).ok_or(ToolsError::Missing(id))?;
    local.rotation = (local.rotation * Quat::from_rotation_y(degrees.to_radians())).normalize();
    scene.set_local_transform(id, local);
    tracing::debug!(entity = %id.short(), degrees, "rotated");
    Ok(())
}

/// Destroy `id` and its subtree. Returns the number of entities removed.
pub fn delete_entity(scene: &mut Scene, id: EntityId) -> Result<usize, ToolsError> {
    let removed = scene.destroy(id)?;
    tracing::info!(entity = %id.short(), removed, "deleted");
    Ok(removed)
}

/// Run a shortcut action against the active selection. Returns false for
/// actions that are not selection tools.
pub fn apply_action(
    scene: &mut Scene,
    selection: &mut Selection,
    action: Action,
) -> Result<bool, ToolsError> {
    selection.prune(scene);
    match action {
        Action::RotateRight | Action::RotateLeft => {
            let id = selection.active().ok_or(ToolsError::NothingSelected)?;
            let degrees = action.yaw_degrees().unwrap_or_default();
            rotate_about_up(scene, id, degrees)?;
            Ok(true)
        }
        Action::DeleteSelected => {
            let id = selection.active().ok_or(ToolsError::NothingSelected)?;
            delete_entity(scene, id)?;
            selection.prune(scene);
            Ok(true)
        }
        _ => Ok(false),
    }
}

/// Names of the 32 layer slots. Unnamed slots are empty strings.
///
/// Deserialized names are laid over the built-in ones.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "BTreeMap<u8, String>", into = "BTreeMap<u8, String>")]
pub struct LayerNames(BTreeMap<u8, String>);

impl From<BTreeMap<u8, String>> for LayerNames {
    fn from(names: BTreeMap<u8, String>) -> Self {
        let mut layers = Self::default();
        for (layer, name) in names {
            if !layers.set(layer, name) {
                tracing::warn!(layer, "ignoring name for out-of-range layer");
            }
        }
        layers
    }
}

impl From<LayerNames> for BTreeMap<u8, String> {
    fn from(names: LayerNames) -> Self {
        names.0
    }
}

impl Default for LayerNames {
    fn default() -> Self {
        let builtin = [
            (0, "Default"),
            (1, "TransparentFX"),
            (2, "Ignore Raycast"),
            (4, "Water"),
            (5, "UI"),
        ];
        Self(builtin.into_iter().map(|(l, n)| (l, n.to_string())).collect())
    }
}

impl LayerNames {
    pub fn name(&self, layer: u8) -> &str {
        self.0.get(&layer).map(String::as_str).unwrap_or("")
    }

    /// Name a slot. Returns false for layers outside `0..32`.
    pub fn set(&mut self, layer: u8, name: impl Into<String>) -> bool {
        if layer >= LAYER_COUNT {
            return false;
        }
        self.0.insert(layer, name.into());
        true
    }

    /// All slots in layer order.
    pub fn all(&self) -> Vec<&str> {
        (0..LAYER_COUNT).map(|l| self.name(l)).collect()
    }

    /// Resolve a layer by name, or by its number.
    pub fn layer_of(&self, name: &str) -> Option<u8> {
        if let Some((layer, _)) = self.0.iter().find(|(_, n)| n.as_str() == name) {
            return Some(*layer);
        }
        name.parse::<u8>().ok().filter(|l| *l < LAYER_COUNT)
    }
}

/// Built-in tags followed by any other tag in use in `scene`, sorted.
pub fn all_tags(scene: &Scene) -> Vec<String> {
    let mut tags: Vec<String> = BUILTIN_TAGS.iter().map(|t| t.to_string()).collect();
    for tag in scene.components().distinct_tags() {
        if !BUILTIN_TAGS.contains(&tag) {
            tags.push(tag.to_string());
        }
    }
    tags
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec3;
    use placekit_common::Transform;
    use placekit_ecs::HideFlags;

    fn tagged(scene: &mut Scene, name: &str, layer: u8, tag: Option<&str>) -> EntityId {
        let id = scene.spawn(name, Transform::default());
        scene.components_mut().set_layer(id, layer);
        scene.components_mut().set_tag(id, tag.map(str::to_string));
        id
    }

    #[test]
    fn selection_is_layer_and_tag_intersection() {
        let mut scene = Scene::new();
        let both = tagged(&mut scene, "Both", 8, Some("Enemy"));
        tagged(&mut scene, "LayerOnly", 8, Some("Player"));
        tagged(&mut scene, "TagOnly", 0, Some("Enemy"));
        let hidden = tagged(&mut scene, "Scratch", 8, Some("Enemy"));
        scene.components_mut().set_hide_flags(hidden, HideFlags::SCRATCH);

        let selection = select_by_layer_and_tag(&scene, 8, "Enemy");
        assert_eq!(selection.objects(), &[both]);
    }

    #[test]
    fn untagged_matches_entities_without_tag() {
        let mut scene = Scene::new();
        let plain = tagged(&mut scene, "Plain", 0, None);
        tagged(&mut scene, "Hero", 0, Some("Player"));
        let selection = select_by_layer_and_tag(&scene, 0, UNTAGGED);
        assert_eq!(selection.objects(), &[plain]);
    }

    #[test]
    fn rename_modes() {
        assert_eq!(RenameMode::Prefix.apply("Rock", "Big"), "BigRock");
        assert_eq!(RenameMode::Suffix.apply("Rock", "_01"), "Rock_01");
        assert_eq!(RenameMode::Replace.apply("Rock", "Stone"), "Stone");
        assert_eq!("SUFFIX".parse::<RenameMode>(), Ok(RenameMode::Suffix));
        assert!("sufix".parse::<RenameMode>().is_err());
    }

    #[test]
    fn rename_applies_to_whole_selection() {
        let mut scene = Scene::new();
        let a = scene.spawn("Rock", Transform::default());
        let b = scene.spawn("Tree", Transform::default());
        let untouched = scene.spawn("Lamp", Transform::default());
        let selection = Selection::from_ids([a, b]);

        assert_eq!(rename(&mut scene, &selection, "Env_", RenameMode::Prefix), 2);
        assert_eq!(scene.name(a), Some("Env_Rock"));
        assert_eq!(scene.name(b), Some("Env_Tree"));
        assert_eq!(scene.name(untouched), Some("Lamp"));

        assert_eq!(rename(&mut scene, &selection, "Prop", RenameMode::Replace), 2);
        assert_eq!(rename(&mut scene, &selection, "Prop", RenameMode::Replace), 0);
    }

    #[test]
    fn rotate_shortcuts_post_multiply() {
        let mut scene = Scene::new();
        let tilted = Quat::from_rotation_x(0.3);
        let id = scene.spawn(
            "Crate",
            Transform {
                rotation: tilted,
                ..Transform::default()
            },
        );
        let mut selection = Selection::from_ids([id]);

        assert!(apply_action(&mut scene, &mut selection, Action::RotateRight).unwrap());
        let expected = tilted * Quat::from_rotation_y(45f32.to_radians());
        let got = scene.local_transform(id).unwrap().rotation;
        assert!(got.abs_diff_eq(expected, 1e-6));

        apply_action(&mut scene, &mut selection, Action::RotateLeft).unwrap();
        let got = scene.local_transform(id).unwrap().rotation;
        assert!(got.abs_diff_eq(tilted, 1e-5));
    }

    #[test]
    fn delete_removes_subtree_and_prunes_selection() {
        let mut scene = Scene::new();
        let parent = scene.spawn("Parent", Transform::default());
        let child = scene
            .spawn_child(parent, "Child", Transform::from_position(Vec3::X))
            .unwrap();
        let other = scene.spawn("Other", Transform::default());
        let mut selection = Selection::from_ids([parent, child, other]);

        assert!(apply_action(&mut scene, &mut selection, Action::DeleteSelected).unwrap());
        assert!(!scene.contains(parent));
        assert!(!scene.contains(child));
        assert_eq!(selection.objects(), &[other]);
    }

    #[test]
    fn actions_need_a_selection() {
        let mut scene = Scene::new();
        let mut selection = Selection::new();
        assert!(matches!(
            apply_action(&mut scene, &mut selection, Action::RotateRight),
            Err(ToolsError::NothingSelected)
        ));
        assert!(!apply_action(&mut scene, &mut selection, Action::Noop).unwrap());
    }

    #[test]
    fn layer_names_have_32_slots() {
        let mut names = LayerNames::default();
        let all = names.all();
        assert_eq!(all.len(), 32);
        assert_eq!(all[0], "Default");
        assert_eq!(all[3], "");
        assert!(names.set(12, "Preview"));
        assert!(!names.set(32, "Nope"));
        assert_eq!(names.layer_of("Preview"), Some(12));
        assert_eq!(names.layer_of("Water"), Some(4));
        assert_eq!(names.layer_of("9"), Some(9));
        assert_eq!(names.layer_of("40"), None);
    }

    #[test]
    fn deserialized_names_keep_builtins() {
        let names: LayerNames = serde_json::from_str(r#"{"8": "Ground", "40": "Nope"}"#).unwrap();
        assert_eq!(names.name(8), "Ground");
        assert_eq!(names.name(0), "Default");
        assert_eq!(names.layer_of("Nope"), None);
    }

    #[test]
    fn tags_list_builtins_then_scene_tags() {
        let mut scene = Scene::new();
        tagged(&mut scene, "Hero", 0, Some("Player"));
        tagged(&mut scene, "Orc", 0, Some("Enemy"));
        let tags = all_tags(&scene);
        assert_eq!(tags.len(), BUILTIN_TAGS.len() + 1);
        assert_eq!(tags.last().map(String::as_str), Some("Enemy"));
    }
}
