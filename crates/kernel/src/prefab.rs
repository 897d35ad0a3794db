use serde::{Deserialize, Serialize};
use placekit_common::Transform;
use placekit_ecs::{Collider, MeshRenderer, RigidBody};

/// A reusable entity template: one node tree, instantiated into a scene as a
/// fresh subtree.
///
/// This is the typed clone contract between scenes and asset files: a live
/// subtree is captured into a `Prefab`, and a `Prefab` instantiates into a
/// live subtree, without any per-field reflection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prefab {
    pub root: PrefabNode,
}

/// One node of a prefab tree. Transforms are local to the parent node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrefabNode {
    pub name: String,
    #[serde(default)]
    pub transform: Transform,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub renderer: Option<MeshRenderer>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collider: Option<Collider>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rigid_body: Option<RigidBody>,
    #[serde(default)]
    pub layer: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tag: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<PrefabNode>,
}

impl PrefabNode {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            transform: Transform::default(),
            renderer: None,
            collider: None,
            rigid_body: None,
            layer: 0,
            tag: None,
            children: Vec::new(),
        }
    }

    pub fn with_transform(mut self, transform: Transform) -> Self {
        self.transform = transform;
        self
    }

    pub fn with_renderer(mut self, renderer: MeshRenderer) -> Self {
        self.renderer = Some(renderer);
        self
    }

    pub fn with_collider(mut self, collider: Collider) -> Self {
        self.collider = Some(collider);
        self
    }

    pub fn with_rigid_body(mut self, body: RigidBody) -> Self {
        self.rigid_body = Some(body);
        self
    }

    pub fn with_layer(mut self, layer: u8) -> Self {
        self.layer = layer;
        self
    }

    pub fn with_tag(mut self, tag: impl Into<String>) -> Self {
        self.tag = Some(tag.into());
        self
    }

    pub fn with_child(mut self, child: PrefabNode) -> Self {
        self.children.push(child);
        self
    }

    /// Number of nodes in this subtree, including itself.
    pub fn node_count(&self) -> usize {
        1 + self.children.iter().map(PrefabNode::node_count).sum::<usize>()
    }
}

impl Prefab {
    pub fn new(root: PrefabNode) -> Self {
        Self { root }
    }

    pub fn name(&self) -> &str {
        &self.root.name
    }

    pub fn node_count(&self) -> usize {
        self.root.node_count()
    }
}
