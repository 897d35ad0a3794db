use std::collections::BTreeSet;

use placekit_assets::AssetIndex;
use placekit_common::EntityId;
use placekit_kernel::Scene;
use serde::{Deserialize, Serialize};

use crate::TilerError;
use crate::config::GridConfig;
use crate::discover::discover;
use crate::extent::ExtentPolicy;

/// The active render pipeline: which shaders it can draw and what to use
/// instead of the rest.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderPipeline {
    pub name: String,
    pub supported: BTreeSet<String>,
    pub fallback: String,
}

impl Default for RenderPipeline {
    fn default() -> Self {
        let supported = ["Lit", "Simple Lit", "Unlit", "Particles/Unlit"]
            .into_iter()
            .map(|s| format!("Lightweight Render Pipeline/{s}"))
            .collect();
        Self {
            name: "Lightweight Render Pipeline".into(),
            supported,
            fallback: "Lightweight Render Pipeline/Lit".into(),
        }
    }
}

impl RenderPipeline {
    pub fn is_supported(&self, shader: &str) -> bool {
        self.supported.contains(shader)
    }
}

/// Swap unsupported shaders in the hierarchy under `root` for the fallback.
///
/// A node whose renderer gets fixed is not descended into; every other node
/// (no renderer, or a supported one) recurses into its children. Returns the
/// entities that were changed.
pub fn update_shaders(scene: &mut Scene, root: EntityId, pipeline: &RenderPipeline) -> Vec<EntityId> {
    let mut fixed = Vec::new();
    fix_node(scene, root, pipeline, &mut fixed);
    fixed
}

fn fix_node(scene: &mut Scene, id: EntityId, pipeline: &RenderPipeline, fixed: &mut Vec<EntityId>) {
    let needs_fix = scene
        .components()
        .get_renderer(id)
        .filter(|r| !pipeline.is_supported(&r.material.shader))
        .cloned();
    if let Some(mut renderer) = needs_fix {
        tracing::debug!(
            entity = %id.short(),
            shader = %renderer.material.shader,
            fallback = %pipeline.fallback,
            "shader not supported"
        );
        renderer.material.shader = pipeline.fallback.clone();
        scene.components_mut().set_renderer(id, renderer);
        fixed.push(id);
        return;
    }
    let children = scene.children(id).to_vec();
    for child in children {
        fix_node(scene, child, pipeline, fixed);
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ShaderReport {
    pub instances: usize,
    pub fixed: Vec<EntityId>,
}

/// Discover every fitting prefab under `root` and fix the shaders of each
/// instance. The instances stay in the scene where discovery put them.
pub fn update_shaders_under(
    scene: &mut Scene,
    index: &impl AssetIndex,
    root: &str,
    config: &GridConfig,
    policy: &dyn ExtentPolicy,
    pipeline: &RenderPipeline,
) -> Result<ShaderReport, TilerError> {
    config.validate()?;
    let _span = tracing::info_span!("tiler.update_shaders", root, pipeline = %pipeline.name).entered();
    let found = discover(scene, index, root, config, policy);
    let mut report = ShaderReport {
        instances: found.accepted.len(),
        fixed: Vec::new(),
    };
    for (instance, _) in &found.accepted {
        report.fixed.extend(update_shaders(scene, *instance, pipeline));
    }
    tracing::info!(instances = report.instances, fixed = report.fixed.len(), "shaders updated");
    Ok(report)
}
