use glam::{Vec2, Vec3};
use placekit_assets::{AssetIndex, AssetQuery};
use placekit_common::EntityId;
use placekit_kernel::Scene;

use crate::config::GridConfig;
use crate::extent::ExtentPolicy;

/// Whether an asset with aggregated half-extent `extent` fits a cell of
/// `max_extent`. The z component is not checked.
pub fn accepts(extent: Vec3, max_extent: Vec2) -> bool {
    extent != Vec3::ZERO && extent.x < max_extent.x && extent.y < max_extent.y
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// No renderer anywhere in the hierarchy.
    Empty,
    /// Larger than a grid cell in x or y.
    Oversized,
}

#[derive(Debug, Clone, PartialEq)]
pub struct RejectedAsset {
    pub path: String,
    pub extent: Vec3,
    pub reason: RejectReason,
}

/// Result of walking an asset folder.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Discovery {
    /// Live instances that fit, in discovery order, with their asset paths.
    pub accepted: Vec<(EntityId, String)>,
    /// Instantiated and destroyed again.
    pub rejected: Vec<RejectedAsset>,
    /// Leaves that could not be loaded as prefabs.
    pub skipped: Vec<String>,
}

impl Discovery {
    pub fn visited(&self) -> usize {
        self.accepted.len() + self.rejected.len() + self.skipped.len()
    }
}

/// Walk `root` recursively, instantiating every prefab leaf into `scene`.
///
/// Entries are visited in path order. Instances that fail [`accepts`] are
/// destroyed on the spot. Nothing here returns an error: unloadable leaves
/// are logged and listed in [`Discovery::skipped`].
pub fn discover(
    scene: &mut Scene,
    index: &impl AssetIndex,
    root: &str,
    config: &GridConfig,
    policy: &dyn ExtentPolicy,
) -> Discovery {
    let _span = tracing::info_span!("tiler.discover", root, policy = policy.name()).entered();
    let mut found = Discovery::default();
    walk(scene, index, root, config, policy, &mut found);
    tracing::info!(
        accepted = found.accepted.len(),
        rejected = found.rejected.len(),
        skipped = found.skipped.len(),
        "discovery finished"
    );
    found
}

fn walk(
    scene: &mut Scene,
    index: &impl AssetIndex,
    folder: &str,
    config: &GridConfig,
    policy: &dyn ExtentPolicy,
    found: &mut Discovery,
) {
    for id in index.find_assets(&AssetQuery::all(), folder) {
        let Some(path) = index.resolve_path(id) else {
            tracing::warn!(?id, "asset id no longer resolves");
            continue;
        };
        if index.is_directory(path) {
            tracing::debug!(folder = path, "iterating through folder");
            walk(scene, index, path, config, policy, found);
            continue;
        }
        let prefab = match index.load_prefab(path) {
            Ok(prefab) => prefab,
            Err(err) => {
                tracing::warn!(path, %err, "skipping asset");
                found.skipped.push(path.to_string());
                continue;
            }
        };

        let instance = scene.instantiate(&prefab);
        let extent = policy.extent(scene, instance);
        if accepts(extent, config.max_extent) {
            found.accepted.push((instance, path.to_string()));
            continue;
        }
        let reason = if extent == Vec3::ZERO {
            tracing::warn!(path, "asset has no renderer, out of bounds; not instanced");
            RejectReason::Empty
        } else {
            tracing::warn!(path, ?extent, "asset extents bigger than the limit; not instanced");
            RejectReason::Oversized
        };
        if let Err(err) = scene.destroy(instance) {
            tracing::warn!(path, %err, "could not destroy rejected instance");
        }
        found.rejected.push(RejectedAsset {
            path: path.to_string(),
            extent,
            reason,
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extent::UntransformedMaxExtent;
    use crate::test_support::{index_with, renderer, tile};
    use placekit_kernel::{Prefab, PrefabNode};

    #[test]
    fn acceptance_ignores_z() {
        let max = Vec2::new(16.0, 16.0);
        assert!(accepts(Vec3::new(1.0, 1.0, 0.0), max));
        assert!(accepts(Vec3::new(1.0, 1.0, 1000.0), max));
        assert!(accepts(Vec3::new(15.9, 15.9, 16.0), max));
    }

    #[test]
    fn acceptance_is_strict_in_x_and_y() {
        let max = Vec2::new(16.0, 16.0);
        assert!(!accepts(Vec3::new(16.0, 1.0, 1.0), max));
        assert!(!accepts(Vec3::new(1.0, 16.0, 1.0), max));
        assert!(!accepts(Vec3::ZERO, max));
    }

    #[test]
    fn every_leaf_is_visited_once_at_any_depth() {
        let (dir, mut index) = index_with(&[
            ("a.prefab.json", tile("A", 1.0, 1.0, 1.0)),
            ("env/b.prefab.json", tile("B", 1.0, 1.0, 1.0)),
            ("env/rocks/deep/c.prefab.json", tile("C", 1.0, 1.0, 1.0)),
        ]);
        std::fs::write(dir.path().join("env/readme.txt"), "notes").unwrap();
        index.refresh().unwrap();

        let mut scene = Scene::new();
        let found = discover(&mut scene, &index, "", &GridConfig::default(), &UntransformedMaxExtent);
        let paths: Vec<&str> = found.accepted.iter().map(|(_, p)| p.as_str()).collect();
        assert_eq!(
            paths,
            ["a.prefab.json", "env/b.prefab.json", "env/rocks/deep/c.prefab.json"]
        );
        assert_eq!(found.skipped, ["env/readme.txt"]);
        assert_eq!(found.visited(), 4);
        assert_eq!(scene.entity_count(), 3);
    }

    #[test]
    fn discovery_can_start_below_the_root() {
        let (_dir, index) = index_with(&[
            ("a.prefab.json", tile("A", 1.0, 1.0, 1.0)),
            ("env/b.prefab.json", tile("B", 1.0, 1.0, 1.0)),
        ]);
        let mut scene = Scene::new();
        let found = discover(&mut scene, &index, "env", &GridConfig::default(), &UntransformedMaxExtent);
        assert_eq!(found.accepted.len(), 1);
        assert_eq!(found.accepted[0].1, "env/b.prefab.json");
    }

    #[test]
    fn rejected_instances_are_destroyed() {
        let big = Prefab::new(
            PrefabNode::new("Cliff")
                .with_renderer(renderer(1.0, 1.0, 1.0))
                .with_child(PrefabNode::new("Face").with_renderer(renderer(20.0, 2.0, 2.0))),
        );
        let (_dir, index) = index_with(&[
            ("cliff.prefab.json", big),
            ("empty.prefab.json", Prefab::new(PrefabNode::new("Marker"))),
            ("rock.prefab.json", tile("Rock", 1.0, 1.0, 1.0)),
        ]);
        let mut scene = Scene::new();
        let found = discover(&mut scene, &index, "", &GridConfig::default(), &UntransformedMaxExtent);

        assert_eq!(found.accepted.len(), 1);
        assert_eq!(scene.entity_count(), 1);
        assert_eq!(scene.name(found.accepted[0].0), Some("Rock"));
        let reasons: Vec<_> = found.rejected.iter().map(|r| (r.path.as_str(), r.reason)).collect();
        assert_eq!(
            reasons,
            [
                ("cliff.prefab.json", RejectReason::Oversized),
                ("empty.prefab.json", RejectReason::Empty),
            ]
        );
    }

    #[test]
    fn missing_folder_yields_nothing() {
        let (_dir, index) = index_with(&[("a.prefab.json", tile("A", 1.0, 1.0, 1.0))]);
        let mut scene = Scene::new();
        let found = discover(&mut scene, &index, "nope", &GridConfig::default(), &UntransformedMaxExtent);
        assert_eq!(found, Discovery::default());
        assert_eq!(scene.entity_count(), 0);
    }
}
