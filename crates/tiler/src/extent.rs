use glam::{Mat4, Vec3};
use placekit_common::EntityId;
use placekit_kernel::Scene;

/// How an instance's bounding half-extent is aggregated over its hierarchy.
pub trait ExtentPolicy {
    fn name(&self) -> &'static str;

    /// Half-extent of the subtree rooted at `root`. Zero when no entity in
    /// the subtree has a renderer.
    fn extent(&self, scene: &Scene, root: EntityId) -> Vec3;
}

/// Component-wise maximum of every renderer's local half-extents in the
/// subtree. Child transforms are ignored, so this is only exact for
/// unrotated, unscaled children centred on their parent.
#[derive(Debug, Clone, Copy, Default)]
pub struct UntransformedMaxExtent;

impl ExtentPolicy for UntransformedMaxExtent {
    fn name(&self) -> &'static str {
        "untransformed-max"
    }

    fn extent(&self, scene: &Scene, root: EntityId) -> Vec3 {
        let own = scene
            .components()
            .get_renderer(root)
            .map_or(Vec3::ZERO, |r| r.extents);
        scene
            .children(root)
            .iter()
            .fold(own, |acc, child| acc.max(self.extent(scene, *child)))
    }
}

/// Half-size of the union of every renderer's box, each projected into the
/// root's local frame through the hierarchy transforms.
#[derive(Debug, Clone, Copy, Default)]
pub struct TransformedBoundsUnion;

impl ExtentPolicy for TransformedBoundsUnion {
    fn name(&self) -> &'static str {
        "transformed-union"
    }

    fn extent(&self, scene: &Scene, root: EntityId) -> Vec3 {
        let Some(root_world) = scene.world_matrix(root) else {
            return Vec3::ZERO;
        };
        let to_root = root_world.inverse();
        let mut bounds: Option<(Vec3, Vec3)> = None;
        for id in scene.descendants(root) {
            let (Some(renderer), Some(world)) =
                (scene.components().get_renderer(id), scene.world_matrix(id))
            else {
                continue;
            };
            let (lo, hi) = projected_box(to_root * world, renderer.extents);
            bounds = Some(match bounds {
                Some((min, max)) => (min.min(lo), max.max(hi)),
                None => (lo, hi),
            });
        }
        bounds.map_or(Vec3::ZERO, |(min, max)| (max - min) * 0.5)
    }
}

fn projected_box(matrix: Mat4, half: Vec3) -> (Vec3, Vec3) {
    let mut min = Vec3::splat(f32::INFINITY);
    let mut max = Vec3::splat(f32::NEG_INFINITY);
    for i in 0..8 {
        let corner = Vec3::new(
            if i & 1 == 0 { -half.x } else { half.x },
            if i & 2 == 0 { -half.y } else { half.y },
            if i & 4 == 0 { -half.z } else { half.z },
        );
        let p = matrix.transform_point3(corner);
        min = min.min(p);
        max = max.max(p);
    }
    (min, max)
}
