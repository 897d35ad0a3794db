use glam::{Mat3, Mat4, Vec3};
use placekit_common::{EntityId, LayerMask};
use placekit_ecs::Collider;
use placekit_kernel::Scene;

/// A half-line in world space. `direction` is always unit length.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Ray {
    pub origin: Vec3,
    pub direction: Vec3,
}

impl Ray {
    /// Build a ray, normalising `direction`. Returns `None` for a zero direction.
    pub fn new(origin: Vec3, direction: Vec3) -> Option<Self> {
        Some(Self {
            origin,
            direction: direction.try_normalize()?,
        })
    }

    pub fn at(&self, distance: f32) -> Vec3 {
        self.origin + self.direction * distance
    }
}

/// Nearest collider surface struck by a ray.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RaycastHit {
    pub entity: EntityId,
    pub point: Vec3,
    /// Outward unit surface normal at `point`.
    pub normal: Vec3,
    pub distance: f32,
}

/// Cast `ray` against every collider on a layer in `mask`, up to
/// `max_distance` (use `f32::INFINITY` for unbounded).
///
/// Colliders that contain the ray origin are not reported. Ties keep the
/// collider that comes first in entity id order, so results are reproducible.
pub fn raycast(
    scene: &Scene,
    ray: &Ray,
    max_distance: f32,
    mask: LayerMask,
) -> Option<RaycastHit> {
    raycast_filtered(scene, ray, max_distance, mask, |_| true)
}

/// [`raycast`] restricted to entities accepted by `filter`.
pub fn raycast_filtered(
    scene: &Scene,
    ray: &Ray,
    max_distance: f32,
    mask: LayerMask,
    filter: impl Fn(EntityId) -> bool,
) -> Option<RaycastHit> {
    let components = scene.components();
    let mut best: Option<RaycastHit> = None;
    for (id, collider) in components.colliders() {
        if !mask.contains(components.layer(*id)) || !filter(*id) {
            continue;
        }
        let Some(world) = scene.world_matrix(*id) else {
            continue;
        };
        let Some((distance, normal)) = intersect(collider, &world, ray) else {
            continue;
        };
        if distance > max_distance {
            continue;
        }
        if best.is_none_or(|b| distance < b.distance) {
            best = Some(RaycastHit {
                entity: *id,
                point: ray.at(distance),
                normal,
                distance,
            });
        }
    }
    best
}

fn intersect(collider: &Collider, world: &Mat4, ray: &Ray) -> Option<(f32, Vec3)> {
    match *collider {
        Collider::Box { half_extents } => intersect_box(half_extents, world, ray),
        Collider::Sphere { radius } => {
            let center = world.transform_point3(Vec3::ZERO);
            let (scale, _, _) = world.to_scale_rotation_translation();
            let radius = radius * scale.abs().max_element();
            intersect_sphere(center, radius, ray)
        }
    }
}

/// Slab test in the box's local space. The affine map keeps the ray
/// parameter, so the local entry parameter is the world distance.
fn intersect_box(half: Vec3, world: &Mat4, ray: &Ray) -> Option<(f32, Vec3)> {
    let inv = world.inverse();
    let origin = inv.transform_point3(ray.origin);
    let dir = inv.transform_vector3(ray.direction);

    let mut t_enter = f32::NEG_INFINITY;
    let mut t_exit = f32::INFINITY;
    let mut enter_normal = Vec3::ZERO;
    for axis in 0..3 {
        let (o, d, h) = (origin[axis], dir[axis], half[axis]);
        if d.abs() < 1e-12 {
            if o < -h || o > h {
                return None;
            }
            continue;
        }
        let mut t0 = (-h - o) / d;
        let mut t1 = (h - o) / d;
        let mut sign = -1.0;
        if t0 > t1 {
            std::mem::swap(&mut t0, &mut t1);
            sign = 1.0;
        }
        if t0 > t_enter {
            t_enter = t0;
            enter_normal = Vec3::ZERO;
            enter_normal[axis] = sign;
        }
        t_exit = t_exit.min(t1);
        if t_enter > t_exit {
            return None;
        }
    }
    if t_enter < 0.0 {
        return None;
    }
    let normal_matrix = Mat3::from_mat4(*world).inverse().transpose();
    let normal = (normal_matrix * enter_normal).try_normalize()?;
    Some((t_enter, normal))
}

fn intersect_sphere(center: Vec3, radius: f32, ray: &Ray) -> Option<(f32, Vec3)> {
    let oc = ray.origin - center;
    let b = oc.dot(ray.direction);
    let c = oc.length_squared() - radius * radius;
    let disc = b * b - c;
    if disc < 0.0 {
        return None;
    }
    let t = -b - disc.sqrt();
    if t < 0.0 {
        return None;
    }
    let normal = (ray.at(t) - center).try_normalize()?;
    Some((t, normal))
}
