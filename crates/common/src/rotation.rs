use glam::{EulerRot, Mat3, Quat, Vec3};

/// Rotation whose local +Z points along `forward` and whose local +Y is as
/// close to `up` as the forward constraint allows.
///
/// `forward` is kept exactly; `up` is re-orthogonalised against it. When the
/// two are parallel `up` carries no information and the shortest arc taking
/// +Z onto `forward` is returned, so `look_rotation(Z, ±Z)` is identity.
pub fn look_rotation(forward: Vec3, up: Vec3) -> Quat {
    let Some(z) = forward.try_normalize() else {
        return Quat::IDENTITY;
    };
    let Some(x) = up.cross(z).try_normalize() else {
        return Quat::from_rotation_arc(Vec3::Z, z);
    };
    let y = z.cross(x);
    Quat::from_mat3(&Mat3::from_cols(x, y, z)).normalize()
}

/// Rotation from Euler angles in degrees, applied around Z, then X, then Y.
pub fn euler_degrees(angles: Vec3) -> Quat {
    Quat::from_euler(
        EulerRot::YXZ,
        angles.y.to_radians(),
        angles.x.to_radians(),
        angles.z.to_radians(),
    )
}
