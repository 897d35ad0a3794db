use glam::{Mat4, Vec2, Vec3};
use placekit_physics::Ray;
use serde::{Deserialize, Serialize};

/// Scene-view camera with a yaw/pitch orientation and a perspective
/// projection over a viewport of `pixel_width` × `pixel_height`.
///
/// Camera motion lives outside the scene: moving it never touches entities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewportCamera {
    pub position: Vec3,
    /// Radians about +Y, measured from +X towards +Z.
    pub yaw: f32,
    /// Radians above the horizon.
    pub pitch: f32,
    /// Vertical field of view in radians.
    pub fov: f32,
    pub near: f32,
    pub far: f32,
    pub pixel_width: f32,
    pub pixel_height: f32,
    pub speed: f32,
    pub sensitivity: f32,
}

impl Default for ViewportCamera {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 10.0, -15.0),
            yaw: 90.0_f32.to_radians(),
            pitch: -30.0_f32.to_radians(),
            fov: 60.0_f32.to_radians(),
            near: 0.1,
            far: 1000.0,
            pixel_width: 1280.0,
            pixel_height: 720.0,
            speed: 10.0,
            sensitivity: 0.003,
        }
    }
}

impl ViewportCamera {
    /// Camera at `position` facing `target`. Falls back to the default
    /// orientation when the two points coincide.
    pub fn looking_at(position: Vec3, target: Vec3) -> Self {
        let mut camera = Self {
            position,
            ..Self::default()
        };
        if let Some(dir) = (target - position).try_normalize() {
            camera.yaw = dir.z.atan2(dir.x);
            camera.pitch = dir.y.clamp(-1.0, 1.0).asin();
        }
        camera
    }

    pub fn with_viewport(mut self, width: f32, height: f32) -> Self {
        self.pixel_width = width;
        self.pixel_height = height;
        self
    }

    pub fn forward(&self) -> Vec3 {
        Vec3::new(
            self.yaw.cos() * self.pitch.cos(),
            self.pitch.sin(),
            self.yaw.sin() * self.pitch.cos(),
        )
        .normalize()
    }

    pub fn right(&self) -> Vec3 {
        self.forward().cross(Vec3::Y).normalize()
    }

    pub fn aspect(&self) -> f32 {
        if self.pixel_height > 0.0 {
            self.pixel_width / self.pixel_height
        } else {
            1.0
        }
    }

    pub fn move_forward(&mut self, dt: f32) {
        self.position += self.forward() * self.speed * dt;
    }

    pub fn move_right(&mut self, dt: f32) {
        self.position += self.right() * self.speed * dt;
    }

    pub fn move_up(&mut self, dt: f32) {
        self.position.y += self.speed * dt;
    }

    pub fn rotate(&mut self, dx: f32, dy: f32) {
        self.yaw += dx * self.sensitivity;
        self.pitch -= dy * self.sensitivity;
        self.pitch = self
            .pitch
            .clamp(-89.0_f32.to_radians(), 89.0_f32.to_radians());
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.position, self.position + self.forward(), Vec3::Y)
    }

    pub fn projection_matrix(&self) -> Mat4 {
        Mat4::perspective_rh(self.fov, self.aspect(), self.near, self.far)
    }

    pub fn view_projection(&self) -> Mat4 {
        self.projection_matrix() * self.view_matrix()
    }

    /// Ray from the near plane through a viewport point, where (0, 0) is the
    /// bottom-left corner and (1, 1) the top-right.
    pub fn viewport_point_to_ray(&self, point: Vec2) -> Option<Ray> {
        let ndc = point * 2.0 - Vec2::ONE;
        let inv = self.view_projection().inverse();
        let near = inv.project_point3(ndc.extend(0.0));
        let far = inv.project_point3(ndc.extend(1.0));
        if !near.is_finite() || !far.is_finite() {
            return None;
        }
        Ray::new(near, far - near)
    }

    /// Ray through a pixel coordinate with a bottom-left origin.
    pub fn screen_point_to_ray(&self, pixel: Vec2) -> Option<Ray> {
        if self.pixel_width <= 0.0 || self.pixel_height <= 0.0 {
            return None;
        }
        self.viewport_point_to_ray(pixel / Vec2::new(self.pixel_width, self.pixel_height))
    }
}
