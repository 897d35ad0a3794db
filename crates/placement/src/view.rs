use glam::Vec2;
use placekit_input::{cursor_to_pixel, pixel_to_viewport};
use placekit_physics::Ray;
use placekit_render::ViewportCamera;

/// The scene view a frame is drawn in: its camera and display scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SceneView {
    pub camera: ViewportCamera,
    /// Physical pixels per GUI point.
    pub pixels_per_point: f32,
}

impl SceneView {
    pub fn new(camera: ViewportCamera) -> Self {
        Self {
            camera,
            pixels_per_point: 1.0,
        }
    }

    /// World ray under a GUI-point cursor position (top-left origin).
    pub fn cursor_ray(&self, mouse_position: Vec2) -> Option<Ray> {
        let pixel = cursor_to_pixel(mouse_position, self.pixels_per_point, self.camera.pixel_height);
        let point = pixel_to_viewport(pixel, self.camera.pixel_width, self.camera.pixel_height)?;
        self.camera.viewport_point_to_ray(point)
    }
}
