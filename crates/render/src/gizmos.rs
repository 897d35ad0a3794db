use glam::Vec3;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    pub a: f32,
}

impl Color {
    pub const WHITE: Self = Self::rgb(1.0, 1.0, 1.0);
    pub const RED: Self = Self::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Self = Self::rgb(0.0, 1.0, 0.0);
    pub const CYAN: Self = Self::rgb(0.0, 1.0, 1.0);
    pub const YELLOW: Self = Self::rgb(1.0, 0.92, 0.016);

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self { r, g, b, a: 1.0 }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

/// One recorded scene-view primitive.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum DrawCommand {
    Line { from: Vec3, to: Vec3, color: Color },
    Polyline { points: Vec<Vec3>, color: Color },
    DottedLine { from: Vec3, to: Vec3, dash: f32, color: Color },
    WireDisc { center: Vec3, normal: Vec3, radius: f32, color: Color },
    Sphere { center: Vec3, radius: f32, color: Color },
    WireSphere { center: Vec3, radius: f32, color: Color },
    Label { position: Vec3, text: String, color: Color },
}

impl DrawCommand {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Line { .. } => "line",
            Self::Polyline { .. } => "polyline",
            Self::DottedLine { .. } => "dotted_line",
            Self::WireDisc { .. } => "wire_disc",
            Self::Sphere { .. } => "sphere",
            Self::WireSphere { .. } => "wire_sphere",
            Self::Label { .. } => "label",
        }
    }
}

/// Destination for scene-view gizmos. Primitives take the current color.
pub trait GizmoSink {
    fn color(&self) -> Color;
    fn set_color(&mut self, color: Color);
    fn draw(&mut self, command: DrawCommand);
    /// Ask the host to redraw the view on the next tick.
    fn request_repaint(&mut self);

    fn line(&mut self, from: Vec3, to: Vec3) {
        let color = self.color();
        self.draw(DrawCommand::Line { from, to, color });
    }

    fn polyline(&mut self, points: &[Vec3]) {
        let color = self.color();
        self.draw(DrawCommand::Polyline {
            points: points.to_vec(),
            color,
        });
    }

    fn dotted_line(&mut self, from: Vec3, to: Vec3, dash: f32) {
        let color = self.color();
        self.draw(DrawCommand::DottedLine { from, to, dash, color });
    }

    fn wire_disc(&mut self, center: Vec3, normal: Vec3, radius: f32) {
        let color = self.color();
        self.draw(DrawCommand::WireDisc {
            center,
            normal,
            radius,
            color,
        });
    }

    fn sphere(&mut self, center: Vec3, radius: f32) {
        let color = self.color();
        self.draw(DrawCommand::Sphere { center, radius, color });
    }

    fn wire_sphere(&mut self, center: Vec3, radius: f32) {
        let color = self.color();
        self.draw(DrawCommand::WireSphere { center, radius, color });
    }

    fn label(&mut self, position: Vec3, text: &str) {
        let color = self.color();
        self.draw(DrawCommand::Label {
            position,
            text: text.to_string(),
            color,
        });
    }

    /// Run `f` with `color` active, restoring the previous color after.
    fn with_color(&mut self, color: Color, f: impl FnOnce(&mut Self))
    where
        Self: Sized,
    {
        let previous = self.color();
        self.set_color(color);
        f(self);
        self.set_color(previous);
    }
}

/// Gizmo sink that records every primitive in draw order.
#[derive(Debug, Clone, Default)]
pub struct GizmoBuffer {
    color: Color,
    commands: Vec<DrawCommand>,
    repaint_requested: bool,
}

impl GizmoBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn repaint_requested(&self) -> bool {
        self.repaint_requested
    }

    /// Take the recorded primitives and reset for the next frame.
    pub fn take(&mut self) -> Vec<DrawCommand> {
        self.repaint_requested = false;
        std::mem::take(&mut self.commands)
    }

    pub fn clear(&mut self) {
        self.commands.clear();
        self.repaint_requested = false;
    }
}

impl GizmoSink for GizmoBuffer {
    fn color(&self) -> Color {
        self.color
    }

    fn set_color(&mut self, color: Color) {
        self.color = color;
    }

    fn draw(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    fn request_repaint(&mut self) {
        self.repaint_requested = true;
    }
}
