use glam::Vec2;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl MouseButton {
    /// Button index as the scene view reports it (0 left, 1 right, 2 middle).
    pub fn from_index(index: u8) -> Option<Self> {
        match index {
            0 => Some(Self::Left),
            1 => Some(Self::Right),
            2 => Some(Self::Middle),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Key {
    G,
    H,
    D,
    Escape,
    Other(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum EventKind {
    /// Cursor moved or the view repainted; carries only the position.
    Layout,
    MouseMove,
    MouseDown(MouseButton),
    MouseUp(MouseButton),
    KeyDown(Key),
}

/// One scene-view event. `mouse_position` is in GUI points with the origin
/// at the top-left of the view.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InputEvent {
    pub kind: EventKind,
    pub mouse_position: Vec2,
    used: bool,
}

impl InputEvent {
    pub fn new(kind: EventKind, mouse_position: Vec2) -> Self {
        Self {
            kind,
            mouse_position,
            used: false,
        }
    }

    pub fn hover(mouse_position: Vec2) -> Self {
        Self::new(EventKind::MouseMove, mouse_position)
    }

    pub fn mouse_down(button: MouseButton, mouse_position: Vec2) -> Self {
        Self::new(EventKind::MouseDown(button), mouse_position)
    }

    pub fn is_mouse_down(&self, button: MouseButton) -> bool {
        self.kind == EventKind::MouseDown(button)
    }

    /// Mark the event consumed so later handlers ignore it.
    pub fn use_event(&mut self) {
        self.used = true;
    }

    pub fn is_used(&self) -> bool {
        self.used
    }
}

/// Convert a GUI-point cursor position into a camera pixel coordinate:
/// scale by the display factor and flip to a bottom-left origin.
pub fn cursor_to_pixel(mouse_position: Vec2, pixels_per_point: f32, pixel_height: f32) -> Vec2 {
    Vec2::new(
        mouse_position.x * pixels_per_point,
        pixel_height - mouse_position.y * pixels_per_point,
    )
}

/// Normalise a bottom-left pixel coordinate into 0..1 viewport space.
pub fn pixel_to_viewport(pixel: Vec2, pixel_width: f32, pixel_height: f32) -> Option<Vec2> {
    if pixel_width <= 0.0 || pixel_height <= 0.0 {
        return None;
    }
    Some(pixel / Vec2::new(pixel_width, pixel_height))
}
