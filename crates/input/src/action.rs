use crate::event::{EventKind, InputEvent, Key, MouseButton};

/// A high-level editor action. Tools consume actions, never raw key codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Rotate the active selection +45° about world up (`G`).
    RotateRight,
    /// Rotate the active selection −45° about world up (`H`).
    RotateLeft,
    /// Destroy the active selection (`D`).
    DeleteSelected,
    /// Instantiate the placement prefab at the hovered surface (middle click).
    CommitPlacement,
    /// Stop the active placement session.
    Cancel,
    Noop,
}

impl Action {
    /// Map a scene-view event to its bound action. Consumed events map to `Noop`.
    pub fn from_event(event: &InputEvent) -> Self {
        if event.is_used() {
            return Self::Noop;
        }
        let action = match event.kind {
            EventKind::KeyDown(Key::G) => Self::RotateRight,
            EventKind::KeyDown(Key::H) => Self::RotateLeft,
            EventKind::KeyDown(Key::D) => Self::DeleteSelected,
            EventKind::KeyDown(Key::Escape) => Self::Cancel,
            EventKind::MouseDown(MouseButton::Middle) => Self::CommitPlacement,
            _ => Self::Noop,
        };
        if action != Self::Noop {
            tracing::trace!(?action, "input mapped");
        }
        action
    }

    /// Yaw applied by the rotate shortcuts, in degrees.
    pub fn yaw_degrees(&self) -> Option<f32> {
        match self {
            Self::RotateRight => Some(45.0),
            Self::RotateLeft => Some(-45.0),
            _ => None,
        }
    }
}
