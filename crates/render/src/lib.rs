//! Rendering adapter: what the editor tools need from a scene view.
//!
//! # Invariants
//! - Renderers and gizmo sinks never mutate the scene.
//! - Camera rays are a pure function of the camera and the input point.

mod camera;
mod gizmos;
mod renderer;

pub use camera::ViewportCamera;
pub use gizmos::{Color, DrawCommand, GizmoBuffer, GizmoSink};
pub use renderer::{DebugTextRenderer, Renderer};
