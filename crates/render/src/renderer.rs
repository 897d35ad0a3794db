use std::fmt::Write;

use placekit_common::EntityId;
use placekit_kernel::Scene;

use crate::camera::ViewportCamera;
use crate::gizmos::DrawCommand;

/// Renderer-agnostic interface. All renderers implement this trait.
///
/// The renderer reads scene state, a camera and the frame's gizmos, then
/// produces output. It never mutates the scene.
pub trait Renderer {
    type Output;

    fn render(&self, scene: &Scene, camera: &ViewportCamera, gizmos: &[DrawCommand]) -> Self::Output;
}

/// Produces a human-readable outline of the scene hierarchy and gizmos.
/// Entities hidden from the hierarchy are skipped along with their subtree.
#[derive(Debug, Default)]
pub struct DebugTextRenderer;

impl DebugTextRenderer {
    pub fn new() -> Self {
        Self
    }

    fn write_entity(&self, out: &mut String, scene: &Scene, id: EntityId, depth: usize) {
        if scene.components().hide_flags(id).hide_in_hierarchy {
            return;
        }
        let Some(world) = scene.world_transform(id) else {
            return;
        };
        let p = world.position;
        let _ = writeln!(
            out,
            "{:indent$}[{}] {} pos=({:.2}, {:.2}, {:.2}) layer={}",
            "",
            id.short(),
            scene.name(id).unwrap_or("<unnamed>"),
            p.x,
            p.y,
            p.z,
            scene.components().layer(id),
            indent = 2 + depth * 2,
        );
        for child in scene.children(id) {
            self.write_entity(out, scene, *child, depth + 1);
        }
    }
}

impl Renderer for DebugTextRenderer {
    type Output = String;

    fn render(&self, scene: &Scene, camera: &ViewportCamera, gizmos: &[DrawCommand]) -> String {
        let _span = tracing::trace_span!("render.debug_text", gizmos = gizmos.len()).entered();
        let mut out = String::new();
        let _ = writeln!(out, "=== Scene (frame={}) ===", scene.frame());
        let _ = writeln!(out, "Entities: {}", scene.entity_count());
        let (p, f) = (camera.position, camera.forward());
        let _ = writeln!(
            out,
            "Camera: pos=({:.1}, {:.1}, {:.1}) forward=({:.2}, {:.2}, {:.2}) viewport={}x{}",
            p.x, p.y, p.z, f.x, f.y, f.z, camera.pixel_width, camera.pixel_height
        );
        for root in scene.roots() {
            self.write_entity(&mut out, scene, *root, 0);
        }
        if !gizmos.is_empty() {
            let _ = writeln!(out, "Gizmos: {}", gizmos.len());
            for command in gizmos {
                match command {
                    DrawCommand::Label { position, text, .. } => {
                        let _ = writeln!(
                            out,
                            "  label \"{}\" at ({:.2}, {:.2}, {:.2})",
                            text, position.x, position.y, position.z
                        );
                    }
                    other => {
                        let _ = writeln!(out, "  {}", other.kind());
                    }
                }
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::gizmos::{GizmoBuffer, GizmoSink};
    use glam::Vec3;
    use placekit_common::Transform;
    use placekit_ecs::HideFlags;

    #[test]
    fn debug_renderer_empty_scene() {
        let scene = Scene::new();
        let output = DebugTextRenderer::new().render(&scene, &ViewportCamera::default(), &[]);
        assert!(output.contains("frame=0"));
        assert!(output.contains("Entities: 0"));
        assert!(!output.contains("Gizmos"));
    }

    #[test]
    fn debug_renderer_lists_hierarchy() {
        let mut scene = Scene::new();
        let parent = scene.spawn("Parent", Transform::from_position(Vec3::new(1.0, 2.0, 3.0)));
        scene.spawn_child(parent, "Child", Transform::default()).unwrap();
        let output = DebugTextRenderer::new().render(&scene, &ViewportCamera::default(), &[]);
        assert!(output.contains("Entities: 2"));
        assert!(output.contains("Parent pos=(1.00, 2.00, 3.00)"));
        assert!(output.contains("    ["));
        assert!(output.contains("Child pos=(1.00, 2.00, 3.00)"));
    }

    #[test]
    fn hidden_entities_are_not_listed() {
        let mut scene = Scene::new();
        let id = scene.spawn("Preview", Transform::default());
        scene.components_mut().set_hide_flags(id, HideFlags::SCRATCH);
        let output = DebugTextRenderer::new().render(&scene, &ViewportCamera::default(), &[]);
        assert!(output.contains("Entities: 1"));
        assert!(!output.contains("Preview"));
    }

    #[test]
    fn gizmos_are_summarised() {
        let scene = Scene::new();
        let mut gizmos = GizmoBuffer::new();
        gizmos.wire_disc(Vec3::ZERO, Vec3::Y, 0.5);
        gizmos.label(Vec3::ONE, "Trajectory");
        let output = DebugTextRenderer::new().render(&scene, &ViewportCamera::default(), gizmos.commands());
        assert!(output.contains("Gizmos: 2"));
        assert!(output.contains("wire_disc"));
        assert!(output.contains("label \"Trajectory\""));
    }
}
