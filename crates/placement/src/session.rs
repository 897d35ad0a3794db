use glam::{Quat, Vec3};
use placekit_assets::AssetIndex;
use placekit_common::{EntityId, Transform, look_rotation};
use placekit_ecs::{HideFlags, RigidBody};
use placekit_input::{InputEvent, MouseButton};
use placekit_kernel::{Prefab, Scene};
use placekit_physics::{Contact, raycast_filtered, simulate};
use placekit_render::GizmoSink;

use crate::config::PlacementConfig;
use crate::view::SceneView;
use crate::{
    HIT_DISC_RADIUS, MARKER_RADIUS, OFFSET_DISTANCE, PLACEMENT_BEHAVIOR, PREVIEW_LAYER,
    PlacementError, preview_material,
};

/// A surface under the cursor and the pose an object placed there gets.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SurfaceHit {
    pub entity: EntityId,
    pub point: Vec3,
    pub normal: Vec3,
    /// World pose of a committed object: `point + position offset`, the
    /// configured rotation and scale.
    pub pose: Transform,
}

impl SurfaceHit {
    /// Where the drop marker sits, `OFFSET_DISTANCE` along the normal.
    pub fn marker(&self) -> Vec3 {
        self.point + self.normal * OFFSET_DISTANCE
    }

    /// Orientation of the preview: forward stays world +Z, up follows the normal.
    pub fn preview_rotation(&self) -> Quat {
        look_rotation(Vec3::Z, self.normal)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum FrameOutcome {
    /// The tool is not running.
    Inactive,
    /// The cursor ray hit nothing on the target layer.
    Miss,
    Hover(SurfaceHit),
    Committed { hit: SurfaceHit, spawned: EntityId },
}

#[derive(Debug, Clone)]
struct Active {
    preview: EntityId,
    prefab: Prefab,
    config: PlacementConfig,
}

/// The placement tool's state. Inactive until [`start`](Self::start).
#[derive(Debug, Clone, Default)]
pub struct PlacementSession {
    active: Option<Active>,
}

impl PlacementSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// The preview entity while active.
    pub fn preview(&self) -> Option<EntityId> {
        self.active.as_ref().map(|a| a.preview)
    }

    /// The configuration snapshot taken at start.
    pub fn config(&self) -> Option<&PlacementConfig> {
        self.active.as_ref().map(|a| &a.config)
    }

    /// Load the configured prefab and spawn its preview. The preview is
    /// hidden, never saved, sits on [`PREVIEW_LAYER`] and draws with the
    /// preview material.
    pub fn start(
        &mut self,
        scene: &mut Scene,
        index: &impl AssetIndex,
        config: PlacementConfig,
    ) -> Result<EntityId, PlacementError> {
        if self.active.is_some() {
            return Err(PlacementError::AlreadyActive);
        }
        let path = config.validate()?;
        let prefab = index.load_prefab(path)?;

        let preview = scene.instantiate(&prefab);
        for id in scene.descendants(preview) {
            let components = scene.components_mut();
            components.set_hide_flags(id, HideFlags::SCRATCH);
            components.set_layer(id, PREVIEW_LAYER);
            if let Some(mut renderer) = components.get_renderer(id).cloned() {
                renderer.material = preview_material();
                components.set_renderer(id, renderer);
            }
        }
        if let Some(mut local) = scene.local_transform(preview) {
            local.rotation = config.rotation_quat();
            local.scale = config.scale;
            scene.set_local_transform(preview, local);
        }
        scene.components_mut().attach_behavior(preview, PLACEMENT_BEHAVIOR);
        tracing::info!(
            prefab = path,
            layer = config.layer,
            physics = config.physics,
            preview = %preview.short(),
            "placement tool started"
        );

        self.active = Some(Active {
            preview,
            prefab,
            config,
        });
        Ok(preview)
    }

    /// Destroy the preview and go inactive. Returns whether a session was running.
    pub fn stop(&mut self, scene: &mut Scene) -> bool {
        let Some(active) = self.active.take() else {
            return false;
        };
        if let Err(err) = scene.destroy(active.preview) {
            tracing::warn!(%err, "preview was already gone");
        }
        tracing::info!("placement tool stopped");
        true
    }

    /// Close hook for the owning tool window.
    pub fn teardown(&mut self, scene: &mut Scene) {
        if self.stop(scene) {
            tracing::debug!("placement session torn down while active");
        }
    }

    /// Handle one scene-view repaint: raycast under the cursor, move the
    /// preview, draw the gizmos, and place an object if `event` is an
    /// unconsumed middle-button press.
    pub fn on_scene_frame(
        &mut self,
        scene: &mut Scene,
        view: &SceneView,
        event: &mut InputEvent,
        gizmos: &mut impl GizmoSink,
    ) -> FrameOutcome {
        let Some(active) = &self.active else {
            return FrameOutcome::Inactive;
        };
        let _span = tracing::trace_span!("placement.frame", frame = scene.frame()).entered();

        let Some(ray) = view.cursor_ray(event.mouse_position) else {
            return FrameOutcome::Miss;
        };
        let preview = active.preview;
        let raycast = raycast_filtered(
            scene,
            &ray,
            f32::INFINITY,
            active.config.layer_mask(),
            |id| !scene.is_ancestor_or_self(preview, id),
        );
        let Some(raycast) = raycast else {
            return FrameOutcome::Miss;
        };

        let config = &active.config;
        let hit = SurfaceHit {
            entity: raycast.entity,
            point: raycast.point,
            normal: raycast.normal,
            pose: Transform {
                position: raycast.point + config.position,
                rotation: config.rotation_quat(),
                scale: config.scale,
            },
        };

        if let Some(mut local) = scene.local_transform(preview) {
            local.position = hit.point;
            local.rotation = hit.preview_rotation();
            scene.set_local_transform(preview, local);
        }

        let marker = hit.marker();
        gizmos.wire_disc(hit.point, hit.normal, HIT_DISC_RADIUS);
        gizmos.sphere(marker, MARKER_RADIUS);
        gizmos.polyline(&[hit.point, marker]);
        gizmos.request_repaint();

        if event.is_used() || !event.is_mouse_down(MouseButton::Middle) {
            return FrameOutcome::Hover(hit);
        }
        let spawned = commit(scene, &active.prefab, config, &hit);
        event.use_event();
        FrameOutcome::Committed { hit, spawned }
    }

    /// Editor tick. Steps rigid bodies while active with physics enabled.
    pub fn update(&mut self, scene: &mut Scene, dt: f32) -> Vec<Contact> {
        match &self.active {
            Some(active) if active.config.physics => {
                simulate(scene, dt, active.config.physics_settings.gravity)
            }
            _ => Vec::new(),
        }
    }
}

fn commit(scene: &mut Scene, prefab: &Prefab, config: &PlacementConfig, hit: &SurfaceHit) -> EntityId {
    let spawned = scene.instantiate(prefab);
    scene.set_local_transform(spawned, hit.pose);
    if let Some(parent) = config.parent {
        if let Err(err) = scene.set_parent(spawned, Some(parent)) {
            tracing::warn!(%err, "placement parent unavailable; left at scene root");
        }
    }
    if config.physics {
        scene.components_mut().set_rigid_body(spawned, RigidBody::default());
        let lifted = hit.pose.position + hit.normal * OFFSET_DISTANCE;
        scene.set_world_position(spawned, lifted);
    }
    tracing::info!(
        entity = %spawned.short(),
        x = hit.pose.position.x,
        y = hit.pose.position.y,
        z = hit.pose.position.z,
        "placed prefab"
    );
    spawned
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::Vec2;
    use placekit_assets::FsAssetIndex;
    use placekit_ecs::{Collider, Material, MeshRenderer};
    use placekit_input::EventKind;
    use placekit_kernel::PrefabNode;
    use placekit_render::{DrawCommand, GizmoBuffer, ViewportCamera};

    const LAMP: &str = "props/lamp.prefab.json";

    fn renderer() -> MeshRenderer {
        MeshRenderer {
            extents: Vec3::splat(0.5),
            material: Material::default(),
        }
    }

    fn lamp() -> Prefab {
        Prefab::new(
            PrefabNode::new("Lamp")
                .with_renderer(renderer())
                .with_child(PrefabNode::new("Bulb").with_renderer(renderer()).with_layer(3)),
        )
    }

    fn index() -> (tempfile::TempDir, FsAssetIndex) {
        let dir = tempfile::tempdir().unwrap();
        let mut index = FsAssetIndex::open(dir.path()).unwrap();
        index.save_prefab(LAMP, &lamp()).unwrap();
        (dir, index)
    }

    fn scene_with_ground(layer: u8) -> (Scene, EntityId) {
        let mut scene = Scene::new();
        let ground = scene.spawn("Ground", Transform::default());
        scene.components_mut().set_collider(
            ground,
            Collider::Box {
                half_extents: Vec3::new(50.0, 0.5, 50.0),
            },
        );
        scene.components_mut().set_layer(ground, layer);
        (scene, ground)
    }

    fn view_from(eye: Vec3) -> SceneView {
        SceneView::new(ViewportCamera::looking_at(eye, Vec3::ZERO).with_viewport(800.0, 600.0))
    }

    fn config() -> PlacementConfig {
        PlacementConfig {
            prefab: Some(LAMP.into()),
            ..PlacementConfig::default()
        }
    }

    const CENTRE: Vec2 = Vec2::new(400.0, 300.0);

    #[test]
    fn start_without_prefab_fails_and_spawns_nothing() {
        let (_dir, index) = index();
        let (mut scene, _) = scene_with_ground(0);
        let mut session = PlacementSession::new();
        let err = session
            .start(&mut scene, &index, PlacementConfig::default())
            .unwrap_err();
        assert!(matches!(err, PlacementError::NoPrefabSelected));
        assert!(!session.is_active());
        assert_eq!(scene.entity_count(), 1);
    }

    #[test]
    fn start_with_unknown_prefab_fails() {
        let (_dir, index) = index();
        let (mut scene, _) = scene_with_ground(0);
        let mut session = PlacementSession::new();
        let config = PlacementConfig {
            prefab: Some("missing.prefab.json".into()),
            ..PlacementConfig::default()
        };
        assert!(matches!(
            session.start(&mut scene, &index, config),
            Err(PlacementError::Asset(_))
        ));
        assert!(!session.is_active());
    }

    #[test]
    fn preview_is_a_hidden_scratch_instance() {
        let (_dir, index) = index();
        let (mut scene, _) = scene_with_ground(0);
        let mut session = PlacementSession::new();
        let config = PlacementConfig {
            scale: Vec3::splat(2.0),
            rotation: Vec3::new(0.0, 90.0, 0.0),
            ..config()
        };
        let preview = session.start(&mut scene, &index, config).unwrap();

        assert_eq!(session.preview(), Some(preview));
        assert!(scene.components().has_behavior(preview, PLACEMENT_BEHAVIOR));
        let nodes = scene.descendants(preview);
        assert_eq!(nodes.len(), 2);
        for id in nodes {
            let c = scene.components();
            assert_eq!(c.hide_flags(id), HideFlags::SCRATCH);
            assert_eq!(c.layer(id), PREVIEW_LAYER);
            assert_eq!(c.get_renderer(id).unwrap().material, preview_material());
        }
        let local = scene.local_transform(preview).unwrap();
        assert_eq!(local.scale, Vec3::splat(2.0));
        assert!((local.rotation * Vec3::Z).abs_diff_eq(Vec3::X, 1e-5));
        assert!(scene.capture_prefab(preview).unwrap().root.children.is_empty());
    }

    #[test]
    fn second_start_is_rejected() {
        let (_dir, index) = index();
        let (mut scene, _) = scene_with_ground(0);
        let mut session = PlacementSession::new();
        session.start(&mut scene, &index, config()).unwrap();
        assert!(matches!(
            session.start(&mut scene, &index, config()),
            Err(PlacementError::AlreadyActive)
        ));
        assert_eq!(scene.entity_count(), 3);
    }

    #[test]
    fn start_stop_cycles_do_not_leak() {
        let (_dir, index) = index();
        let (mut scene, _) = scene_with_ground(0);
        let baseline = scene.entity_count();
        let mut session = PlacementSession::new();
        for _ in 0..5 {
            session.start(&mut scene, &index, config()).unwrap();
            assert_eq!(scene.entity_count(), baseline + 2);
            assert!(session.stop(&mut scene));
            assert_eq!(scene.entity_count(), baseline);
        }
        assert!(!session.stop(&mut scene));
        session.teardown(&mut scene);
        assert_eq!(scene.entity_count(), baseline);
    }

    #[test]
    fn teardown_stops_an_active_session() {
        let (_dir, index) = index();
        let (mut scene, _) = scene_with_ground(0);
        let mut session = PlacementSession::new();
        let preview = session.start(&mut scene, &index, config()).unwrap();
        session.teardown(&mut scene);
        assert!(!session.is_active());
        assert!(!scene.contains(preview));
    }

    #[test]
    fn inactive_session_draws_nothing() {
        let (mut scene, _) = scene_with_ground(0);
        let mut session = PlacementSession::new();
        let mut gizmos = GizmoBuffer::new();
        let mut event = InputEvent::hover(CENTRE);
        let outcome = session.on_scene_frame(&mut scene, &view_from(Vec3::new(0.0, 10.0, -10.0)), &mut event, &mut gizmos);
        assert_eq!(outcome, FrameOutcome::Inactive);
        assert!(gizmos.is_empty());
    }

    #[test]
    fn hover_snaps_preview_and_draws_gizmos() {
        let (_dir, index) = index();
        let (mut scene, ground) = scene_with_ground(0);
        let mut session = PlacementSession::new();
        let preview = session.start(&mut scene, &index, config()).unwrap();
        let mut gizmos = GizmoBuffer::new();
        let mut event = InputEvent::hover(CENTRE);

        let outcome = session.on_scene_frame(&mut scene, &view_from(Vec3::new(0.0, 10.0, -10.0)), &mut event, &mut gizmos);
        let FrameOutcome::Hover(hit) = outcome else {
            panic!("expected hover, got {outcome:?}");
        };
        assert_eq!(hit.entity, ground);
        assert!(hit.normal.abs_diff_eq(Vec3::Y, 1e-5));
        assert!(hit.point.abs_diff_eq(Vec3::new(0.0, 0.5, -0.5), 1e-3));

        let local = scene.local_transform(preview).unwrap();
        assert_eq!(local.position, hit.point);
        assert!(local.rotation.abs_diff_eq(Quat::IDENTITY, 1e-5));

        let kinds: Vec<_> = gizmos.commands().iter().map(DrawCommand::kind).collect();
        assert_eq!(kinds, ["wire_disc", "sphere", "polyline"]);
        assert!(matches!(
            gizmos.commands()[1],
            DrawCommand::Sphere { center, radius, .. } if center == hit.marker() && radius == MARKER_RADIUS
        ));
        assert!(gizmos.repaint_requested());
        assert!(!event.is_used());
        assert_eq!(scene.entity_count(), 3);
    }

    #[test]
    fn wall_facing_the_camera_keeps_preview_forward() {
        let (_dir, index) = index();
        let mut scene = Scene::new();
        let wall = scene.spawn("Wall", Transform::from_position(Vec3::new(0.0, 0.0, 10.0)));
        scene.components_mut().set_collider(
            wall,
            Collider::Box {
                half_extents: Vec3::new(5.0, 5.0, 0.5),
            },
        );
        let mut session = PlacementSession::new();
        let preview = session.start(&mut scene, &index, config()).unwrap();
        let view = SceneView::new(
            ViewportCamera::looking_at(Vec3::ZERO, Vec3::new(0.0, 0.0, 10.0)).with_viewport(800.0, 600.0),
        );
        let mut event = InputEvent::hover(CENTRE);

        let outcome = session.on_scene_frame(&mut scene, &view, &mut event, &mut GizmoBuffer::new());
        let FrameOutcome::Hover(hit) = outcome else {
            panic!("expected hover, got {outcome:?}");
        };
        assert_eq!(hit.entity, wall);
        assert!(hit.normal.abs_diff_eq(Vec3::NEG_Z, 1e-5));
        assert!(hit.point.abs_diff_eq(Vec3::new(0.0, 0.0, 9.5), 1e-3));

        let rotation = scene.local_transform(preview).unwrap().rotation;
        assert!((rotation * Vec3::Z).abs_diff_eq(Vec3::Z, 1e-5));
        assert!((rotation * Vec3::Y).abs_diff_eq(Vec3::Y, 1e-5));
    }

    #[test]
    fn other_layers_are_not_hit() {
        let (_dir, index) = index();
        let (mut scene, _) = scene_with_ground(4);
        let mut session = PlacementSession::new();
        session.start(&mut scene, &index, config()).unwrap();
        let mut gizmos = GizmoBuffer::new();
        let mut event = InputEvent::mouse_down(MouseButton::Middle, CENTRE);
        let outcome = session.on_scene_frame(&mut scene, &view_from(Vec3::new(0.0, 10.0, -10.0)), &mut event, &mut gizmos);
        assert_eq!(outcome, FrameOutcome::Miss);
        assert!(gizmos.is_empty());
        assert!(!event.is_used());
    }

    #[test]
    fn preview_layer_target_still_ignores_the_preview() {
        let (_dir, index) = index();
        let (mut scene, _) = scene_with_ground(0);
        let mut session = PlacementSession::new();
        let config = PlacementConfig {
            layer: PREVIEW_LAYER,
            ..config()
        };
        let preview = session.start(&mut scene, &index, config).unwrap();
        scene
            .components_mut()
            .set_collider(preview, Collider::Sphere { radius: 1.0 });
        let mut event = InputEvent::hover(CENTRE);
        let outcome = session.on_scene_frame(&mut scene, &view_from(Vec3::new(0.0, 10.0, -10.0)), &mut event, &mut GizmoBuffer::new());
        assert_eq!(outcome, FrameOutcome::Miss);
    }

    #[test]
    fn commit_places_at_hit_plus_offset_from_any_camera() {
        let (_dir, index) = index();
        let offset = Vec3::new(1.0, 2.0, -0.5);
        for eye in [Vec3::new(0.0, 10.0, -10.0), Vec3::new(7.0, 3.0, 4.0), Vec3::new(-2.0, 20.0, 1.0)] {
            let (mut scene, _) = scene_with_ground(0);
            let mut session = PlacementSession::new();
            let config = PlacementConfig {
                position: offset,
                rotation: Vec3::new(0.0, 45.0, 0.0),
                scale: Vec3::new(1.0, 2.0, 1.0),
                ..config()
            };
            session.start(&mut scene, &index, config).unwrap();
            let mut event = InputEvent::mouse_down(MouseButton::Middle, CENTRE);
            let outcome = session.on_scene_frame(&mut scene, &view_from(eye), &mut event, &mut GizmoBuffer::new());
            let FrameOutcome::Committed { hit, spawned } = outcome else {
                panic!("expected commit, got {outcome:?}");
            };
            let placed = scene.world_transform(spawned).unwrap();
            assert_eq!(placed.position, hit.point + offset);
            assert_eq!(placed.scale, Vec3::new(1.0, 2.0, 1.0));
            assert!(placed.rotation.abs_diff_eq(Quat::from_rotation_y(45f32.to_radians()), 1e-6));
            assert!(event.is_used());
            // placed objects are ordinary, visible and saved
            assert_eq!(scene.components().hide_flags(spawned), HideFlags::default());
            assert_eq!(scene.components().layer(spawned), 0);
            assert!(!scene.components().has_behavior(spawned, PLACEMENT_BEHAVIOR));
        }
    }

    #[test]
    fn consumed_events_do_not_commit() {
        let (_dir, index) = index();
        let (mut scene, _) = scene_with_ground(0);
        let mut session = PlacementSession::new();
        session.start(&mut scene, &index, config()).unwrap();
        let mut event = InputEvent::mouse_down(MouseButton::Middle, CENTRE);
        event.use_event();
        let outcome = session.on_scene_frame(&mut scene, &view_from(Vec3::new(0.0, 10.0, -10.0)), &mut event, &mut GizmoBuffer::new());
        assert!(matches!(outcome, FrameOutcome::Hover(_)));
        let mut left = InputEvent::new(EventKind::MouseDown(MouseButton::Left), CENTRE);
        let outcome = session.on_scene_frame(&mut scene, &view_from(Vec3::new(0.0, 10.0, -10.0)), &mut left, &mut GizmoBuffer::new());
        assert!(matches!(outcome, FrameOutcome::Hover(_)));
        assert_eq!(scene.entity_count(), 3);
    }

    #[test]
    fn commit_keeps_world_pose_under_parent() {
        let (_dir, index) = index();
        let (mut scene, _) = scene_with_ground(0);
        let parent = scene.spawn("Props", Transform::from_position(Vec3::new(5.0, 0.0, 5.0)));
        let mut session = PlacementSession::new();
        let config = PlacementConfig {
            parent: Some(parent),
            ..config()
        };
        session.start(&mut scene, &index, config).unwrap();
        let mut event = InputEvent::mouse_down(MouseButton::Middle, CENTRE);
        let outcome = session.on_scene_frame(&mut scene, &view_from(Vec3::new(0.0, 10.0, -10.0)), &mut event, &mut GizmoBuffer::new());
        let FrameOutcome::Committed { hit, spawned } = outcome else {
            panic!("expected commit, got {outcome:?}");
        };
        assert_eq!(scene.parent(spawned), Some(parent));
        let world = scene.world_transform(spawned).unwrap();
        assert!(world.position.abs_diff_eq(hit.point, 1e-5));
    }

    #[test]
    fn physics_commit_lifts_and_update_drops_it() {
        let (_dir, index) = index();
        let (mut scene, ground) = scene_with_ground(0);
        let mut session = PlacementSession::new();
        let config = PlacementConfig {
            physics: true,
            ..config()
        };
        session.start(&mut scene, &index, config).unwrap();
        let mut event = InputEvent::mouse_down(MouseButton::Middle, CENTRE);
        let outcome = session.on_scene_frame(&mut scene, &view_from(Vec3::new(0.0, 10.0, -10.0)), &mut event, &mut GizmoBuffer::new());
        let FrameOutcome::Committed { hit, spawned } = outcome else {
            panic!("expected commit, got {outcome:?}");
        };
        assert!(scene.components().get_rigid_body(spawned).is_some());
        let start = scene.world_transform(spawned).unwrap().position;
        assert_eq!(start, hit.point + hit.normal * OFFSET_DISTANCE);

        let mut landed = Vec::new();
        for _ in 0..100 {
            landed.extend(session.update(&mut scene, 0.02));
        }
        assert!(landed.iter().any(|c| c.entity == spawned && c.other == ground));
        let rest = scene.world_transform(spawned).unwrap().position;
        assert!((rest.y - 0.5).abs() < 1e-3);
    }

    #[test]
    fn physics_commit_lifts_from_the_offset_position() {
        let (_dir, index) = index();
        let (mut scene, ground) = scene_with_ground(0);
        let offset = Vec3::new(1.0, 2.0, -0.5);
        let mut session = PlacementSession::new();
        let config = PlacementConfig {
            physics: true,
            position: offset,
            ..config()
        };
        session.start(&mut scene, &index, config).unwrap();
        let mut event = InputEvent::mouse_down(MouseButton::Middle, CENTRE);
        let outcome = session.on_scene_frame(&mut scene, &view_from(Vec3::new(0.0, 10.0, -10.0)), &mut event, &mut GizmoBuffer::new());
        let FrameOutcome::Committed { hit, spawned } = outcome else {
            panic!("expected commit, got {outcome:?}");
        };
        assert_eq!(hit.pose.position, hit.point + offset);
        let start = scene.world_transform(spawned).unwrap().position;
        assert!(start.abs_diff_eq(hit.point + offset + hit.normal * OFFSET_DISTANCE, 1e-5));

        let mut landed = Vec::new();
        for _ in 0..100 {
            landed.extend(session.update(&mut scene, 0.02));
        }
        assert!(landed.iter().any(|c| c.entity == spawned && c.other == ground));
        let rest = scene.world_transform(spawned).unwrap().position;
        assert!((rest.x - start.x).abs() < 1e-4 && (rest.z - start.z).abs() < 1e-4);
        assert!((rest.y - 0.5).abs() < 1e-3);
    }

    #[test]
    fn update_without_physics_is_a_no_op() {
        let (_dir, index) = index();
        let (mut scene, _) = scene_with_ground(0);
        let body = scene.spawn("Crate", Transform::from_position(Vec3::new(0.0, 5.0, 0.0)));
        scene.components_mut().set_rigid_body(body, RigidBody::default());
        let mut session = PlacementSession::new();
        assert!(session.update(&mut scene, 0.02).is_empty());
        session.start(&mut scene, &index, config()).unwrap();
        session.update(&mut scene, 0.02);
        assert_eq!(scene.world_transform(body).unwrap().position.y, 5.0);
    }
}
