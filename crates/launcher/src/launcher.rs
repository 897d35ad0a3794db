use glam::{Quat, Vec3};
use placekit_common::{EntityId, Transform, look_rotation};
use placekit_ecs::RigidBody;
use placekit_kernel::{Prefab, Scene, SceneError};
use placekit_physics::{Contact, simulate};

use crate::config::LauncherConfig;
use crate::projectile::{PROJECTILE_BEHAVIOR, Projectile, destroy_on_contact};
use crate::{LAUNCHER_BEHAVIOR, LauncherError, PLAYER_TAG};

/// Rate at which an idle barrel spins down, per second.
const SPIN_DOWN_RATE: f32 = 10.0;

/// The entities a launcher drives. `base` yaws toward the target, `gun_body`
/// aims at it, `barrel` spins about its local z.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LauncherParts {
    pub root: EntityId,
    pub base: EntityId,
    pub gun_body: EntityId,
    pub barrel: EntityId,
}

impl LauncherParts {
    /// Spawn a default rig at `position`: root > base > gun body > barrel.
    pub fn spawn(scene: &mut Scene, name: &str, position: Vec3) -> Result<Self, SceneError> {
        let root = scene.spawn(name, Transform::from_position(position));
        let base = scene.spawn_child(root, "Base", Transform::default())?;
        let gun_body = scene.spawn_child(base, "GunBody", Transform::from_position(Vec3::Y))?;
        let barrel = scene.spawn_child(
            gun_body,
            "Barrel",
            Transform::from_position(Vec3::new(0.0, 0.0, 0.5)),
        )?;
        scene.components_mut().attach_behavior(root, LAUNCHER_BEHAVIOR);
        Ok(Self {
            root,
            base,
            gun_body,
            barrel,
        })
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TriggerEdge {
    /// A player came into range and became the target.
    Enter(EntityId),
    /// No player is in range any more.
    Exit,
}

/// What one [`Launcher::update`] did.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LauncherTick {
    pub edge: Option<TriggerEdge>,
    pub fired: Option<EntityId>,
}

#[derive(Debug, Clone)]
pub struct Launcher {
    config: LauncherConfig,
    parts: LauncherParts,
    projectile: Option<Prefab>,
    target: Option<EntityId>,
    can_fire: bool,
    barrel_speed: f32,
    muzzle_flash: bool,
    projectiles: Vec<Projectile>,
}

impl Launcher {
    pub fn new(config: LauncherConfig, parts: LauncherParts) -> Self {
        Self {
            config,
            parts,
            projectile: None,
            target: None,
            can_fire: false,
            barrel_speed: 0.0,
            muzzle_flash: false,
            projectiles: Vec::new(),
        }
    }

    pub fn with_projectile(mut self, template: Prefab) -> Self {
        self.projectile = Some(template);
        self
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    pub fn parts(&self) -> &LauncherParts {
        &self.parts
    }

    pub fn target(&self) -> Option<EntityId> {
        self.target
    }

    pub fn set_target(&mut self, target: Option<EntityId>) {
        self.target = target;
    }

    pub fn can_fire(&self) -> bool {
        self.can_fire
    }

    /// Current barrel spin in degrees per second.
    pub fn barrel_speed(&self) -> f32 {
        self.barrel_speed
    }

    pub fn muzzle_flash_playing(&self) -> bool {
        self.muzzle_flash
    }

    pub fn projectiles(&self) -> &[Projectile] {
        &self.projectiles
    }

    /// Mass of a fired projectile. Templates without a rigid body get a
    /// default one when fired.
    pub fn projectile_mass(&self) -> Option<f32> {
        let template = self.projectile.as_ref()?;
        Some(template.root.rigid_body.unwrap_or_default().mass)
    }

    /// World-space muzzle point: the offset transformed by the gun body.
    pub fn muzzle_point(&self, scene: &Scene) -> Option<Vec3> {
        scene
            .world_matrix(self.parts.gun_body)
            .map(|m| m.transform_point3(self.config.offset))
    }

    /// Track players entering and leaving the firing-range sphere around
    /// the root. The current target is kept while it stays in range;
    /// otherwise the nearest player in range is taken.
    pub fn detect(&mut self, scene: &Scene) -> Option<TriggerEdge> {
        let center = scene.world_transform(self.parts.root)?.position;
        let range = self.config.firing_range;
        let in_range = |id: EntityId| {
            scene.components().tag(id) == Some(PLAYER_TAG)
                && scene
                    .world_transform(id)
                    .is_some_and(|t| t.position.distance(center) <= range)
        };
        let engaged = self.target.filter(|t| in_range(*t)).or_else(|| {
            scene
                .entities()
                .keys()
                .copied()
                .filter(|id| in_range(*id))
                .filter_map(|id| Some((id, scene.world_transform(id)?.position.distance(center))))
                .min_by(|a, b| a.1.total_cmp(&b.1))
                .map(|(id, _)| id)
        });

        match (self.can_fire, engaged) {
            (false, Some(target)) => {
                self.can_fire = true;
                self.target = Some(target);
                tracing::info!(target = %target.short(), "target entered firing range");
                Some(TriggerEdge::Enter(target))
            }
            (true, None) => {
                self.can_fire = false;
                tracing::info!("target left firing range");
                Some(TriggerEdge::Exit)
            }
            (true, Some(target)) => {
                self.target = Some(target);
                None
            }
            (false, None) => None,
        }
    }

    /// Yaw the base toward the target at the base's own height, then point
    /// the gun body straight at it.
    pub fn aim(&self, scene: &mut Scene) -> Result<(), LauncherError> {
        let target = self.target.ok_or(LauncherError::MissingTarget)?;
        let goal = world_position(scene, target)?;

        let base = world_position(scene, self.parts.base)?;
        let level = Vec3::new(goal.x, base.y, goal.z);
        if let Some(dir) = (level - base).try_normalize() {
            scene.set_world_rotation(self.parts.base, look_rotation(dir, Vec3::Y));
        }

        let gun = world_position(scene, self.parts.gun_body)?;
        if let Some(dir) = (goal - gun).try_normalize() {
            scene.set_world_rotation(self.parts.gun_body, look_rotation(dir, Vec3::Y));
        }
        Ok(())
    }

    /// Spin the barrel up and launch a projectile from the muzzle along the
    /// gun body's forward axis.
    pub fn fire(&mut self, scene: &mut Scene) -> Result<EntityId, LauncherError> {
        let template = self
            .projectile
            .as_ref()
            .ok_or(LauncherError::MissingProjectile)?;
        let gun = scene
            .world_transform(self.parts.gun_body)
            .ok_or(LauncherError::PartMissing(self.parts.gun_body))?;
        let muzzle = self
            .muzzle_point(scene)
            .ok_or(LauncherError::PartMissing(self.parts.gun_body))?;
        self.barrel_speed = self.config.barrel_rotation_speed;

        let shell = scene.instantiate(template);
        scene.set_local_transform(
            shell,
            Transform {
                position: muzzle,
                rotation: gun.rotation,
                scale: template.root.transform.scale,
            },
        );
        let velocity = gun.forward() * self.config.muzzle_velocity();
        let components = scene.components_mut();
        match components.get_rigid_body_mut(shell) {
            Some(body) => body.velocity = velocity,
            None => components.set_rigid_body(
                shell,
                RigidBody {
                    velocity,
                    ..RigidBody::default()
                },
            ),
        }
        components.attach_behavior(shell, PROJECTILE_BEHAVIOR);
        self.projectiles.push(Projectile {
            entity: shell,
            damage_radius: self.config.damage_radius,
        });
        tracing::debug!(projectile = %shell.short(), speed = self.config.muzzle_velocity(), "fired");

        if !self.muzzle_flash {
            self.muzzle_flash = true;
            tracing::debug!("muzzle flash started");
        }
        Ok(shell)
    }

    /// Per-frame update: detect targets, spin the barrel, then aim and fire
    /// while engaged or spin down and stop the flash otherwise.
    pub fn update(&mut self, scene: &mut Scene, dt: f32) -> LauncherTick {
        let edge = self.detect(scene);

        if self.barrel_speed != 0.0 {
            if let Some(mut local) = scene.local_transform(self.parts.barrel) {
                let spin = Quat::from_rotation_z((self.barrel_speed * dt).to_radians());
                local.rotation = (local.rotation * spin).normalize();
                scene.set_local_transform(self.parts.barrel, local);
            }
        }

        let mut fired = None;
        if self.can_fire {
            if let Err(err) = self.aim(scene) {
                tracing::warn!(%err, "cannot aim");
            }
            match self.fire(scene) {
                Ok(shell) => fired = Some(shell),
                Err(err) => tracing::warn!(%err, "cannot fire"),
            }
        } else {
            let t = (SPIN_DOWN_RATE * dt).clamp(0.0, 1.0);
            self.barrel_speed += (0.0 - self.barrel_speed) * t;
            if self.muzzle_flash {
                self.muzzle_flash = false;
                tracing::debug!("muzzle flash stopped");
            }
        }
        LauncherTick { edge, fired }
    }

    /// Destroy this launcher's projectiles that hit something and forget
    /// any that are no longer in the scene.
    pub fn resolve_contacts(&mut self, scene: &mut Scene, contacts: &[Contact]) -> Vec<EntityId> {
        let destroyed = destroy_on_contact(scene, contacts);
        self.projectiles.retain(|p| scene.contains(p.entity));
        destroyed
    }

    /// Step physics for the whole scene, then resolve projectile hits.
    pub fn step_physics(&mut self, scene: &mut Scene, dt: f32, gravity: Vec3) -> Vec<EntityId> {
        let contacts = simulate(scene, dt, gravity);
        self.resolve_contacts(scene, &contacts)
    }
}

fn world_position(scene: &Scene, id: EntityId) -> Result<Vec3, LauncherError> {
    scene
        .world_transform(id)
        .map(|t| t.position)
        .ok_or(LauncherError::PartMissing(id))
}
