mod config;

use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Args, Parser, Subcommand, ValueEnum};
use glam::{Vec2, Vec3};
use placekit_assets::{AssetIndex, FsAssetIndex};
use placekit_common::Transform;
use placekit_ecs::{Collider, RigidBody};
use placekit_input::{InputEvent, MouseButton};
use placekit_kernel::{Prefab, PrefabNode, Scene};
use placekit_launcher::{
    Launcher, LauncherParts, TRAJECTORY_STEP, draw_launcher_gizmos, trajectory,
};
use placekit_placement::{FrameOutcome, PlacementSession, SceneView};
use placekit_render::{DebugTextRenderer, GizmoBuffer, Renderer};
use placekit_tiler::{ExtentPolicy, GridConfig, TransformedBoundsUnion, UntransformedMaxExtent};
use placekit_tools::{PrefabCatalog, SceneInspector};
use tracing_subscriber::EnvFilter;

use crate::config::FileConfig;

#[derive(Parser)]
#[command(name = "placekit-cli", about = "Scene tooling: tile sets, surface placement, prefab browsing")]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,

    /// YAML settings file; flags override its values
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print version, crate info and layer names
    Info,
    /// Lay out every prefab under a folder on a grid
    Tiles {
        #[command(flatten)]
        grid: GridArgs,
        /// Print the resulting scene outline
        #[arg(long)]
        render: bool,
    },
    /// Replace shaders the render pipeline cannot draw
    Shaders {
        #[command(flatten)]
        grid: GridArgs,
    },
    /// Place a prefab on a ground plane under a cursor position
    Place {
        /// Asset root folder
        root: PathBuf,
        /// Prefab asset path, relative to the root
        #[arg(long)]
        prefab: Option<String>,
        /// Cursor in GUI points, top-left origin (default: view centre)
        #[arg(long, value_parser = parse_vec2)]
        cursor: Option<Vec2>,
        /// Target layer, by name or number
        #[arg(long)]
        layer: Option<String>,
        /// Offset added to the hit point
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        offset: Option<Vec3>,
        /// Euler rotation in degrees
        #[arg(long, value_parser = parse_vec3, allow_hyphen_values = true)]
        rotation: Option<Vec3>,
        #[arg(long, value_parser = parse_vec3)]
        scale: Option<Vec3>,
        /// Give the placed object a rigid body
        #[arg(long)]
        physics: bool,
        /// Physics steps to run after placing
        #[arg(long, default_value = "0")]
        steps: u32,
    },
    /// List prefabs and the thumbnail grid cells that are on screen
    Browse {
        /// Asset root folder
        root: PathBuf,
        #[arg(long)]
        search: Option<String>,
        /// Select a prefab by asset path
        #[arg(long)]
        select: Option<String>,
        #[arg(long, default_value = "300")]
        width: f32,
        #[arg(long, default_value = "300")]
        height: f32,
        #[arg(long, default_value = "0")]
        scroll: f32,
    },
    /// Print a launcher's one-second trajectory estimate
    Trajectory {
        /// Asset root, needed when the launcher config names a projectile prefab
        #[arg(long)]
        root: Option<PathBuf>,
        /// Muzzle speed (clamped to 0..=100)
        #[arg(long)]
        velocity: Option<f32>,
        /// Projectile mass when no prefab is configured
        #[arg(long, default_value = "1")]
        mass: f32,
        /// Gun pitch in degrees, positive up
        #[arg(long, default_value = "0", allow_hyphen_values = true)]
        pitch: f32,
    },
}

#[derive(Args)]
struct GridArgs {
    /// Asset root folder
    root: PathBuf,
    /// Folder inside the root to scan
    #[arg(long, default_value = "")]
    folder: String,
    #[arg(long)]
    width: Option<u32>,
    #[arg(long)]
    offset: Option<f32>,
    /// Cell size as `x,y`
    #[arg(long, value_parser = parse_vec2)]
    max_extent: Option<Vec2>,
    #[arg(long, value_enum, default_value_t = Policy::UntransformedMax)]
    policy: Policy,
}

impl GridArgs {
    fn apply(&self, mut grid: GridConfig) -> GridConfig {
        if let Some(width) = self.width {
            grid.width = width;
        }
        if let Some(offset) = self.offset {
            grid.offset = offset;
        }
        if let Some(max) = self.max_extent {
            grid.max_extent = max;
        }
        grid
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Policy {
    UntransformedMax,
    TransformedUnion,
}

impl Policy {
    fn extent_policy(self) -> &'static dyn ExtentPolicy {
        match self {
            Self::UntransformedMax => &UntransformedMaxExtent,
            Self::TransformedUnion => &TransformedBoundsUnion,
        }
    }
}

fn parse_floats<const N: usize>(s: &str) -> Result<[f32; N], String> {
    let parts: Vec<&str> = s.split(',').map(str::trim).collect();
    if parts.len() != N {
        return Err(format!("expected {N} comma-separated numbers, got `{s}`"));
    }
    let mut out = [0.0; N];
    for (slot, part) in out.iter_mut().zip(parts) {
        *slot = part.parse().map_err(|e| format!("`{part}`: {e}"))?;
    }
    Ok(out)
}

fn parse_vec2(s: &str) -> Result<Vec2, String> {
    parse_floats::<2>(s).map(Vec2::from_array)
}

fn parse_vec3(s: &str) -> Result<Vec3, String> {
    parse_floats::<3>(s).map(Vec3::from_array)
}

fn open_index(root: &Path) -> anyhow::Result<FsAssetIndex> {
    FsAssetIndex::open(root).with_context(|| format!("opening asset root {}", root.display()))
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .init();

    let settings = FileConfig::load(cli.config.as_deref())?;

    match cli.command {
        Commands::Info => {
            println!("placekit-cli v{}", env!("CARGO_PKG_VERSION"));
            println!("assets: {}", placekit_assets::crate_info());
            println!("tools: {}", placekit_tools::crate_info());
            println!("pipeline: {}", settings.pipeline.name);
            for (layer, name) in settings.layers.all().into_iter().enumerate() {
                if !name.is_empty() {
                    println!("layer {layer:>2}: {name}");
                }
            }
        }
        Commands::Tiles { grid, render } => {
            let index = open_index(&grid.root)?;
            let config = grid.apply(settings.grid);
            let mut scene = Scene::new();
            let report = placekit_tiler::build(
                &mut scene,
                &index,
                &grid.folder,
                &config,
                grid.policy.extent_policy(),
            )?;

            println!(
                "Tile set: placed={} rejected={} skipped={} rows={}",
                report.accepted_count(),
                report.rejected_count(),
                report.skipped.len(),
                report.row_count()
            );
            for tile in &report.tiles {
                println!(
                    "  ({}, {}) {} at ({:.1}, {:.1}, {:.1})",
                    tile.column, tile.row, tile.path, tile.position.x, tile.position.y, tile.position.z
                );
            }
            for rejected in &report.rejected {
                println!("  rejected {:?}: {}", rejected.reason, rejected.path);
            }
            if render {
                print!("{}", DebugTextRenderer::new().render(&scene, &settings.camera, &[]));
            }
        }
        Commands::Shaders { grid } => {
            let index = open_index(&grid.root)?;
            let config = grid.apply(settings.grid);
            let mut scene = Scene::new();
            let report = placekit_tiler::update_shaders_under(
                &mut scene,
                &index,
                &grid.folder,
                &config,
                grid.policy.extent_policy(),
                &settings.pipeline,
            )?;
            println!(
                "Shaders: instances={} fixed={} fallback={}",
                report.instances,
                report.fixed.len(),
                settings.pipeline.fallback
            );
            for id in &report.fixed {
                println!("  {}", scene.name(*id).unwrap_or("<unnamed>"));
            }
        }
        Commands::Place {
            root,
            prefab,
            cursor,
            layer,
            offset,
            rotation,
            scale,
            physics,
            steps,
        } => {
            let index = open_index(&root)?;
            let mut placement = settings.placement.clone();
            if prefab.is_some() {
                placement.prefab = prefab;
            }
            if let Some(layer) = layer {
                let Some(resolved) = settings.layers.layer_of(&layer) else {
                    bail!("unknown layer `{layer}`");
                };
                placement.layer = resolved;
            }
            if let Some(offset) = offset {
                placement.position = offset;
            }
            if let Some(rotation) = rotation {
                placement.rotation = rotation;
            }
            if let Some(scale) = scale {
                placement.scale = scale;
            }
            placement.physics |= physics;

            let mut scene = Scene::new();
            let ground = scene.spawn("Ground", Transform::from_position(Vec3::new(0.0, -0.5, 0.0)));
            scene.components_mut().set_collider(
                ground,
                Collider::Box {
                    half_extents: Vec3::new(50.0, 0.5, 50.0),
                },
            );
            scene.components_mut().set_layer(ground, placement.layer);

            let dt = placement.physics_settings.fixed_delta_time;
            let mut session = PlacementSession::new();
            session.start(&mut scene, &index, placement)?;

            let view = SceneView::new(settings.camera);
            let camera = settings.camera;
            let cursor =
                cursor.unwrap_or(Vec2::new(camera.pixel_width, camera.pixel_height) / 2.0);
            let mut event = InputEvent::mouse_down(MouseButton::Middle, cursor);
            let mut gizmos = GizmoBuffer::new();
            match session.on_scene_frame(&mut scene, &view, &mut event, &mut gizmos) {
                FrameOutcome::Committed { hit, spawned } => {
                    println!(
                        "Placed {} at ({:.3}, {:.3}, {:.3}) on {} normal=({:.2}, {:.2}, {:.2})",
                        scene.name(spawned).unwrap_or("<unnamed>"),
                        hit.pose.position.x,
                        hit.pose.position.y,
                        hit.pose.position.z,
                        scene.name(hit.entity).unwrap_or("<unnamed>"),
                        hit.normal.x,
                        hit.normal.y,
                        hit.normal.z,
                    );
                    for _ in 0..steps {
                        session.update(&mut scene, dt);
                    }
                    if steps > 0 {
                        if let Some(info) = SceneInspector::inspect_entity(&scene, spawned) {
                            println!("After {steps} steps: {info}");
                        }
                    }
                }
                FrameOutcome::Miss => println!("Cursor ray hit nothing on the target layer"),
                other => println!("No placement: {other:?}"),
            }
            print!("{}", DebugTextRenderer::new().render(&scene, &camera, gizmos.commands()));
            session.stop(&mut scene);
        }
        Commands::Browse {
            root,
            search,
            select,
            width,
            height,
            scroll,
        } => {
            let index = open_index(&root)?;
            let mut catalog = PrefabCatalog::load(&index);
            if let Some(search) = search {
                catalog.set_search(search);
            }
            if let Some(path) = select {
                if !catalog.select_path(&path) {
                    bail!("no prefab at `{path}`");
                }
            }
            let layout = settings.browser;
            let visible = catalog.visible();
            println!(
                "Prefabs: {} listed, {} matching, {} columns x {} rows",
                catalog.prefabs().len(),
                visible.len(),
                layout.columns(width),
                layout.rows(width, visible.len())
            );
            let selected = catalog.selected().map(|p| p.id);
            let on_screen = layout.visible_indices(width, height, scroll, visible.len());
            for (i, info) in visible.iter().enumerate() {
                let rect = layout.element_rect(width, i);
                println!(
                    "{} {:<24} {:>7.1},{:>7.1} {}{}",
                    if Some(info.id) == selected { "*" } else { " " },
                    info.name,
                    rect.x,
                    rect.y,
                    info.path,
                    if on_screen.contains(&i) { "" } else { " (culled)" },
                );
            }
        }
        Commands::Trajectory {
            root,
            velocity,
            mass,
            pitch,
        } => {
            let mut launcher_config = settings.launcher.clone();
            if let Some(velocity) = velocity {
                launcher_config.velocity = velocity;
            }
            let template = match (&launcher_config.projectile, &root) {
                (Some(path), Some(root)) => open_index(root)?
                    .load_prefab(path)
                    .with_context(|| format!("loading projectile {path}"))?,
                (Some(path), None) => bail!("projectile `{path}` needs --root"),
                (None, _) => Prefab::new(PrefabNode::new("Shell").with_rigid_body(RigidBody {
                    mass,
                    ..RigidBody::default()
                })),
            };

            let mut scene = Scene::new();
            let parts = LauncherParts::spawn(&mut scene, "Launcher", Vec3::ZERO)?;
            if let Some(mut gun) = scene.local_transform(parts.gun_body) {
                gun.rotation = glam::Quat::from_rotation_x(-pitch.to_radians());
                scene.set_local_transform(parts.gun_body, gun);
            }
            let launcher = Launcher::new(launcher_config, parts).with_projectile(template);
            let gravity = settings.placement.physics_settings.gravity;

            let (Some(muzzle), Some(gun), Some(mass)) = (
                launcher.muzzle_point(&scene),
                scene.world_transform(parts.gun_body),
                launcher.projectile_mass(),
            ) else {
                bail!("launcher rig is incomplete");
            };
            if mass <= 0.0 {
                bail!("projectile mass must be positive, got {mass}");
            }
            let start = gun.forward() * launcher.config().muzzle_velocity() / mass;
            println!(
                "Muzzle ({:.2}, {:.2}, {:.2}) speed={:.2} mass={mass}",
                muzzle.x,
                muzzle.y,
                muzzle.z,
                launcher.config().muzzle_velocity()
            );
            for (i, p) in trajectory(muzzle, start, gravity).iter().enumerate() {
                println!("  t={:.1}s ({:.3}, {:.3}, {:.3})", i as f32 * TRAJECTORY_STEP, p.x, p.y, p.z);
            }

            let mut gizmos = GizmoBuffer::new();
            draw_launcher_gizmos(&launcher, &scene, gravity, &mut gizmos);
            print!("{}", DebugTextRenderer::new().render(&scene, &settings.camera, gizmos.commands()));
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn vector_flags_parse() {
        assert_eq!(parse_vec2("4, 6.5"), Ok(Vec2::new(4.0, 6.5)));
        assert_eq!(parse_vec3("0,-1,2"), Ok(Vec3::new(0.0, -1.0, 2.0)));
        assert!(parse_vec3("1,2").is_err());
        assert!(parse_vec2("a,b").is_err());
    }

    #[test]
    fn grid_flags_override_file_values() {
        let cli = Cli::parse_from(["placekit-cli", "tiles", "assets", "--width", "3", "--max-extent", "4,4"]);
        let Commands::Tiles { grid, .. } = cli.command else {
            panic!("expected tiles");
        };
        let file = GridConfig {
            offset: 2.0,
            ..GridConfig::default()
        };
        let merged = grid.apply(file);
        assert_eq!(merged.width, 3);
        assert_eq!(merged.offset, 2.0);
        assert_eq!(merged.max_extent, Vec2::new(4.0, 4.0));
    }
}
