use std::path::Path;

use anyhow::Context;
use placekit_launcher::LauncherConfig;
use placekit_placement::PlacementConfig;
use placekit_render::ViewportCamera;
use placekit_tiler::{GridConfig, RenderPipeline};
use placekit_tools::{BrowserLayout, LayerNames};
use serde::{Deserialize, Serialize};

/// Settings file read with `--config`. Every section is optional and falls
/// back to its defaults; command-line flags override what it sets.
///
/// ```yaml
/// grid:
///   width: 4
///   max_extent: [8.0, 8.0]
/// placement:
///   prefab: Env/Rock.prefab.json
///   layer: 8
/// camera:
///   position: [0.0, 12.0, -12.0]
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub grid: GridConfig,
    pub pipeline: RenderPipeline,
    pub placement: PlacementConfig,
    pub browser: BrowserLayout,
    pub launcher: LauncherConfig,
    pub camera: ViewportCamera,
    pub layers: LayerNames,
}

impl FileConfig {
    /// Read `path`, or return the defaults when no file was given.
    pub fn load(path: Option<&Path>) -> anyhow::Result<Self> {
        let Some(path) = path else {
            return Ok(Self::default());
        };
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        let config: Self = serde_yaml::from_str(&text)
            .with_context(|| format!("parsing config {}", path.display()))?;
        tracing::debug!(path = %path.display(), "config loaded");
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glam::{Vec2, Vec3};

    fn write(text: &str) -> (tempfile::TempDir, std::path::PathBuf) {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("placekit.yaml");
        std::fs::write(&path, text).unwrap();
        (dir, path)
    }

    #[test]
    fn no_file_means_defaults() {
        let config = FileConfig::load(None).unwrap();
        assert_eq!(config.grid, GridConfig::default());
        assert_eq!(config.launcher, LauncherConfig::default());
    }

    #[test]
    fn sections_override_only_what_they_set() {
        let (_dir, path) = write(
            "grid:\n  width: 3\n  max_extent: [4.0, 6.0]\n\
             placement:\n  prefab: Env/Rock.prefab.json\n  rotation: [0.0, 90.0, 0.0]\n\
             layers:\n  8: Ground\n",
        );
        let config = FileConfig::load(Some(&path)).unwrap();
        assert_eq!(config.grid.width, 3);
        assert_eq!(config.grid.max_extent, Vec2::new(4.0, 6.0));
        assert_eq!(config.grid.offset, 0.0);
        assert_eq!(config.placement.prefab.as_deref(), Some("Env/Rock.prefab.json"));
        assert_eq!(config.placement.rotation, Vec3::new(0.0, 90.0, 0.0));
        assert_eq!(config.placement.scale, Vec3::ONE);
        assert_eq!(config.layers.layer_of("Ground"), Some(8));
        assert_eq!(config.browser, BrowserLayout::default());
    }

    #[test]
    fn unknown_section_is_an_error() {
        let (_dir, path) = write("gird:\n  width: 3\n");
        assert!(FileConfig::load(Some(&path)).is_err());
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = FileConfig::load(Some(Path::new("/nonexistent/placekit.yaml"))).unwrap_err();
        assert!(format!("{err:#}").contains("reading config"));
    }
}
