use glam::Vec3;
use placekit_assets::AssetIndex;
use placekit_common::EntityId;
use placekit_kernel::Scene;

use crate::TilerError;
use crate::config::GridConfig;
use crate::discover::{RejectedAsset, discover};
use crate::extent::ExtentPolicy;

/// Walks grid cells row by row, wrapping after `width` columns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridCursor {
    column: u32,
    row: u32,
    width: u32,
}

impl GridCursor {
    pub fn new(width: u32) -> Self {
        Self {
            column: 0,
            row: 0,
            width: width.max(1),
        }
    }

    /// The cell the next tile will take, as (column, row).
    pub fn cell(&self) -> (u32, u32) {
        (self.column, self.row)
    }

    /// Return the current cell and step to the next one.
    pub fn advance(&mut self) -> (u32, u32) {
        let cell = self.cell();
        self.column = (self.column + 1) % self.width;
        if self.column == 0 {
            self.row += 1;
        }
        cell
    }
}

/// World position of a cell origin. Tiles sit on the y = 0 plane and rows run
/// along +z.
pub fn cell_position(config: &GridConfig, (column, row): (u32, u32)) -> Vec3 {
    let pitch = config.cell_pitch();
    Vec3::new(column as f32 * pitch.x, 0.0, row as f32 * pitch.y)
}

/// Move `instances` onto consecutive grid cells in the given order and return
/// the cell each one took.
pub fn layout(
    scene: &mut Scene,
    instances: &[EntityId],
    config: &GridConfig,
) -> Result<Vec<(u32, u32)>, TilerError> {
    config.validate()?;
    let mut cursor = GridCursor::new(config.width);
    let mut cells = Vec::with_capacity(instances.len());
    for id in instances {
        let cell = cursor.advance();
        if !scene.set_world_position(*id, cell_position(config, cell)) {
            tracing::warn!(entity = %id.short(), "tile vanished before layout");
        }
        cells.push(cell);
    }
    Ok(cells)
}

#[derive(Debug, Clone, PartialEq)]
pub struct PlacedTile {
    pub entity: EntityId,
    pub path: String,
    pub column: u32,
    pub row: u32,
    pub position: Vec3,
}

/// Outcome of a tile-set build.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TileSetReport {
    pub tiles: Vec<PlacedTile>,
    pub rejected: Vec<RejectedAsset>,
    pub skipped: Vec<String>,
}

impl TileSetReport {
    pub fn accepted_count(&self) -> usize {
        self.tiles.len()
    }

    pub fn rejected_count(&self) -> usize {
        self.rejected.len()
    }

    pub fn row_count(&self) -> u32 {
        self.tiles.iter().map(|t| t.row + 1).max().unwrap_or(0)
    }
}

/// Discover every fitting prefab under `root` and lay them out on the grid.
pub fn build(
    scene: &mut Scene,
    index: &impl AssetIndex,
    root: &str,
    config: &GridConfig,
    policy: &dyn ExtentPolicy,
) -> Result<TileSetReport, TilerError> {
    config.validate()?;
    let _span = tracing::info_span!("tiler.build", root, width = config.width).entered();
    let found = discover(scene, index, root, config, policy);
    let ids: Vec<EntityId> = found.accepted.iter().map(|(id, _)| *id).collect();
    let cells = layout(scene, &ids, config)?;
    let tiles = found
        .accepted
        .into_iter()
        .zip(cells)
        .map(|((entity, path), (column, row))| PlacedTile {
            entity,
            path,
            column,
            row,
            position: cell_position(config, (column, row)),
        })
        .collect();
    let report = TileSetReport {
        tiles,
        rejected: found.rejected,
        skipped: found.skipped,
    };
    tracing::info!(
        placed = report.accepted_count(),
        rows = report.row_count(),
        "tile set built"
    );
    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extent::UntransformedMaxExtent;
    use crate::test_support::{index_with, tile};
    use glam::Vec2;
    use placekit_common::Transform;

    #[test]
    fn cursor_wraps_rows() {
        let mut cursor = GridCursor::new(3);
        let cells: Vec<_> = (0..7).map(|_| cursor.advance()).collect();
        let columns: Vec<u32> = cells.iter().map(|c| c.0).collect();
        let rows: Vec<u32> = cells.iter().map(|c| c.1).collect();
        assert_eq!(columns, [0, 1, 2, 0, 1, 2, 0]);
        assert_eq!(rows, [0, 0, 0, 1, 1, 1, 2]);
    }

    #[test]
    fn single_column_grid_is_one_tile_per_row() {
        let mut cursor = GridCursor::new(1);
        let rows: Vec<u32> = (0..4).map(|_| cursor.advance().1).collect();
        assert_eq!(rows, [0, 1, 2, 3]);
    }

    #[test]
    fn layout_positions_follow_pitch() {
        let mut scene = Scene::new();
        let ids: Vec<EntityId> = (0..5)
            .map(|i| scene.spawn(format!("T{i}"), Transform::from_position(Vec3::splat(9.0))))
            .collect();
        let config = GridConfig {
            width: 2,
            offset: 1.0,
            max_extent: Vec2::new(4.0, 6.0),
        };
        let cells = layout(&mut scene, &ids, &config).unwrap();
        assert_eq!(cells, [(0, 0), (1, 0), (0, 1), (1, 1), (0, 2)]);
        let positions: Vec<Vec3> = ids
            .iter()
            .map(|id| scene.world_transform(*id).unwrap().position)
            .collect();
        assert_eq!(
            positions,
            [
                Vec3::new(0.0, 0.0, 0.0),
                Vec3::new(5.0, 0.0, 0.0),
                Vec3::new(0.0, 0.0, 7.0),
                Vec3::new(5.0, 0.0, 7.0),
                Vec3::new(0.0, 0.0, 14.0),
            ]
        );
    }

    #[test]
    fn layout_rejects_zero_width() {
        let mut scene = Scene::new();
        let config = GridConfig {
            width: 0,
            ..GridConfig::default()
        };
        assert_eq!(layout(&mut scene, &[], &config), Err(TilerError::ZeroWidth));
    }

    #[test]
    fn build_places_accepted_and_reports_rejected() {
        let (_dir, index) = index_with(&[
            ("a.prefab.json", tile("A", 1.0, 1.0, 1.0)),
            ("b.prefab.json", tile("B", 40.0, 1.0, 1.0)),
            ("c.prefab.json", tile("C", 2.0, 2.0, 50.0)),
            ("d/e.prefab.json", tile("E", 3.0, 3.0, 3.0)),
        ]);
        let mut scene = Scene::new();
        let config = GridConfig {
            width: 2,
            ..GridConfig::default()
        };
        let report = build(&mut scene, &index, "", &config, &UntransformedMaxExtent).unwrap();
        assert_eq!(report.accepted_count(), 3);
        assert_eq!(report.rejected_count(), 1);
        assert_eq!(report.row_count(), 2);
        let last = &report.tiles[2];
        assert_eq!(last.path, "d/e.prefab.json");
        assert_eq!((last.column, last.row), (0, 1));
        assert_eq!(last.position, Vec3::new(0.0, 0.0, 16.0));
        assert_eq!(scene.world_transform(last.entity).unwrap().position, last.position);
        assert_eq!(scene.entity_count(), 3);
    }

    #[test]
    fn invalid_config_does_no_work() {
        let (_dir, index) = index_with(&[("a.prefab.json", tile("A", 1.0, 1.0, 1.0))]);
        let mut scene = Scene::new();
        let config = GridConfig {
            width: 0,
            ..GridConfig::default()
        };
        assert!(build(&mut scene, &index, "", &config, &UntransformedMaxExtent).is_err());
        assert_eq!(scene.entity_count(), 0);
    }
}
