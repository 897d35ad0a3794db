//! Prefab browser: the catalog of prefabs in an asset index and the
//! thumbnail grid used to show it.
//!
//! Grid geometry is in list-local pixels with the origin at the top-left of
//! the scrollable content. Each element is a square thumbnail with a label
//! strip underneath.

use glam::Vec2;
use placekit_assets::{AssetId, AssetIndex, AssetKind, AssetQuery, PREFAB_SUFFIX};
use serde::{Deserialize, Serialize};

/// Height of the name label under each thumbnail, and the grid margin.
const LABEL_HEIGHT: f32 = 15.0;
const GRID_MARGIN: f32 = 15.0;
/// Width reserved for the vertical scrollbar.
const SCROLLBAR_WIDTH: f32 = 12.0;

/// One prefab listed by the browser.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PrefabInfo {
    pub id: AssetId,
    pub path: String,
    pub name: String,
}

impl PrefabInfo {
    fn from_path(id: AssetId, path: &str) -> Self {
        let file = path.rsplit('/').next().unwrap_or(path);
        let name = file.strip_suffix(PREFAB_SUFFIX).unwrap_or(file);
        Self {
            id,
            path: path.to_string(),
            name: name.to_string(),
        }
    }
}

/// Every prefab in an index, a search filter and at most one selection.
#[derive(Debug, Clone, Default)]
pub struct PrefabCatalog {
    prefabs: Vec<PrefabInfo>,
    search: String,
    selected: Option<AssetId>,
}

impl PrefabCatalog {
    pub fn load(index: &impl AssetIndex) -> Self {
        let mut catalog = Self::default();
        catalog.refresh(index);
        catalog
    }

    /// Re-list the index. The selection survives if its prefab still exists.
    pub fn refresh(&mut self, index: &impl AssetIndex) {
        self.prefabs = index
            .find_all(&AssetQuery::prefabs())
            .into_iter()
            .filter_map(|id| Some(PrefabInfo::from_path(id, index.resolve_path(id)?)))
            .collect();
        if let Some(id) = self.selected {
            if !self.prefabs.iter().any(|p| p.id == id) {
                tracing::debug!(?id, "selected prefab disappeared");
                self.selected = None;
            }
        }
        tracing::debug!(count = self.prefabs.len(), "prefab catalog loaded");
    }

    /// All prefabs in path order, ignoring the search.
    pub fn prefabs(&self) -> &[PrefabInfo] {
        &self.prefabs
    }

    pub fn search(&self) -> &str {
        &self.search
    }

    pub fn set_search(&mut self, text: impl Into<String>) {
        self.search = text.into();
    }

    pub fn clear_search(&mut self) {
        self.search.clear();
    }

    /// Prefabs whose name contains every search term, case-insensitively.
    pub fn visible(&self) -> Vec<&PrefabInfo> {
        let query = AssetQuery::parse(&self.search);
        self.prefabs
            .iter()
            .filter(|p| query.matches(AssetKind::Prefab, &p.name))
            .collect()
    }

    pub fn selected(&self) -> Option<&PrefabInfo> {
        let id = self.selected?;
        self.prefabs.iter().find(|p| p.id == id)
    }

    /// Make `id` the only selected prefab. Unknown ids leave the selection alone.
    pub fn select(&mut self, id: AssetId) -> bool {
        if !self.prefabs.iter().any(|p| p.id == id) {
            return false;
        }
        self.selected = Some(id);
        true
    }

    pub fn select_path(&mut self, path: &str) -> bool {
        match self.prefabs.iter().find(|p| p.path == path) {
            Some(info) => {
                self.selected = Some(info.id);
                true
            }
            None => false,
        }
    }

    pub fn clear_selection(&mut self) {
        self.selected = None;
    }

    /// Select the visible element under `point` (content coordinates).
    pub fn select_at(&mut self, layout: &BrowserLayout, list_width: f32, point: Vec2) -> Option<&PrefabInfo> {
        let hit = self
            .visible()
            .iter()
            .enumerate()
            .find(|(i, _)| layout.element_rect(list_width, *i).contains(point))
            .map(|(_, p)| p.id)?;
        self.selected = Some(hit);
        self.selected()
    }
}

/// Axis-aligned rectangle, origin at the top-left.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= self.x && p.x < self.x + self.width && p.y >= self.y && p.y < self.y + self.height
    }
}

/// Thumbnail grid settings.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BrowserLayout {
    /// Thumbnail edge in pixels.
    pub thumbnail: f32,
    pub min_spacing: f32,
    pub width_shift: f32,
}

impl Default for BrowserLayout {
    fn default() -> Self {
        Self {
            thumbnail: 128.0,
            min_spacing: 1.0,
            width_shift: 24.0,
        }
    }
}

impl BrowserLayout {
    /// Columns that fit in `width`, at least one.
    pub fn columns(&self, width: f32) -> usize {
        let fit = ((width - self.min_spacing) / (self.thumbnail + self.min_spacing)).floor();
        if fit.is_finite() && fit >= 1.0 { fit as usize } else { 1 }
    }

    pub fn rows(&self, width: f32, count: usize) -> usize {
        count.div_ceil(self.columns(width))
    }

    /// Free horizontal space shared out per column. Negative when a single
    /// thumbnail is wider than the list.
    pub fn spacing(&self, width: f32) -> f32 {
        let columns = self.columns(width) as f32;
        ((width - self.min_spacing) - SCROLLBAR_WIDTH - columns * self.thumbnail) / columns
    }

    /// Height of the scrollable content holding `count` elements.
    pub fn content_height(&self, width: f32, count: usize) -> f32 {
        let spacing = self.spacing(width);
        self.rows(width, count) as f32 * (self.thumbnail + spacing + self.width_shift) + spacing * 2.0
    }

    /// Full rect (thumbnail plus label) of element `index`.
    pub fn element_rect(&self, width: f32, index: usize) -> Rect {
        let columns = self.columns(width);
        let spacing = self.spacing(width);
        let (column, row) = ((index % columns) as f32, (index / columns) as f32);
        Rect {
            x: (self.thumbnail + spacing) * column + GRID_MARGIN,
            y: (self.thumbnail + spacing + LABEL_HEIGHT) * row + GRID_MARGIN,
            width: self.thumbnail,
            height: self.thumbnail + LABEL_HEIGHT,
        }
    }

    /// Whether `rect` overlaps a view of `view_height` scrolled down by `scroll_y`.
    pub fn is_visible(&self, rect: &Rect, view_height: f32, scroll_y: f32) -> bool {
        rect.y <= view_height + scroll_y && rect.y + rect.height >= scroll_y
    }

    /// Indices of the elements that need drawing.
    pub fn visible_indices(&self, width: f32, view_height: f32, scroll_y: f32, count: usize) -> Vec<usize> {
        (0..count)
            .filter(|i| self.is_visible(&self.element_rect(width, *i), view_height, scroll_y))
            .collect()
    }
}
