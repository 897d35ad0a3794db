//! Editor tooling around a scene: inspection, selection and naming helpers,
//! saved-object snapshots, and the prefab browser.
//!
//! # Invariants
//! - Tools never hold on to entities they did not get from the caller; a
//!   [`Selection`] is pruned against the scene before every use.
//! - Scratch objects (hidden in hierarchy) are invisible to every tool here.

pub mod browser;
pub mod inspector;
pub mod saved;
pub mod selection;

pub use browser::{BrowserLayout, PrefabCatalog, PrefabInfo, Rect};
pub use inspector::{EntityInfo, SceneInspector, SceneSummary};
pub use saved::{Restored, SavedObjects};
pub use selection::{
    BUILTIN_TAGS, LayerNames, RenameMode, Selection, UNTAGGED, all_tags, apply_action,
    delete_entity, rename, rotate_about_up, select_by_layer_and_tag,
};

use placekit_common::EntityId;
use placekit_kernel::SceneError;

/// Errors from selection tools.
#[derive(Debug, thiserror::Error)]
pub enum ToolsError {
    #[error("nothing is selected")]
    NothingSelected,
    #[error("entity {0:?} is not in the scene")]
    Missing(EntityId),
    #[error(transparent)]
    Scene(#[from] SceneError),
}

pub fn crate_info() -> &'static str {
    "placekit-tools v0.1.0"
}
