//! Asset index: a folder tree of prefab documents addressed by content hash.
//!
//! Tools never touch raw file paths directly; they go through the
//! [`AssetIndex`] trait, which mirrors the small surface an editor asset
//! database offers: find, resolve, is-folder, load.
//!
//! # Layout
//! ```text
//! <root>/
//!   Environment/
//!     Rocks/
//!       Boulder.prefab.json   - prefab document (serde JSON of `Prefab`)
//!     Lamp.prefab.json
//!   readme.txt                - any other file is an `Other` leaf
//! ```
//! Asset paths are relative to the root and always use `/` separators.

mod query;

pub use query::{AssetKind, AssetQuery};

use placekit_kernel::Prefab;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// File suffix that marks a prefab document.
pub const PREFAB_SUFFIX: &str = ".prefab.json";

/// Content-addressed asset ID computed from the asset path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct AssetId(pub u64);

impl AssetId {
    pub fn from_path(path: &str) -> Self {
        let mut hasher = Sha256::new();
        hasher.update(path.as_bytes());
        let result = hasher.finalize();
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(&result[..8]);
        Self(u64::from_le_bytes(bytes))
    }
}

/// One entry of the index.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetEntry {
    pub id: AssetId,
    /// Root-relative path with `/` separators. The root itself is `""`.
    pub path: String,
    pub name: String,
    pub kind: AssetKind,
}

/// Errors from asset operations.
#[derive(Debug, thiserror::Error)]
pub enum AssetError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("asset root is not a directory: {0}")]
    InvalidRoot(PathBuf),
    #[error("asset not found: {0}")]
    NotFound(String),
    #[error("asset is not a prefab: {0}")]
    NotAPrefab(String),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Read-side interface every tool uses to reach assets.
pub trait AssetIndex {
    /// Ids of the entries directly inside the folder `scope` that match `query`,
    /// in path order. Folders are returned as entries too; callers recurse.
    fn find_assets(&self, query: &AssetQuery, scope: &str) -> Vec<AssetId>;

    /// Ids of every matching entry anywhere in the index, in path order.
    fn find_all(&self, query: &AssetQuery) -> Vec<AssetId>;

    fn resolve_path(&self, id: AssetId) -> Option<&str>;

    fn is_directory(&self, path: &str) -> bool;

    fn load_prefab(&self, path: &str) -> Result<Prefab, AssetError>;
}

/// Filesystem-backed asset index. Scans the tree on open and on `refresh`.
#[derive(Debug, Clone)]
pub struct FsAssetIndex {
    root: PathBuf,
    entries: BTreeMap<AssetId, AssetEntry>,
    children: BTreeMap<String, Vec<AssetId>>,
}

impl FsAssetIndex {
    /// Open and scan the folder tree at `root`.
    pub fn open(root: impl AsRef<Path>) -> Result<Self, AssetError> {
        let root = root.as_ref().to_path_buf();
        if !root.is_dir() {
            return Err(AssetError::InvalidRoot(root));
        }
        let mut index = Self {
            root,
            entries: BTreeMap::new(),
            children: BTreeMap::new(),
        };
        index.refresh()?;
        Ok(index)
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Rescan the whole tree.
    pub fn refresh(&mut self) -> Result<(), AssetError> {
        let _span = tracing::debug_span!("asset_refresh").entered();
        self.entries.clear();
        self.children.clear();
        let root_id = AssetId::from_path("");
        self.entries.insert(
            root_id,
            AssetEntry {
                id: root_id,
                path: String::new(),
                name: String::new(),
                kind: AssetKind::Folder,
            },
        );
        let root = self.root.clone();
        self.scan_dir(&root, "")?;
        tracing::debug!(entries = self.entries.len(), "asset index scanned");
        Ok(())
    }

    fn scan_dir(&mut self, dir: &Path, rel: &str) -> Result<(), AssetError> {
        let mut names: Vec<(String, bool)> = Vec::new();
        for entry in std::fs::read_dir(dir)? {
            let entry = entry?;
            let Ok(file_name) = entry.file_name().into_string() else {
                tracing::warn!(path = %entry.path().display(), "skipping asset with a non-UTF-8 name");
                continue;
            };
            names.push((file_name, entry.file_type()?.is_dir()));
        }
        names.sort();

        let mut ids = Vec::with_capacity(names.len());
        for (file_name, is_dir) in names {
            let path = if rel.is_empty() {
                file_name.clone()
            } else {
                format!("{rel}/{file_name}")
            };
            let (kind, name) = if is_dir {
                (AssetKind::Folder, file_name.clone())
            } else if let Some(stem) = file_name.strip_suffix(PREFAB_SUFFIX) {
                (AssetKind::Prefab, stem.to_string())
            } else {
                let stem = Path::new(&file_name)
                    .file_stem()
                    .map(|s| s.to_string_lossy().into_owned())
                    .unwrap_or_else(|| file_name.clone());
                (AssetKind::Other, stem)
            };
            let id = AssetId::from_path(&path);
            self.entries.insert(
                id,
                AssetEntry {
                    id,
                    path: path.clone(),
                    name,
                    kind,
                },
            );
            ids.push(id);
            if is_dir {
                if let Err(err) = self.scan_dir(&dir.join(&file_name), &path) {
                    tracing::warn!(path = %path, error = %err, "skipping unreadable folder");
                }
            }
        }
        self.children.insert(rel.to_string(), ids);
        Ok(())
    }

    pub fn entry(&self, id: AssetId) -> Option<&AssetEntry> {
        self.entries.get(&id)
    }

    pub fn entry_by_path(&self, path: &str) -> Option<&AssetEntry> {
        self.entries.get(&AssetId::from_path(normalize(path)))
    }

    /// Number of indexed entries, the root folder included.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.len() <= 1
    }

    /// Write a prefab document under the root and rescan. Parent folders are
    /// created as needed. `path` must end with [`PREFAB_SUFFIX`].
    pub fn save_prefab(&mut self, path: &str, prefab: &Prefab) -> Result<AssetId, AssetError> {
        let path = normalize(path);
        if !path.ends_with(PREFAB_SUFFIX) {
            return Err(AssetError::NotAPrefab(path.to_string()));
        }
        let full = self.root.join(path);
        if let Some(parent) = full.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let file = std::fs::File::create(&full)?;
        serde_json::to_writer_pretty(file, prefab)?;
        self.refresh()?;
        Ok(AssetId::from_path(path))
    }
}

impl AssetIndex for FsAssetIndex {
    fn find_assets(&self, query: &AssetQuery, scope: &str) -> Vec<AssetId> {
        let Some(ids) = self.children.get(normalize(scope)) else {
            tracing::warn!(scope, "find_assets: scope is not an indexed folder");
            return Vec::new();
        };
        ids.iter()
            .filter(|id| {
                self.entries
                    .get(id)
                    .is_some_and(|e| query.matches(e.kind, &e.name))
            })
            .copied()
            .collect()
    }

    fn find_all(&self, query: &AssetQuery) -> Vec<AssetId> {
        let mut found: Vec<&AssetEntry> = self
            .entries
            .values()
            .filter(|e| !e.path.is_empty() && query.matches(e.kind, &e.name))
            .collect();
        found.sort_by(|a, b| a.path.cmp(&b.path));
        found.into_iter().map(|e| e.id).collect()
    }

    fn resolve_path(&self, id: AssetId) -> Option<&str> {
        self.entries.get(&id).map(|e| e.path.as_str())
    }

    fn is_directory(&self, path: &str) -> bool {
        self.entry_by_path(path)
            .is_some_and(|e| e.kind == AssetKind::Folder)
    }

    fn load_prefab(&self, path: &str) -> Result<Prefab, AssetError> {
        let entry = self
            .entry_by_path(path)
            .ok_or_else(|| AssetError::NotFound(path.to_string()))?;
        if entry.kind != AssetKind::Prefab {
            return Err(AssetError::NotAPrefab(path.to_string()));
        }
        let data = std::fs::read_to_string(self.root.join(&entry.path))?;
        let prefab: Prefab = serde_json::from_str(&data)?;
        Ok(prefab)
    }
}

/// Strip leading/trailing separators and a leading `./`.
fn normalize(path: &str) -> &str {
    let path = path.strip_prefix("./").unwrap_or(path);
    path.trim_matches('/')
}

pub fn crate_info() -> &'static str {
    "placekit-assets v0.1.0"
}
