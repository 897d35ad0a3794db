use serde::{Deserialize, Serialize};
use std::fmt;

/// What an index entry is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AssetKind {
    Folder,
    Prefab,
    /// Any leaf file that is not a prefab document.
    Other,
}

impl AssetKind {
    fn from_type_filter(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "folder" => Some(Self::Folder),
            "prefab" => Some(Self::Prefab),
            "other" => Some(Self::Other),
            _ => None,
        }
    }
}

/// Search filter for `AssetIndex::find_assets`.
///
/// Text form: whitespace-separated terms. `t:<kind>` restricts the kind
/// (`t:Prefab`, `t:Folder`); every other term must appear, case-insensitively,
/// in the asset name. The empty query matches everything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssetQuery {
    pub kind: Option<AssetKind>,
    pub terms: Vec<String>,
}

impl AssetQuery {
    pub fn all() -> Self {
        Self::default()
    }

    pub fn prefabs() -> Self {
        Self {
            kind: Some(AssetKind::Prefab),
            terms: Vec::new(),
        }
    }

    pub fn parse(text: &str) -> Self {
        let mut query = Self::default();
        for term in text.split_whitespace() {
            match term.strip_prefix("t:").and_then(AssetKind::from_type_filter) {
                Some(kind) => query.kind = Some(kind),
                None => query.terms.push(term.to_lowercase()),
            }
        }
        query
    }

    pub fn matches(&self, kind: AssetKind, name: &str) -> bool {
        if self.kind.is_some_and(|k| k != kind) {
            return false;
        }
        let name = name.to_lowercase();
        self.terms.iter().all(|t| name.contains(t.as_str()))
    }
}

impl fmt::Display for AssetQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut parts = Vec::new();
        if let Some(kind) = self.kind {
            parts.push(format!("t:{kind:?}"));
        }
        parts.extend(self.terms.iter().cloned());
        write!(f, "{}", parts.join(" "))
    }
}
