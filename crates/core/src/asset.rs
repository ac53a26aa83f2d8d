//! Asset identifiers and resolved file assets
//!
//! An [`AssetId`] is the opaque key of a node in the reference graph, e.g.
//! `/Game/Rig/Test` for a package or `/Game/Rig/Test.Test` for the object
//! inside it. Identifiers are compared by string equality only.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Reserved namespace for compiled logic (code/engine-internal nodes)
pub const CODE_PREFIX: &str = "/Script";

/// Identifier of an asset or package in the reference graph
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AssetId(String);

impl AssetId {
    pub fn new(id: impl Into<String>) -> Self {
        AssetId(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this node lives in the reserved code namespace
    ///
    /// This is a plain prefix check, so `/ScriptTools/X` also counts as code.
    pub fn is_code(&self) -> bool {
        self.0.starts_with(CODE_PREFIX)
    }

    /// The outer package path, dropping any `.Object` suffix on the last segment
    pub fn package_name(&self) -> AssetId {
        let last_segment = self.0.rfind('/').map_or(0, |i| i + 1);
        match self.0[last_segment..].find('.') {
            Some(dot) => AssetId(self.0[..last_segment + dot].to_string()),
            None => self.clone(),
        }
    }

    /// Whether this asset sits inside `folder`
    ///
    /// With `recursive == false` only direct children match.
    pub fn is_under(&self, folder: &AssetId, recursive: bool) -> bool {
        let folder = folder.0.trim_end_matches('/');
        let Some(rest) = self
            .0
            .strip_prefix(folder)
            .and_then(|rest| rest.strip_prefix('/'))
        else {
            return false;
        };

        !rest.is_empty() && (recursive || !rest.contains('/'))
    }
}

impl fmt::Display for AssetId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for AssetId {
    fn from(id: &str) -> Self {
        AssetId(id.to_string())
    }
}

impl From<String> for AssetId {
    fn from(id: String) -> Self {
        AssetId(id)
    }
}

impl AsRef<str> for AssetId {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

/// A graph node paired with its on-disk location
///
/// `system_path` is `None` when the asset cannot be found on disk, which is
/// common for soft references to deleted content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileAsset {
    pub asset: AssetId,
    pub system_path: Option<PathBuf>,
}

impl FileAsset {
    pub fn is_resolved(&self) -> bool {
        self.system_path.is_some()
    }
}
