//! Path resolution from graph nodes to files on disk
//!
//! Packages live under mount points (`/Game` -> `<project>/Content`). A
//! package resolves to the first existing `.uasset` or `.umap` file at the
//! mapped location. Assets that resolve nowhere are logged and reported as
//! unresolved; they never abort a traversal.

use std::path::{Component, Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::asset::{AssetId, FileAsset};
use crate::error::Result;
use crate::registry::AssetRegistry;

/// File extensions a package can be stored with, in lookup order
pub const PACKAGE_EXTENSIONS: &[&str] = &["uasset", "umap"];

/// Maps a package mount point onto a content directory
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentMount {
    /// Package path prefix, e.g. `/Game`
    pub mount_point: String,
    /// Directory holding the mounted packages
    pub content_dir: PathBuf,
}

impl ContentMount {
    pub fn new(mount_point: impl Into<String>, content_dir: impl Into<PathBuf>) -> Self {
        Self {
            mount_point: mount_point.into(),
            content_dir: content_dir.into(),
        }
    }

    fn relative_package<'a>(&self, package: &'a str) -> Option<&'a str> {
        package
            .strip_prefix(self.mount_point.trim_end_matches('/'))
            .and_then(|rest| rest.strip_prefix('/'))
            .filter(|rest| !rest.is_empty())
    }

    /// Package id for a file inside this mount's content directory
    pub fn package_for(&self, path: &Path) -> Option<AssetId> {
        let extension = path.extension()?.to_str()?;
        if !PACKAGE_EXTENSIONS.contains(&extension) {
            return None;
        }

        let relative = path.strip_prefix(&self.content_dir).ok()?.with_extension("");
        let mut package = self.mount_point.trim_end_matches('/').to_string();
        for component in relative.components() {
            match component {
                Component::Normal(segment) => {
                    package.push('/');
                    package.push_str(segment.to_str()?);
                }
                _ => return None,
            }
        }

        Some(AssetId::from(package))
    }
}

/// The set of mounts known to a registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ContentMounts {
    mounts: Vec<ContentMount>,
}

impl ContentMounts {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, mount: ContentMount) {
        self.mounts.push(mount);
    }

    pub fn iter(&self) -> impl Iterator<Item = &ContentMount> {
        self.mounts.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.mounts.is_empty()
    }

    /// Candidate files for an asset, in lookup order
    ///
    /// Object paths (`/Game/A.A`) are reduced to their package first.
    pub fn candidates(&self, asset: &AssetId) -> Vec<PathBuf> {
        let package = asset.package_name();
        self.mounts
            .iter()
            .filter_map(|mount| {
                mount
                    .relative_package(package.as_str())
                    .map(|relative| mount.content_dir.join(relative))
            })
            .flat_map(|base| {
                PACKAGE_EXTENSIONS
                    .iter()
                    .map(move |extension| base.with_extension(extension))
            })
            .collect()
    }

    /// First candidate that exists as a file
    pub fn locate(&self, asset: &AssetId) -> Option<PathBuf> {
        self.candidates(asset).into_iter().find(|path| path.is_file())
    }

    /// Package id for a file under any mount
    pub fn package_for(&self, path: &Path) -> Option<AssetId> {
        self.mounts.iter().find_map(|mount| mount.package_for(path))
    }
}

impl FromIterator<ContentMount> for ContentMounts {
    fn from_iter<I: IntoIterator<Item = ContentMount>>(iter: I) -> Self {
        Self {
            mounts: iter.into_iter().collect(),
        }
    }
}

/// Resolve one asset to its on-disk location
///
/// An unresolved asset is logged at error level and returned with
/// `system_path: None`. Only registry failures are returned as errors.
pub fn resolve<R>(registry: &R, asset: &AssetId) -> Result<FileAsset>
where
    R: AssetRegistry + ?Sized,
{
    let system_path = registry.resolve_path(asset)?;
    if system_path.is_none() {
        tracing::error!(asset = %asset, "file doesn't exist on disk");
    }

    Ok(FileAsset {
        asset: asset.clone(),
        system_path,
    })
}

/// Resolve a sequence of assets, keeping input order
pub fn resolve_all<'a, R, I>(registry: &R, assets: I) -> Result<Vec<FileAsset>>
where
    R: AssetRegistry + ?Sized,
    I: IntoIterator<Item = &'a AssetId>,
{
    assets
        .into_iter()
        .map(|asset| resolve(registry, asset))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::{self, File};
    use tempfile::TempDir;

    fn game_mounts(root: &Path) -> ContentMounts {
        [ContentMount::new("/Game", root.join("Content"))]
            .into_iter()
            .collect()
    }

    #[test]
    fn test_candidates_for_package() {
        let mounts = game_mounts(Path::new("/project"));
        let candidates = mounts.candidates(&AssetId::from("/Game/Rig/Test.Test"));

        assert_eq!(
            candidates,
            vec![
                PathBuf::from("/project/Content/Rig/Test.uasset"),
                PathBuf::from("/project/Content/Rig/Test.umap"),
            ]
        );
    }

    #[test]
    fn test_candidates_outside_mounts() {
        let mounts = game_mounts(Path::new("/project"));

        assert!(mounts.candidates(&AssetId::from("/Engine/Basic/Cube")).is_empty());
        assert!(mounts.candidates(&AssetId::from("/Game")).is_empty());
        assert!(mounts.candidates(&AssetId::from("/GameData/Test")).is_empty());
    }

    #[test]
    fn test_locate_prefers_existing_file() {
        let temp_dir = TempDir::new().unwrap();
        let mounts = game_mounts(temp_dir.path());

        fs::create_dir_all(temp_dir.path().join("Content/Maps")).unwrap();
        File::create(temp_dir.path().join("Content/Maps/Arena.umap")).unwrap();

        assert_eq!(
            mounts.locate(&AssetId::from("/Game/Maps/Arena")),
            Some(temp_dir.path().join("Content/Maps/Arena.umap"))
        );
        assert_eq!(mounts.locate(&AssetId::from("/Game/Maps/Missing")), None);
    }

    #[test]
    fn test_package_for_round_trip() {
        let mounts = game_mounts(Path::new("/project"));

        assert_eq!(
            mounts.package_for(Path::new("/project/Content/Rig/Test.uasset")),
            Some(AssetId::from("/Game/Rig/Test"))
        );
        assert_eq!(mounts.package_for(Path::new("/project/Content/Rig/readme.txt")), None);
        assert_eq!(mounts.package_for(Path::new("/elsewhere/Rig/Test.uasset")), None);
    }
}
