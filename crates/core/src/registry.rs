//! Registry adapter boundary
//!
//! The asset registry is owned by the content pipeline and treated as a
//! black box: given an asset, it returns the direct neighbors in one
//! direction. [`crate::graph::ReferenceGraph`] is the in-memory
//! implementation used by the CLI and the tests.

use std::path::PathBuf;

use crate::asset::AssetId;
use crate::error::Result;
use crate::options::{Direction, ReferenceOptions};

/// Read-only view of an external asset registry
///
/// Implementations return an empty list for unknown assets. The only error
/// they should raise is [`crate::MigratorError::RegistryUnavailable`].
pub trait AssetRegistry {
    /// Direct dependencies of `asset`
    fn dependencies(&self, asset: &AssetId, options: &ReferenceOptions) -> Result<Vec<AssetId>>;

    /// Direct referencers of `asset`
    fn referencers(&self, asset: &AssetId, options: &ReferenceOptions) -> Result<Vec<AssetId>>;

    /// On-disk location of `asset`, or `None` if it does not exist on disk
    fn resolve_path(&self, asset: &AssetId) -> Result<Option<PathBuf>>;

    /// Assets stored under a folder path
    fn assets_under(&self, folder: &AssetId, recursive: bool) -> Result<Vec<AssetId>>;

    /// Direct neighbors of `asset` in the given direction
    fn neighbors(
        &self,
        asset: &AssetId,
        direction: Direction,
        options: &ReferenceOptions,
    ) -> Result<Vec<AssetId>> {
        match direction {
            Direction::Dependency => self.dependencies(asset, options),
            Direction::Referencer => self.referencers(asset, options),
        }
    }
}

impl<R: AssetRegistry + ?Sized> AssetRegistry for &R {
    fn dependencies(&self, asset: &AssetId, options: &ReferenceOptions) -> Result<Vec<AssetId>> {
        (**self).dependencies(asset, options)
    }

    fn referencers(&self, asset: &AssetId, options: &ReferenceOptions) -> Result<Vec<AssetId>> {
        (**self).referencers(asset, options)
    }

    fn resolve_path(&self, asset: &AssetId) -> Result<Option<PathBuf>> {
        (**self).resolve_path(asset)
    }

    fn assets_under(&self, folder: &AssetId, recursive: bool) -> Result<Vec<AssetId>> {
        (**self).assets_under(folder, recursive)
    }
}
