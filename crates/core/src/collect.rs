//! Collecting the on-disk files behind a package or folder
//!
//! Packages are walked in list mode, flattened, resolved to system paths and
//! deduplicated. The result includes the starting package itself, so it can
//! be handed straight to [`crate::migrate::migrate`].

use std::path::PathBuf;

use crate::asset::AssetId;
use crate::error::Result;
use crate::flatten::dedupe;
use crate::options::TraversalOptions;
use crate::registry::AssetRegistry;
use crate::resolve::resolve_all;
use crate::walker::walk_list;

/// Unique system paths reachable from `package`
///
/// `package` should be the outer package path (`/Game/Rig/Test`, not
/// `/Game/Rig/Test.Test`); object paths are reduced to their package.
/// Assets that do not exist on disk are logged and left out.
///
/// The walk is list mode, so duplicates are only removed afterwards. A
/// cycle that fans out (`A -> {B, C}`, `B -> A`, `C -> A`) is re-expanded
/// on every branch, and the work grows exponentially with
/// `options.max_depth`. Lower the depth for graphs like that, or walk them
/// with [`crate::walker::walk_map`].
pub fn package_files<R>(registry: &R, package: &AssetId, options: &TraversalOptions) -> Result<Vec<PathBuf>>
where
    R: AssetRegistry + ?Sized,
{
    let package = package.package_name();
    let assets = walk_list(registry, &package, options)?.flatten();
    let files = resolve_all(registry, &dedupe(assets))?;

    let unresolved = files.iter().filter(|file| !file.is_resolved()).count();
    if unresolved > 0 {
        tracing::warn!(package = %package, unresolved, "some references are missing on disk");
    }

    Ok(dedupe(files.into_iter().filter_map(|file| file.system_path)))
}

/// Unique system paths reachable from every asset in `folder`
///
/// Each asset gets its own independent walk; the union is deduplicated in
/// first-seen order.
pub fn folder_files<R>(
    registry: &R,
    folder: &AssetId,
    recursive: bool,
    options: &TraversalOptions,
) -> Result<Vec<PathBuf>>
where
    R: AssetRegistry + ?Sized,
{
    let packages = dedupe(
        registry
            .assets_under(folder, recursive)?
            .iter()
            .map(AssetId::package_name),
    );
    tracing::debug!(folder = %folder, packages = packages.len(), "collecting folder");

    let mut files = Vec::new();
    for package in &packages {
        files.extend(package_files(registry, package, options)?);
    }

    Ok(dedupe(files))
}
