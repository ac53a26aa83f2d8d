//! Package discovery on disk with gitignore-aware filtering
//!
//! Content directories checked into version control often carry ignored
//! build output next to real packages. Discovery walks a mount's content
//! directory, honours `.gitignore`, and maps every package file back to its
//! package id.

use ignore::WalkBuilder;
use std::path::Path;

use crate::asset::AssetId;
use crate::resolve::{ContentMount, PACKAGE_EXTENSIONS};

/// Discover every package stored under a mount's content directory
///
/// # Returns
/// Sorted package ids. A missing content directory yields an empty list.
///
/// # Example
/// ```no_run
/// use asset_migrator_core::discovery;
/// use asset_migrator_core::resolve::ContentMount;
///
/// let mount = ContentMount::new("/Game", "MyProject/Content");
/// let packages = discovery::discover_packages(&mount);
/// println!("Found {} packages", packages.len());
/// ```
pub fn discover_packages(mount: &ContentMount) -> Vec<AssetId> {
    let root = &mount.content_dir;
    if !root.is_dir() {
        tracing::debug!(content_dir = %root.display(), "content directory missing, nothing to discover");
        return Vec::new();
    }

    let glob_matcher = match build_glob_matcher() {
        Ok(matcher) => matcher,
        Err(err) => {
            tracing::warn!(error = %err, "invalid package glob");
            return Vec::new();
        }
    };

    let mut packages = Vec::new();
    for result in build_walker(root) {
        match result {
            Ok(entry) => {
                if !entry.file_type().is_some_and(|ft| ft.is_file()) {
                    continue;
                }
                let Ok(rel_path) = entry.path().strip_prefix(root) else {
                    continue;
                };
                if glob_matcher.is_match(rel_path) {
                    if let Some(package) = mount.package_for(entry.path()) {
                        packages.push(package);
                    }
                }
            }
            Err(err) => {
                // Unreadable entries are skipped, the rest of the tree still counts
                tracing::warn!(error = %err, "error walking content directory");
            }
        }
    }

    packages.sort();
    packages.dedup();
    packages
}

/// Build a glob matcher for every package extension
fn build_glob_matcher() -> Result<globset::GlobSet, globset::Error> {
    use globset::GlobSetBuilder;

    let mut builder = GlobSetBuilder::new();
    for extension in PACKAGE_EXTENSIONS {
        builder.add(globset::Glob::new(&format!("**/*.{extension}"))?);
    }
    builder.build()
}

/// Build a WalkBuilder with proper ignore configuration
fn build_walker(root: &Path) -> ignore::Walk {
    let mut builder = WalkBuilder::new(root);
    builder
        .git_ignore(true)
        .git_exclude(true)
        .hidden(false)
        .parents(true);

    // WalkBuilder only honours .gitignore inside a git repository unless added explicitly
    let gitignore_path = root.join(".gitignore");
    if gitignore_path.exists() {
        // Valid lines still apply when some fail to parse
        if let Some(err) = builder.add_ignore(&gitignore_path) {
            tracing::warn!(path = %gitignore_path.display(), error = %err, "malformed .gitignore");
        }
    }

    builder.build()
}
