//! In-memory reference graph implementing [`AssetRegistry`]
//!
//! Uses `petgraph::StableGraph` so node indices stay valid as assets are
//! registered from several sources (manifest entries, discovered packages,
//! programmatic edits). Edges point from the requiring asset to the asset it
//! requires and carry the [`ReferenceKind`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use petgraph::stable_graph::{EdgeIndex, NodeIndex, StableGraph};
use petgraph::visit::EdgeRef;
use petgraph::Direction as EdgeDirection;
use serde::{Deserialize, Serialize};

use crate::asset::AssetId;
use crate::discovery;
use crate::error::{MigratorError, Result};
use crate::flatten::dedupe;
use crate::migrate::CopyOptions;
use crate::options::{ReferenceKind, ReferenceOptions, TraversalOptions};
use crate::registry::AssetRegistry;
use crate::resolve::{ContentMount, ContentMounts};

/// JSON description of a registry snapshot
///
/// ```json
/// {
///   "mounts": [{ "mount_point": "/Game", "content_dir": "Content" }],
///   "assets": [
///     { "id": "/Game/Rig/Test", "dependencies": [{ "id": "/Game/Rig/Mesh" }] }
///   ],
///   "traversal": { "max_depth": 10 },
///   "copy": { "do_diff": true }
/// }
/// ```
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Manifest {
    /// Mount points; relative content directories are taken relative to the manifest
    pub mounts: Vec<ContentMount>,
    pub assets: Vec<ManifestAsset>,
    /// Default traversal settings for tools reading this manifest
    pub traversal: Option<TraversalOptions>,
    /// Default copy policy for tools reading this manifest
    pub copy: Option<CopyOptions>,
}

/// One asset entry of a [`Manifest`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestAsset {
    pub id: AssetId,
    /// Explicit on-disk location, overriding mount lookup
    #[serde(default)]
    pub path: Option<PathBuf>,
    #[serde(default)]
    pub dependencies: Vec<ManifestReference>,
}

/// A dependency edge of a [`ManifestAsset`]
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ManifestReference {
    pub id: AssetId,
    #[serde(default)]
    pub kind: ReferenceKind,
}

impl Manifest {
    /// Read and parse a manifest file
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path).map_err(|source| MigratorError::io(path, source))?;
        serde_json::from_str(&text).map_err(|source| MigratorError::Manifest {
            path: path.to_path_buf(),
            source,
        })
    }
}

/// The reference graph
pub struct ReferenceGraph {
    inner: StableGraph<AssetId, ReferenceKind>,
    /// Id -> index cache, avoids linear scans on every query
    node_id_map: HashMap<AssetId, NodeIndex>,
    paths: HashMap<AssetId, PathBuf>,
    mounts: ContentMounts,
}

impl ReferenceGraph {
    /// Create a new empty graph
    pub fn new() -> Self {
        Self {
            inner: StableGraph::new(),
            node_id_map: HashMap::new(),
            paths: HashMap::new(),
            mounts: ContentMounts::new(),
        }
    }

    /// Build a graph from a parsed manifest
    ///
    /// `base_dir` anchors relative mount directories and asset paths.
    pub fn from_manifest(manifest: &Manifest, base_dir: &Path) -> Self {
        let mut graph = Self::new();

        for mount in &manifest.mounts {
            graph.add_mount(ContentMount::new(
                mount.mount_point.clone(),
                base_dir.join(&mount.content_dir),
            ));
        }

        for entry in &manifest.assets {
            graph.add_asset(entry.id.clone());
            if let Some(path) = &entry.path {
                graph.set_path(entry.id.clone(), base_dir.join(path));
            }
            for reference in &entry.dependencies {
                graph.add_reference(&entry.id, &reference.id, reference.kind);
            }
        }

        graph
    }

    /// Load a manifest file and build its graph
    ///
    /// Returns the manifest alongside so callers can read its settings.
    pub fn load(path: &Path) -> Result<(Self, Manifest)> {
        let manifest = Manifest::load(path)?;
        let base_dir = path.parent().unwrap_or_else(|| Path::new("."));
        let graph = Self::from_manifest(&manifest, base_dir);
        tracing::debug!(
            manifest = %path.display(),
            assets = graph.asset_count(),
            references = graph.reference_count(),
            "loaded reference graph"
        );
        Ok((graph, manifest))
    }

    /// Register an asset, returning its index (existing assets are reused)
    pub fn add_asset(&mut self, asset: AssetId) -> NodeIndex {
        if let Some(&index) = self.node_id_map.get(&asset) {
            return index;
        }
        let index = self.inner.add_node(asset.clone());
        self.node_id_map.insert(asset, index);
        index
    }

    /// Add a `from -> to` reference, registering both assets if needed
    pub fn add_reference(&mut self, from: &AssetId, to: &AssetId, kind: ReferenceKind) -> EdgeIndex {
        let source = self.add_asset(from.clone());
        let target = self.add_asset(to.clone());
        self.inner.add_edge(source, target, kind)
    }

    /// Pin an asset to an explicit on-disk location
    pub fn set_path(&mut self, asset: AssetId, path: PathBuf) {
        self.add_asset(asset.clone());
        self.paths.insert(asset, path);
    }

    pub fn add_mount(&mut self, mount: ContentMount) {
        self.mounts.add(mount);
    }

    pub fn mounts(&self) -> &ContentMounts {
        &self.mounts
    }

    /// Register packages found on disk under every mount
    ///
    /// Returns how many previously unknown packages were added.
    pub fn scan_mounts(&mut self) -> usize {
        let discovered: Vec<AssetId> = self
            .mounts
            .iter()
            .flat_map(discovery::discover_packages)
            .collect();

        let before = self.asset_count();
        for package in discovered {
            self.add_asset(package);
        }
        let added = self.asset_count() - before;
        tracing::debug!(added, "registered discovered packages");
        added
    }

    pub fn contains(&self, asset: &AssetId) -> bool {
        self.node_id_map.contains_key(asset)
    }

    pub fn asset_count(&self) -> usize {
        self.inner.node_count()
    }

    pub fn reference_count(&self) -> usize {
        self.inner.edge_count()
    }

    /// Iterate over all assets in registration order
    pub fn assets(&self) -> impl Iterator<Item = &AssetId> {
        self.inner.node_weights()
    }

    /// Neighbors along edges of allowed kinds, in edge insertion order
    fn adjacent(
        &self,
        asset: &AssetId,
        edge_direction: EdgeDirection,
        options: &ReferenceOptions,
    ) -> Vec<AssetId> {
        let Some(&index) = self.node_id_map.get(asset) else {
            return Vec::new();
        };

        // StableGraph yields adjacency newest-first; sort back to insertion order
        let mut edges: Vec<_> = self
            .inner
            .edges_directed(index, edge_direction)
            .filter(|edge| options.allows(*edge.weight()))
            .map(|edge| {
                let other = if edge.source() == index {
                    edge.target()
                } else {
                    edge.source()
                };
                (edge.id(), other)
            })
            .collect();
        edges.sort_by_key(|(edge, _)| *edge);

        dedupe(
            edges
                .into_iter()
                .filter_map(|(_, other)| self.inner.node_weight(other).cloned()),
        )
    }
}

impl Default for ReferenceGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl AssetRegistry for ReferenceGraph {
    fn dependencies(&self, asset: &AssetId, options: &ReferenceOptions) -> Result<Vec<AssetId>> {
        Ok(self.adjacent(asset, EdgeDirection::Outgoing, options))
    }

    fn referencers(&self, asset: &AssetId, options: &ReferenceOptions) -> Result<Vec<AssetId>> {
        Ok(self.adjacent(asset, EdgeDirection::Incoming, options))
    }

    fn resolve_path(&self, asset: &AssetId) -> Result<Option<PathBuf>> {
        let package = asset.package_name();
        if let Some(path) = self.paths.get(asset).or_else(|| self.paths.get(&package)) {
            return Ok(path.is_file().then(|| path.clone()));
        }
        Ok(self.mounts.locate(asset))
    }

    fn assets_under(&self, folder: &AssetId, recursive: bool) -> Result<Vec<AssetId>> {
        Ok(self
            .assets()
            .filter(|asset| asset.is_under(folder, recursive))
            .cloned()
            .collect())
    }
}
