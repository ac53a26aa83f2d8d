//! Bounded traversal of the reference graph
//!
//! Two strategies share the same per-node steps (fetch neighbors, drop code
//! nodes, stop at the depth bound) but differ in duplicate handling:
//!
//! - [`walk_list`] never suppresses duplicates. Sibling branches that reach
//!   the same asset each expand it, and the nested result is meant to be
//!   passed through [`crate::flatten::flatten`] and
//!   [`crate::flatten::dedupe`].
//! - [`walk_map`] threads one [`SeenSet`] through the whole traversal. Once an
//!   asset has been discovered anywhere it is filtered out of every later
//!   neighbor list, so it is expanded at most once and appears once in the
//!   resulting [`ReferenceTree`]. This also bounds the walk on cyclic graphs.
//!
//! On graphs with shared dependencies the two expand different branches.

use std::collections::HashSet;

use serde::Serialize;

use crate::asset::AssetId;
use crate::error::Result;
use crate::flatten;
use crate::options::TraversalOptions;
use crate::registry::AssetRegistry;

/// Nested list-mode result: the asset followed by its expansions
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum ReferenceList {
    Asset(AssetId),
    Nested(Vec<ReferenceList>),
}

impl ReferenceList {
    /// Depth-first, left-to-right leaves (duplicates kept)
    pub fn flatten(&self) -> Vec<AssetId> {
        flatten::flatten(self)
    }
}

/// Assets already discovered during one top-level traversal
///
/// Callers allocate a fresh set per independent traversal. Reusing a set
/// across unrelated walks suppresses assets those walks never saw.
#[derive(Debug, Clone, Default)]
pub struct SeenSet {
    order: Vec<AssetId>,
    members: HashSet<AssetId>,
}

impl SeenSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, asset: &AssetId) -> bool {
        self.members.contains(asset)
    }

    /// Record an asset; returns `false` if it was already present
    pub fn insert(&mut self, asset: AssetId) -> bool {
        if !self.members.insert(asset.clone()) {
            return false;
        }
        self.order.push(asset);
        true
    }

    pub fn len(&self) -> usize {
        self.order.len()
    }

    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }

    /// Assets in discovery order
    pub fn iter(&self) -> impl Iterator<Item = &AssetId> {
        self.order.iter()
    }
}

/// One node of a [`ReferenceTree`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TreeEntry {
    pub asset: AssetId,
    /// Distance from the root
    pub depth: usize,
    /// `None` when the depth bound stopped expansion, empty when expanded
    /// without surviving neighbors
    pub children: Option<Vec<usize>>,
}

/// Map-mode result, stored as an arena of entries with the root at index 0
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ReferenceTree {
    entries: Vec<TreeEntry>,
}

impl ReferenceTree {
    fn with_root(root: AssetId) -> Self {
        Self {
            entries: vec![TreeEntry {
                asset: root,
                depth: 0,
                children: None,
            }],
        }
    }

    fn push(&mut self, asset: AssetId, depth: usize) -> usize {
        self.entries.push(TreeEntry {
            asset,
            depth,
            children: None,
        });
        self.entries.len() - 1
    }

    pub fn root(&self) -> &AssetId {
        &self.entries[0].asset
    }

    pub fn entries(&self) -> &[TreeEntry] {
        &self.entries
    }

    pub fn entry(&self, index: usize) -> Option<&TreeEntry> {
        self.entries.get(index)
    }

    /// Child entries of `index`, in discovery order
    pub fn children_of(&self, index: usize) -> impl Iterator<Item = &TreeEntry> {
        self.entries
            .get(index)
            .and_then(|entry| entry.children.as_deref())
            .unwrap_or_default()
            .iter()
            .filter_map(|&child| self.entries.get(child))
    }

    /// Index of the first entry for `asset`
    pub fn find(&self, asset: &AssetId) -> Option<usize> {
        self.entries.iter().position(|entry| &entry.asset == asset)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// All assets in pre-order, root first
    pub fn assets(&self) -> Vec<AssetId> {
        let mut ordered = Vec::with_capacity(self.entries.len());
        let mut stack = vec![0usize];
        while let Some(index) = stack.pop() {
            let entry = &self.entries[index];
            ordered.push(entry.asset.clone());
            if let Some(children) = &entry.children {
                stack.extend(children.iter().rev());
            }
        }
        ordered
    }

    /// Nested JSON map: `{ root: { child: { .. }, leaf: null } }`
    pub fn to_json(&self) -> serde_json::Value {
        let mut map = serde_json::Map::new();
        map.insert(self.root().to_string(), self.entry_json(0));
        serde_json::Value::Object(map)
    }

    fn entry_json(&self, index: usize) -> serde_json::Value {
        match &self.entries[index].children {
            None => serde_json::Value::Null,
            Some(children) => serde_json::Value::Object(
                children
                    .iter()
                    .map(|&child| (self.entries[child].asset.to_string(), self.entry_json(child)))
                    .collect(),
            ),
        }
    }
}

/// Neighbors of `asset` after the code-namespace filter
fn surviving_neighbors<R>(
    registry: &R,
    asset: &AssetId,
    options: &TraversalOptions,
) -> Result<Vec<AssetId>>
where
    R: AssetRegistry + ?Sized,
{
    let mut neighbors = registry.neighbors(asset, options.direction, &options.references)?;
    if options.filter_code {
        neighbors.retain(|neighbor| !neighbor.is_code());
    }
    Ok(neighbors)
}

/// List-mode traversal without duplicate suppression
///
/// Each level is `[asset, expansion..]`: at the depth bound the expansion is
/// the plain neighbor list, otherwise one nested level per neighbor.
///
/// # Errors
/// Only registry unavailability is returned; no partial result is kept.
pub fn walk_list<R>(registry: &R, root: &AssetId, options: &TraversalOptions) -> Result<ReferenceList>
where
    R: AssetRegistry + ?Sized,
{
    list_level(registry, root, options, options.max_depth.max(1))
}

fn list_level<R>(
    registry: &R,
    asset: &AssetId,
    options: &TraversalOptions,
    remaining: usize,
) -> Result<ReferenceList>
where
    R: AssetRegistry + ?Sized,
{
    let mut level = vec![ReferenceList::Asset(asset.clone())];

    let neighbors = surviving_neighbors(registry, asset, options)?;
    tracing::debug!(asset = %asset, neighbors = neighbors.len(), remaining, "list expansion");
    if neighbors.is_empty() {
        return Ok(ReferenceList::Nested(level));
    }

    if remaining <= 1 {
        level.push(ReferenceList::Nested(
            neighbors.into_iter().map(ReferenceList::Asset).collect(),
        ));
    } else {
        for neighbor in &neighbors {
            level.push(list_level(registry, neighbor, options, remaining - 1)?);
        }
    }

    Ok(ReferenceList::Nested(level))
}

/// Map-mode traversal with a fresh [`SeenSet`]
pub fn walk_map<R>(registry: &R, root: &AssetId, options: &TraversalOptions) -> Result<ReferenceTree>
where
    R: AssetRegistry + ?Sized,
{
    let mut seen = SeenSet::new();
    walk_map_with(registry, root, options, &mut seen)
}

/// Map-mode traversal sharing a caller-owned [`SeenSet`]
///
/// Expansion is depth-first with an explicit frontier, visiting nodes in the
/// same order as a recursive walk. With `deduplicate` set, a neighbor already
/// in `seen` is dropped before expansion, survivors are added to `seen`, and
/// the root itself is recorded up front so cycles back to it stop there.
///
/// # Errors
/// Only registry unavailability is returned; no partial result is kept.
pub fn walk_map_with<R>(
    registry: &R,
    root: &AssetId,
    options: &TraversalOptions,
    seen: &mut SeenSet,
) -> Result<ReferenceTree>
where
    R: AssetRegistry + ?Sized,
{
    if options.deduplicate {
        seen.insert(root.clone());
    }

    let mut tree = ReferenceTree::with_root(root.clone());
    let mut frontier = vec![(0usize, options.max_depth.max(1))];

    while let Some((index, remaining)) = frontier.pop() {
        let asset = tree.entries[index].asset.clone();
        let mut neighbors = surviving_neighbors(registry, &asset, options)?;

        if options.deduplicate {
            neighbors.retain(|neighbor| seen.insert(neighbor.clone()));
        } else {
            for neighbor in &neighbors {
                seen.insert(neighbor.clone());
            }
        }
        tracing::debug!(asset = %asset, neighbors = neighbors.len(), remaining, "map expansion");

        let depth = tree.entries[index].depth + 1;
        let children: Vec<usize> = neighbors
            .into_iter()
            .map(|neighbor| tree.push(neighbor, depth))
            .collect();

        if remaining > 1 {
            // Reversed so the first neighbor's subtree completes before its siblings
            frontier.extend(children.iter().rev().map(|&child| (child, remaining - 1)));
        }
        tree.entries[index].children = Some(children);
    }

    Ok(tree)
}
