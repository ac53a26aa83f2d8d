//! Flattening of list-mode traversal results and stable deduplication

use std::collections::HashSet;
use std::hash::Hash;

use crate::asset::AssetId;
use crate::walker::ReferenceList;

/// Collapse a nested [`ReferenceList`] into one sequence
///
/// Leaves are emitted depth-first, left to right. Duplicates are kept;
/// run [`dedupe`] afterwards when a unique list is needed.
pub fn flatten(list: &ReferenceList) -> Vec<AssetId> {
    let mut flattened = Vec::new();
    flatten_into(list, &mut flattened);
    flattened
}

fn flatten_into(list: &ReferenceList, out: &mut Vec<AssetId>) {
    match list {
        ReferenceList::Asset(asset) => out.push(asset.clone()),
        ReferenceList::Nested(items) => {
            for item in items {
                flatten_into(item, out);
            }
        }
    }
}

/// Remove duplicates, keeping the first occurrence of each item in place
pub fn dedupe<T, I>(items: I) -> Vec<T>
where
    T: Eq + Hash + Clone,
    I: IntoIterator<Item = T>,
{
    let mut seen = HashSet::new();
    items
        .into_iter()
        .filter(|item| seen.insert(item.clone()))
        .collect()
}
