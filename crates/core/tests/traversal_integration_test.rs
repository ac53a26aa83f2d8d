//! End-to-end traversal over the fixture manifest

mod common;

use asset_migrator_core::collect;
use asset_migrator_core::resolve;
use asset_migrator_core::walker::{walk_list, walk_map, walk_map_with};
use asset_migrator_core::{
    flatten, MigratorError, ReferenceGraph, ReferenceOptions, SeenSet, TraversalOptions,
};

use common::{capture_logs, fixture_content, fixture_manifest, id, ids, load_fixture, FlakyRegistry};

#[test]
fn test_manifest_settings_loaded() {
    let (graph, manifest) = ReferenceGraph::load(&fixture_manifest()).unwrap();

    assert_eq!(graph.asset_count(), 9);
    assert_eq!(graph.reference_count(), 10);
    assert_eq!(manifest.traversal.unwrap().max_depth, 50);
    assert!(manifest.copy.unwrap().do_diff);
    assert!(manifest.copy.unwrap().force);
}

#[test]
fn test_walk_map_dependencies() {
    let graph = load_fixture();

    let tree = walk_map(&graph, &id("/Game/Rig/Test"), &TraversalOptions::dependencies()).unwrap();

    assert_eq!(
        tree.assets(),
        ids(&[
            "/Game/Rig/Test",
            "/Game/Rig/Mesh",
            "/Game/Textures/Skin_D",
            "/Game/Materials/Skin",
            "/Game/Textures/Skin_N",
            "/Game/Old/Removed",
        ])
    );
}

#[test]
fn test_walk_map_hard_references_only() {
    let graph = load_fixture();
    let options = TraversalOptions::dependencies().with_references(ReferenceOptions::hard_only());

    let tree = walk_map(&graph, &id("/Game/Rig/Test"), &options).unwrap();

    assert_eq!(
        tree.assets(),
        ids(&[
            "/Game/Rig/Test",
            "/Game/Rig/Mesh",
            "/Game/Textures/Skin_D",
            "/Game/Materials/Skin",
        ])
    );
}

#[test]
fn test_no_asset_expanded_twice() {
    let graph = load_fixture();
    let mut seen = SeenSet::new();

    let tree = walk_map_with(&graph, &id("/Game/Maps/Arena"), &TraversalOptions::dependencies(), &mut seen).unwrap();

    let assets = tree.assets();
    assert_eq!(flatten::dedupe(assets.clone()), assets);
    assert_eq!(seen.len(), assets.len());
}

#[test]
fn test_walk_map_referencers() {
    let graph = load_fixture();

    let tree = walk_map(&graph, &id("/Game/Textures/Skin_D"), &TraversalOptions::referencers()).unwrap();

    assert_eq!(
        tree.assets(),
        ids(&[
            "/Game/Textures/Skin_D",
            "/Game/Rig/Mesh",
            "/Game/Rig/Test",
            "/Game/Maps/Arena",
            "/Game/Materials/Skin",
        ])
    );
}

#[test]
fn test_depth_one_keeps_code_nodes_when_unfiltered() {
    let graph = load_fixture();
    let options = TraversalOptions::dependencies()
        .with_max_depth(1)
        .with_filter_code(false);

    let tree = walk_map(&graph, &id("/Game/Maps/Arena"), &options).unwrap();

    assert_eq!(
        tree.assets(),
        ids(&["/Game/Maps/Arena", "/Game/Rig/Test", "/Script/CoreUObject"])
    );
    assert!(tree.children_of(0).all(|entry| entry.children.is_none()));
}

#[test]
fn test_walk_list_then_dedupe() {
    let graph = load_fixture();
    let options = TraversalOptions::dependencies().with_references(ReferenceOptions::hard_only());

    let flat = walk_list(&graph, &id("/Game/Rig/Test"), &options).unwrap().flatten();

    assert_eq!(
        flat,
        ids(&[
            "/Game/Rig/Test",
            "/Game/Rig/Mesh",
            "/Game/Materials/Skin",
            "/Game/Textures/Skin_D",
            "/Game/Textures/Skin_D",
            "/Game/Materials/Skin",
            "/Game/Textures/Skin_D",
        ])
    );
    assert_eq!(
        flatten::dedupe(flat),
        ids(&[
            "/Game/Rig/Test",
            "/Game/Rig/Mesh",
            "/Game/Materials/Skin",
            "/Game/Textures/Skin_D",
        ])
    );
}

#[test]
fn test_registry_unavailable_propagates() {
    let registry = FlakyRegistry {
        inner: load_fixture(),
        broken: id("/Game/Textures/Skin_D"),
    };
    let options = TraversalOptions::dependencies();

    let map_err = walk_map(&registry, &id("/Game/Rig/Test"), &options).unwrap_err();
    let list_err = walk_list(&registry, &id("/Game/Rig/Test"), &options).unwrap_err();

    for err in [map_err, list_err] {
        match err {
            MigratorError::RegistryUnavailable { asset, .. } => {
                assert_eq!(asset, id("/Game/Textures/Skin_D"));
            }
            other => panic!("Expected RegistryUnavailable, got {other:?}"),
        }
    }
}

#[test]
fn test_unresolved_assets_logged_as_errors() {
    let graph = load_fixture();

    let (files, logs) = capture_logs(|| {
        collect::package_files(&graph, &id("/Game/Rig/Test"), &TraversalOptions::dependencies())
    });

    let content = fixture_content();
    assert_eq!(
        files.unwrap(),
        vec![
            content.join("Rig/Test.uasset"),
            content.join("Rig/Mesh.uasset"),
            content.join("Materials/Skin.uasset"),
            content.join("Textures/Skin_D.uasset"),
        ]
    );
    assert!(logs.contains("ERROR"), "logs: {logs}");
    assert!(logs.contains("/Game/Old/Removed"), "logs: {logs}");
    assert!(logs.contains("/Game/Textures/Skin_N"), "logs: {logs}");
}

#[test]
fn test_resolve_all_keeps_order() {
    let graph = load_fixture();
    let assets = ids(&["/Game/Maps/Arena", "/Game/Old/Removed"]);

    let resolved = resolve::resolve_all(&graph, &assets).unwrap();

    assert_eq!(resolved.len(), 2);
    assert_eq!(
        resolved[0].system_path,
        Some(fixture_content().join("Maps/Arena.umap"))
    );
    assert!(!resolved[1].is_resolved());
}
