//! Collect-then-migrate over the fixture project

mod common;

use std::fs;

use asset_migrator_core::collect;
use asset_migrator_core::migrate::{self, CopyOptions};
use asset_migrator_core::{ReferenceOptions, TraversalOptions};
use tempfile::TempDir;

use common::{capture_logs, fixture_content, id, load_fixture, FIXTURE_PROJECT};

fn hard_dependencies() -> TraversalOptions {
    TraversalOptions::dependencies().with_references(ReferenceOptions::hard_only())
}

#[test]
fn test_migrate_package_dependencies() {
    let graph = load_fixture();
    let target = TempDir::new().unwrap();
    let target_root = target.path().to_str().unwrap();

    let files = collect::package_files(&graph, &id("/Game/Rig/Test"), &hard_dependencies()).unwrap();
    let moved = migrate::migrate(&files, FIXTURE_PROJECT, target_root).unwrap();

    assert_eq!(
        moved,
        vec![
            target.path().join("Content/Rig/Test.uasset"),
            target.path().join("Content/Rig/Mesh.uasset"),
            target.path().join("Content/Materials/Skin.uasset"),
            target.path().join("Content/Textures/Skin_D.uasset"),
        ]
    );
    for (source, destination) in files.iter().zip(&moved) {
        assert_eq!(fs::read(source).unwrap(), fs::read(destination).unwrap());
    }
    assert!(!target.path().join("Content/Maps").exists());
}

#[test]
fn test_second_run_with_diff_copies_nothing() {
    let graph = load_fixture();
    let target = TempDir::new().unwrap();
    let target_root = target.path().to_str().unwrap();
    let options = CopyOptions {
        do_diff: true,
        force: true,
    };

    let files = collect::folder_files(&graph, &id("/Game/Rig"), false, &hard_dependencies()).unwrap();
    let first = migrate::migrate_with(&files, FIXTURE_PROJECT, target_root, options).unwrap();
    let second = migrate::migrate_with(&files, FIXTURE_PROJECT, target_root, options).unwrap();

    assert_eq!(first.copied, files.len());
    assert_eq!(second.copied, 0);
    assert_eq!(second.skipped, files.len());
    assert_eq!(first.destinations, second.destinations);
}

#[test]
fn test_missing_source_logged_and_recorded() {
    let target = TempDir::new().unwrap();
    let target_root = target.path().to_str().unwrap();
    let missing = fixture_content().join("Rig/Ghost.uasset");
    let present = fixture_content().join("Rig/Mesh.uasset");

    let (report, logs) = capture_logs(|| {
        migrate::migrate_with(&[&missing, &present], FIXTURE_PROJECT, target_root, CopyOptions::default())
    });
    let report = report.unwrap();

    assert_eq!(
        report.destinations,
        vec![
            target.path().join("Content/Rig/Ghost.uasset"),
            target.path().join("Content/Rig/Mesh.uasset"),
        ]
    );
    assert_eq!(report.copied, 1);
    assert!(logs.contains("WARN"), "logs: {logs}");
    assert!(logs.contains("source file not located"), "logs: {logs}");
}
