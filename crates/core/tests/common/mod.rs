//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::io;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use asset_migrator_core::{AssetId, AssetRegistry, MigratorError, ReferenceGraph, ReferenceOptions, Result};
use tracing_subscriber::fmt::MakeWriter;

pub const FIXTURE_PROJECT: &str = "tests/test-fixtures/rig-project";

pub fn fixture_manifest() -> PathBuf {
    Path::new(FIXTURE_PROJECT).join("manifest.json")
}

pub fn fixture_content() -> PathBuf {
    Path::new(FIXTURE_PROJECT).join("Content")
}

pub fn load_fixture() -> ReferenceGraph {
    let (graph, _) = ReferenceGraph::load(&fixture_manifest()).expect("fixture manifest should load");
    graph
}

pub fn id(s: &str) -> AssetId {
    AssetId::from(s)
}

pub fn ids(items: &[&str]) -> Vec<AssetId> {
    items.iter().map(|s| AssetId::from(*s)).collect()
}

/// In-memory sink for formatted log output
#[derive(Clone, Default)]
pub struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl LogBuffer {
    pub fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).into_owned()
    }
}

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for LogBuffer {
    type Writer = LogBuffer;

    fn make_writer(&'a self) -> Self::Writer {
        self.clone()
    }
}

/// Run `f` with a subscriber that records every event, returning the log text
pub fn capture_logs<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(buffer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    (result, buffer.contents())
}

/// Registry wrapper that becomes unavailable when asked about one asset
pub struct FlakyRegistry {
    pub inner: ReferenceGraph,
    pub broken: AssetId,
}

impl FlakyRegistry {
    fn check(&self, asset: &AssetId) -> Result<()> {
        if asset == &self.broken {
            return Err(MigratorError::RegistryUnavailable {
                asset: asset.clone(),
                reason: "editor connection lost".to_string(),
            });
        }
        Ok(())
    }
}

impl AssetRegistry for FlakyRegistry {
    fn dependencies(&self, asset: &AssetId, options: &ReferenceOptions) -> Result<Vec<AssetId>> {
        self.check(asset)?;
        self.inner.dependencies(asset, options)
    }

    fn referencers(&self, asset: &AssetId, options: &ReferenceOptions) -> Result<Vec<AssetId>> {
        self.check(asset)?;
        self.inner.referencers(asset, options)
    }

    fn resolve_path(&self, asset: &AssetId) -> Result<Option<PathBuf>> {
        self.check(asset)?;
        self.inner.resolve_path(asset)
    }

    fn assets_under(&self, folder: &AssetId, recursive: bool) -> Result<Vec<AssetId>> {
        self.inner.assets_under(folder, recursive)
    }
}
