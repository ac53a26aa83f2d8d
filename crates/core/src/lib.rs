//! Asset Migrator Core Library
//!
//! Walks the reference graph of a content asset registry, collects the
//! transitive dependencies (or referencers) of a package or folder, resolves
//! them to files on disk, and copies those files from one project root to
//! another.

pub mod asset;
pub mod collect;
pub mod discovery;
pub mod error;
pub mod flatten;
pub mod graph;
pub mod migrate;
pub mod options;
pub mod registry;
pub mod resolve;
pub mod walker;

// Re-export commonly used types
pub use asset::{AssetId, FileAsset};
pub use error::{MigratorError, Result};
pub use graph::{Manifest, ReferenceGraph};
pub use migrate::CopyOptions;
pub use options::{Direction, ReferenceKind, ReferenceOptions, TraversalOptions};
pub use registry::AssetRegistry;
pub use walker::{ReferenceList, ReferenceTree, SeenSet};
