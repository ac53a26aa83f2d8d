//! Error types for the asset migrator
//!
//! Only registry unavailability and filesystem failures surface as errors.
//! Unresolvable assets and missing source files are logged and skipped by
//! the callers that encounter them.

use std::path::PathBuf;

use thiserror::Error;

use crate::asset::AssetId;

/// Errors raised by the core library
#[derive(Debug, Error)]
pub enum MigratorError {
    /// The external registry could not answer a query.
    ///
    /// Fatal for the traversal that issued the query; no partial result is
    /// synthesized.
    #[error("asset registry unavailable while querying {asset}: {reason}")]
    RegistryUnavailable {
        /// Asset being queried when the registry failed
        asset: AssetId,
        /// Backend-specific description
        reason: String,
    },

    /// A filesystem operation failed.
    #[error("I/O error at {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// A registry manifest could not be parsed.
    #[error("invalid manifest {}: {source}", .path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

impl MigratorError {
    /// Wrap an I/O error with the path it occurred on
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        MigratorError::Io {
            path: path.into(),
            source,
        }
    }
}

/// Result alias used throughout the core library
pub type Result<T, E = MigratorError> = std::result::Result<T, E>;
