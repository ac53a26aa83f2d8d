//! Traversal and reference-filter options
//!
//! These are plain serde structs so they can come from a manifest's
//! `traversal` section as well as from code.

use serde::{Deserialize, Serialize};

/// Depth used when the caller does not constrain the traversal
pub const DEFAULT_MAX_DEPTH: usize = 99;

/// Which way to follow edges in the reference graph
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// Forward edges: what the subject requires
    #[default]
    Dependency,
    /// Backward edges: what requires the subject
    Referencer,
}

/// Kinds of reference the registry can report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceKind {
    /// Guaranteed to resolve to an existing target
    #[default]
    Hard,
    /// May point at a missing or unloaded target
    Soft,
    /// Reference to a searchable name rather than a package
    SearchableName,
    /// Management reference owned by a hard manager (e.g. primary asset rules)
    HardManagement,
    /// Management reference owned by a soft manager
    SoftManagement,
}

/// Which reference kinds a registry query reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReferenceOptions {
    pub include_soft: bool,
    pub include_hard: bool,
    pub include_searchable_names: bool,
    pub include_soft_management: bool,
    pub include_hard_management: bool,
}

impl ReferenceOptions {
    /// Hard package references only
    ///
    /// Soft references may name assets that no longer exist, so file
    /// collection uses this preset.
    pub fn hard_only() -> Self {
        Self {
            include_soft: false,
            include_hard: true,
            include_searchable_names: false,
            include_soft_management: false,
            include_hard_management: false,
        }
    }

    pub fn allows(&self, kind: ReferenceKind) -> bool {
        match kind {
            ReferenceKind::Hard => self.include_hard,
            ReferenceKind::Soft => self.include_soft,
            ReferenceKind::SearchableName => self.include_searchable_names,
            ReferenceKind::HardManagement => self.include_hard_management,
            ReferenceKind::SoftManagement => self.include_soft_management,
        }
    }
}

impl Default for ReferenceOptions {
    fn default() -> Self {
        Self {
            include_soft: true,
            include_hard: true,
            include_searchable_names: true,
            include_soft_management: true,
            include_hard_management: true,
        }
    }
}

/// Options controlling one traversal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TraversalOptions {
    pub direction: Direction,
    pub references: ReferenceOptions,
    /// Drop neighbors in the reserved code namespace
    pub filter_code: bool,
    /// Depth 1 means direct neighbors only
    pub max_depth: usize,
    /// Suppress re-expansion of already seen nodes (map mode only)
    pub deduplicate: bool,
}

impl TraversalOptions {
    pub fn dependencies() -> Self {
        Self::default()
    }

    pub fn referencers() -> Self {
        Self {
            direction: Direction::Referencer,
            ..Self::default()
        }
    }

    pub fn with_references(mut self, references: ReferenceOptions) -> Self {
        self.references = references;
        self
    }

    /// Set the depth bound, clamped to at least 1
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth.max(1);
        self
    }

    pub fn with_filter_code(mut self, filter_code: bool) -> Self {
        self.filter_code = filter_code;
        self
    }

    pub fn with_deduplicate(mut self, deduplicate: bool) -> Self {
        self.deduplicate = deduplicate;
        self
    }
}

impl Default for TraversalOptions {
    fn default() -> Self {
        Self {
            direction: Direction::Dependency,
            references: ReferenceOptions::default(),
            filter_code: true,
            max_depth: DEFAULT_MAX_DEPTH,
            deduplicate: true,
        }
    }
}
