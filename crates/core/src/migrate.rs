//! Relocating resolved files from one filesystem root to another
//!
//! Destinations are computed by textual root substitution on each file's
//! parent directory ([`remap_root`]), then files are copied one by one.
//! Nothing is transactional: if a later copy fails, earlier copies stay.

use std::fs::{self, File};
use std::io::{self, BufReader, Read};
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{MigratorError, Result};

/// Collision policy for [`copy_file`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CopyOptions {
    /// Skip the copy when an existing destination has identical content
    pub do_diff: bool,
    /// Overwrite an existing destination; when false, existing files are kept
    pub force: bool,
}

impl Default for CopyOptions {
    fn default() -> Self {
        Self {
            do_diff: false,
            force: true,
        }
    }
}

/// Where one source file goes
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MigrationEntry {
    pub source: PathBuf,
    pub destination_dir: PathBuf,
    pub destination: PathBuf,
}

/// Outcome of [`migrate_with`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct MigrationReport {
    /// Intended destination of every input path, in input order
    pub destinations: Vec<PathBuf>,
    pub copied: usize,
    pub skipped: usize,
}

/// Replace the first occurrence of `source_root` in `dir` with `target_root`
///
/// This is plain substring substitution, so a root that also appears
/// further down the path is only replaced once, and a match need not sit on
/// a segment boundary.
pub fn remap_root(dir: &Path, source_root: &str, target_root: &str) -> PathBuf {
    PathBuf::from(dir.to_string_lossy().replacen(source_root, target_root, 1))
}

/// Compute destinations for every path without touching the filesystem
pub fn plan<P: AsRef<Path>>(paths: &[P], source_root: &str, target_root: &str) -> Vec<MigrationEntry> {
    paths
        .iter()
        .map(|path| {
            let source = path.as_ref();
            let parent = source.parent().unwrap_or_else(|| Path::new(""));
            let destination_dir = remap_root(parent, source_root, target_root);
            let destination = match source.file_name() {
                Some(name) => destination_dir.join(name),
                None => destination_dir.clone(),
            };
            MigrationEntry {
                source: source.to_path_buf(),
                destination_dir,
                destination,
            }
        })
        .collect()
}

/// Copy every path under `target_root` with the default [`CopyOptions`]
///
/// Returns the intended destination of each input, whether or not a copy
/// happened. Running it twice converges on the same tree.
///
/// # Example
/// ```no_run
/// use asset_migrator_core::migrate;
///
/// let moved = migrate::migrate(
///     &["C:/Desktop/UnrealProject/Content/Rig/Test.uasset"],
///     "C:/Desktop/UnrealProject",
///     "D:/UnrealProject",
/// )
/// .unwrap();
/// assert_eq!(moved.len(), 1);
/// ```
pub fn migrate<P: AsRef<Path>>(paths: &[P], source_root: &str, target_root: &str) -> Result<Vec<PathBuf>> {
    Ok(migrate_with(paths, source_root, target_root, CopyOptions::default())?.destinations)
}

/// [`migrate`] with an explicit collision policy
///
/// # Errors
/// Missing sources are logged and skipped. Failing to create a directory or
/// copy a file aborts the run; files copied so far are left in place.
pub fn migrate_with<P: AsRef<Path>>(
    paths: &[P],
    source_root: &str,
    target_root: &str,
    options: CopyOptions,
) -> Result<MigrationReport> {
    let mut report = MigrationReport::default();

    for entry in plan(paths, source_root, target_root) {
        tracing::info!(
            source = %entry.source.display(),
            destination = %entry.destination_dir.display(),
            "migrating"
        );
        if copy_file(&entry.source, &entry.destination_dir, options)? {
            report.copied += 1;
        } else {
            report.skipped += 1;
        }
        report.destinations.push(entry.destination);
    }

    tracing::info!(
        copied = report.copied,
        skipped = report.skipped,
        "migration finished"
    );
    Ok(report)
}

/// Copy `src` into `dst_dir`, keeping its file name
///
/// Returns `Ok(true)` when a copy was written and `Ok(false)` when it was
/// skipped: the source is missing, the destination is the source itself,
/// the destination exists and `force` is off, or `do_diff` found identical
/// content.
pub fn copy_file(src: &Path, dst_dir: &Path, options: CopyOptions) -> Result<bool> {
    if !src.is_file() {
        tracing::warn!(source = %src.display(), "source file not located");
        return Ok(false);
    }

    if !dst_dir.is_dir() {
        fs::create_dir_all(dst_dir).map_err(|source| MigratorError::io(dst_dir, source))?;
    }

    let Some(file_name) = src.file_name() else {
        return Ok(false);
    };
    let target = dst_dir.join(file_name);

    if target.exists() {
        // Copying a file onto itself truncates it before reading
        if same_file(src, &target) {
            tracing::warn!(source = %src.display(), "destination is the source file, not copying");
            return Ok(false);
        }
        if !options.force {
            tracing::debug!(target = %target.display(), "destination exists, not overwriting");
            return Ok(false);
        }
        if options.do_diff && files_identical(src, &target)? {
            tracing::debug!(target = %target.display(), "destination identical, skipping");
            return Ok(false);
        }
    }

    fs::copy(src, &target).map_err(|source| MigratorError::io(&target, source))?;
    Ok(true)
}

/// Whether both paths name the same file after resolving links and `..`
fn same_file(a: &Path, b: &Path) -> bool {
    match (fs::canonicalize(a), fs::canonicalize(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => false,
    }
}

/// Byte-for-byte comparison of two files
pub fn files_identical(a: &Path, b: &Path) -> Result<bool> {
    let file_a = File::open(a).map_err(|source| MigratorError::io(a, source))?;
    let file_b = File::open(b).map_err(|source| MigratorError::io(b, source))?;

    let len_a = file_a.metadata().map_err(|source| MigratorError::io(a, source))?.len();
    let len_b = file_b.metadata().map_err(|source| MigratorError::io(b, source))?.len();
    if len_a != len_b {
        return Ok(false);
    }

    let mut reader_a = BufReader::new(file_a);
    let mut reader_b = BufReader::new(file_b);
    let mut chunk_a = [0u8; 8192];
    let mut chunk_b = [0u8; 8192];
    loop {
        let read_a = read_chunk(&mut reader_a, &mut chunk_a).map_err(|source| MigratorError::io(a, source))?;
        let read_b = read_chunk(&mut reader_b, &mut chunk_b).map_err(|source| MigratorError::io(b, source))?;
        if chunk_a[..read_a] != chunk_b[..read_b] {
            return Ok(false);
        }
        if read_a == 0 {
            return Ok(true);
        }
    }
}

/// Fill `buf` as far as the reader allows
fn read_chunk(reader: &mut impl Read, buf: &mut [u8]) -> io::Result<usize> {
    let mut filled = 0;
    while filled < buf.len() {
        match reader.read(&mut buf[filled..]) {
            Ok(0) => break,
            Ok(n) => filled += n,
            Err(err) if err.kind() == io::ErrorKind::Interrupted => continue,
            Err(err) => return Err(err),
        }
    }
    Ok(filled)
}
