use std::io::{self, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use asset_migrator_core::collect;
use asset_migrator_core::migrate::{self, CopyOptions};
use asset_migrator_core::walker::{walk_list, walk_map};
use asset_migrator_core::{
    AssetId, Direction, Manifest, ReferenceGraph, ReferenceOptions, TraversalOptions,
};
use clap::{Args, Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

/// Asset Migrator - Collect asset dependencies and move them between projects
#[derive(Parser)]
#[command(name = "migrator")]
#[command(version)] // Auto-pull version from Cargo.toml
#[command(about = "Walk an asset reference graph and migrate the files it reaches", long_about = None)]
struct Cli {
    /// Registry manifest (JSON) describing assets, references and mounts
    #[arg(short, long)]
    manifest: PathBuf,

    /// Also register packages found on disk under the manifest's mounts
    #[arg(long)]
    scan_content: bool,

    /// Raise log verbosity (-v info, -vv debug); RUST_LOG overrides
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Print the traversal from one asset as JSON
    Deps {
        asset: String,

        /// Output shape
        #[arg(long, value_enum, default_value_t = Mode::Tree)]
        mode: Mode,

        #[command(flatten)]
        traversal: TraversalArgs,
    },

    /// List the files on disk behind an asset or folder
    Files {
        #[command(flatten)]
        target: TargetArgs,

        #[command(flatten)]
        traversal: TraversalArgs,
    },

    /// Copy the files behind an asset or folder to another root
    Migrate {
        #[command(flatten)]
        target: TargetArgs,

        /// Root prefix shared by the source files
        #[arg(long)]
        source_root: String,

        /// Root prefix replacing it
        #[arg(long)]
        target_root: String,

        /// Skip destinations whose content is already identical
        #[arg(long)]
        diff: bool,

        /// Never overwrite existing destination files
        #[arg(long)]
        no_force: bool,

        /// Print the copy plan without touching the filesystem
        #[arg(long)]
        dry_run: bool,

        #[command(flatten)]
        traversal: TraversalArgs,
    },
}

#[derive(Clone, Copy, ValueEnum)]
enum Mode {
    /// Nested list, flattened and deduplicated
    List,
    /// Nested map with duplicate suppression during the walk
    Tree,
}

#[derive(Args)]
struct TargetArgs {
    /// Package path (e.g. /Game/Rig/Test) or folder path with --folder
    path: String,

    /// Treat the path as a folder and collect every asset inside it
    #[arg(long)]
    folder: bool,

    /// Include sub-folders when collecting a folder
    #[arg(long, requires = "folder")]
    recursive: bool,
}

#[derive(Args)]
struct TraversalArgs {
    /// Follow referencers instead of dependencies
    #[arg(long)]
    referencers: bool,

    /// Maximum traversal depth (1 = direct neighbors only); keep it low on cyclic graphs
    #[arg(long)]
    depth: Option<usize>,

    /// Follow soft, searchable-name and management references too
    #[arg(long)]
    all_references: bool,

    /// Keep /Script code nodes
    #[arg(long)]
    keep_code: bool,

    /// Expand shared dependencies once per branch in tree mode
    #[arg(long)]
    no_dedupe: bool,
}

impl TraversalArgs {
    /// Apply flags on top of the manifest defaults
    fn resolve(&self, manifest: &Manifest) -> TraversalOptions {
        let mut options = manifest.traversal.unwrap_or_else(|| {
            TraversalOptions::default().with_references(ReferenceOptions::hard_only())
        });
        if self.referencers {
            options.direction = Direction::Referencer;
        }
        if let Some(depth) = self.depth {
            options = options.with_max_depth(depth);
        }
        if self.all_references {
            options.references = ReferenceOptions::default();
        }
        if self.keep_code {
            options.filter_code = false;
        }
        if self.no_dedupe {
            options.deduplicate = false;
        }
        options
    }
}

fn init_logging(verbose: u8) {
    let default_level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn collect_files(
    graph: &ReferenceGraph,
    target: &TargetArgs,
    options: &TraversalOptions,
) -> Result<Vec<PathBuf>> {
    let path = AssetId::from(target.path.as_str());
    let files = if target.folder {
        collect::folder_files(graph, &path, target.recursive, options)
    } else {
        collect::package_files(graph, &path, options)
    };
    files.with_context(|| format!("failed to collect files for {path}"))
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    run(&cli, &mut io::stdout().lock())
}

/// Execute one command, writing its results to `out`
fn run(cli: &Cli, out: &mut impl Write) -> Result<()> {
    let (mut graph, manifest) = ReferenceGraph::load(&cli.manifest)
        .with_context(|| format!("failed to load manifest {}", cli.manifest.display()))?;
    if cli.scan_content {
        let added = graph.scan_mounts();
        tracing::info!(added, "scanned content mounts");
    }

    match &cli.command {
        Command::Deps {
            asset,
            mode,
            traversal,
        } => {
            let options = traversal.resolve(&manifest);
            let root = AssetId::from(asset.as_str());
            let output = match mode {
                Mode::List => {
                    let assets = walk_list(&graph, &root, &options)?.flatten();
                    serde_json::to_value(asset_migrator_core::flatten::dedupe(assets))?
                }
                Mode::Tree => walk_map(&graph, &root, &options)?.to_json(),
            };
            writeln!(out, "{}", serde_json::to_string_pretty(&output)?)?;
        }
        Command::Files { target, traversal } => {
            let options = traversal.resolve(&manifest);
            for file in collect_files(&graph, target, &options)? {
                writeln!(out, "{}", file.display())?;
            }
        }
        Command::Migrate {
            target,
            source_root,
            target_root,
            diff,
            no_force,
            dry_run,
            traversal,
        } => {
            if source_root.is_empty() {
                bail!("--source-root must not be empty");
            }
            let options = traversal.resolve(&manifest);
            let files = collect_files(&graph, target, &options)?;

            if *dry_run {
                let plan = migrate::plan(&files, source_root, target_root);
                writeln!(out, "{}", serde_json::to_string_pretty(&plan)?)?;
                return Ok(());
            }

            let mut copy: CopyOptions = manifest.copy.unwrap_or_default();
            if *diff {
                copy.do_diff = true;
            }
            if *no_force {
                copy.force = false;
            }
            let report = migrate::migrate_with(&files, source_root, target_root, copy)
                .context("migration stopped")?;
            for destination in &report.destinations {
                writeln!(out, "{}", destination.display())?;
            }
            eprintln!("{} copied, {} skipped", report.copied, report.skipped);
        }
    }

    Ok(())
}
