//! Command-line interface for gedcom-reconcile.
//!
//! Available commands:
//!
//! - **cleanup**: Drop everything unreachable from a root individual and deduplicate notes and sources
//! - **compare**: Compare two trees from a pair of root individuals, optionally merging one into the other
//! - **check**: Report birth, death and marriage events missing a required detail
//!
//! ## Usage
//!
//! ```text
//! # Prune a tree to the relatives of @I1@
//! gedcom-reconcile cleanup family.ged @I1@ family.clean.ged
//!
//! # Compare two trees
//! gedcom-reconcile compare mine.ged @I1@ theirs.ged @I42@
//!
//! # Copy what only the right tree knows into the left tree
//! gedcom-reconcile compare mine.ged @I1@ theirs.ged @I42@ --merge right --output merged.ged
//!
//! # Events between 1850 and 1900 without a source, as JSON
//! gedcom-reconcile check family.ged --from-year 1850 --to-year 1900 --require source --format json
//! ```

use std::path::Path;

use anyhow::Context;
use clap::{Parser, Subcommand};

use crate::parsing::gedcom::parse_file;
use crate::store::Gedcom;

pub mod check;
pub mod cleanup;
pub mod compare;

#[derive(Parser)]
#[command(name = "gedcom-reconcile")]
#[command(version)]
#[command(about = "Clean, compare and merge GEDCOM family trees")]
#[command(
    long_about = "gedcom-reconcile works on GEDCOM 5.5 family trees.\n\nIt can prune a tree down to the relatives of one individual, walk two trees side by side from a pair of matching individuals and report every difference, and graft whatever only one tree knows into the other."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Output format
    #[arg(short, long, global = true, default_value = "text")]
    pub format: OutputFormat,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Remove records unreachable from a root individual and deduplicate notes and sources
    Cleanup(cleanup::CleanupArgs),

    /// Compare (and optionally merge) two trees
    Compare(compare::CompareArgs),

    /// Validate birth, death and marriage events
    Check(check::CheckArgs),
}

#[derive(Clone, Copy, Debug, clap::ValueEnum)]
pub enum OutputFormat {
    Text,
    Json,
    Tsv,
}

/// Load a tree, attaching the path to any error
pub(crate) fn load(path: &Path, verbose: bool) -> anyhow::Result<Gedcom> {
    let store = parse_file(path).with_context(|| format!("Failed to read {}", path.display()))?;
    if verbose {
        eprintln!("{}: {} records", path.display(), store.len());
    }
    Ok(store)
}
