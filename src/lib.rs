//! # gedcom-reconcile
//!
//! A library for cleaning, comparing and merging GEDCOM family trees.
//!
//! Two researchers working on the same family rarely end up with the same
//! file: one has a death date the other lacks, one has found a second
//! marriage, and both carry hundreds of unrelated people picked up along the
//! way. `gedcom-reconcile` walks two trees side by side from a pair of
//! individuals known to be the same person, pairs up their relatives, reports
//! every difference and can graft what only one side knows into the other.
//!
//! ## Features
//!
//! - **Reachability pruning**: drops every individual and family not connected to a root
//! - **Deduplication**: collapses identical notes and sources and removes unreferenced ones
//! - **Fuzzy matching**: pairs relatives by birth, death and marriage events and name similarity
//! - **Difference report**: names, events and relatives present on one side only
//! - **Merge**: grafts one-sided relatives, families, events, notes and sources with fresh ids
//! - **Event validation**: finds dated events missing a place, source or note
//!
//! ## Example
//!
//! ```rust,no_run
//! use gedcom_reconcile::{cleanup, parse_file, write_file};
//! use std::path::Path;
//!
//! let mut store = parse_file(Path::new("family.ged")).unwrap();
//! let report = cleanup(&mut store, "@I1@").unwrap();
//! println!(
//!     "kept {} of {} individuals",
//!     report.reachability.individuals.traversed,
//!     report.reachability.individuals.found
//! );
//! write_file(&store, Path::new("family.clean.ged")).unwrap();
//! ```
//!
//! ## Modules
//!
//! - [`core`]: Record tree and typed views over individuals, families, notes, sources and events
//! - [`store`]: In-memory tree indexed by id
//! - [`parsing`]: GEDCOM reader and writer
//! - [`cleanup`]: Reachability and deduplication passes
//! - [`matching`]: Similarity scores and the pairing engine
//! - [`compare`]: Comparison and merge of two trees
//! - [`cli`]: Command-line interface implementation

pub mod cleanup;
pub mod cli;
pub mod compare;
pub mod core;
pub mod matching;
pub mod parsing;
pub mod store;
pub mod utils;

// Re-export commonly used types for convenience
pub use cleanup::{cleanup, CleanupReport};
pub use compare::{CompareConfig, ComparisonReport, GedcomCompare, MergeSource};
pub use crate::core::event::{Event, EventKind};
pub use crate::core::family::Family;
pub use crate::core::individual::Individual;
pub use crate::core::record::Record;
pub use crate::core::types::*;
pub use matching::scoring::ScoringWeights;
pub use parsing::gedcom::{parse_file, parse_text, ParseError};
pub use parsing::writer::{write_file, write_gedcom};
pub use store::Gedcom;
