//! Pruning and deduplication of a single tree.
//!
//! [`cleanup`] runs the passes in order:
//!
//! 1. [`remove_unreachable`]: drop individuals and families with no path to the root
//! 2. [`canonicalize`] notes: collapse duplicate notes and drop unreferenced ones
//! 3. [`canonicalize`] sources: the same for sources
//!
//! ## Example
//!
//! ```rust,no_run
//! use gedcom_reconcile::cleanup::cleanup;
//! use gedcom_reconcile::parsing::gedcom::parse_file;
//! use gedcom_reconcile::parsing::writer::write_file;
//! use std::path::Path;
//!
//! let mut store = parse_file(Path::new("family.ged")).unwrap();
//! let report = cleanup(&mut store, "@I1@").unwrap();
//! println!("removed {} individuals", report.reachability.individuals.removed);
//! write_file(&store, Path::new("family.clean.ged")).unwrap();
//! ```

use serde::Serialize;
use thiserror::Error;

use crate::core::types::RecordKind;
use crate::store::Gedcom;

pub mod canonical;
pub mod reachability;

pub use canonical::{canonicalize, CanonicalizeReport};
pub use reachability::{remove_unreachable, ReachabilityReport, SweepCounts};

#[derive(Error, Debug)]
pub enum CleanupError {
    #[error("Root individual {0} not found")]
    MissingRoot(String),
}

/// Counts from every cleanup pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CleanupReport {
    pub reachability: ReachabilityReport,
    pub notes: CanonicalizeReport,
    pub sources: CanonicalizeReport,
}

/// Prune everything unreachable from `root`, then deduplicate notes and sources
///
/// # Errors
///
/// Returns `CleanupError::MissingRoot` if `root` is not an individual in the
/// store; the store is left untouched in that case.
pub fn cleanup(store: &mut Gedcom, root: &str) -> Result<CleanupReport, CleanupError> {
    if store.individual(root).is_none() {
        return Err(CleanupError::MissingRoot(root.to_string()));
    }

    let reachability = remove_unreachable(store, root);
    let notes = canonicalize(store, RecordKind::Note);
    let sources = canonicalize(store, RecordKind::Source);

    Ok(CleanupReport {
        reachability,
        notes,
        sources,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::gedcom::parse_text;

    const TREE: &str = "\
0 HEAD
0 @I1@ INDI
1 NAME Root /Smith/
1 NOTE @N1@
0 @I2@ INDI
1 NAME Stranger /Jones/
1 NOTE @N2@
1 SOUR @S1@
0 @N1@ NOTE shared text
0 @N2@ NOTE shared text
0 @S1@ SOUR
1 TITL Only cited by the stranger
0 TRLR
";

    #[test]
    fn test_cleanup() {
        let mut store = parse_text(TREE).unwrap();
        let report = cleanup(&mut store, "@I1@").unwrap();

        assert_eq!(report.reachability.individuals.removed, 1);
        // N2 lost its only reference when I2 was removed
        assert_eq!(report.notes.removed, 1);
        assert_eq!(report.sources.removed, 1);
        let ids: Vec<_> = store.records().filter_map(|r| r.id()).collect();
        assert_eq!(ids, vec!["@I1@", "@N1@"]);
        // The header is not subject to cleanup
        assert_eq!(store.len(), 3);
    }

    #[test]
    fn test_missing_root() {
        let mut store = parse_text(TREE).unwrap();
        let err = cleanup(&mut store, "@I9@").unwrap_err();
        assert!(matches!(err, CleanupError::MissingRoot(ref id) if id == "@I9@"));
        assert_eq!(store.len(), 6);
    }
}
