//! Comparison and merge of two trees anchored at a pair of root individuals.
//!
//! Starting from the root pair, [`GedcomCompare`] walks both trees in step:
//! parents are paired with parents, spouse families are paired by
//! [`family_score`](crate::matching::scoring::family_score) and children by
//! [`individual_score`](crate::matching::scoring::individual_score). Every
//! divergence is recorded in a [`ComparisonReport`]:
//!
//! - names that are not similar
//! - birth, death, marriage, census and residence events that differ or exist on one side only
//! - parents, spouses and children that exist on one side only
//!
//! A pair whose last names are both recorded and not similar is reported but
//! not expanded further, so a bad match cannot drag the walk into an
//! unrelated branch.
//!
//! ## Merging
//!
//! With a [`MergeSource`] of `left` or `right`, everything found only on the
//! source side is grafted into the other tree: individuals get fresh ids and
//! are re-linked through family records, events are copied under their
//! counterpart, and referenced notes and sources are copied once each. Before
//! the reporting walk, an identity walk records which source individual and
//! family corresponds to which destination record, so an individual reached
//! along two paths is linked rather than duplicated.
//!
//! ## Example
//!
//! ```rust,no_run
//! use gedcom_reconcile::compare::{CompareConfig, GedcomCompare, MergeSource};
//! use gedcom_reconcile::parsing::gedcom::parse_file;
//! use std::path::Path;
//!
//! let mut left = parse_file(Path::new("mine.ged")).unwrap();
//! let mut right = parse_file(Path::new("theirs.ged")).unwrap();
//!
//! let config = CompareConfig {
//!     merge: MergeSource::Right,
//!     ..CompareConfig::default()
//! };
//! let report = GedcomCompare::new(&mut left, &mut right, config)
//!     .compare_from("@I1@", "@I42@")
//!     .unwrap();
//! println!("{} pairs compared, {}", report.pairs.len(), report.merge);
//! ```

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::types::Side;
use crate::matching::scoring::ScoringWeights;

pub mod context;
pub mod engine;
pub mod graft;
pub mod report;

pub use context::{ComparisonContext, Role};
pub use engine::GedcomCompare;
pub use graft::IdMap;
pub use report::{ComparisonReport, Difference, MergeSummary, PairReport, PersonRef};

#[derive(Error, Debug)]
pub enum CompareError {
    #[error("Root individual {id} not found in the {side} tree")]
    MissingRoot { side: Side, id: String },
}

/// Which tree's one-sided records are copied into the other
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum MergeSource {
    /// Report only
    #[default]
    None,
    /// Copy from the left tree into the right tree
    Left,
    /// Copy from the right tree into the left tree
    Right,
}

impl MergeSource {
    /// The side records are copied from, if merging
    pub fn side(self) -> Option<Side> {
        match self {
            Self::None => None,
            Self::Left => Some(Side::Left),
            Self::Right => Some(Side::Right),
        }
    }

    /// The side records are copied into, if merging
    pub fn destination(self) -> Option<Side> {
        self.side().map(Side::opposite)
    }
}

/// Settings for a comparison run
#[derive(Debug, Clone, Copy, Default)]
pub struct CompareConfig {
    pub merge: MergeSource,
    pub weights: ScoringWeights,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_source_sides() {
        assert_eq!(MergeSource::None.side(), None);
        assert_eq!(MergeSource::Left.side(), Some(Side::Left));
        assert_eq!(MergeSource::Left.destination(), Some(Side::Right));
        assert_eq!(MergeSource::Right.destination(), Some(Side::Left));
        assert_eq!(MergeSource::default(), MergeSource::None);
    }
}
