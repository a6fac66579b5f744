//! Fuzzy scoring and greedy pairing of records between two trees.
//!
//! - [`scoring`]: Edit distance, name similarity and individual/family/event match scores
//! - [`engine`]: [`match_records`], which pairs two lists of records by descending score
//!
//! ## Scoring
//!
//! | Component | Default points |
//! |-----------|----------------|
//! | Matching birth | 20 |
//! | Matching death | 10 |
//! | Similar name | 5 minus edit distance, at least 1 |
//! | Matching marriage (families) | 40 |
//!
//! Two individuals whose recorded sexes differ always score 0. A family scores
//! its marriage plus the individual scores of both husbands and both wives.
//!
//! ## Example
//!
//! ```rust
//! use gedcom_reconcile::matching::match_records;
//!
//! let rows = match_records(&[1, 10], &[11, 2, 50], |a: i32, b: i32| {
//!     5u32.saturating_sub(a.abs_diff(b))
//! });
//! assert_eq!(rows.len(), 3);
//! assert_eq!(rows[0].left, Some(1));
//! assert_eq!(rows[0].right, Some(2));
//! ```

pub mod engine;
pub mod scoring;

pub use engine::{match_records, MatchedPair};
pub use scoring::ScoringWeights;
