//! Reading and writing GEDCOM files.
//!
//! - [`gedcom`]: Parse GEDCOM text (optionally gzip-compressed) into a [`Gedcom`] store
//! - [`writer`]: Write a store back out with a byte-order mark, CRLF line endings and a `0 TRLR` trailer
//!
//! ## Example
//!
//! ```rust,no_run
//! use gedcom_reconcile::parsing::gedcom::{parse_file, parse_text};
//! use gedcom_reconcile::parsing::writer::write_file;
//! use std::path::Path;
//!
//! let store = parse_file(Path::new("family.ged")).unwrap();
//! write_file(&store, Path::new("family.ged.gz")).unwrap();
//!
//! let store = parse_text("0 @I1@ INDI\n1 NAME John /Smith/\n0 TRLR\n").unwrap();
//! assert_eq!(store.len(), 1);
//! ```
//!
//! [`Gedcom`]: crate::store::Gedcom

pub mod gedcom;
pub mod writer;
