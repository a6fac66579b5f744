//! Core data types for genealogical records.
//!
//! This module provides the record tree and the typed views over it:
//!
//! - [`Record`]: One tagged line with its nested lines
//! - [`Individual`], [`Family`], [`Note`], [`Source`]: Borrowed views over top-level records
//! - [`Event`]: Birth, death, census, residence and marriage events
//! - [`RecordKind`], [`Sex`], [`Side`]: Small classification types
//!
//! ## Line Format
//!
//! Every line has the shape `<level> <@xref@>? <TAG> <value>?`:
//!
//! ```text
//! 0 @I1@ INDI
//! 1 NAME John /Smith/
//! 1 BIRT
//! 2 DATE 1 JAN 1900
//! 2 PLAC London, England
//! 1 FAMC @F1@
//! ```
//!
//! Levels are not stored. A record's children are the lines nested one level
//! deeper, and levels are recomputed from tree depth when writing.
//!
//! [`Record`]: record::Record
//! [`Individual`]: individual::Individual
//! [`Family`]: family::Family
//! [`Note`]: note::Note
//! [`Source`]: source::Source
//! [`Event`]: event::Event
//! [`RecordKind`]: types::RecordKind
//! [`Sex`]: types::Sex
//! [`Side`]: types::Side

pub mod event;
pub mod family;
pub mod individual;
pub mod note;
pub mod record;
pub mod source;
pub mod types;
