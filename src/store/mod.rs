//! Keyed storage of top-level records.
//!
//! [`Gedcom`] keeps records in input order and indexes them by cross-reference
//! id. It also tracks which numeric id suffixes are in use per record kind so
//! that merges can mint fresh ids that never collide with existing ones.
//!
//! ## Example
//!
//! ```rust
//! use gedcom_reconcile::core::record::Record;
//! use gedcom_reconcile::core::types::RecordKind;
//! use gedcom_reconcile::store::Gedcom;
//!
//! let mut store = Gedcom::new();
//! store.insert(Record::new("INDI").with_xref("@I1@"));
//! store.insert(Record::new("INDI").with_xref("@I3@"));
//!
//! assert_eq!(store.mint_id(RecordKind::Individual), "@I2@");
//! assert_eq!(store.mint_id(RecordKind::Individual), "@I4@");
//! ```

use std::collections::{BTreeSet, HashMap};

use crate::core::family::Family;
use crate::core::individual::Individual;
use crate::core::note::Note;
use crate::core::record::Record;
use crate::core::source::Source;
use crate::core::types::RecordKind;

pub mod events;

pub use events::{EventFailure, EventValidation};

/// All top-level records of one file
#[derive(Debug, Default, Clone)]
pub struct Gedcom {
    /// Records in input order; removed records leave an empty slot
    records: Vec<Option<Record>>,

    /// Index: cross-reference id -> slot in `records`
    id_to_index: HashMap<String, usize>,

    /// Numeric suffixes in use (or reserved) per kind
    used_ids: HashMap<RecordKind, BTreeSet<u32>>,
}

impl Gedcom {
    /// Create an empty store
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a top-level record.
    ///
    /// A record whose id is already present replaces the existing record in
    /// place, and the replaced record is returned.
    pub fn insert(&mut self, record: Record) -> Option<Record> {
        let Some(id) = record.id().map(str::to_string) else {
            self.records.push(Some(record));
            return None;
        };

        let kind = RecordKind::of(&record);
        if let Some(n) = kind.id_number(&id) {
            self.used_ids.entry(kind).or_default().insert(n);
        }

        if let Some(&idx) = self.id_to_index.get(&id) {
            return self.records[idx].replace(record);
        }
        self.id_to_index.insert(id, self.records.len());
        self.records.push(Some(record));
        None
    }

    pub fn get(&self, id: &str) -> Option<&Record> {
        let idx = *self.id_to_index.get(id)?;
        self.records[idx].as_ref()
    }

    pub fn get_mut(&mut self, id: &str) -> Option<&mut Record> {
        let idx = *self.id_to_index.get(id)?;
        self.records[idx].as_mut()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.id_to_index.contains_key(id)
    }

    /// Remove a record by id, releasing its numeric suffix
    pub fn remove(&mut self, id: &str) -> Option<Record> {
        let idx = self.id_to_index.remove(id)?;
        let record = self.records[idx].take()?;
        let kind = RecordKind::of(&record);
        if let Some(n) = kind.id_number(id) {
            if let Some(used) = self.used_ids.get_mut(&kind) {
                used.remove(&n);
            }
        }
        Some(record)
    }

    pub fn individual(&self, id: &str) -> Option<Individual<'_>> {
        self.get(id).and_then(Individual::new)
    }

    pub fn family(&self, id: &str) -> Option<Family<'_>> {
        self.get(id).and_then(Family::new)
    }

    pub fn note(&self, id: &str) -> Option<Note<'_>> {
        self.get(id).and_then(Note::new)
    }

    pub fn source(&self, id: &str) -> Option<Source<'_>> {
        self.get(id).and_then(Source::new)
    }

    /// Every record in input order
    pub fn records(&self) -> impl Iterator<Item = &Record> {
        self.records.iter().flatten()
    }

    pub fn records_mut(&mut self) -> impl Iterator<Item = &mut Record> {
        self.records.iter_mut().flatten()
    }

    /// Ids of every record of `kind`, in input order
    pub fn ids_of(&self, kind: RecordKind) -> Vec<String> {
        self.records()
            .filter(|r| RecordKind::of(r) == kind)
            .filter_map(|r| r.id().map(str::to_string))
            .collect()
    }

    pub fn count(&self, kind: RecordKind) -> usize {
        self.records().filter(|r| RecordKind::of(r) == kind).count()
    }

    pub fn len(&self) -> usize {
        self.records().count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Reserve and return the lowest unused id of `kind`
    pub fn mint_id(&mut self, kind: RecordKind) -> String {
        let used = self.used_ids.entry(kind).or_default();
        let mut n = 1;
        loop {
            let id = kind.format_id(n);
            if !used.contains(&n) && !self.id_to_index.contains_key(&id) {
                used.insert(n);
                return id;
            }
            n += 1;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn indi(id: &str) -> Record {
        Record::new("INDI").with_xref(id)
    }

    #[test]
    fn test_insert_and_get() {
        let mut store = Gedcom::new();
        store.insert(Record::new("HEAD"));
        store.insert(indi("@I1@"));
        store.insert(Record::new("FAM").with_xref("@F1@"));

        assert_eq!(store.len(), 3);
        assert!(store.contains("@I1@"));
        assert!(store.individual("@I1@").is_some());
        assert!(store.family("@I1@").is_none());
        assert!(store.family("@F1@").is_some());
        assert_eq!(store.count(RecordKind::Individual), 1);
        assert_eq!(store.count(RecordKind::Other), 1);
    }

    #[test]
    fn test_insert_duplicate_replaces_in_place() {
        let mut store = Gedcom::new();
        store.insert(indi("@I1@"));
        store.insert(indi("@I2@"));
        let replaced = store.insert(indi("@I1@").with_child(Record::new("SEX").with_value("F")));

        assert!(replaced.is_some());
        assert_eq!(store.len(), 2);
        assert_eq!(store.ids_of(RecordKind::Individual), vec!["@I1@", "@I2@"]);
        assert_eq!(store.get("@I1@").unwrap().child_value("SEX"), Some("F"));
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut store = Gedcom::new();
        for id in ["@I1@", "@I2@", "@I3@"] {
            store.insert(indi(id));
        }
        assert!(store.remove("@I2@").is_some());
        assert!(store.remove("@I2@").is_none());
        assert_eq!(store.ids_of(RecordKind::Individual), vec!["@I1@", "@I3@"]);
    }

    #[test]
    fn test_mint_id_lowest_unused() {
        let mut store = Gedcom::new();
        store.insert(indi("@I1@"));
        store.insert(indi("@I2@"));
        store.insert(indi("@I5@"));
        assert_eq!(store.mint_id(RecordKind::Individual), "@I3@");
        assert_eq!(store.mint_id(RecordKind::Individual), "@I4@");
        assert_eq!(store.mint_id(RecordKind::Individual), "@I6@");
        assert_eq!(store.mint_id(RecordKind::Family), "@F1@");
    }

    #[test]
    fn test_mint_id_avoids_foreign_kind_prefix() {
        // An id in I-form attached to a non-individual record still blocks minting
        let mut store = Gedcom::new();
        store.insert(Record::new("_CUSTOM").with_xref("@I1@"));
        assert_eq!(store.mint_id(RecordKind::Individual), "@I2@");
    }

    #[test]
    fn test_mint_ids_are_unique() {
        let mut store = Gedcom::new();
        let mut seen = std::collections::HashSet::new();
        for _ in 0..50 {
            let id = store.mint_id(RecordKind::Note);
            assert!(seen.insert(id.clone()));
            store.insert(Record::new("NOTE").with_xref(id));
        }
    }
}
