use std::collections::{HashMap, HashSet};

use serde::Serialize;
use tracing::info;

use crate::core::types::RecordKind;
use crate::store::Gedcom;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct CanonicalizeReport {
    /// Records of the kind before the pass
    pub found: usize,
    /// Distinct records after collapsing duplicates
    pub canonical: usize,
    /// Canonical records still referenced from somewhere
    pub traversed: usize,
    pub removed: usize,
}

/// Collapse structurally identical note or source records onto one representative.
///
/// The representative of each record is the earliest record (in input order)
/// with the same content. Every pointer to a duplicate is rewritten to its
/// representative, then records of the kind that nothing points at are deleted.
pub fn canonicalize(store: &mut Gedcom, kind: RecordKind) -> CanonicalizeReport {
    let ids = store.ids_of(kind);

    let mut canonical_ids: Vec<&str> = Vec::new();
    let mut representative: HashMap<&str, &str> = HashMap::new();
    for id in &ids {
        let Some(record) = store.get(id) else {
            continue;
        };
        let found = canonical_ids.iter().copied().find(|c| {
            store
                .get(c)
                .is_some_and(|candidate| kind.same_content(candidate, record))
        });
        match found {
            Some(c) => {
                representative.insert(id, c);
            }
            None => {
                canonical_ids.push(id);
                representative.insert(id, id);
            }
        }
    }
    let representative: HashMap<String, String> = representative
        .into_iter()
        .map(|(id, c)| (id.to_string(), c.to_string()))
        .collect();
    let canonical = canonical_ids.len();

    let tag = kind.tag();
    let mut traversed: HashSet<String> = HashSet::new();
    for record in store.records_mut() {
        if RecordKind::of(record) == kind {
            continue;
        }
        record.rewrite_pointers(&[tag], &mut |_, pointer| {
            match representative.get(pointer) {
                Some(c) => {
                    traversed.insert(c.clone());
                    Some(c.clone())
                }
                // Dangling pointers are left untouched
                None => Some(pointer.to_string()),
            }
        });
    }

    let mut removed = 0;
    for id in &ids {
        if !traversed.contains(id) && store.remove(id).is_some() {
            removed += 1;
        }
    }

    let report = CanonicalizeReport {
        found: ids.len(),
        canonical,
        traversed: traversed.len(),
        removed,
    };
    info!(
        kind = %kind,
        found = report.found,
        canonical = report.canonical,
        traversed = report.traversed,
        removed = report.removed,
        "Canonicalized records"
    );
    report
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::gedcom::parse_text;

    const TREE: &str = "\
0 @I1@ INDI
1 NOTE @N2@
1 BIRT
2 DATE 1900
2 SOUR @S1@
0 @I2@ INDI
1 NOTE @N1@
1 SOUR @S2@
0 @N1@ NOTE Born at home
0 @N2@ NOTE Born at home
0 @N3@ NOTE Copied from the register
0 @S1@ SOUR
1 TITL Parish register
0 @S2@ SOUR
1 TITL Parish register
1 NOTE @N3@
";

    #[test]
    fn test_duplicate_notes_collapse() {
        let mut store = parse_text(TREE).unwrap();
        let report = canonicalize(&mut store, RecordKind::Note);

        assert_eq!(
            report,
            CanonicalizeReport {
                found: 3,
                canonical: 2,
                traversed: 2,
                removed: 1
            }
        );
        assert_eq!(store.get("@I1@").unwrap().child_pointer("NOTE"), Some("@N1@"));
        assert_eq!(store.get("@I2@").unwrap().child_pointer("NOTE"), Some("@N1@"));
        assert!(store.contains("@N1@"));
        assert!(!store.contains("@N2@"));
        // Referenced from a source record
        assert!(store.contains("@N3@"));
    }

    #[test]
    fn test_sources_collapse_on_title_and_text() {
        let mut store = parse_text(TREE).unwrap();
        let report = canonicalize(&mut store, RecordKind::Source);
        // Title matches; the NOTE child is not part of source identity
        assert_eq!(report.canonical, 1);
        assert_eq!(report.removed, 1);
        let birth = store.get("@I1@").unwrap().child("BIRT").unwrap();
        assert_eq!(birth.child_pointer("SOUR"), Some("@S1@"));
        assert_eq!(store.get("@I2@").unwrap().child_pointer("SOUR"), Some("@S1@"));
    }

    #[test]
    fn test_idempotent() {
        let mut store = parse_text(TREE).unwrap();
        for kind in [RecordKind::Note, RecordKind::Source] {
            canonicalize(&mut store, kind);
            let snapshot: Vec<_> = store.records().cloned().collect();

            let again = canonicalize(&mut store, kind);
            assert_eq!(again.removed, 0);
            assert_eq!(again.found, again.canonical);
            assert_eq!(store.records().cloned().collect::<Vec<_>>(), snapshot);
        }
    }
}
