use std::collections::HashSet;

use serde::Serialize;
use tracing::{debug, info};

use crate::core::types::RecordKind;
use crate::store::Gedcom;

/// Record counts for one kind during a sweep
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SweepCounts {
    pub found: usize,
    pub traversed: usize,
    pub removed: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ReachabilityReport {
    pub individuals: SweepCounts,
    pub families: SweepCounts,
}

/// Delete every individual and family that cannot be reached from `root`.
///
/// Reachable means connected through parent families (father and mother) or
/// spouse families (husband, wife and every child). Each individual and each
/// family is expanded at most once, so cyclic links terminate.
pub fn remove_unreachable(store: &mut Gedcom, root: &str) -> ReachabilityReport {
    let mut individuals: HashSet<String> = HashSet::new();
    let mut families: HashSet<String> = HashSet::new();
    let mut stack = vec![root.to_string()];

    while let Some(id) = stack.pop() {
        let Some(indi) = store.individual(&id) else {
            debug!(id = %id, "Skipping reference to a missing individual");
            continue;
        };
        if !individuals.insert(id.clone()) {
            continue;
        }

        let linked = indi.parent_family().into_iter().chain(indi.spouse_families());
        for family_id in linked {
            let Some(family) = store.family(family_id) else {
                continue;
            };
            if !families.insert(family_id.to_string()) {
                continue;
            }
            // Pushed in reverse so the husband is expanded first
            stack.extend(family.children().into_iter().rev().map(str::to_string));
            stack.extend(family.wife().map(str::to_string));
            stack.extend(family.husband().map(str::to_string));
        }
    }

    let report = ReachabilityReport {
        individuals: sweep(store, RecordKind::Individual, &individuals),
        families: sweep(store, RecordKind::Family, &families),
    };
    info!(
        individuals_found = report.individuals.found,
        individuals_traversed = report.individuals.traversed,
        individuals_removed = report.individuals.removed,
        families_found = report.families.found,
        families_traversed = report.families.traversed,
        families_removed = report.families.removed,
        "Removed unreachable records"
    );
    report
}

fn sweep(store: &mut Gedcom, kind: RecordKind, keep: &HashSet<String>) -> SweepCounts {
    let ids = store.ids_of(kind);
    let mut removed = 0;
    for id in &ids {
        if !keep.contains(id) && store.remove(id).is_some() {
            removed += 1;
        }
    }
    SweepCounts {
        found: ids.len(),
        traversed: keep.len(),
        removed,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsing::gedcom::parse_text;

    // I1 + I2 are parents of I3; I3 married I4 (F2) with child I5.
    // I6/I7 (F3) are disconnected; I8 is a lone individual.
    const TREE: &str = "\
0 @I1@ INDI
1 NAME Father /Smith/
1 FAMS @F1@
0 @I2@ INDI
1 NAME Mother /Brown/
1 FAMS @F1@
0 @I3@ INDI
1 NAME Root /Smith/
1 FAMC @F1@
1 FAMS @F2@
0 @I4@ INDI
1 NAME Spouse /Green/
1 FAMS @F2@
0 @I5@ INDI
1 NAME Child /Smith/
1 FAMC @F2@
0 @I6@ INDI
1 NAME Other /Person/
1 FAMS @F3@
0 @I7@ INDI
1 NAME Another /Person/
1 FAMS @F3@
0 @I8@ INDI
1 NAME Lone /Person/
0 @F1@ FAM
1 HUSB @I1@
1 WIFE @I2@
1 CHIL @I3@
0 @F2@ FAM
1 HUSB @I3@
1 WIFE @I4@
1 CHIL @I5@
0 @F3@ FAM
1 HUSB @I6@
1 WIFE @I7@
";

    #[test]
    fn test_remove_unreachable() {
        let mut store = parse_text(TREE).unwrap();
        let report = remove_unreachable(&mut store, "@I3@");

        assert_eq!(
            store.ids_of(RecordKind::Individual),
            vec!["@I1@", "@I2@", "@I3@", "@I4@", "@I5@"]
        );
        assert_eq!(store.ids_of(RecordKind::Family), vec!["@F1@", "@F2@"]);
        assert_eq!(
            report.individuals,
            SweepCounts {
                found: 8,
                traversed: 5,
                removed: 3
            }
        );
        assert_eq!(report.families.removed, 1);
    }

    #[test]
    fn test_siblings_reached_through_parents() {
        let text = format!("{TREE}0 @I9@ INDI\n1 NAME Sibling /Smith/\n1 FAMC @F1@\n");
        let mut store = parse_text(&text.replace("1 CHIL @I3@\n", "1 CHIL @I3@\n1 CHIL @I9@\n"))
            .unwrap();
        remove_unreachable(&mut store, "@I5@");
        assert!(store.contains("@I9@"));
        assert!(!store.contains("@I8@"));
    }

    #[test]
    fn test_missing_root_removes_everything() {
        let mut store = parse_text(TREE).unwrap();
        let report = remove_unreachable(&mut store, "@I99@");
        assert_eq!(report.individuals.removed, 8);
        assert_eq!(store.count(RecordKind::Individual), 0);
    }

    #[test]
    fn test_cycle_terminates() {
        // Individual listed as their own child
        let text = "0 @I1@ INDI\n1 FAMS @F1@\n1 FAMC @F1@\n0 @F1@ FAM\n1 HUSB @I1@\n1 CHIL @I1@\n";
        let mut store = parse_text(text).unwrap();
        let report = remove_unreachable(&mut store, "@I1@");
        assert_eq!(report.individuals.traversed, 1);
        assert_eq!(report.families.removed, 0);
    }
}
