use serde::Serialize;
use tracing::debug;

use crate::core::event::{Event, EventKind};
use crate::core::family::Family;
use crate::core::individual::Individual;
use crate::store::Gedcom;

/// An event that was selected but failed validation
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EventFailure {
    /// Id of the individual or family owning the event
    pub owner: String,
    pub kind: EventKind,
}

/// Outcome of [`Gedcom::validate_events`]
#[derive(Debug, Clone, Default, Serialize)]
pub struct EventValidation {
    /// Birth, death and marriage events found
    pub total: usize,
    /// Events accepted by the selection predicate
    pub selected: usize,
    pub failed: Vec<EventFailure>,
}

impl Gedcom {
    /// Check every birth, death and marriage event accepted by `select` against `validate`
    pub fn validate_events<S, V>(&self, mut select: S, mut validate: V) -> EventValidation
    where
        S: FnMut(&Event<'_>) -> bool,
        V: FnMut(&Event<'_>, &Gedcom) -> bool,
    {
        let mut events = Vec::new();
        for record in self.records() {
            if let Some(indi) = Individual::new(record) {
                events.extend(indi.birth());
                events.extend(indi.death());
            } else if let Some(family) = Family::new(record) {
                events.extend(family.marriage());
            }
        }

        let mut report = EventValidation {
            total: events.len(),
            ..EventValidation::default()
        };
        for event in events.iter().filter(|e| select(e)) {
            report.selected += 1;
            if !validate(event, self) {
                let owner = event.owner.unwrap_or_default().to_string();
                debug!(owner = %owner, kind = %event.kind, "Event failed validation");
                report.failed.push(EventFailure {
                    owner,
                    kind: event.kind,
                });
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use crate::parsing::gedcom::parse_text;

    const TREE: &str = "\
0 HEAD
0 @I1@ INDI
1 NAME John /Smith/
1 BIRT
2 DATE 1 JAN 1900
2 PLAC London
1 DEAT
2 DATE 1970
0 @I2@ INDI
1 NAME Mary /Jones/
1 BIRT
2 DATE 3 MAR 1902
0 @F1@ FAM
1 HUSB @I1@
1 WIFE @I2@
1 MARR
2 PLAC York
0 TRLR
";

    #[test]
    fn test_validate_place_required() {
        let store = parse_text(TREE).unwrap();
        let report = store.validate_events(|_| true, |e, _| e.place.is_some());
        assert_eq!(report.total, 4);
        assert_eq!(report.selected, 4);
        let owners: Vec<_> = report.failed.iter().map(|f| f.owner.as_str()).collect();
        assert_eq!(owners, vec!["@I1@", "@I2@"]);
    }

    #[test]
    fn test_select_by_year() {
        let store = parse_text(TREE).unwrap();
        let report = store.validate_events(
            |e| e.year().is_some_and(|y| y < 1950),
            |e, _| e.date.is_some(),
        );
        assert_eq!(report.selected, 2);
        assert!(report.failed.is_empty());
    }
}
