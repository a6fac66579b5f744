use crate::core::record::Record;
use crate::core::types::RecordKind;

/// View of a top-level `NOTE` record: free text on the record line plus continuations
#[derive(Debug, Clone, Copy)]
pub struct Note<'a> {
    record: &'a Record,
}

impl<'a> Note<'a> {
    pub fn new(record: &'a Record) -> Option<Self> {
        (RecordKind::of(record) == RecordKind::Note).then_some(Self { record })
    }

    pub fn id(&self) -> &'a str {
        self.record.id().unwrap_or_default()
    }

    pub fn text(&self) -> Option<&'a str> {
        self.record.value()
    }

    pub fn continuation(&self) -> Vec<(&'a str, Option<&'a str>)> {
        self.record.continuation()
    }
}

/// Two notes are duplicates when their body and every continuation line agree
pub fn same_content(a: &Record, b: &Record) -> bool {
    match (Note::new(a), Note::new(b)) {
        (Some(a), Some(b)) => a.text() == b.text() && a.continuation() == b.continuation(),
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn note(id: &str, text: &str, cont: &[&str]) -> Record {
        let mut record = Record::new("NOTE").with_xref(id).with_value(text);
        for line in cont {
            record.push_child(Record::new("CONT").with_value(*line));
        }
        record
    }

    #[test]
    fn test_same_content() {
        let a = note("@N1@", "Born at home", &["second line"]);
        let b = note("@N2@", "Born at home", &["second line"]);
        let c = note("@N3@", "Born at home", &["other line"]);
        let d = note("@N4@", "Born at home", &[]);
        assert!(same_content(&a, &b));
        assert!(!same_content(&a, &c));
        assert!(!same_content(&a, &d));
    }

    #[test]
    fn test_other_children_ignored() {
        let a = note("@N1@", "text", &[]).with_child(Record::new("CHAN"));
        let b = note("@N2@", "text", &[]);
        assert!(same_content(&a, &b));
    }

    #[test]
    fn test_kind_mismatch() {
        let a = note("@N1@", "text", &[]);
        let b = Record::new("SOUR").with_xref("@S1@").with_value("text");
        assert!(!same_content(&a, &b));
    }
}
