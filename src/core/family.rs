use crate::core::event::{Event, EventKind};
use crate::core::record::Record;
use crate::core::types::RecordKind;

pub const HUSBAND_TAG: &str = "HUSB";
pub const WIFE_TAG: &str = "WIFE";
pub const CHILD_TAG: &str = "CHIL";

/// Read-only view of a `FAM` record
#[derive(Debug, Clone, Copy)]
pub struct Family<'a> {
    record: &'a Record,
}

impl<'a> Family<'a> {
    pub fn new(record: &'a Record) -> Option<Self> {
        (RecordKind::of(record) == RecordKind::Family).then_some(Self { record })
    }

    pub fn id(&self) -> &'a str {
        self.record.id().unwrap_or_default()
    }

    pub fn record(&self) -> &'a Record {
        self.record
    }

    pub fn husband(&self) -> Option<&'a str> {
        self.record.child_pointer(HUSBAND_TAG)
    }

    pub fn wife(&self) -> Option<&'a str> {
        self.record.child_pointer(WIFE_TAG)
    }

    pub fn children(&self) -> Vec<&'a str> {
        self.record
            .children_tagged(CHILD_TAG)
            .filter_map(Record::pointer)
            .collect()
    }

    pub fn has_child(&self, id: &str) -> bool {
        self.record
            .children_tagged(CHILD_TAG)
            .any(|r| r.pointer() == Some(id))
    }

    pub fn marriage(&self) -> Option<Event<'a>> {
        self.record
            .child(EventKind::Marriage.tag())
            .and_then(|r| Event::from_record(self.record.id(), r))
            .filter(|e| !e.is_empty())
    }
}

pub fn new_family(id: &str) -> Record {
    Record::new(RecordKind::Family.tag()).with_xref(id)
}

pub fn set_husband(record: &mut Record, id: &str) {
    record.set_child_value(HUSBAND_TAG, id);
}

pub fn set_wife(record: &mut Record, id: &str) {
    record.set_child_value(WIFE_TAG, id);
}

/// Append a CHIL link unless the child is already listed
pub fn add_child(record: &mut Record, id: &str) {
    let present = record
        .children_tagged(CHILD_TAG)
        .any(|r| r.pointer() == Some(id));
    if !present {
        record.push_child(Record::new(CHILD_TAG).with_value(id));
    }
}
