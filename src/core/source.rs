use crate::core::record::Record;
use crate::core::types::RecordKind;

pub const TITLE_TAG: &str = "TITL";
pub const TEXT_TAG: &str = "TEXT";

/// View of a top-level `SOUR` record
#[derive(Debug, Clone, Copy)]
pub struct Source<'a> {
    record: &'a Record,
}

impl<'a> Source<'a> {
    pub fn new(record: &'a Record) -> Option<Self> {
        (RecordKind::of(record) == RecordKind::Source).then_some(Self { record })
    }

    pub fn id(&self) -> &'a str {
        self.record.id().unwrap_or_default()
    }

    pub fn title(&self) -> Option<&'a str> {
        self.record.child_value(TITLE_TAG)
    }

    pub fn text(&self) -> Option<&'a str> {
        self.record.child_value(TEXT_TAG)
    }

    /// Continuation lines of the TEXT body
    pub fn continuation(&self) -> Vec<(&'a str, Option<&'a str>)> {
        self.record
            .child(TEXT_TAG)
            .map(Record::continuation)
            .unwrap_or_default()
    }
}

/// Two sources are duplicates when title, text and text continuation all agree.
/// A value missing on both sides counts as equal.
pub fn same_content(a: &Record, b: &Record) -> bool {
    match (Source::new(a), Source::new(b)) {
        (Some(a), Some(b)) => {
            a.title() == b.title() && a.text() == b.text() && a.continuation() == b.continuation()
        }
        _ => false,
    }
}
