use crate::core::event::{Event, EventKind, NOTE_TAG, SOURCE_TAG};
use crate::core::record::Record;
use crate::core::types::{RecordKind, Sex};

pub const NAME_TAG: &str = "NAME";
pub const SEX_TAG: &str = "SEX";
pub const PARENT_FAMILY_TAG: &str = "FAMC";
pub const SPOUSE_FAMILY_TAG: &str = "FAMS";

/// Read-only view of an `INDI` record
#[derive(Debug, Clone, Copy)]
pub struct Individual<'a> {
    record: &'a Record,
}

impl<'a> Individual<'a> {
    /// Wrap `record` if it is an individual
    pub fn new(record: &'a Record) -> Option<Self> {
        (RecordKind::of(record) == RecordKind::Individual).then_some(Self { record })
    }

    pub fn id(&self) -> &'a str {
        self.record.id().unwrap_or_default()
    }

    pub fn record(&self) -> &'a Record {
        self.record
    }

    /// Family in which this individual is a child
    pub fn parent_family(&self) -> Option<&'a str> {
        self.record.child_pointer(PARENT_FAMILY_TAG)
    }

    /// Families in which this individual is a spouse, in record order
    pub fn spouse_families(&self) -> Vec<&'a str> {
        self.record
            .children_tagged(SPOUSE_FAMILY_TAG)
            .filter_map(Record::pointer)
            .collect()
    }

    /// Full name with the surname delimiters removed and whitespace collapsed
    pub fn name(&self) -> Option<String> {
        let raw = self.record.child_value(NAME_TAG)?;
        let name = raw.replace('/', " ").split_whitespace().collect::<Vec<_>>().join(" ");
        (!name.is_empty()).then_some(name)
    }

    /// Given names: the text before the first `/`, or the whole value if there is none
    pub fn first_name(&self) -> Option<&'a str> {
        let raw = self.record.child_value(NAME_TAG)?;
        let first = raw.split('/').next().unwrap_or(raw).trim();
        (!first.is_empty()).then_some(first)
    }

    /// Surname: the text between the `/` delimiters
    pub fn last_name(&self) -> Option<&'a str> {
        let raw = self.record.child_value(NAME_TAG)?;
        let last = raw.split('/').nth(1)?.trim();
        (!last.is_empty()).then_some(last)
    }

    pub fn sex(&self) -> Option<Sex> {
        self.record.child_value(SEX_TAG).and_then(Sex::parse)
    }

    pub fn birth(&self) -> Option<Event<'a>> {
        self.event(EventKind::Birth)
    }

    pub fn death(&self) -> Option<Event<'a>> {
        self.event(EventKind::Death)
    }

    /// First event of `kind`, unless it carries neither date nor place
    pub fn event(&self, kind: EventKind) -> Option<Event<'a>> {
        self.record
            .child(kind.tag())
            .and_then(|r| Event::from_record(self.record.id(), r))
            .filter(|e| !e.is_empty())
    }

    /// Every non-empty event of `kind`
    pub fn events(&self, kind: EventKind) -> Vec<Event<'a>> {
        self.record
            .children_tagged(kind.tag())
            .filter_map(|r| Event::from_record(self.record.id(), r))
            .filter(|e| !e.is_empty())
            .collect()
    }

    pub fn census(&self) -> Vec<Event<'a>> {
        self.events(EventKind::Census)
    }

    pub fn residences(&self) -> Vec<Event<'a>> {
        self.events(EventKind::Residence)
    }

    pub fn note(&self) -> Option<&'a str> {
        self.record.child_pointer(NOTE_TAG)
    }

    pub fn source(&self) -> Option<&'a str> {
        self.record.child_pointer(SOURCE_TAG)
    }

    /// Name for reports, falling back to the id
    pub fn display_name(&self) -> String {
        self.name().unwrap_or_else(|| self.id().to_string())
    }
}

impl std::fmt::Display for Individual<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.display_name(), self.id())
    }
}

/// A bare individual record with the given id
pub fn new_individual(id: &str) -> Record {
    Record::new(RecordKind::Individual.tag()).with_xref(id)
}

/// Drop every FAMC/FAMS link so the record can be re-linked in another tree
pub fn strip_family_links(record: &mut Record) {
    record.remove_children(PARENT_FAMILY_TAG);
    record.remove_children(SPOUSE_FAMILY_TAG);
}

/// Set the parent family unless one is already recorded; returns whether it was set
pub fn set_parent_family(record: &mut Record, family: &str) -> bool {
    if record.child_pointer(PARENT_FAMILY_TAG).is_some() {
        return false;
    }
    record.set_child_value(PARENT_FAMILY_TAG, family);
    true
}

/// Add a spouse family link if it is not already present
pub fn add_spouse_family(record: &mut Record, family: &str) {
    let present = record
        .children_tagged(SPOUSE_FAMILY_TAG)
        .any(|r| r.pointer() == Some(family));
    if !present {
        record.push_child(Record::new(SPOUSE_FAMILY_TAG).with_value(family));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::event::{DATE_TAG, PLACE_TAG};

    fn john() -> Record {
        new_individual("@I1@")
            .with_child(Record::new(NAME_TAG).with_value("John /Smith/"))
            .with_child(Record::new(SEX_TAG).with_value("M"))
            .with_child(
                Record::new("BIRT")
                    .with_child(Record::new(DATE_TAG).with_value("1 JAN 1900"))
                    .with_child(Record::new(PLACE_TAG).with_value("London, England")),
            )
            .with_child(Record::new("DEAT"))
            .with_child(
                Record::new("CENS").with_child(Record::new(PLACE_TAG).with_value("London")),
            )
            .with_child(
                Record::new("CENS").with_child(Record::new(DATE_TAG).with_value("1911")),
            )
            .with_child(Record::new(PARENT_FAMILY_TAG).with_value("@F1@"))
            .with_child(Record::new(SPOUSE_FAMILY_TAG).with_value("@F2@"))
            .with_child(Record::new(SPOUSE_FAMILY_TAG).with_value("@F3@"))
    }

    #[test]
    fn test_accessors() {
        let record = john();
        let indi = Individual::new(&record).unwrap();
        assert_eq!(indi.id(), "@I1@");
        assert_eq!(indi.name().as_deref(), Some("John Smith"));
        assert_eq!(indi.first_name(), Some("John"));
        assert_eq!(indi.last_name(), Some("Smith"));
        assert_eq!(indi.sex(), Some(Sex::Male));
        assert_eq!(indi.parent_family(), Some("@F1@"));
        assert_eq!(indi.spouse_families(), vec!["@F2@", "@F3@"]);
        assert_eq!(indi.birth().unwrap().date, Some("1 JAN 1900"));
        assert_eq!(indi.census().len(), 2);
        assert!(indi.residences().is_empty());
        assert_eq!(indi.to_string(), "John Smith (@I1@)");
    }

    #[test]
    fn test_empty_death_is_absent() {
        let record = john();
        let indi = Individual::new(&record).unwrap();
        assert!(indi.death().is_none());
    }

    #[test]
    fn test_name_without_surname() {
        let record = new_individual("@I2@").with_child(Record::new(NAME_TAG).with_value("Mary"));
        let indi = Individual::new(&record).unwrap();
        assert_eq!(indi.first_name(), Some("Mary"));
        assert_eq!(indi.last_name(), None);
        assert_eq!(indi.display_name(), "Mary");
    }

    #[test]
    fn test_surname_only() {
        let record =
            new_individual("@I2@").with_child(Record::new(NAME_TAG).with_value("/Jones/"));
        let indi = Individual::new(&record).unwrap();
        assert_eq!(indi.first_name(), None);
        assert_eq!(indi.last_name(), Some("Jones"));
        assert_eq!(indi.name().as_deref(), Some("Jones"));
    }

    #[test]
    fn test_not_an_individual() {
        let record = Record::new("FAM").with_xref("@F1@");
        assert!(Individual::new(&record).is_none());
    }

    #[test]
    fn test_link_mutators() {
        let mut record = john();
        assert!(!set_parent_family(&mut record, "@F9@"));
        add_spouse_family(&mut record, "@F2@");
        add_spouse_family(&mut record, "@F4@");
        assert_eq!(
            Individual::new(&record).unwrap().spouse_families(),
            vec!["@F2@", "@F3@", "@F4@"]
        );

        strip_family_links(&mut record);
        let indi = Individual::new(&record).unwrap();
        assert!(indi.parent_family().is_none());
        assert!(indi.spouse_families().is_empty());

        assert!(set_parent_family(&mut record, "@F9@"));
        assert_eq!(Individual::new(&record).unwrap().parent_family(), Some("@F9@"));
    }
}
