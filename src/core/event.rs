use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::core::record::Record;

pub const DATE_TAG: &str = "DATE";
pub const PLACE_TAG: &str = "PLAC";
pub const NOTE_TAG: &str = "NOTE";
pub const SOURCE_TAG: &str = "SOUR";

/// Calendar formats tried before falling back to raw string comparison.
/// Month names are matched case-insensitively, so `JAN` and `January` both parse.
const DATE_FORMATS: [&str; 2] = ["%d %b %Y", "%d %B %Y"];

/// The events we compare and merge
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    Birth,
    Death,
    Census,
    Residence,
    Marriage,
}

impl EventKind {
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "BIRT" => Some(Self::Birth),
            "DEAT" => Some(Self::Death),
            "CENS" => Some(Self::Census),
            "RESI" => Some(Self::Residence),
            "MARR" => Some(Self::Marriage),
            _ => None,
        }
    }

    pub fn tag(self) -> &'static str {
        match self {
            Self::Birth => "BIRT",
            Self::Death => "DEAT",
            Self::Census => "CENS",
            Self::Residence => "RESI",
            Self::Marriage => "MARR",
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Birth => "Birth",
            Self::Death => "Death",
            Self::Census => "Census",
            Self::Residence => "Residence",
            Self::Marriage => "Marriage",
        }
    }

    /// At most one event of this kind is kept per record
    pub fn is_singular(self) -> bool {
        matches!(self, Self::Birth | Self::Death | Self::Marriage)
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// A view over an event line and its DATE/PLAC/SOUR/NOTE children
#[derive(Debug, Clone, Copy)]
pub struct Event<'a> {
    /// Id of the individual or family owning the event
    pub owner: Option<&'a str>,
    /// The originating line, kept for cloning
    pub record: &'a Record,
    pub kind: EventKind,
    pub date: Option<&'a str>,
    pub place: Option<&'a str>,
    pub source: Option<&'a str>,
    pub note: Option<&'a str>,
}

impl<'a> Event<'a> {
    /// Interpret `record` as an event owned by `owner`; `None` for tags we don't track
    pub fn from_record(owner: Option<&'a str>, record: &'a Record) -> Option<Self> {
        let kind = EventKind::from_tag(&record.tag)?;
        Some(Self {
            owner,
            record,
            kind,
            date: record.child_value(DATE_TAG).map(str::trim).filter(|d| !d.is_empty()),
            place: record.child_value(PLACE_TAG).map(str::trim).filter(|p| !p.is_empty()),
            source: record.child_pointer(SOURCE_TAG),
            note: record.child_pointer(NOTE_TAG),
        })
    }

    /// An event with neither date nor place carries no information
    pub fn is_empty(&self) -> bool {
        self.date.is_none() && self.place.is_none()
    }

    /// Year taken from the last word of the date
    pub fn year(&self) -> Option<i32> {
        self.date?.split_whitespace().last()?.parse().ok()
    }

    /// Place up to its first comma
    pub fn short_place(&self) -> Option<&'a str> {
        self.place.map(short_place)
    }

    /// Same date (calendar-equal if both parse) and same short place
    pub fn matches(&self, other: &Event<'_>) -> bool {
        dates_match(self.date, other.date) && self.short_place() == other.short_place()
    }

    pub fn summary(&self) -> EventSummary {
        EventSummary {
            date: self.date.map(str::to_string),
            place: self.place.map(str::to_string),
        }
    }
}

/// Owned date/place pair used in reports
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EventSummary {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub place: Option<String>,
}

impl std::fmt::Display for EventSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (&self.date, &self.place) {
            (Some(date), Some(place)) => write!(f, "{date} ({place})"),
            (Some(date), None) => write!(f, "{date}"),
            (None, Some(place)) => write!(f, "({place})"),
            (None, None) => write!(f, "(no details)"),
        }
    }
}

/// Parse a free-text date in one of the recognized calendar formats
pub fn parse_date(date: &str) -> Option<NaiveDate> {
    let date = date.trim();
    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(date, format).ok())
}

/// Calendar equality when both dates parse, raw string equality otherwise
pub fn dates_match(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => match (parse_date(a), parse_date(b)) {
            (Some(x), Some(y)) => x == y,
            _ => a == b,
        },
        (None, None) => true,
        _ => false,
    }
}

/// Substring of a place before its first comma
pub fn short_place(place: &str) -> &str {
    place.split(',').next().unwrap_or(place).trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event_record(tag: &str, date: Option<&str>, place: Option<&str>) -> Record {
        let mut record = Record::new(tag);
        if let Some(date) = date {
            record.push_child(Record::new(DATE_TAG).with_value(date));
        }
        if let Some(place) = place {
            record.push_child(Record::new(PLACE_TAG).with_value(place));
        }
        record
    }

    #[test]
    fn test_short_and_long_month_names_match() {
        let a = event_record("BIRT", Some("1 JAN 1900"), Some("London, England"));
        let b = event_record("BIRT", Some("1 January 1900"), Some("London"));
        let a = Event::from_record(None, &a).unwrap();
        let b = Event::from_record(None, &b).unwrap();
        assert!(a.matches(&b));
        assert!(b.matches(&a));
    }

    #[test]
    fn test_different_short_place_does_not_match() {
        let a = event_record("BIRT", Some("1 JAN 1900"), Some("London, England"));
        let b = event_record("BIRT", Some("1 January 1900"), Some("Paris, France"));
        let a = Event::from_record(None, &a).unwrap();
        let b = Event::from_record(None, &b).unwrap();
        assert!(!a.matches(&b));
    }

    #[test]
    fn test_unparseable_dates_fall_back_to_string_equality() {
        assert!(dates_match(Some("ABT 1900"), Some("ABT 1900")));
        assert!(!dates_match(Some("ABT 1900"), Some("1 JAN 1900")));
        assert!(!dates_match(Some("BEF 1900"), Some("ABT 1900")));
        assert!(dates_match(None, None));
        assert!(!dates_match(Some("1900"), None));
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = NaiveDate::from_ymd_opt(1900, 3, 4);
        assert_eq!(parse_date("4 MAR 1900"), expected);
        assert_eq!(parse_date("4 March 1900"), expected);
        assert_eq!(parse_date("04 Mar 1900"), expected);
        assert_eq!(parse_date("MAR 1900"), None);
    }

    #[test]
    fn test_empty_event() {
        let record = event_record("DEAT", None, None);
        let event = Event::from_record(Some("@I1@"), &record).unwrap();
        assert!(event.is_empty());
        assert_eq!(event.owner, Some("@I1@"));
        assert_eq!(event.kind, EventKind::Death);
    }

    #[test]
    fn test_untracked_tag() {
        let record = event_record("BAPM", Some("1900"), None);
        assert!(Event::from_record(None, &record).is_none());
    }

    #[test]
    fn test_year() {
        let record = event_record("BIRT", Some("12 FEB 1875"), None);
        assert_eq!(Event::from_record(None, &record).unwrap().year(), Some(1875));
        let record = event_record("BIRT", Some("ABT 1875"), None);
        assert_eq!(Event::from_record(None, &record).unwrap().year(), Some(1875));
        let record = event_record("BIRT", None, Some("York"));
        assert_eq!(Event::from_record(None, &record).unwrap().year(), None);
    }

    #[test]
    fn test_source_and_note_pointers() {
        let record = event_record("BIRT", Some("1900"), None)
            .with_child(Record::new(SOURCE_TAG).with_value("@S1@"))
            .with_child(Record::new(NOTE_TAG).with_value("@N4@"));
        let event = Event::from_record(None, &record).unwrap();
        assert_eq!(event.source, Some("@S1@"));
        assert_eq!(event.note, Some("@N4@"));
    }

    #[test]
    fn test_summary_display() {
        let record = event_record("BIRT", Some("1 JAN 1900"), Some("London, England"));
        let summary = Event::from_record(None, &record).unwrap().summary();
        assert_eq!(summary.to_string(), "1 JAN 1900 (London, England)");
    }
}
