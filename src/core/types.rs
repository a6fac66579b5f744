use serde::{Deserialize, Serialize};

use crate::core::record::Record;
use crate::core::{note, source};

/// Kind of a top-level record, derived from its tag
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
    Individual,
    Family,
    Note,
    Source,
    /// Header, submitter, repository and anything else we carry through untouched
    Other,
}

impl RecordKind {
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "INDI" => Self::Individual,
            "FAM" => Self::Family,
            "NOTE" => Self::Note,
            "SOUR" => Self::Source,
            _ => Self::Other,
        }
    }

    pub fn of(record: &Record) -> Self {
        Self::from_tag(&record.tag)
    }

    /// Tag of the top-level line, which is also the tag used to point at such records
    pub fn tag(self) -> &'static str {
        match self {
            Self::Individual => "INDI",
            Self::Family => "FAM",
            Self::Note => "NOTE",
            Self::Source => "SOUR",
            Self::Other => "",
        }
    }

    /// Letter following the opening `@` of generated ids
    pub fn id_prefix(self) -> &'static str {
        match self {
            Self::Individual => "I",
            Self::Family => "F",
            Self::Note => "N",
            Self::Source => "S",
            Self::Other => "X",
        }
    }

    /// Format a generated id, e.g. `@I12@`
    pub fn format_id(self, number: u32) -> String {
        format!("@{}{number}@", self.id_prefix())
    }

    /// Numeric suffix of an id in this kind's generated form
    pub fn id_number(self, id: &str) -> Option<u32> {
        id.strip_prefix('@')?
            .strip_suffix('@')?
            .strip_prefix(self.id_prefix())?
            .parse()
            .ok()
            .filter(|n| *n > 0)
    }

    /// Structural equality used to find duplicate records of this kind
    pub fn same_content(self, a: &Record, b: &Record) -> bool {
        match self {
            Self::Note => note::same_content(a, b),
            Self::Source => source::same_content(a, b),
            _ => a.same_content(b),
        }
    }
}

impl std::fmt::Display for RecordKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Other => write!(f, "OTHER"),
            kind => write!(f, "{}", kind.tag()),
        }
    }
}

/// Recorded sex of an individual
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Sex {
    Male,
    Female,
}

impl Sex {
    /// Parse a SEX value; anything other than M or F counts as unrecorded
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim().chars().next() {
            Some('M' | 'm') => Some(Self::Male),
            Some('F' | 'f') => Some(Self::Female),
            _ => None,
        }
    }
}

/// One of the two files being compared
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Side {
    Left,
    Right,
}

impl Side {
    #[must_use]
    pub fn opposite(self) -> Self {
        match self {
            Self::Left => Self::Right,
            Self::Right => Self::Left,
        }
    }

    /// Pick the value belonging to this side
    pub fn pick<T>(self, left: T, right: T) -> T {
        match self {
            Self::Left => left,
            Self::Right => right,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Left => write!(f, "left"),
            Self::Right => write!(f, "right"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_tag() {
        assert_eq!(RecordKind::from_tag("INDI"), RecordKind::Individual);
        assert_eq!(RecordKind::from_tag("FAM"), RecordKind::Family);
        assert_eq!(RecordKind::from_tag("NOTE"), RecordKind::Note);
        assert_eq!(RecordKind::from_tag("SOUR"), RecordKind::Source);
        assert_eq!(RecordKind::from_tag("SUBM"), RecordKind::Other);
    }

    #[test]
    fn test_id_format_and_number() {
        assert_eq!(RecordKind::Individual.format_id(7), "@I7@");
        assert_eq!(RecordKind::Family.id_number("@F12@"), Some(12));
        assert_eq!(RecordKind::Family.id_number("@I12@"), None);
        assert_eq!(RecordKind::Source.id_number("@SUBM1@"), None);
        assert_eq!(RecordKind::Note.id_number("@N0@"), None);
        assert_eq!(RecordKind::Note.id_number("N3"), None);
    }

    #[test]
    fn test_sex_parse() {
        assert_eq!(Sex::parse("M"), Some(Sex::Male));
        assert_eq!(Sex::parse("F"), Some(Sex::Female));
        assert_eq!(Sex::parse("U"), None);
        assert_eq!(Sex::parse(""), None);
    }

    #[test]
    fn test_side() {
        assert_eq!(Side::Left.opposite(), Side::Right);
        assert_eq!(Side::Right.pick(1, 2), 2);
        assert_eq!(Side::Left.to_string(), "left");
    }
}
