use serde::Serialize;

use crate::compare::context::Role;
use crate::compare::MergeSource;
use crate::core::event::{EventKind, EventSummary};
use crate::core::individual::Individual;
use crate::core::types::Side;

/// An individual as named in a report
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PersonRef {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl From<&Individual<'_>> for PersonRef {
    fn from(individual: &Individual<'_>) -> Self {
        Self {
            id: individual.id().to_string(),
            name: individual.name(),
        }
    }
}

impl std::fmt::Display for PersonRef {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.name.as_deref().unwrap_or("Unknown"), self.id)
    }
}

/// One divergence between a compared pair
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Difference {
    /// Full names are not similar
    NameMismatch {
        left: Option<String>,
        right: Option<String>,
    },

    /// Last names are not similar; the pair's relatives were not compared
    LastNameMismatch { left: String, right: String },

    /// Both sides record the event with different details
    EventMismatch {
        kind: EventKind,
        left: EventSummary,
        right: EventSummary,
    },

    /// The event is recorded on one side only
    EventOneSided {
        kind: EventKind,
        side: Side,
        event: EventSummary,
        /// Copied into the other tree
        grafted: bool,
    },

    /// A relative exists on one side only
    RelativeOneSided {
        role: Role,
        side: Side,
        person: PersonRef,
        /// Id of the copy in the other tree
        #[serde(skip_serializing_if = "Option::is_none")]
        grafted_as: Option<String>,
    },
}

impl Difference {
    /// Short machine-friendly name of the variant
    pub fn kind(&self) -> &'static str {
        match self {
            Self::NameMismatch { .. } => "name_mismatch",
            Self::LastNameMismatch { .. } => "last_name_mismatch",
            Self::EventMismatch { .. } => "event_mismatch",
            Self::EventOneSided { .. } => "event_one_sided",
            Self::RelativeOneSided { .. } => "relative_one_sided",
        }
    }
}

impl std::fmt::Display for Difference {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::NameMismatch { left, right } => write!(
                f,
                "Names are significantly different: {} vs {}",
                left.as_deref().unwrap_or("Unknown"),
                right.as_deref().unwrap_or("Unknown")
            ),
            Self::LastNameMismatch { left, right } => write!(
                f,
                "Last names are significantly different, not comparing relatives: {left} vs {right}"
            ),
            Self::EventMismatch { kind, left, right } => {
                write!(f, "{kind} different: {left} vs {right}")
            }
            Self::EventOneSided {
                kind,
                side,
                event,
                grafted,
            } => {
                write!(
                    f,
                    "Found {kind} on the {side} but not the {}: {event}",
                    side.opposite()
                )?;
                if *grafted {
                    write!(f, " (merged)")?;
                }
                Ok(())
            }
            Self::RelativeOneSided {
                role,
                side,
                person,
                grafted_as,
            } => {
                write!(
                    f,
                    "Found {role} on the {side} but not the {}: {person}",
                    side.opposite()
                )?;
                if let Some(id) = grafted_as {
                    write!(f, " (merged as {id})")?;
                }
                Ok(())
            }
        }
    }
}

/// Everything found while comparing one pair of individuals
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PairReport {
    pub left: PersonRef,
    pub right: PersonRef,
    pub differences: Vec<Difference>,
}

impl PairReport {
    pub fn new(left: PersonRef, right: PersonRef) -> Self {
        Self {
            left,
            right,
            differences: Vec::new(),
        }
    }
}

/// Records created in the destination tree by a merge
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct MergeSummary {
    pub individuals: usize,
    pub families: usize,
    pub notes: usize,
    pub sources: usize,
    pub events: usize,
}

impl MergeSummary {
    pub fn total(&self) -> usize {
        self.individuals + self.families + self.notes + self.sources + self.events
    }
}

impl std::fmt::Display for MergeSummary {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "merged {} individuals, {} families, {} notes, {} sources, {} events",
            self.individuals, self.families, self.notes, self.sources, self.events
        )
    }
}

/// Result of [`GedcomCompare::compare_from`](crate::compare::GedcomCompare::compare_from)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ComparisonReport {
    pub merge_source: MergeSource,
    /// Compared pairs in traversal order
    pub pairs: Vec<PairReport>,
    pub merge: MergeSummary,
}

impl ComparisonReport {
    /// The report for a compared pair, looked up by ids
    pub fn pair(&self, left: &str, right: &str) -> Option<&PairReport> {
        self.pairs
            .iter()
            .find(|p| p.left.id == left && p.right.id == right)
    }

    pub fn difference_count(&self) -> usize {
        self.pairs.iter().map(|p| p.differences.len()).sum()
    }
}
