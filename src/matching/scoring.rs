use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::core::event::Event;
use crate::core::family::Family;
use crate::core::individual::Individual;
use crate::store::Gedcom;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read scoring weights: {0}")]
    ReadError(#[from] std::io::Error),

    #[error("Failed to parse scoring weights: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// Points awarded by the match scores.
///
/// Births outweigh deaths, which outweigh names; a matching marriage outweighs
/// everything an individual can contribute. Missing fields in a JSON file take
/// the default value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScoringWeights {
    /// Awarded when both births are present and match
    pub birth: u32,
    /// Awarded when both deaths are present and match
    pub death: u32,
    /// Upper bound for similar names, reduced by the edit distance (never below 1)
    pub name: u32,
    /// Awarded when both marriages are present and match
    pub marriage: u32,
}

impl Default for ScoringWeights {
    fn default() -> Self {
        Self {
            birth: 20,
            death: 10,
            name: 5,
            marriage: 40,
        }
    }
}

impl ScoringWeights {
    /// Load weights from a JSON file
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ReadError` if the file cannot be read or
    /// `ConfigError::ParseError` if it is not valid JSON for this type.
    pub fn load_from_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        Ok(serde_json::from_str(&content)?)
    }
}

/// Levenshtein distance counted in characters, using a single DP row
#[must_use]
pub fn levenshtein(a: &str, b: &str) -> usize {
    let b: Vec<char> = b.chars().collect();
    let mut row: Vec<usize> = (0..=b.len()).collect();

    for (i, ca) in a.chars().enumerate() {
        let mut diagonal = row[0];
        row[0] = i + 1;
        for (j, cb) in b.iter().enumerate() {
            let above = row[j + 1];
            let substitution = diagonal + usize::from(ca != *cb);
            row[j + 1] = substitution.min(above + 1).min(row[j] + 1);
            diagonal = above;
        }
    }
    row[b.len()]
}

/// Largest distance at which two strings still count as similar
fn similarity_threshold(a: &str, b: &str) -> usize {
    ((a.chars().count() + b.chars().count()) / 6).max(1)
}

/// Whether two strings are within edit distance `max(1, (len(a) + len(b)) / 6)`
#[must_use]
pub fn is_similar(a: &str, b: &str) -> bool {
    levenshtein(a, b) <= similarity_threshold(a, b)
}

/// Like [`is_similar`], but a missing value is never similar to anything
#[must_use]
pub fn names_similar(a: Option<&str>, b: Option<&str>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => is_similar(a, b),
        _ => false,
    }
}

/// 1 if both events match, 0 otherwise
#[must_use]
pub fn event_score(a: &Event<'_>, b: &Event<'_>) -> u32 {
    u32::from(a.matches(b))
}

fn events_match(a: Option<Event<'_>>, b: Option<Event<'_>>) -> bool {
    matches!((a, b), (Some(a), Some(b)) if a.matches(&b))
}

/// Likelihood that two individuals are the same person.
///
/// Zero whenever both sexes are recorded and differ.
#[must_use]
pub fn individual_score(left: &Individual<'_>, right: &Individual<'_>, weights: &ScoringWeights) -> u32 {
    if let (Some(l), Some(r)) = (left.sex(), right.sex()) {
        if l != r {
            return 0;
        }
    }

    let mut score = 0;
    if events_match(left.birth(), right.birth()) {
        score += weights.birth;
    }
    if events_match(left.death(), right.death()) {
        score += weights.death;
    }

    let (left_name, right_name) = (left.name(), right.name());
    if let (Some(l), Some(r)) = (&left_name, &right_name) {
        if is_similar(l, r) {
            let distance = u32::try_from(levenshtein(l, r)).unwrap_or(u32::MAX);
            score += weights.name.saturating_sub(distance).max(1);
        }
    }
    score
}

/// Likelihood that two families are the same couple: marriage plus spouse scores
#[must_use]
pub fn family_score(
    left_store: &Gedcom,
    left: &Family<'_>,
    right_store: &Gedcom,
    right: &Family<'_>,
    weights: &ScoringWeights,
) -> u32 {
    let mut score = 0;
    if events_match(left.marriage(), right.marriage()) {
        score += weights.marriage;
    }

    let spouses = [
        (left.husband(), right.husband()),
        (left.wife(), right.wife()),
    ];
    for (l, r) in spouses {
        let l = l.and_then(|id| left_store.individual(id));
        let r = r.and_then(|id| right_store.individual(id));
        if let (Some(l), Some(r)) = (l, r) {
            score += individual_score(&l, &r, weights);
        }
    }
    score
}
