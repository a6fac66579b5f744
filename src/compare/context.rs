use serde::{Deserialize, Serialize};

use crate::core::types::Side;

/// How a compared individual relates to the pair that led to it
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    Root,
    Father,
    Mother,
    Husband,
    Wife,
    Child,
}

impl Role {
    pub fn label(self) -> &'static str {
        match self {
            Self::Root => "Root",
            Self::Father => "Father",
            Self::Mother => "Mother",
            Self::Husband => "Husband",
            Self::Wife => "Wife",
            Self::Child => "Child",
        }
    }
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// One pending comparison: a candidate on each side (either may be missing)
/// plus what is needed to link a graft later.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComparisonContext {
    pub role: Role,
    pub left: Option<String>,
    pub right: Option<String>,

    /// The compared pair whose relatives produced this context
    pub focal: Option<(String, String)>,

    /// Family linking the candidate to the focal individual, per side
    pub left_family: Option<String>,
    pub right_family: Option<String>,
}

impl ComparisonContext {
    pub fn root(left: &str, right: &str) -> Self {
        Self::relative(Role::Root, Some(left), Some(right))
    }

    pub fn relative(role: Role, left: Option<&str>, right: Option<&str>) -> Self {
        Self {
            role,
            left: left.map(str::to_string),
            right: right.map(str::to_string),
            focal: None,
            left_family: None,
            right_family: None,
        }
    }

    #[must_use]
    pub fn with_focal(mut self, left: &str, right: &str) -> Self {
        self.focal = Some((left.to_string(), right.to_string()));
        self
    }

    #[must_use]
    pub fn with_families(mut self, left: Option<&str>, right: Option<&str>) -> Self {
        self.left_family = left.map(str::to_string);
        self.right_family = right.map(str::to_string);
        self
    }

    /// Fill in the candidate on one side
    #[must_use]
    pub fn with_candidate(mut self, side: Side, id: String) -> Self {
        match side {
            Side::Left => self.left = Some(id),
            Side::Right => self.right = Some(id),
        }
        self
    }

    pub fn candidate(&self, side: Side) -> Option<&str> {
        side.pick(&self.left, &self.right).as_deref()
    }

    pub fn family(&self, side: Side) -> Option<&str> {
        side.pick(&self.left_family, &self.right_family).as_deref()
    }

    pub fn focal(&self, side: Side) -> Option<&str> {
        self.focal
            .as_ref()
            .map(|(left, right)| side.pick(left.as_str(), right.as_str()))
    }

    /// The only side with a candidate, or `None` if both or neither have one
    pub fn one_sided(&self) -> Option<Side> {
        match (&self.left, &self.right) {
            (Some(_), None) => Some(Side::Left),
            (None, Some(_)) => Some(Side::Right),
            _ => None,
        }
    }

    pub fn is_matched(&self) -> bool {
        self.left.is_some() && self.right.is_some()
    }

    /// Whether the candidate on `side` is the focal individual itself
    pub fn is_focal(&self, side: Side) -> bool {
        self.candidate(side).is_some() && self.candidate(side) == self.focal(side)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_one_sided() {
        let ctx = ComparisonContext::relative(Role::Father, Some("@I1@"), None)
            .with_focal("@I2@", "@I9@")
            .with_families(Some("@F1@"), None);
        assert_eq!(ctx.one_sided(), Some(Side::Left));
        assert!(!ctx.is_matched());
        assert_eq!(ctx.candidate(Side::Left), Some("@I1@"));
        assert_eq!(ctx.focal(Side::Right), Some("@I9@"));
        assert_eq!(ctx.family(Side::Left), Some("@F1@"));
        assert_eq!(ctx.family(Side::Right), None);

        let ctx = ctx.with_candidate(Side::Right, "@I20@".to_string());
        assert!(ctx.is_matched());
        assert_eq!(ctx.one_sided(), None);
    }

    #[test]
    fn test_is_focal() {
        let ctx = ComparisonContext::relative(Role::Husband, Some("@I2@"), None).with_focal("@I2@", "@I9@");
        assert!(ctx.is_focal(Side::Left));
        assert!(!ctx.is_focal(Side::Right));

        let root = ComparisonContext::root("@I1@", "@I1@");
        assert!(!root.is_focal(Side::Left));
    }
}
