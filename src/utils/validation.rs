//! Centralized validation and helper functions.

use std::path::Path;

/// Deepest nesting level accepted by the parser (DOS protection)
pub const MAX_LEVEL: usize = 99;

/// Maximum number of top-level records allowed in a single file (DOS protection)
pub const MAX_RECORDS: usize = 5_000_000;

/// Validate that a string is a cross-reference id: a non-empty token enclosed in `@`.
///
/// # Examples
///
/// ```
/// use gedcom_reconcile::utils::validation::is_valid_xref;
///
/// assert!(is_valid_xref("@I12@"));
/// assert!(!is_valid_xref("@@"));
/// assert!(!is_valid_xref("John /Smith/"));
/// assert!(!is_valid_xref("@I1 @"));
/// ```
#[must_use]
pub fn is_valid_xref(s: &str) -> bool {
    s.len() > 2
        && s.starts_with('@')
        && s.ends_with('@')
        && !s[1..s.len() - 1].contains(['@', ' ', '\t'])
}

/// Check if adding another top-level record would exceed the maximum allowed.
///
/// Call this with the current count BEFORE adding a new record.
/// Returns an error message if adding would exceed the limit, None if safe to add.
#[must_use]
pub fn check_record_limit(count: usize) -> Option<String> {
    if count >= MAX_RECORDS {
        Some(format!(
            "Too many records: adding another would exceed maximum of {MAX_RECORDS}"
        ))
    } else {
        None
    }
}

/// Check if the path is a gzipped file
#[must_use]
#[allow(clippy::case_sensitive_file_extension_comparisons)] // Already lowercased
pub fn is_gzipped(path: &Path) -> bool {
    let path_str = path.to_string_lossy().to_lowercase();
    path_str.ends_with(".gz")
}
