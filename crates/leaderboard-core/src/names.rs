//! Splitting of credited-solver strings into individual solver names.

use std::sync::LazyLock;

use regex::Regex;

/// Delimiters between people in one credit string: `&`, the word `and`,
/// `,` or `/`, with any surrounding whitespace.
static SOLVER_DELIMITER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s*(?:&|\band\b|,|/)\s*").expect("regex is valid")
});

static HTML_AMPERSAND: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)&amp;").expect("regex is valid"));

/// Split one raw credit string into the individual solvers it names.
///
/// `"Alice & Bob"` → `["Alice", "Bob"]`, `"Alice, Bob and Carol"` →
/// `["Alice", "Bob", "Carol"]`. The HTML entity `&amp;` is treated as `&`.
/// Fragments are trimmed and empty ones dropped; no case folding is applied,
/// so `"bob"` and `"Bob"` stay distinct.
///
/// # Examples
///
/// ```
/// use leaderboard_core::names::split_solver_names;
///
/// assert_eq!(split_solver_names("Alice &amp; Bob"), vec!["Alice", "Bob"]);
/// assert!(split_solver_names("   ").is_empty());
/// ```
pub fn split_solver_names(raw: &str) -> Vec<String> {
    if raw.is_empty() {
        return Vec::new();
    }

    let normalized = HTML_AMPERSAND.replace_all(raw, "&");
    SOLVER_DELIMITER
        .split(normalized.trim())
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(str::to_string)
        .collect()
}
