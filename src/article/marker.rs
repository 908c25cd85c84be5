//! Matching of `[UPDATE ...]` announcements inside article text.
//!
//! Patterns are compiled once and only used through `&self` matching methods,
//! so no scan position carries over between calls.

use std::sync::LazyLock;

use regex::Regex;

/// `[UPDATE]`, `[Update 3]`, `[UPDATE 2: Title]`, `[update - Title]` ...
const MARKER_PATTERN: &str = r"(?i)\[\s*update\s*\d*\s*(?:[:\-–—][^\]]*)?\]";

static UPDATE_MARKER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(MARKER_PATTERN).expect("Invalid update marker regex"));

static UPDATE_MARKER_WITH_SPACE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(&format!(r"{MARKER_PATTERN}\s*")).expect("Invalid update marker regex")
});

/// Whether the text contains an update marker anywhere.
#[must_use]
pub fn contains_marker(text: &str) -> bool {
    UPDATE_MARKER.is_match(text)
}

/// The first update marker in the text, brackets included.
#[must_use]
pub fn first_marker(text: &str) -> Option<&str> {
    UPDATE_MARKER.find(text).map(|m| m.as_str())
}

/// Remove every update marker together with the whitespace following it.
#[must_use]
pub fn strip_markers(text: &str) -> String {
    UPDATE_MARKER_WITH_SPACE.replace_all(text, "").into_owned()
}
