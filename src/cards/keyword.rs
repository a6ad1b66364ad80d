//! Keyword detection over card text.
//!
//! This is a fixed-string heuristic, not a rules-text parser: a card has
//! keyword `K` when its text contains `"K."`, ignoring case. It can be
//! fooled by a sentence that happens to end in the keyword.

pub const LIMITED: &str = "Limited";
pub const TERMINAL: &str = "Terminal";
pub const STEALTH: &str = "Stealth";

/// Marker that a plot has a "When Revealed" effect.
pub const WHEN_REVEALED: &str = "When Revealed";

/// Case-insensitive test for `"<keyword>."` in `text`.
#[must_use]
pub fn has_keyword(text: Option<&str>, keyword: &str) -> bool {
    let Some(text) = text else {
        return false;
    };
    let needle = format!("{}.", keyword.to_lowercase());
    text.to_lowercase().contains(&needle)
}

/// Case-sensitive substring test, for printed markers like "When Revealed".
#[must_use]
pub fn has_marker(text: Option<&str>, marker: &str) -> bool {
    text.is_some_and(|t| t.contains(marker))
}
