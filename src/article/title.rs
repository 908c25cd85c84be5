use super::marker::first_marker;

/// Extract the human title from the first update marker in `text`.
///
/// The marker is read backwards from its closing bracket until a separator
/// (`-`, `:`, `—`, `–`) is reached; everything collected so far, restored to
/// reading order, is the title. Reaching the opening `[` first means the
/// marker carries no title, and an empty string is returned so the caller
/// falls back to the article's own title.
#[must_use]
pub fn extract_title(text: &str) -> String {
    let Some(marker) = first_marker(text) else {
        return String::new();
    };

    let mut reversed = String::new();
    for c in marker.chars().rev() {
        match c {
            ']' => {}
            '-' | ':' | '—' | '–' => {
                return reversed.chars().rev().collect::<String>().trim().to_string();
            }
            '[' => return String::new(),
            _ => reversed.push(c),
        }
    }

    String::new()
}
