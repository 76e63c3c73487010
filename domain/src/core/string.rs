//! String helpers for previews and templated text.

/// Truncate to at most `max_len` bytes, appending `...` when shortened.
///
/// Cuts on a UTF-8 character boundary.
pub fn truncate(s: &str, max_len: usize) -> String {
    if s.len() <= max_len {
        return s.to_string();
    }
    let mut end = max_len.saturating_sub(3).min(s.len());
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    format!("{}...", &s[..end])
}

/// Collapse all whitespace runs (newlines included) into single spaces.
pub fn one_line(s: &str) -> String {
    s.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Single-line preview of dialogue text
pub fn preview(s: &str, max_len: usize) -> String {
    truncate(&one_line(s), max_len)
}
