/// Appended when [`limit_words`] drops trailing words.
pub const TRUNCATION_MARKER: &str = "...";

/// Keep at most `max_words` whitespace-separated words, joined by single spaces.
///
/// When words were dropped, [`TRUNCATION_MARKER`] is appended directly to the last kept word,
/// so applying the function again with the same limit returns the same string.
/// A limit of zero yields an empty string.
pub fn limit_words(text: &str, max_words: usize) -> String {
    if max_words == 0 {
        return String::new();
    }

    let words: Vec<&str> = text.split_whitespace().collect();
    let mut out = words
        .iter()
        .take(max_words)
        .copied()
        .collect::<Vec<_>>()
        .join(" ");
    if words.len() > max_words {
        out.push_str(TRUNCATION_MARKER);
    }
    out
}

pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
