//! Splits raw text into the word sequence a session plays.

/// Split `text` on runs of whitespace, discarding empty tokens.
pub fn tokenize(text: &str) -> Vec<String> {
    text.split_whitespace().map(str::to_string).collect()
}
