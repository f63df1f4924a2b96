use std::path::Path;

use anyhow::Context as _;

use crate::foundation::error::{TextgenError, TextgenResult};

/// Non-empty, trimmed lines of a UTF-8 text file, in file order.
pub fn load_sentences(path: &Path) -> TextgenResult<Vec<String>> {
    if !path.is_file() {
        return Err(TextgenError::config(format!(
            "sentences file '{}' does not exist",
            path.display()
        )));
    }
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("read sentences file '{}'", path.display()))?;
    let sentences = parse_sentences(&text);
    if sentences.is_empty() {
        return Err(TextgenError::config(format!(
            "sentences file '{}' has no non-empty lines",
            path.display()
        )));
    }
    Ok(sentences)
}

pub fn parse_sentences(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_owned)
        .collect()
}
