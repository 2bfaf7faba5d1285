//! Pulling the YAML document out of free-form model output.

use once_cell::sync::Lazy;
use regex::Regex;

/// Top-level key every summary document starts with.
pub const DOCUMENT_KEY: &str = "articles:";

static FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?s)```ya?ml[ \t]*\r?\n(.*?)```").expect("fence pattern is valid"));

/// Locate the YAML document inside `text`.
///
/// A fenced ```` ```yaml ```` block wins; otherwise the document starts at the
/// first line beginning with `articles:`. Returns `None` when neither exists.
pub fn extract_yaml_block(text: &str) -> Option<&str> {
    if let Some(captures) = FENCE.captures(text) {
        let body = captures.get(1)?.as_str().trim();
        if !body.is_empty() {
            return Some(body);
        }
    }

    let start = text
        .match_indices(DOCUMENT_KEY)
        .map(|(idx, _)| idx)
        .find(|&idx| idx == 0 || text[..idx].ends_with('\n'))?;
    Some(text[start..].trim_end())
}

/// Strip a single surrounding ```` ```markdown ```` (or bare) fence, if present.
pub fn strip_markdown_fence(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let Some(body) = rest.strip_suffix("```") else {
        return trimmed;
    };
    match body.split_once('\n') {
        Some((lang, inner)) if !lang.contains(' ') => inner.trim(),
        _ => body.trim(),
    }
}
