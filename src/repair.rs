//! Best-effort recovery of model text before strict parsing.
//!
//! Models wrap output in Markdown fences and surround JSON with prose. These
//! helpers peel that off and nothing more; the strict parsers (`plan`,
//! `svg`) decide whether what remains is acceptable.

use serde_json::Value;

const FENCE: &str = "```";

/// Language tags a model may put right after the opening fence.
const LANGUAGE_HINTS: &[&str] = &["json", "javascript", "js", "svg", "xml", "html", "text"];

/// Remove a surrounding triple-backtick block, with an optional language
/// tag, and trim. Text that does not start with a fence is only trimmed.
///
/// An unterminated opening fence is dropped along with its tag.
#[must_use]
pub fn strip_fences(raw: &str) -> String {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix(FENCE) else {
        return trimmed.to_string();
    };
    let inner = match rest.find(FENCE) {
        Some(end) => &rest[..end],
        None => rest,
    };
    drop_language_hint(inner).trim().to_string()
}

fn drop_language_hint(inner: &str) -> &str {
    let (first_line, remainder) = match inner.split_once('\n') {
        Some((first, rest)) => (first, rest),
        None => (inner, ""),
    };
    if is_language_hint(first_line.trim()) {
        return remainder;
    }

    // Same-line form: "```svg<svg ...>```".
    let head = inner.trim_start();
    for hint in LANGUAGE_HINTS {
        let Some(prefix) = head.get(..hint.len()) else {
            continue;
        };
        if prefix.eq_ignore_ascii_case(hint) {
            let after = head[hint.len()..].trim_start();
            if after.starts_with('<') || after.starts_with('{') {
                return after;
            }
        }
    }
    inner
}

fn is_language_hint(tag: &str) -> bool {
    LANGUAGE_HINTS
        .iter()
        .any(|hint| hint.eq_ignore_ascii_case(tag))
}

/// Parse `text` as JSON, falling back to the outermost `{...}` span when the
/// whole text does not parse. Returns `None` when neither parses.
#[must_use]
pub fn recover_json(text: &str) -> Option<Value> {
    if let Ok(value) = serde_json::from_str::<Value>(text) {
        return Some(value);
    }
    let start = text.find('{')?;
    let end = text.rfind('}')?;
    if end <= start {
        return None;
    }
    serde_json::from_str::<Value>(&text[start..=end]).ok()
}

#[cfg(test)]
#[path = "repair_test.rs"]
mod tests;
