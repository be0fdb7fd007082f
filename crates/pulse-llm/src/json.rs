//! Helpers for digging JSON out of free-form model replies.

use std::sync::LazyLock;

use regex::Regex;

static FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)```(?:json)?").expect("valid fence regex"));

/// Removes every Markdown code fence marker (```` ```json ```` and ```` ``` ````)
/// and trims the result.
#[must_use]
pub fn strip_code_fences(text: &str) -> String {
    FENCE_RE.replace_all(text, "").trim().to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_json_fence() {
        assert_eq!(strip_code_fences("```json\n[1, 2]\n```"), "[1, 2]");
    }

    #[test]
    fn strips_bare_fence() {
        assert_eq!(strip_code_fences("```\n{\"a\": 1}\n```\n"), "{\"a\": 1}");
    }

    #[test]
    fn leaves_plain_json_alone() {
        assert_eq!(strip_code_fences("  {\"a\": 1} "), "{\"a\": 1}");
    }

    #[test]
    fn uppercase_language_tag_is_stripped() {
        assert_eq!(strip_code_fences("```JSON\n[]\n```"), "[]");
    }
}
