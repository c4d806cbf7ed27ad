//! Cleanup of raw model output before it is diffed.
//!
//! The diff engine takes plain text; this is the text-source side that turns
//! a chat-style answer into file content.

use once_cell::sync::Lazy;
use regex::Regex;

static FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```[\w+#.-]*[ \t]*\r?\n(.*?)```").expect("Failed to compile fenced block pattern")
});

static STRAY_FENCE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"```[\w+#.-]*[ \t]*\r?\n?").expect("Failed to compile fence pattern"));

/// Pull the code out of a model response.
///
/// The first fenced block wins; without a complete block any stray fence
/// markers are dropped. Surrounding whitespace is trimmed.
pub fn extract_code(response: &str) -> String {
    if let Some(captures) = FENCED_BLOCK.captures(response) {
        if let Some(body) = captures.get(1) {
            return body.as_str().trim().to_string();
        }
    }
    STRAY_FENCE.replace_all(response, "").trim().to_string()
}

/// Give `proposal` the same trailing newline state as `original`, so a
/// trimmed answer does not show up as a deleted last line.
pub fn match_trailing_newline(proposal: &str, original: &str) -> String {
    let body = proposal.trim_end_matches('\n');
    if original.ends_with('\n') {
        format!("{}\n", body)
    } else {
        body.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_first_block() {
        let response = "Here is the fix:\n\n```rust\nfn main() {\n    run();\n}\n```\n\nAnd a test:\n```rust\n#[test]\nfn t() {}\n```";

        assert_eq!(extract_code(response), "fn main() {\n    run();\n}");
    }

    #[test]
    fn test_plain_response_is_trimmed() {
        assert_eq!(extract_code("\n  let x = 1;\n\n"), "let x = 1;");
    }

    #[test]
    fn test_unterminated_fence() {
        assert_eq!(extract_code("```js\nconsole.log(1);"), "console.log(1);");
    }

    #[test]
    fn test_block_without_language() {
        assert_eq!(extract_code("```\na\nb\n```"), "a\nb");
    }

    #[test]
    fn test_match_trailing_newline() {
        assert_eq!(match_trailing_newline("a\nb", "x\n"), "a\nb\n");
        assert_eq!(match_trailing_newline("a\nb\n\n", "x"), "a\nb");
    }
}
