//! String helpers for Markdown output: escaping, fence sizing and
//! whitespace normalization.

use std::sync::LazyLock;

use regex::Regex;

static BLANK_RUN: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\n{3,}").unwrap());

/// Escape backticks for use inside a single-backtick code span.
///
/// ```
/// use leetdown::markdown::escape_inline_code;
///
/// assert_eq!(escape_inline_code("a`b"), "a\\`b");
/// ```
pub fn escape_inline_code(text: &str) -> String {
    text.replace('`', "\\`")
}

/// Prepare cell content for a pipe table: newlines flattened, pipes escaped.
pub fn escape_table_cell(text: &str) -> String {
    let flat = collapse_whitespace(text);
    flat.trim().replace('|', "\\|")
}

/// Collapse every run of three or more newlines to exactly two.
pub fn collapse_blank_lines(text: &str) -> String {
    BLANK_RUN.replace_all(text, "\n\n").into_owned()
}

/// Collapse every whitespace run (including newlines) to a single space.
pub fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_space = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_space {
                out.push(' ');
            }
            in_space = true;
        } else {
            out.push(c);
            in_space = false;
        }
    }
    out
}

/// Calculate the minimum fence length needed for a code block.
///
/// Returns the smallest number of fence characters (at least 3) that
/// doesn't appear as a run in the content.
///
/// ```
/// use leetdown::markdown::calculate_fence_length;
///
/// assert_eq!(calculate_fence_length("let x = 1;", '`'), 3);
/// assert_eq!(calculate_fence_length("```rust\ncode\n```", '`'), 4);
/// ```
pub fn calculate_fence_length(content: &str, fence_char: char) -> usize {
    let mut max_run = 0;
    let mut current_run = 0;

    for c in content.chars() {
        if c == fence_char {
            current_run += 1;
            max_run = max_run.max(current_run);
        } else {
            current_run = 0;
        }
    }

    max_run.max(2) + 1
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_inline_code() {
        assert_eq!(escape_inline_code("plain"), "plain");
        assert_eq!(escape_inline_code("``"), "\\`\\`");
    }

    #[test]
    fn test_escape_table_cell() {
        assert_eq!(escape_table_cell(" a | b "), "a \\| b");
        assert_eq!(escape_table_cell("line one\n\nline two"), "line one line two");
    }

    #[test]
    fn test_collapse_blank_lines() {
        assert_eq!(collapse_blank_lines("a\n\n\n\nb"), "a\n\nb");
        assert_eq!(collapse_blank_lines("a\n\nb\nc"), "a\n\nb\nc");
    }

    #[test]
    fn test_collapse_whitespace() {
        assert_eq!(collapse_whitespace("  a \n\t b  "), " a b ");
        assert_eq!(collapse_whitespace(""), "");
    }

    #[test]
    fn test_fence_length_with_backticks() {
        assert_eq!(calculate_fence_length("``", '`'), 3);
        assert_eq!(calculate_fence_length("```", '`'), 4);
        assert_eq!(calculate_fence_length("`` and ````", '`'), 5);
    }
}
