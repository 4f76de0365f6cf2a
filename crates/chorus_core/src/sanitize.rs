//! Output sanitization.
//!
//! Text-generation backends echo the prompt at the start of every candidate.
//! The echo is removed by length, then newline runs are folded into single
//! spaces.

use regex::Regex;
use std::sync::LazyLock;

static NEWLINE_RUNS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n+").expect("newline pattern is a valid regex"));

/// Drop the first `prompt.chars().count()` characters of `generated`.
///
/// The prefix is removed by length only; its content is not compared with the
/// prompt. Output shorter than the prompt yields an empty string.
///
/// # Examples
///
/// ```
/// use chorus_core::strip_prompt_echo;
///
/// assert_eq!(strip_prompt_echo("Hello world and more", "Hello world"), " and more");
/// assert_eq!(strip_prompt_echo("Hi", "Hello world"), "");
/// ```
pub fn strip_prompt_echo<'a>(generated: &'a str, prompt: &str) -> &'a str {
    let echo_len = prompt.chars().count();
    match generated.char_indices().nth(echo_len) {
        Some((offset, _)) => &generated[offset..],
        None => "",
    }
}

/// Replace each run of `\n` with one space and trim surrounding whitespace.
///
/// Applying it to its own output changes nothing.
pub fn collapse_newlines(text: &str) -> String {
    NEWLINE_RUNS.replace_all(text, " ").trim().to_string()
}

/// Strip the prompt echo from one candidate and normalize its whitespace.
///
/// # Examples
///
/// ```
/// use chorus_core::sanitize;
///
/// let raw = "Hello world this is\n\na test.";
/// assert_eq!(sanitize(raw, "Hello world"), "this is a test.");
/// ```
pub fn sanitize(generated: &str, prompt: &str) -> String {
    collapse_newlines(strip_prompt_echo(generated, prompt))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_counts_characters_not_bytes() {
        assert_eq!(strip_prompt_echo("héllo wörld!", "héllo"), " wörld!");
    }

    #[test]
    fn test_strip_exact_length_leaves_nothing() {
        assert_eq!(strip_prompt_echo("prompt", "prompt"), "");
    }

    #[test]
    fn test_collapse_mixed_runs() {
        assert_eq!(collapse_newlines("\n\na\nb\n\n\nc\n"), "a b c");
    }

    #[test]
    fn test_collapse_keeps_carriage_returns_and_tabs_inside() {
        assert_eq!(collapse_newlines("a\tb\r\nc"), "a\tb\r c");
    }
}
