//! Cleanup of raw model output before it is displayed.

use once_cell::sync::Lazy;
use regex::Regex;

/// A hyphen and any whitespace after it, anywhere in the text.
static HYPHEN_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"-\s*").expect("Valid regex pattern"));

/// A newline, optional whitespace, and another newline.
static BLANK_LINE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\n\s*\n").expect("Valid regex pattern"));

/// One pass of the cleanup rules, in order:
/// trim, drop code fences, drop `**`, drop `*`, drop `-` plus trailing
/// whitespace, collapse blank lines to a single newline.
pub fn sanitize_once(raw: &str) -> String {
    let text = raw.trim();
    let text = text.replace("```", "");
    let text = text.replace("**", "");
    let text = text.replace('*', "");
    let text = HYPHEN_RUN.replace_all(&text, "");
    BLANK_LINE.replace_all(&text, "\n").into_owned()
}

/// Apply [`sanitize_once`] until the text stops changing.
///
/// Removing one marker can expose another (a fence split by an asterisk,
/// or whitespace left at the edges once a fence is gone), so a single pass
/// is not idempotent. Every pass only deletes characters, so this ends.
pub fn sanitize(raw: &str) -> String {
    let mut current = sanitize_once(raw);
    loop {
        let next = sanitize_once(&current);
        if next == current {
            return current;
        }
        current = next;
    }
}
