//! Code extraction from free-form completion text.
//!
//! Rule: the first fenced block wins. The opening fence may carry an info
//! string (language tag plus attributes) up to the end of its line, or the
//! whole block may sit on one line. The interior is returned trimmed. Without
//! a complete fence the whole text is returned trimmed.

use once_cell::sync::Lazy;
use regex::Regex;

// Group 1: block body after an info-string line. Group 2: one-line block.
static RE_FENCED_BLOCK: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?s)```(?:[^\n`]*\r?\n(.*?)|([^\n`]*))```").expect("fence pattern is valid")
});

pub fn extract_code(text: &str) -> String {
    let body = RE_FENCED_BLOCK
        .captures(text)
        .and_then(|caps| caps.get(1).or_else(|| caps.get(2)))
        .map(|m| m.as_str())
        .unwrap_or(text);
    body.trim().to_string()
}
