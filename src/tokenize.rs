//! # Tokenizer
//! Turns a raw message body into word tokens, and separately pulls out
//! `:emoji:` tokens.
//!
//! Two entry points:
//! - `tokenize(text, strip_symbols, lowercase)`: whitespace split, optional
//!   edge-punctuation stripping and case folding. Used by the per-channel
//!   word analysis.
//! - `tokenize_with_emoji(text, lowercase)`: emoji extraction first, then a
//!   plain whitespace split. Used by the per-message analysis.

use once_cell::sync::Lazy;
use regex::Regex;

/// Characters stripped from both token ends when `strip_symbols` is on.
pub const SYMBOLS: [char; 11] = ['.', ',', '"', '\'', '(', ')', '!', '?', '$', ';', ':'];

static EMOJI_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r":[-_A-Za-z0-9]+:").expect("emoji regex"));
static EMOJI_EXACT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^:[-_A-Za-z0-9]+:$").expect("exact emoji regex"));

/// Split `text` on whitespace runs. Tokens left empty after stripping are dropped.
pub fn tokenize(text: &str, strip_symbols: bool, lowercase: bool) -> Vec<String> {
    text.split_whitespace()
        .map(|raw| if strip_symbols { strip(raw) } else { raw })
        .filter(|t| !t.is_empty())
        .map(|t| fold(t, lowercase))
        .collect()
}

/// Extract emoji tokens (colons kept, in order of appearance), replace each with
/// a space, then whitespace-split what remains. No symbol stripping.
pub fn tokenize_with_emoji(text: &str, lowercase: bool) -> (Vec<String>, Vec<String>) {
    let emojis: Vec<String> = EMOJI_RE
        .find_iter(text)
        .map(|m| m.as_str().to_string())
        .collect();

    let words = if emojis.is_empty() {
        tokenize(text, false, lowercase)
    } else {
        let rest = EMOJI_RE.replace_all(text, " ");
        tokenize(&rest, false, lowercase)
    };

    (words, emojis)
}

/// True when the whole token is one `:emoji:`.
pub fn is_emoji(token: &str) -> bool {
    EMOJI_EXACT_RE.is_match(token)
}

/// Keep only the tokens that are exactly an emoji.
pub fn emojis_in<S: AsRef<str>>(tokens: &[S]) -> Vec<String> {
    tokens
        .iter()
        .map(AsRef::as_ref)
        .filter(|t| is_emoji(t))
        .map(str::to_string)
        .collect()
}

#[inline]
fn strip(token: &str) -> &str {
    token.trim_matches(|c: char| SYMBOLS.contains(&c))
}

#[inline]
fn fold(token: &str, lowercase: bool) -> String {
    if lowercase {
        token.to_lowercase()
    } else {
        token.to_string()
    }
}
