//! Provider response post-processing.
//!
//! Models asked to role-play tend to wrap their answer in quotation marks or
//! open with a self-introduction despite instructions not to. The cleanup
//! passes here are pattern heuristics, not a grammar: each one is a safe
//! no-op when its pattern does not match.

/// Quote pairs recognized by the wrapping-quote strip.
const QUOTE_PAIRS: [(char, char); 3] = [('"', '"'), ('\u{201C}', '\u{201D}'), ('「', '」')];

/// Characters that terminate a leading self-identification clause.
const CLAUSE_TERMINATORS: [char; 4] = [':', '.', '：', '。'];

/// Self-identification openers stripped from the start of a response.
const SELF_ID_OPENERS: [&str; 2] = ["I am ", "I'm "];

/// Marker appended when content is truncated to the word limit.
const ELLIPSIS: &str = "...";

/// Normalizes and bounds a raw provider response.
///
/// Applies, in order: whitespace trim, one wrapping-quote strip, one
/// self-identification strip, then truncation so the result never exceeds
/// `word_limit` characters. Truncated content ends with `...` and is exactly
/// `word_limit` characters long. May return an empty string when the whole
/// response matched a stripped pattern; the engine emits such turns as
/// ordinary messages.
pub fn sanitize_response(raw: &str, word_limit: u32) -> String {
    let text = raw.trim();
    let text = strip_wrapping_quotes(text);
    let text = strip_self_identification(text);
    // Stripping can expose whitespace that sat inside the removed pattern.
    truncate_to_limit(text.trim(), word_limit)
}

/// Removes a single pair of quotation marks enclosing the entire text.
fn strip_wrapping_quotes(text: &str) -> &str {
    let mut chars = text.chars();
    let (Some(first), Some(last)) = (chars.next(), chars.next_back()) else {
        return text;
    };

    for (open, close) in QUOTE_PAIRS {
        if first == open && last == close {
            return &text[open.len_utf8()..text.len() - close.len_utf8()];
        }
    }
    text
}

/// Removes a leading "I am ...:" / "I'm ...." style declaration.
///
/// Strips from the opener through the first terminating colon or full stop,
/// plus any whitespace that follows it. No terminator, no match, no change.
fn strip_self_identification(text: &str) -> &str {
    let Some(opener) = SELF_ID_OPENERS.iter().find(|o| text.starts_with(**o)) else {
        return text;
    };

    let rest = &text[opener.len()..];
    let Some(offset) = rest.find(&CLAUSE_TERMINATORS[..]) else {
        return text;
    };
    let terminator_len = rest[offset..]
        .chars()
        .next()
        .map(char::len_utf8)
        .unwrap_or(0);

    rest[offset + terminator_len..].trim_start()
}

/// Bounds text to `word_limit` characters, marking truncation with `...`.
fn truncate_to_limit(text: &str, word_limit: u32) -> String {
    let limit = word_limit as usize;
    if text.chars().count() <= limit {
        return text.to_string();
    }

    let mut out: String = text
        .chars()
        .take(limit.saturating_sub(ELLIPSIS.len()))
        .collect();
    out.push_str(ELLIPSIS);
    out
}
