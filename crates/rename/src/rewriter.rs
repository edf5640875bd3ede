//! Whole-identifier substitution inside source text.
//!
//! Used by the source-text back end only; the IR back end renames symbols in
//! place and never needs textual rewriting. Matching happens on a masked
//! shadow of the buffer so occurrences inside comments and string literals
//! are never touched, and both buffers are edited in lockstep so offsets stay
//! aligned across replacements.

use symveil_core::is_identifier_char;
use symveil_core::scan::mask_non_code;

/// Applies `original → obfuscated` pairs to `source` as whole identifiers.
///
/// Pairs are processed in descending order of original length so a name that
/// is a prefix of another (`foo` vs `foo_bar`) cannot clip the longer one.
/// After each replacement the cursor advances past the inserted text, so
/// substituted bytes are never re-scanned.
pub fn apply(source: &str, mapping: &[(String, String)]) -> String {
    let mut text = source.to_string();
    let mut shadow = mask_non_code(source);

    let mut pairs: Vec<&(String, String)> = mapping.iter().collect();
    pairs.sort_by(|a, b| b.0.len().cmp(&a.0.len()).then_with(|| a.0.cmp(&b.0)));

    for (original, obfuscated) in pairs {
        replace_whole_word(&mut text, &mut shadow, original, obfuscated);
    }
    text
}

fn replace_whole_word(text: &mut String, shadow: &mut String, original: &str, obfuscated: &str) {
    let mut cursor = 0;
    while let Some(found) = shadow[cursor..].find(original) {
        let at = cursor + found;
        if is_whole_word(shadow, at, original.len()) {
            text.replace_range(at..at + original.len(), obfuscated);
            shadow.replace_range(at..at + original.len(), obfuscated);
            cursor = at + obfuscated.len();
        } else {
            cursor = at + original.len();
        }
    }
}

/// A match qualifies only when not flanked by identifier characters.
fn is_whole_word(text: &str, at: usize, len: usize) -> bool {
    let bytes = text.as_bytes();
    if at > 0 && is_identifier_char(bytes[at - 1] as char) {
        return false;
    }
    let end = at + len;
    if end < bytes.len() && is_identifier_char(bytes[end] as char) {
        return false;
    }
    true
}
