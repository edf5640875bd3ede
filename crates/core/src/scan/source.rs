//! Lexical symbol recogniser for C/C++ source text.
//!
//! This is deliberately not a parser. It recognises function definitions
//! (`type name ( … ) {`) and global variable declarations (`type name ;` or
//! `type name = …`) well enough to obfuscate straightforward translation
//! units. The contract is asymmetric: a reported name must really be declared
//! in the unit, while missed declarations merely stay un-obfuscated.

use crate::preserve::is_language_keyword;
use crate::symbol::{Linkage, SymbolInfo, SymbolKind};
use std::collections::HashSet;
use tracing::debug;

/// Primitive, pointer-sized, and fixed-width type keywords that can open a
/// variable declaration.
const TYPE_KEYWORDS: &[&str] = &[
    "bool", "char", "double", "float", "int", "int16_t", "int32_t", "int64_t", "int8_t",
    "intptr_t", "long", "short", "signed", "size_t", "ssize_t", "uint16_t", "uint32_t",
    "uint64_t", "uint8_t", "uintptr_t", "unsigned", "void",
];

/// Keywords that may legitimately precede a function's return type.
const DECL_QUALIFIERS: &[&str] = &["const", "extern", "inline", "register", "static", "volatile"];

/// An identifier span inside the masked buffer.
#[derive(Debug, Clone, Copy)]
struct Token {
    start: usize,
    end: usize,
}

impl Token {
    fn text<'a>(&self, buffer: &'a str) -> &'a str {
        &buffer[self.start..self.end]
    }
}

/// Scans masked source text for symbol declarations.
///
/// Results are in order of appearance and deduplicated by name.
pub fn scan(source: &str, file: &str) -> Vec<SymbolInfo> {
    let masked = super::mask_non_code(source);
    let tokens = identifier_tokens(&masked);

    let mut symbols = Vec::new();
    let mut seen = HashSet::new();
    scan_functions(&masked, &tokens, file, &mut symbols, &mut seen);
    scan_globals(&masked, &tokens, file, &mut symbols, &mut seen);
    symbols.sort_by_key(|s| s.line);
    symbols
}

fn identifier_tokens(masked: &str) -> Vec<Token> {
    let bytes = masked.as_bytes();
    let mut tokens = Vec::new();
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i].is_ascii_alphabetic() || bytes[i] == b'_' {
            let start = i;
            while i < bytes.len() && (bytes[i].is_ascii_alphanumeric() || bytes[i] == b'_') {
                i += 1;
            }
            tokens.push(Token { start, end: i });
        } else {
            i += 1;
        }
    }
    tokens
}

/// Function definitions: `⟨type⟩ ⟨name⟩ ( … ) {`.
fn scan_functions(
    masked: &str,
    tokens: &[Token],
    file: &str,
    symbols: &mut Vec<SymbolInfo>,
    seen: &mut HashSet<String>,
) {
    for window in tokens.windows(2) {
        let (return_type, name) = (window[0], window[1]);
        if !gap_is(masked, return_type.end, name.start, b" \t\r\n") {
            continue;
        }

        let type_text = return_type.text(masked);
        if is_language_keyword(type_text)
            && !TYPE_KEYWORDS.contains(&type_text)
            && !DECL_QUALIFIERS.contains(&type_text)
            && !matches!(type_text, "struct" | "enum" | "union" | "class")
        {
            continue;
        }

        let name_text = name.text(masked);
        if is_language_keyword(name_text) {
            debug!("skipping keyword candidate '{name_text}'");
            continue;
        }

        let Some(open) = next_non_ws(masked, name.end) else {
            continue;
        };
        if masked.as_bytes()[open] != b'(' {
            continue;
        }
        let Some(close) = matching_paren(masked, open) else {
            continue;
        };
        let Some(brace) = next_non_ws(masked, close + 1) else {
            continue;
        };
        if masked.as_bytes()[brace] != b'{' {
            continue;
        }

        if !seen.insert(name_text.to_string()) {
            continue;
        }
        let linkage = if preceded_by_static(masked, tokens, window[0]) {
            Linkage::Internal
        } else {
            Linkage::External
        };
        let mut info = SymbolInfo::new(name_text, SymbolKind::Function, linkage);
        info.source_file = Some(file.to_string());
        info.line = Some(line_of(masked, name.start));
        symbols.push(info);
    }
}

/// Global variables: `⟨type⟩ [*…] ⟨name⟩` followed by `;` or `=`.
fn scan_globals(
    masked: &str,
    tokens: &[Token],
    file: &str,
    symbols: &mut Vec<SymbolInfo>,
    seen: &mut HashSet<String>,
) {
    for (index, token) in tokens.iter().enumerate() {
        if !TYPE_KEYWORDS.contains(&token.text(masked)) {
            continue;
        }

        // Walk over a multi-keyword type like `unsigned long`.
        let mut name_index = index + 1;
        let mut previous_end = token.end;
        while name_index < tokens.len()
            && gap_is(masked, previous_end, tokens[name_index].start, b" \t\r\n*")
            && TYPE_KEYWORDS.contains(&tokens[name_index].text(masked))
        {
            previous_end = tokens[name_index].end;
            name_index += 1;
        }
        if name_index >= tokens.len() {
            continue;
        }

        let name = tokens[name_index];
        if !gap_is(masked, previous_end, name.start, b" \t\r\n*") {
            continue;
        }
        let name_text = name.text(masked);
        if is_language_keyword(name_text) {
            continue;
        }

        let Some(after) = next_non_ws(masked, name.end) else {
            continue;
        };
        if !matches!(masked.as_bytes()[after], b';' | b'=') {
            continue;
        }

        if !seen.insert(name_text.to_string()) {
            continue;
        }
        let is_static = preceded_by_static(masked, tokens, *token);
        let (kind, linkage) = if is_static {
            (SymbolKind::StaticVar, Linkage::Internal)
        } else {
            (SymbolKind::GlobalVar, Linkage::External)
        };
        let mut info = SymbolInfo::new(name_text, kind, linkage);
        info.source_file = Some(file.to_string());
        info.line = Some(line_of(masked, name.start));
        symbols.push(info);
    }
}

/// True when every byte in `masked[from..to]` is one of `allowed`.
fn gap_is(masked: &str, from: usize, to: usize, allowed: &[u8]) -> bool {
    from <= to && masked.as_bytes()[from..to].iter().all(|b| allowed.contains(b))
}

fn next_non_ws(masked: &str, from: usize) -> Option<usize> {
    masked.as_bytes()[from..]
        .iter()
        .position(|b| !b" \t\r\n".contains(b))
        .map(|offset| from + offset)
}

fn matching_paren(masked: &str, open: usize) -> Option<usize> {
    let bytes = masked.as_bytes();
    let mut depth = 0usize;
    for (offset, &byte) in bytes[open..].iter().enumerate() {
        match byte {
            b'(' => depth += 1,
            b')' => {
                depth -= 1;
                if depth == 0 {
                    return Some(open + offset);
                }
            }
            _ => {}
        }
    }
    None
}

/// Looks back over adjacent qualifier keywords for `static`.
fn preceded_by_static(masked: &str, tokens: &[Token], first: Token) -> bool {
    let mut end = first.start;
    for token in tokens.iter().rev() {
        if token.end > end {
            continue;
        }
        if !gap_is(masked, token.end, end, b" \t\r\n") {
            return false;
        }
        if !DECL_QUALIFIERS.contains(&token.text(masked)) {
            return false;
        }
        if token.text(masked) == "static" {
            return true;
        }
        end = token.start;
    }
    false
}

fn line_of(masked: &str, position: usize) -> u32 {
    masked.as_bytes()[..position]
        .iter()
        .filter(|&&b| b == b'\n')
        .count() as u32
        + 1
}
