//! Preservation oracle: decides which symbols must keep their names.
//!
//! Renaming an entry point, an ABI hook, or a libc import breaks linkage or
//! runtime contracts, so these classes of names are preserved by default.

use crate::result::{Error, Result};
use regex::Regex;
use std::collections::HashSet;

/// Names that must never be renamed regardless of configuration.
pub const DEFAULT_PRESERVED: &[&str] = &[
    "main",
    "_start",
    "__libc_start_main",
    "_init",
    "_fini",
    "__cxa_atexit",
    "__cxa_finalize",
    "__dso_handle",
    "__gxx_personality_v0",
    "_GLOBAL__sub_I_",
];

/// Common libc entry points preserved under `preserve_stdlib`.
const STDLIB_SYMBOLS: &[&str] = &[
    "malloc", "free", "calloc", "realloc", "printf", "scanf", "fprintf", "sprintf", "memcpy",
    "memset", "strlen", "strcmp", "exit", "abort", "signal", "sigaction",
];

/// C and C++ keywords, checked only by the source-text back end.
const LANGUAGE_KEYWORDS: &[&str] = &[
    "and", "auto", "bool", "break", "case", "catch", "char", "class", "const", "continue",
    "default", "delete", "do", "double", "else", "enum", "extern", "false", "float", "for",
    "friend", "goto", "if", "int", "long", "namespace", "new", "not", "nullptr", "operator",
    "or", "private", "protected", "public", "register", "return", "short", "signed", "sizeof",
    "static", "struct", "switch", "template", "this", "throw", "true", "try", "typedef",
    "typeof", "typename", "union", "unsigned", "using", "virtual", "void", "volatile", "while",
    "xor", "NULL",
];

/// Returns true for reserved C/C++ keywords.
pub(crate) fn is_language_keyword(name: &str) -> bool {
    LANGUAGE_KEYWORDS.contains(&name)
}

/// Configurable predicate deciding whether a symbol is preserved.
#[derive(Debug, Clone)]
pub struct PreservePolicy {
    symbols: HashSet<String>,
    patterns: Vec<Regex>,
    preserve_main: bool,
    preserve_stdlib: bool,
    /// Source-text back end only: reserved language keywords are preserved.
    keywords: bool,
}

impl Default for PreservePolicy {
    fn default() -> Self {
        Self {
            symbols: DEFAULT_PRESERVED.iter().map(|s| s.to_string()).collect(),
            patterns: Vec::new(),
            preserve_main: true,
            preserve_stdlib: true,
            keywords: false,
        }
    }
}

impl PreservePolicy {
    /// Policy for the source-text back end, which must also skip keywords.
    pub fn for_source() -> Self {
        Self {
            keywords: true,
            ..Self::default()
        }
    }

    pub fn set_preserve_main(&mut self, preserve: bool) {
        self.preserve_main = preserve;
        if !preserve {
            self.symbols.remove("main");
        }
    }

    pub fn set_preserve_stdlib(&mut self, preserve: bool) {
        self.preserve_stdlib = preserve;
    }

    /// Adds a symbol to the explicit preserve set.
    pub fn add_symbol(&mut self, name: impl Into<String>) {
        self.symbols.insert(name.into());
    }

    /// Compiles and adds a user-supplied preserve pattern.
    pub fn add_pattern(&mut self, pattern: &str) -> Result<()> {
        let regex = Regex::new(pattern)
            .map_err(|e| Error::InvalidConfig(format!("bad preserve pattern '{pattern}': {e}")))?;
        self.patterns.push(regex);
        Ok(())
    }

    /// Returns true when `name` must keep its original spelling.
    pub fn should_preserve(&self, name: &str) -> bool {
        if self.symbols.contains(name) {
            return true;
        }
        if self.preserve_main && name == "main" {
            return true;
        }
        // System and compiler-reserved identifiers.
        if name.starts_with("__") {
            return true;
        }
        // Compiler intrinsics in IR modules.
        if name.starts_with("llvm.") {
            return true;
        }
        if name.starts_with("__cxa") {
            return true;
        }
        if self.preserve_stdlib && STDLIB_SYMBOLS.contains(&name) {
            return true;
        }
        if self.patterns.iter().any(|p| p.is_match(name)) {
            return true;
        }
        if self.keywords && is_language_keyword(name) {
            return true;
        }
        false
    }
}
