//! Core symbol renaming engine.
//!
//! The pieces here are deliberately free of I/O and global state: a keyed
//! [`hasher::Hasher`] producing deterministic identifiers, the
//! [`mangle`] codec that renames Itanium C++ symbols component-by-component
//! while preserving their ABI shape, the [`preserve::PreservePolicy`] oracle,
//! and the two symbol scanners ([`scan`] for source text, [`ir`] for IR
//! modules). The rename driver that orchestrates them lives in the
//! `symveil-rename` crate.

pub mod hasher;
pub mod ir;
pub mod mangle;
pub mod preserve;
pub mod result;
pub mod salt;
pub mod scan;
pub mod symbol;

pub use result::{Error, Result};

/// Returns true for characters that may appear in a C identifier.
#[inline]
pub fn is_identifier_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Returns true if `name` is a valid C identifier
/// (`[A-Za-z_][A-Za-z0-9_]*`).
pub fn is_valid_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(is_identifier_char)
        }
        _ => false,
    }
}
