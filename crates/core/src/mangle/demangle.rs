//! Advisory demangling for diagnostics.
//!
//! Used for human-readable scan output only; the result never feeds back
//! into renaming.

use cpp_demangle::Symbol;

/// Attempts to demangle an Itanium symbol into its C++ source form.
///
/// Returns `None` for names that are not mangled or fail to parse.
pub fn demangle(name: &str) -> Option<String> {
    if !super::is_mangled(name) {
        return None;
    }
    Symbol::new(name.as_bytes()).ok().map(|symbol| symbol.to_string())
}

/// Returns the demangled name, or the original if demangling fails.
pub fn demangle_or_original(name: &str) -> String {
    demangle(name).unwrap_or_else(|| name.to_string())
}
