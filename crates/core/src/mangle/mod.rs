//! Itanium C++ ABI mangled-name parsing and reconstruction.
//!
//! The parser recognises the subset of the grammar needed for symbol
//! renaming: the `_Z` prefix, `N…E` nested sequences of length-prefixed
//! components, constructor/destructor tokens, and the special `_ZTV`/`_ZTI`/
//! `_ZTS` prefixes. Everything after the name — the parameter-type encoding —
//! is carried byte-for-byte so a demangler of the host ABI can still parse
//! the obfuscated output.

pub mod demangle;

use crate::hasher::Hasher;
use crate::result::{Error, Result};
use std::collections::HashMap;
use tracing::warn;

const VTABLE_PREFIX: &str = "_ZTV";
const TYPEINFO_PREFIX: &str = "_ZTI";
const TYPEINFO_NAME_PREFIX: &str = "_ZTS";

/// Hex characters kept for an obfuscated namespace component.
const NAMESPACE_HASH_LEN: usize = 8;
/// Hex characters kept for an obfuscated class or method component.
const COMPONENT_HASH_LEN: usize = 10;

/// Returns true if `name` is an Itanium-mangled symbol.
pub fn is_mangled(name: &str) -> bool {
    name.len() > 2 && name.starts_with("_Z")
}

/// Returns true for vtable, typeinfo, and typeinfo-name symbols.
pub fn is_special(name: &str) -> bool {
    name.starts_with(VTABLE_PREFIX)
        || name.starts_with(TYPEINFO_PREFIX)
        || name.starts_with(TYPEINFO_NAME_PREFIX)
}

/// A mangled symbol decomposed into renameable components.
///
/// Nested names keep their full depth: scopes beyond the leading namespace
/// land in `nested_tail`, so `a::b::c::Klass::m` survives reconstruction
/// without collapsing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MangledName {
    pub is_mangled: bool,
    pub has_namespace: bool,
    pub has_class: bool,
    pub is_vtable: bool,
    pub is_typeinfo: bool,
    pub is_typeinfo_name: bool,
    pub is_constructor: bool,
    pub is_destructor: bool,
    /// Outermost scope of a nested name.
    pub namespace_name: Option<String>,
    /// Scopes between the outermost namespace and the class.
    pub nested_tail: Vec<String>,
    pub class_name: Option<String>,
    /// Unqualified function name; empty for constructors and destructors.
    pub method_name: String,
    /// `C0`–`C2` / `D0`–`D2` token of a constructor or destructor.
    pub special_member: Option<String>,
    /// Trailing parameter-type bytes, preserved verbatim.
    pub parameter_encoding: String,
}

/// Parses a mangled name into its components.
///
/// Non-mangled input yields a record with `is_mangled == false`. Special
/// symbols (`_ZTV`/`_ZTI`/`_ZTS`) only have their flag set; their payload is
/// handled by the codec. Grammar violations are reported as
/// [`Error::MalformedMangling`].
pub fn parse(name: &str) -> Result<MangledName> {
    let mut parsed = MangledName::default();
    if !is_mangled(name) {
        return Ok(parsed);
    }
    parsed.is_mangled = true;

    if name.starts_with(VTABLE_PREFIX) {
        parsed.is_vtable = true;
        return Ok(parsed);
    }
    if name.starts_with(TYPEINFO_PREFIX) {
        parsed.is_typeinfo = true;
        return Ok(parsed);
    }
    if name.starts_with(TYPEINFO_NAME_PREFIX) {
        parsed.is_typeinfo_name = true;
        return Ok(parsed);
    }

    let malformed = |reason: &str| Error::MalformedMangling {
        name: name.to_string(),
        reason: reason.to_string(),
    };

    let bytes = name.as_bytes();
    let mut pos = 2;

    if bytes[pos] == b'N' {
        pos += 1;
        let mut components = Vec::new();

        loop {
            if pos >= bytes.len() {
                return Err(malformed("unterminated nested name"));
            }
            if bytes[pos] == b'E' {
                pos += 1;
                break;
            }
            // Constructor/destructor tokens terminate the scope chain.
            if matches!(bytes[pos], b'C' | b'D')
                && pos + 1 < bytes.len()
                && bytes[pos + 1].is_ascii_digit()
            {
                if bytes[pos] == b'C' {
                    parsed.is_constructor = true;
                } else {
                    parsed.is_destructor = true;
                }
                parsed.special_member = Some(name[pos..pos + 2].to_string());
                pos += 2;
                continue;
            }
            if !bytes[pos].is_ascii_digit() {
                return Err(malformed("expected length-prefixed component"));
            }
            let (component, end) =
                read_length_prefixed(&name[pos..]).ok_or_else(|| malformed("bad length prefix"))?;
            components.push(component.to_string());
            pos += end;
        }

        assign_components(&mut parsed, components).map_err(|reason| malformed(reason))?;
    } else {
        if !bytes[pos].is_ascii_digit() {
            return Err(malformed("expected length-prefixed identifier"));
        }
        let (identifier, end) =
            read_length_prefixed(&name[pos..]).ok_or_else(|| malformed("bad length prefix"))?;
        parsed.method_name = identifier.to_string();
        pos += end;
    }

    parsed.parameter_encoding = name[pos..].to_string();
    Ok(parsed)
}

/// Distributes the parsed scope chain over namespace/class/method.
///
/// The last component is the unqualified name, the one before it the class,
/// and everything earlier a namespace scope. Constructors and destructors
/// have no name component of their own; their whole chain is scopes.
fn assign_components(
    parsed: &mut MangledName,
    mut components: Vec<String>,
) -> std::result::Result<(), &'static str> {
    if components.is_empty() {
        return Err("empty nested name");
    }

    if parsed.special_member.is_some() {
        parsed.class_name = components.pop();
        parsed.has_class = true;
        if !components.is_empty() {
            parsed.namespace_name = Some(components.remove(0));
            parsed.has_namespace = true;
            parsed.nested_tail = components;
        }
        return Ok(());
    }

    if components.len() == 1 {
        parsed.namespace_name = components.pop();
        parsed.has_namespace = true;
        return Ok(());
    }

    if let Some(method) = components.pop() {
        parsed.method_name = method;
    }
    parsed.class_name = components.pop();
    parsed.has_class = true;
    if !components.is_empty() {
        parsed.namespace_name = Some(components.remove(0));
        parsed.has_namespace = true;
        parsed.nested_tail = components;
    }
    Ok(())
}

/// Mangled-name codec: renames components while keeping the ABI shape.
///
/// The per-kind caches guarantee identity across a translation unit: a class
/// referenced by two symbols obfuscates to the same token in both.
#[derive(Debug, Default)]
pub struct MangleCodec {
    namespace_cache: HashMap<String, String>,
    class_cache: HashMap<String, String>,
    method_cache: HashMap<String, String>,
    memo: HashMap<String, String>,
}

impl MangleCodec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Obfuscates a mangled symbol, preserving its ABI shape.
    ///
    /// Non-mangled input is returned unchanged. Malformed manglings fall back
    /// to hashing the whole name so the output remains link-shaped.
    pub fn obfuscate(&mut self, hasher: &Hasher, name: &str) -> String {
        if let Some(hit) = self.memo.get(name) {
            return hit.clone();
        }
        if !is_mangled(name) {
            return name.to_string();
        }

        let obfuscated = if name.starts_with(VTABLE_PREFIX) {
            self.obfuscate_vtable(hasher, name)
        } else if name.starts_with(TYPEINFO_PREFIX) || name.starts_with(TYPEINFO_NAME_PREFIX) {
            obfuscate_typeinfo(hasher, name)
        } else {
            match parse(name) {
                Ok(parsed) => self.reconstruct(hasher, &parsed),
                Err(error) => {
                    warn!("{error}; hashing whole symbol");
                    format!(
                        "_Z{}",
                        length_prefixed(&identifier_guard(hasher.hash(name, "")))
                    )
                }
            }
        };

        self.memo.insert(name.to_string(), obfuscated.clone());
        obfuscated
    }

    /// Rebuilds `_Z…` from obfuscated components.
    fn reconstruct(&mut self, hasher: &Hasher, parsed: &MangledName) -> String {
        let mut out = String::from("_Z");

        if parsed.has_namespace || parsed.has_class {
            out.push('N');
            if let Some(ns) = &parsed.namespace_name {
                out.push_str(&length_prefixed(&self.obfuscate_namespace(hasher, ns)));
            }
            for scope in &parsed.nested_tail {
                out.push_str(&length_prefixed(&self.obfuscate_namespace(hasher, scope)));
            }
            if let Some(class) = &parsed.class_name {
                out.push_str(&length_prefixed(&self.obfuscate_class(hasher, class)));
            }
            if let Some(token) = &parsed.special_member {
                out.push_str(token);
            } else if !parsed.method_name.is_empty() {
                out.push_str(&length_prefixed(&self.obfuscate_method(hasher, &parsed.method_name)));
            }
            out.push('E');
        } else {
            let hash = identifier_guard(hasher.hash(&parsed.method_name, ""));
            out.push_str(&length_prefixed(&hash));
        }

        if parsed.parameter_encoding.is_empty() {
            // Void arity for function symbols with no parameter bytes.
            out.push('v');
        } else {
            out.push_str(&parsed.parameter_encoding);
        }
        out
    }

    /// `_ZTV<class>` keeps its prefix; the class goes through the shared
    /// class cache so vtables and methods agree on the renamed token.
    fn obfuscate_vtable(&mut self, hasher: &Hasher, symbol: &str) -> String {
        let rest = &symbol[VTABLE_PREFIX.len()..];
        match read_length_prefixed(rest) {
            Some((class_name, _)) => {
                let obfuscated = self.obfuscate_class(hasher, class_name);
                format!("{VTABLE_PREFIX}{}", length_prefixed(&obfuscated))
            }
            None => {
                warn!("unparseable vtable symbol '{symbol}'; hashing whole symbol");
                format!("{VTABLE_PREFIX}{}", hasher.hash(symbol, "vtable"))
            }
        }
    }

    fn obfuscate_namespace(&mut self, hasher: &Hasher, namespace: &str) -> String {
        if let Some(hit) = self.namespace_cache.get(namespace) {
            return hit.clone();
        }
        let token = format!("N{}", short_hash(hasher, namespace, "ns", NAMESPACE_HASH_LEN));
        self.namespace_cache
            .insert(namespace.to_string(), token.clone());
        token
    }

    fn obfuscate_class(&mut self, hasher: &Hasher, class_name: &str) -> String {
        if let Some(hit) = self.class_cache.get(class_name) {
            return hit.clone();
        }
        let token = format!("C{}", short_hash(hasher, class_name, "class", COMPONENT_HASH_LEN));
        self.class_cache
            .insert(class_name.to_string(), token.clone());
        token
    }

    fn obfuscate_method(&mut self, hasher: &Hasher, method_name: &str) -> String {
        if let Some(hit) = self.method_cache.get(method_name) {
            return hit.clone();
        }
        let token = format!("M{}", short_hash(hasher, method_name, "method", COMPONENT_HASH_LEN));
        self.method_cache
            .insert(method_name.to_string(), token.clone());
        token
    }
}

/// `_ZTI`/`_ZTS` payloads are not structurally parsed; the whole symbol is
/// hashed under a dedicated context.
fn obfuscate_typeinfo(hasher: &Hasher, symbol: &str) -> String {
    let prefix = &symbol[..TYPEINFO_PREFIX.len()];
    format!("{prefix}{}", short_hash(hasher, symbol, "typeinfo", 10))
}

fn short_hash(hasher: &Hasher, name: &str, context: &str, max_len: usize) -> String {
    let hash = hasher.hash(name, context);
    let keep = hash.len().min(max_len);
    hash[..keep].to_string()
}

fn length_prefixed(component: &str) -> String {
    format!("{}{}", component.len(), component)
}

/// Reads `<decimal-length><bytes>` from the front of `input`.
///
/// Returns the component and the total bytes consumed, or `None` when the
/// prefix is missing, zero, overflowing, or runs past the end of the input.
fn read_length_prefixed(input: &str) -> Option<(&str, usize)> {
    let bytes = input.as_bytes();
    let mut length: usize = 0;
    let mut pos = 0;

    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        length = length
            .checked_mul(10)?
            .checked_add((bytes[pos] - b'0') as usize)?;
        pos += 1;
    }
    if pos == 0 || length == 0 {
        return None;
    }
    let end = pos.checked_add(length)?;
    if end > input.len() {
        return None;
    }
    Some((&input[pos..end], end))
}

/// A length-prefixed token must not begin with a digit, or the length prefix
/// of the surrounding grammar becomes ambiguous.
fn identifier_guard(hash: String) -> String {
    if hash.starts_with(|c: char| c.is_ascii_digit()) {
        format!("s_{hash}")
    } else {
        hash
    }
}
