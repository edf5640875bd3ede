//! Mapping store: the persistent original↔obfuscated table.
//!
//! The document is what makes post-mortem debugging, crash-report
//! symbolication, and controlled de-obfuscation possible for the party
//! holding it. Serialization is lossless and the on-disk order is stable so
//! identical runs produce identical files.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use symveil_core::hasher::HashAlgorithm;
use symveil_core::salt::Salt;
use symveil_core::symbol::{Linkage, SymbolInfo, SymbolKind};

/// Mapping document format version.
pub const MAP_VERSION: &str = "1.0";

/// One renamed (or recorded) symbol.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapEntry {
    /// Name as declared in the translation unit.
    pub original: String,
    /// Name emitted in the obfuscated artifact.
    pub obfuscated: String,
    pub kind: SymbolKind,
    pub linkage: Linkage,
    /// Load address, when known.
    #[serde(default)]
    pub address: u64,
    /// Object size in bytes, when known.
    #[serde(default)]
    pub size: u64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line: Option<u32>,
}

impl MapEntry {
    /// Builds an entry from a scanned descriptor and its new name.
    pub fn from_symbol(symbol: &SymbolInfo, obfuscated: impl Into<String>) -> Self {
        Self {
            original: symbol.name.clone(),
            obfuscated: obfuscated.into(),
            kind: symbol.kind,
            linkage: symbol.linkage,
            address: symbol.address,
            size: symbol.size,
            source_file: symbol.source_file.clone(),
            line: symbol.line,
        }
    }
}

/// The complete mapping for one driver run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SymbolMap {
    /// Document format version.
    pub version: String,
    /// Salt the run was keyed with.
    pub salt: Salt,
    /// Hash algorithm, as an integer code.
    #[serde(rename = "hash_algorithm")]
    pub algorithm: HashAlgorithm,
    /// Renamed symbols, sorted by original name on save.
    pub symbols: Vec<MapEntry>,
}

impl SymbolMap {
    pub fn new(salt: Salt, algorithm: HashAlgorithm) -> Self {
        Self {
            version: MAP_VERSION.to_string(),
            salt,
            algorithm,
            symbols: Vec::new(),
        }
    }

    pub fn push(&mut self, entry: MapEntry) {
        self.symbols.push(entry);
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }

    /// Finds the entry for an original name.
    pub fn lookup(&self, original: &str) -> Option<&MapEntry> {
        self.symbols.iter().find(|e| e.original == original)
    }

    /// Finds the entry for an obfuscated name (de-obfuscation direction).
    pub fn lookup_obfuscated(&self, obfuscated: &str) -> Option<&MapEntry> {
        self.symbols.iter().find(|e| e.obfuscated == obfuscated)
    }

    /// Exports the mapping as pretty-printed JSON with entries sorted by
    /// original name.
    pub fn to_json_pretty(&self) -> Result<String> {
        let mut sorted = self.clone();
        sorted.symbols.sort_by(|a, b| a.original.cmp(&b.original));
        Ok(serde_json::to_string_pretty(&sorted)?)
    }

    /// Writes the mapping document to `path`.
    pub fn save(&self, path: &Path) -> Result<()> {
        let json = self.to_json_pretty()?;
        fs::write(path, json).map_err(|source| Error::MapWrite {
            path: path.display().to_string(),
            source,
        })
    }

    /// Reads a mapping document back from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let json = fs::read_to_string(path).map_err(|source| Error::MapRead {
            path: path.display().to_string(),
            source,
        })?;
        Ok(serde_json::from_str(&json)?)
    }
}
