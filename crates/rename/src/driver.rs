//! The rename driver: scan → classify → hash → substitute.
//!
//! One driver instance owns all run state (hasher, codec caches, accumulated
//! mapping); nothing is global. The hasher's own used-name set provides
//! uniqueness across every symbol kind in the run. Multiple drivers may run
//! in parallel on distinct units, and sharing a salt is how callers opt into
//! cross-unit stable renaming.

use crate::mapping::{MapEntry, SymbolMap};
use crate::rewriter;
use crate::Result;
use std::path::PathBuf;
use symveil_core::hasher::{HashConfig, Hasher};
use symveil_core::ir::IrModule;
use symveil_core::mangle::{self, MangleCodec};
use symveil_core::preserve::PreservePolicy;
use symveil_core::scan;
use symveil_core::symbol::{SymbolInfo, SymbolKind};
use tracing::{debug, info};

/// Configuration for one rename run.
#[derive(Debug, Clone)]
pub struct RenameConfig {
    /// Hashing configuration, including algorithm, length, and salt.
    pub hash: HashConfig,
    /// Which symbols must keep their names.
    pub policy: PreservePolicy,
    /// Whether global variables are renamed in addition to functions.
    pub rename_globals: bool,
    /// Route mangled-looking identifiers through the codec in source mode.
    pub cpp: bool,
    /// Where to persist the mapping, if anywhere.
    pub map_path: Option<PathBuf>,
}

impl Default for RenameConfig {
    fn default() -> Self {
        Self {
            hash: HashConfig::default(),
            policy: PreservePolicy::default(),
            rename_globals: true,
            cpp: false,
            map_path: None,
        }
    }
}

/// Counts reported after a run.
#[derive(Debug, Clone, Copy, Default)]
pub struct RenameSummary {
    pub renamed: usize,
    pub preserved: usize,
}

/// Orchestrates scanning, preservation, hashing, and substitution for one
/// translation unit.
pub struct RenameDriver {
    config: RenameConfig,
    hasher: Hasher,
    codec: MangleCodec,
    map: SymbolMap,
}

impl RenameDriver {
    pub fn new(config: RenameConfig) -> Result<Self> {
        let hasher = Hasher::new(config.hash.clone())?;
        let map = SymbolMap::new(hasher.salt().clone(), hasher.algorithm());
        Ok(Self {
            config,
            hasher,
            codec: MangleCodec::new(),
            map,
        })
    }

    /// The accumulated mapping for this run.
    pub fn mapping(&self) -> &SymbolMap {
        &self.map
    }

    /// Renames every eligible symbol of an IR module in place.
    ///
    /// The module updates its own use sites on rename, so reference
    /// integrity holds by construction. Functions are processed first, then
    /// globals (when enabled), then aliases, matching the order in which the
    /// mapping is recorded.
    pub fn run_on_module(&mut self, module: &mut IrModule) -> Result<RenameSummary> {
        self.ensure_salt(&module.name, &module.source_file);
        info!("obfuscating module {}", module.name);

        let mut summary = RenameSummary::default();
        // Module order is already functions, then globals, then aliases.
        for symbol in module.symbols() {
            if symbol.kind != SymbolKind::Function
                && symbol.kind != SymbolKind::Alias
                && !self.config.rename_globals
            {
                continue;
            }
            if self.config.policy.should_preserve(&symbol.name) {
                info!("  preserving {}", symbol.name);
                summary.preserved += 1;
                continue;
            }

            let obfuscated = self.obfuscate_symbol(&symbol, true)?;
            info!("  {} -> {}", symbol.name, obfuscated);
            self.map.push(MapEntry::from_symbol(&symbol, &obfuscated));
            module.rename(&symbol.name, &obfuscated);
            summary.renamed += 1;
        }

        info!("obfuscated {} symbols", summary.renamed);
        self.persist_mapping()?;
        Ok(summary)
    }

    /// Obfuscates source text, returning the rewritten buffer.
    pub fn run_on_source(&mut self, source: &str, file_name: &str) -> Result<String> {
        self.ensure_salt(file_name, file_name);
        info!("obfuscating {file_name}");

        let symbols = scan::source::scan(source, file_name);
        debug!("scanner found {} candidate symbols", symbols.len());

        let mut pairs = Vec::new();
        for symbol in symbols {
            if !self.config.rename_globals && symbol.is_variable() {
                continue;
            }
            if self.config.policy.should_preserve(&symbol.name) {
                debug!("  preserving {}", symbol.name);
                continue;
            }

            let obfuscated = self.obfuscate_symbol(&symbol, self.config.cpp)?;
            info!("  {} -> {}", symbol.name, obfuscated);
            self.map.push(MapEntry::from_symbol(&symbol, &obfuscated));
            pairs.push((symbol.name.clone(), obfuscated));
        }

        info!("obfuscated {} symbols", pairs.len());
        let rewritten = rewriter::apply(source, &pairs);
        self.persist_mapping()?;
        Ok(rewritten)
    }

    /// Writes the mapping when a path is configured.
    pub fn persist_mapping(&self) -> Result<()> {
        if let Some(path) = &self.config.map_path {
            self.map.save(path)?;
            info!("saved symbol mapping to {}", path.display());
        }
        Ok(())
    }

    /// Derives the module salt when none was configured.
    fn ensure_salt(&mut self, module_name: &str, source_file: &str) {
        if !self.hasher.salt().is_empty() {
            return;
        }
        let salt = self.hasher.derive_module_salt(module_name, source_file);
        debug!("derived module salt from {module_name}");
        self.hasher.set_salt(salt.clone());
        self.map.salt = salt;
    }

    /// Routes one symbol to the codec or the typed hasher entries.
    ///
    /// `allow_mangled` is always on for IR modules; the source back end only
    /// routes through the codec when configured for C++. The typed entries
    /// share the hasher's used-name set, which keeps flat pseudonyms unique
    /// across every symbol kind in the run.
    fn obfuscate_symbol(&mut self, symbol: &SymbolInfo, allow_mangled: bool) -> Result<String> {
        if allow_mangled && mangle::is_mangled(&symbol.name) {
            return Ok(self.codec.obfuscate(&self.hasher, &symbol.name));
        }
        let hashed = match symbol.kind {
            SymbolKind::Function => self.hasher.hash_function(&symbol.name),
            SymbolKind::Struct | SymbolKind::Enum => self.hasher.hash_class(&symbol.name),
            SymbolKind::Alias => self.hasher.hash_alias(&symbol.name),
            _ => self.hasher.hash_variable(&symbol.name),
        };
        Ok(hashed?)
    }
}
