//! The `scan` subcommand: list the symbols the recogniser finds, without
//! touching the file. Useful for checking what a later `obfuscate` run will
//! rename.

use crate::commands::CliError;
use clap::Args;
use std::error::Error;
use std::fs;
use std::path::PathBuf;
use symveil_core::mangle::demangle::demangle;
use symveil_core::preserve::PreservePolicy;
use symveil_core::scan;
use symveil_core::symbol::{Linkage, SymbolKind};

/// Arguments for the `scan` subcommand.
#[derive(Args)]
pub struct ScanArgs {
    /// Input source file.
    pub input: PathBuf,
    /// Show the demangled form of mangled names.
    #[arg(long)]
    demangle: bool,
}

impl super::Command for ScanArgs {
    fn execute(self) -> Result<(), Box<dyn Error>> {
        let source = fs::read_to_string(&self.input).map_err(CliError::File)?;
        let file_name = self.input.display().to_string();
        let policy = PreservePolicy::for_source();

        let symbols = scan::source::scan(&source, &file_name);
        for symbol in &symbols {
            let line = symbol.line.unwrap_or(0);
            let status = if policy.should_preserve(&symbol.name) {
                "preserve"
            } else {
                "rename"
            };
            print!(
                "{:>5}  {:<9} {:<9} {:<8} {}",
                line,
                kind_label(symbol.kind),
                linkage_label(symbol.linkage),
                status,
                symbol.name
            );
            if self.demangle {
                if let Some(readable) = demangle(&symbol.name) {
                    print!("  ({readable})");
                }
            }
            println!();
        }
        println!("{} symbols", symbols.len());
        Ok(())
    }
}

fn kind_label(kind: SymbolKind) -> &'static str {
    match kind {
        SymbolKind::Function => "function",
        SymbolKind::GlobalVar => "global",
        SymbolKind::StaticVar => "static",
        SymbolKind::LocalVar => "local",
        SymbolKind::Typedef => "typedef",
        SymbolKind::Struct => "struct",
        SymbolKind::Enum => "enum",
        SymbolKind::Alias => "alias",
        SymbolKind::Unknown => "unknown",
    }
}

fn linkage_label(linkage: Linkage) -> &'static str {
    match linkage {
        Linkage::External => "external",
        Linkage::Internal => "internal",
        Linkage::Weak => "weak",
        Linkage::Common => "common",
    }
}
