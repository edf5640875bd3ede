//! The `map` subcommand: inspect a saved symbol mapping, in either
//! direction. Reverse lookup is the supported de-obfuscation path for crash
//! reports coming back from the field.

use crate::commands::CliError;
use clap::Args;
use std::error::Error;
use std::path::PathBuf;
use symveil_rename::SymbolMap;

/// Arguments for the `map` subcommand.
#[derive(Args)]
pub struct MapArgs {
    /// Mapping file produced by `obfuscate`.
    pub map_file: PathBuf,
    /// Look up a single symbol instead of listing everything.
    #[arg(long)]
    lookup: Option<String>,
    /// Treat the lookup argument as an obfuscated name.
    #[arg(long)]
    reverse: bool,
}

impl super::Command for MapArgs {
    fn execute(self) -> Result<(), Box<dyn Error>> {
        let map = SymbolMap::load(&self.map_file)?;

        if let Some(name) = self.lookup {
            let entry = if self.reverse {
                map.lookup_obfuscated(&name)
            } else {
                map.lookup(&name)
            }
            .ok_or_else(|| CliError::UnknownSymbol(name.clone()))?;
            println!("{} -> {}", entry.original, entry.obfuscated);
            return Ok(());
        }

        println!(
            "version {}  algorithm {}  {} symbols",
            map.version,
            u8::from(map.algorithm),
            map.len()
        );
        for entry in &map.symbols {
            println!("{} -> {}", entry.original, entry.obfuscated);
        }
        Ok(())
    }
}
