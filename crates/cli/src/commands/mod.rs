use clap::Subcommand;
use std::error::Error;

pub mod map;
pub mod obfuscate;
pub mod scan;

use thiserror::Error;

/// Errors raised while parsing and validating CLI arguments.
#[derive(Debug, Error)]
pub enum CliError {
    /// File read/write error.
    #[error("file error: {0}")]
    File(#[from] std::io::Error),
    /// The input file extension is not a recognised C/C++ source suffix.
    #[error("unsupported input file '{0}' (expected .c, .cc, .cpp, or .cxx)")]
    UnsupportedInput(String),
    /// Lookup target missing from the mapping file.
    #[error("symbol '{0}' not found in mapping")]
    UnknownSymbol(String),
}

/// CLI subcommands for symveil.
#[derive(Subcommand)]
pub enum Cmd {
    /// Obfuscate the symbols of a source file.
    Obfuscate(obfuscate::ObfuscateArgs),
    /// List the symbols the scanner would rename.
    Scan(scan::ScanArgs),
    /// Inspect a saved symbol mapping.
    Map(map::MapArgs),
}

/// Trait for executing CLI subcommands.
pub trait Command {
    /// Executes the subcommand.
    ///
    /// # Returns
    /// A `Result` indicating success or an error if execution fails.
    fn execute(self) -> Result<(), Box<dyn Error>>;
}

impl Command for Cmd {
    fn execute(self) -> Result<(), Box<dyn Error>> {
        match self {
            Cmd::Obfuscate(args) => args.execute(),
            Cmd::Scan(args) => args.execute(),
            Cmd::Map(args) => args.execute(),
        }
    }
}
