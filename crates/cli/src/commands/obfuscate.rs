//! The `obfuscate` subcommand: rename every eligible symbol of a source file
//! and write the transformed unit plus its mapping document.

use crate::commands::CliError;
use clap::Args;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};
use symveil_core::hasher::{HashAlgorithm, HashConfig, PrefixStyle};
use symveil_core::preserve::PreservePolicy;
use symveil_core::salt::Salt;
use symveil_rename::{RenameConfig, RenameDriver};

const CPP_EXTENSIONS: &[&str] = &["cc", "cpp", "cxx", "hpp"];

/// Arguments for the `obfuscate` subcommand.
#[derive(Args)]
pub struct ObfuscateArgs {
    /// Input source file (.c, .cc, .cpp, .cxx).
    pub input: PathBuf,
    /// Output file path.
    #[arg(short, long)]
    output: PathBuf,
    /// Symbol mapping file.
    #[arg(short, long, default_value = "symbol_map.json")]
    map: PathBuf,
    /// Hash algorithm: sha256, blake2b, siphash.
    #[arg(short, long, default_value = "sha256")]
    algorithm: String,
    /// Prefix style: none, typed, underscore.
    #[arg(short, long, default_value = "typed")]
    prefix: String,
    /// Hash length in characters.
    #[arg(short = 'l', long, default_value_t = 12)]
    length: usize,
    /// Custom salt for hashing (derived from the file name when omitted).
    #[arg(short, long)]
    salt: Option<String>,
    /// Don't preserve the main() entry point.
    #[arg(long)]
    no_preserve_main: bool,
    /// Don't preserve common stdlib functions.
    #[arg(long)]
    no_preserve_stdlib: bool,
    /// Don't generate a mapping file.
    #[arg(long)]
    no_map: bool,
    /// Treat input as C++ (route mangled names through the codec).
    #[arg(long)]
    cpp: bool,
    /// Additional regex of symbol names to preserve (repeatable).
    #[arg(long = "preserve", value_name = "PATTERN")]
    preserve_patterns: Vec<String>,
}

impl super::Command for ObfuscateArgs {
    fn execute(self) -> Result<(), Box<dyn Error>> {
        let source = fs::read_to_string(&self.input).map_err(CliError::File)?;
        let file_name = source_file_name(&self.input)?;

        let mut policy = PreservePolicy::for_source();
        policy.set_preserve_main(!self.no_preserve_main);
        policy.set_preserve_stdlib(!self.no_preserve_stdlib);
        for pattern in &self.preserve_patterns {
            policy.add_pattern(pattern)?;
        }

        let config = RenameConfig {
            hash: HashConfig {
                algorithm: self.algorithm.parse::<HashAlgorithm>()?,
                prefix_style: self.prefix.parse::<PrefixStyle>()?,
                hash_length: self.length,
                salt: self.salt.as_deref().map(Salt::from).unwrap_or_default(),
                deterministic: true,
            },
            policy,
            rename_globals: true,
            cpp: self.cpp || is_cpp_source(&self.input),
            map_path: (!self.no_map).then(|| self.map.clone()),
        };

        let mut driver = RenameDriver::new(config)?;
        let rewritten = driver.run_on_source(&source, &file_name)?;
        fs::write(&self.output, rewritten).map_err(CliError::File)?;

        println!("input:           {}", self.input.display());
        println!("output:          {}", self.output.display());
        println!("symbols renamed: {}", driver.mapping().len());
        if !self.no_map {
            println!("mapping saved:   {}", self.map.display());
        }
        Ok(())
    }
}

fn source_file_name(path: &Path) -> Result<String, CliError> {
    let extension = path.extension().and_then(|e| e.to_str()).unwrap_or("");
    if extension != "c" && !CPP_EXTENSIONS.contains(&extension) {
        return Err(CliError::UnsupportedInput(path.display().to_string()));
    }
    Ok(path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default())
}

fn is_cpp_source(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| CPP_EXTENSIONS.contains(&e))
}
