use clap::Parser;
use symveil_cli::commands::{Cmd, Command};
use tracing_subscriber::EnvFilter;

/// symveil CLI
///
/// symveil is a deterministic symbol obfuscator for C/C++ translation units:
/// it renames functions and globals to keyed cryptographic pseudonyms while
/// keeping entry points, ABI symbols, and the stdlib intact, and emits a
/// mapping file for later symbolication.
#[derive(Parser)]
#[command(name = "symveil")]
#[command(about = "symveil: deterministic symbol obfuscator")]
struct Cli {
    #[command(subcommand)]
    command: Cmd,

    /// Print a line for every renamed or preserved symbol.
    #[arg(short, long, global = true)]
    verbose: bool,
}

/// Runs the symveil CLI with the provided arguments.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let default_filter = if cli.verbose {
        "symveil_core=info,symveil_rename=info"
    } else {
        "warn"
    };
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_ansi(false)
        .without_time()
        .init();

    cli.command.execute()
}
