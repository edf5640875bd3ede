pub mod driver;
pub mod mapping;
pub mod pass;
pub mod rewriter;

pub use driver::{RenameConfig, RenameDriver, RenameSummary};
pub use mapping::{MapEntry, SymbolMap};

use thiserror::Error;

/// Rename error type encompassing all driver and mapping-store errors.
#[derive(Debug, Error)]
pub enum Error {
    /// Core hashing or configuration failure.
    #[error(transparent)]
    Core(#[from] symveil_core::Error),

    /// Failed to read a mapping file.
    #[error("could not read mapping file '{path}': {source}")]
    MapRead {
        /// The path that could not be read.
        path: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write a mapping file.
    #[error("could not write mapping file '{path}': {source}")]
    MapWrite {
        /// The path that could not be written.
        path: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Mapping document serialization or deserialization failed.
    #[error("mapping serialization failed: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Rename result type
pub type Result<T> = std::result::Result<T, Error>;
