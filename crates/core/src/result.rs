//! Core result and error types

use thiserror::Error;

/// Core error type encompassing all core module errors.
#[derive(Debug, Error)]
pub enum Error {
    /// The unique-hash loop exhausted its retry budget.
    ///
    /// Raised after 10 000 counter probes for a single name; the configured
    /// hash length is too short for the symbol corpus.
    #[error("too many hash collisions for '{0}'")]
    CollisionExhausted(String),

    /// Failed to read file at the specified path.
    #[error("could not read file '{path}': {source}")]
    FileRead {
        /// The path to the file that could not be read.
        path: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file at the specified path.
    #[error("could not write file '{path}': {source}")]
    FileWrite {
        /// The path to the file that could not be written.
        path: String,
        /// The underlying IO error.
        #[source]
        source: std::io::Error,
    },

    /// The hash or preservation configuration is invalid.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// A mangled name does not follow the Itanium grammar subset.
    #[error("malformed mangled name '{name}': {reason}")]
    MalformedMangling {
        /// The symbol that failed to parse.
        name: String,
        /// Description of the grammar violation.
        reason: String,
    },
}

/// Core result type
pub type Result<T> = std::result::Result<T, Error>;
