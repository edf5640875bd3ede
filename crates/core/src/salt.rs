use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fmt;

/// A byte string mixed into every hash.
///
/// A party not holding the salt cannot predict the mapping from original to
/// obfuscated names. Sharing a salt (and mapping) across translation units is
/// how callers opt into cross-unit stable renaming.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Salt(String);

impl Salt {
    /// Create a salt from a configured string.
    pub fn new(value: impl Into<String>) -> Self {
        Self(value.into())
    }

    /// Generate a fresh random salt (32 bytes, hex-encoded).
    ///
    /// Only entry point in the crate that is not deterministic. Callers who
    /// need reproducible output across runs must persist the generated value.
    pub fn generate() -> Self {
        let mut bytes = [0u8; 32];
        rand::rng().fill_bytes(&mut bytes);
        Self(hex::encode(bytes))
    }

    /// Returns true when no salt was configured.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Salt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl fmt::Debug for Salt {
    // Salts are secrets; keep them out of debug output.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Salt(<{} bytes>)", self.0.len())
    }
}

impl From<&str> for Salt {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}
