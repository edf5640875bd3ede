//! Deterministic keyed hashing of symbol names.
//!
//! Every pseudonym in the system comes out of this module: the input bytes
//! `salt ‖ context ‖ name` are fed to the configured primitive and the digest
//! is hex-encoded and truncated. The unique-hash loop layers collision
//! handling on top so that no two distinct names share an output within one
//! driver run.

use crate::result::{Error, Result};
use crate::salt::Salt;
use blake2::Blake2b512;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use siphasher::sip::SipHasher24;
use std::collections::HashSet;
use std::fmt;
use std::hash::Hasher as _;
use std::str::FromStr;

/// Shortest permitted truncation; anything below cannot absorb a realistic
/// symbol corpus.
pub const MIN_HASH_LENGTH: usize = 4;
/// Longest permitted truncation (a full SHA-256 hex digest).
pub const MAX_HASH_LENGTH: usize = 64;

/// Counter probes attempted before the unique-hash loop gives up.
const MAX_COLLISION_PROBES: u32 = 10_000;

/// SipHash keys used when no salt is configured.
const SIP_K0: u64 = 0x0706050403020100;
const SIP_K1: u64 = 0x0f0e0d0c0b0a0908;

/// Hash primitive used to derive pseudonyms.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum HashAlgorithm {
    /// SHA-256, hex digest truncated to the configured length.
    #[default]
    Sha256,
    /// BLAKE2b with a 512-bit state, hex digest truncated.
    Blake2b,
    /// SipHash-2-4, 16-char zero-padded hex of the 64-bit result.
    SipHash,
}

impl From<HashAlgorithm> for u8 {
    fn from(algorithm: HashAlgorithm) -> u8 {
        match algorithm {
            HashAlgorithm::Sha256 => 0,
            HashAlgorithm::Blake2b => 1,
            HashAlgorithm::SipHash => 2,
        }
    }
}

impl TryFrom<u8> for HashAlgorithm {
    type Error = String;

    fn try_from(code: u8) -> std::result::Result<Self, String> {
        match code {
            0 => Ok(HashAlgorithm::Sha256),
            1 => Ok(HashAlgorithm::Blake2b),
            2 => Ok(HashAlgorithm::SipHash),
            other => Err(format!("unknown hash algorithm code: {other}")),
        }
    }
}

impl FromStr for HashAlgorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sha256" => Ok(HashAlgorithm::Sha256),
            "blake2b" => Ok(HashAlgorithm::Blake2b),
            "siphash" => Ok(HashAlgorithm::SipHash),
            other => Err(Error::InvalidConfig(format!(
                "unknown hash algorithm '{other}' (expected sha256, blake2b, or siphash)"
            ))),
        }
    }
}

impl fmt::Display for HashAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            HashAlgorithm::Sha256 => "sha256",
            HashAlgorithm::Blake2b => "blake2b",
            HashAlgorithm::SipHash => "siphash",
        };
        f.write_str(name)
    }
}

/// How emitted identifiers are prefixed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrefixStyle {
    /// Pure hash. A leading `s_` is added only when the hash would otherwise
    /// start with a digit, so the output stays a valid C identifier.
    None,
    /// Per-kind prefix: `f_` functions, `v_` variables, `C_` classes,
    /// `N_` namespaces, `a_` aliases.
    #[default]
    Typed,
    /// A single leading underscore.
    Underscore,
}

impl FromStr for PrefixStyle {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "none" => Ok(PrefixStyle::None),
            "typed" => Ok(PrefixStyle::Typed),
            "underscore" => Ok(PrefixStyle::Underscore),
            other => Err(Error::InvalidConfig(format!(
                "unknown prefix style '{other}' (expected none, typed, or underscore)"
            ))),
        }
    }
}

/// Hashing configuration shared by the hasher and the mangled-name codec.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HashConfig {
    /// The keyed primitive producing digests.
    pub algorithm: HashAlgorithm,
    /// Prefix applied after truncation.
    pub prefix_style: PrefixStyle,
    /// Characters kept from the hex digest, within `[MIN_HASH_LENGTH, MAX_HASH_LENGTH]`.
    pub hash_length: usize,
    /// Global salt mixed into every hash.
    pub salt: Salt,
    /// Same input always produces the same output.
    pub deterministic: bool,
}

impl Default for HashConfig {
    fn default() -> Self {
        Self {
            algorithm: HashAlgorithm::Sha256,
            prefix_style: PrefixStyle::Typed,
            hash_length: 12,
            salt: Salt::default(),
            deterministic: true,
        }
    }
}

/// Deterministic symbol-name hasher with collision handling.
///
/// The hasher remembers every name it has handed out so that repeated typed
/// calls within one driver run stay injective.
#[derive(Debug)]
pub struct Hasher {
    config: HashConfig,
    used: HashSet<String>,
}

impl Hasher {
    /// Creates a hasher, validating the configuration.
    pub fn new(config: HashConfig) -> Result<Self> {
        if config.hash_length < MIN_HASH_LENGTH || config.hash_length > MAX_HASH_LENGTH {
            return Err(Error::InvalidConfig(format!(
                "hash length {} outside [{MIN_HASH_LENGTH}, {MAX_HASH_LENGTH}]",
                config.hash_length
            )));
        }
        Ok(Self {
            config,
            used: HashSet::new(),
        })
    }

    pub fn config(&self) -> &HashConfig {
        &self.config
    }

    pub fn algorithm(&self) -> HashAlgorithm {
        self.config.algorithm
    }

    pub fn salt(&self) -> &Salt {
        &self.config.salt
    }

    /// Replaces the global salt, e.g. after deriving a module salt.
    pub fn set_salt(&mut self, salt: Salt) {
        self.config.salt = salt;
    }

    /// Derives a deterministic per-module salt from the module identity.
    pub fn derive_module_salt(&self, module_name: &str, source_file: &str) -> Salt {
        Salt::new(self.hash(&format!("{module_name}{source_file}"), "module_salt"))
    }

    /// Hashes `salt ‖ context ‖ name` with the configured primitive and
    /// truncates the lower-case hex digest to the configured length.
    pub fn hash(&self, name: &str, context: &str) -> String {
        let input = format!("{}{}{}", self.config.salt.as_str(), context, name);
        let digest = match self.config.algorithm {
            HashAlgorithm::Sha256 => hex::encode(Sha256::digest(input.as_bytes())),
            HashAlgorithm::Blake2b => hex::encode(Blake2b512::digest(input.as_bytes())),
            HashAlgorithm::SipHash => format!("{:016x}", self.sip64(input.as_bytes())),
        };
        truncate(&digest, self.config.hash_length)
    }

    /// Returns `prefix ‖ hash(name)`, probing `name_0`, `name_1`, … on
    /// collision until an output absent from both `used` and the hasher's own
    /// set is found. The winner is inserted into both sets.
    ///
    /// Fails with [`Error::CollisionExhausted`] after 10 000 probes.
    pub fn unique(
        &mut self,
        name: &str,
        used: &mut HashSet<String>,
        prefix: &str,
    ) -> Result<String> {
        let mut candidate = self.apply_prefix(&self.hash(name, ""), prefix);

        let mut counter: u32 = 0;
        while used.contains(&candidate) || self.used.contains(&candidate) {
            if counter >= MAX_COLLISION_PROBES {
                return Err(Error::CollisionExhausted(name.to_string()));
            }
            candidate = self.apply_prefix(&self.hash(&format!("{name}_{counter}"), ""), prefix);
            counter += 1;
        }

        used.insert(candidate.clone());
        self.used.insert(candidate.clone());
        Ok(candidate)
    }

    /// Hashes a function name (`f_` prefix under the typed style).
    pub fn hash_function(&mut self, name: &str) -> Result<String> {
        self.typed(name, "f_")
    }

    /// Hashes a variable name (`v_` prefix under the typed style).
    pub fn hash_variable(&mut self, name: &str) -> Result<String> {
        self.typed(name, "v_")
    }

    /// Hashes a class or struct name (`C_` prefix under the typed style).
    pub fn hash_class(&mut self, name: &str) -> Result<String> {
        self.typed(name, "C_")
    }

    /// Hashes a namespace name (`N_` prefix under the typed style).
    pub fn hash_namespace(&mut self, name: &str) -> Result<String> {
        self.typed(name, "N_")
    }

    /// Hashes an alias name (`a_` prefix under the typed style).
    pub fn hash_alias(&mut self, name: &str) -> Result<String> {
        self.typed(name, "a_")
    }

    fn typed(&mut self, name: &str, prefix: &str) -> Result<String> {
        let prefix = if self.config.prefix_style == PrefixStyle::Typed {
            prefix
        } else {
            ""
        };
        let mut scratch = HashSet::new();
        self.unique(name, &mut scratch, prefix)
    }

    fn apply_prefix(&self, hash: &str, prefix: &str) -> String {
        if !prefix.is_empty() {
            return format!("{prefix}{hash}");
        }
        match self.config.prefix_style {
            PrefixStyle::Underscore => format!("_{hash}"),
            // A C identifier cannot start with a digit.
            PrefixStyle::None if hash.starts_with(|c: char| c.is_ascii_digit()) => {
                format!("s_{hash}")
            }
            _ => hash.to_string(),
        }
    }

    fn sip64(&self, data: &[u8]) -> u64 {
        let (k0, k1) = self.sip_keys();
        let mut sip = SipHasher24::new_with_keys(k0, k1);
        sip.write(data);
        sip.finish()
    }

    /// SipHash keys: fixed test constants without a salt, otherwise derived
    /// by self-hashing `salt‖"k0"` and `salt‖"k1"`.
    fn sip_keys(&self) -> (u64, u64) {
        let salt = self.config.salt.as_str();
        if salt.is_empty() {
            return (SIP_K0, SIP_K1);
        }
        (
            sip_with(SIP_K0, SIP_K1, format!("{salt}k0").as_bytes()),
            sip_with(SIP_K0, SIP_K1, format!("{salt}k1").as_bytes()),
        )
    }
}

fn sip_with(k0: u64, k1: u64, data: &[u8]) -> u64 {
    let mut sip = SipHasher24::new_with_keys(k0, k1);
    sip.write(data);
    sip.finish()
}

fn truncate(digest: &str, length: usize) -> String {
    if digest.len() <= length {
        digest.to_string()
    } else {
        digest[..length].to_string()
    }
}
