//! Symbol descriptor types shared by the scanners and the rename driver.

use serde::{Deserialize, Serialize};

/// The category of a declared symbol.
///
/// Serialized as an integer code so the mapping document stays readable by
/// tooling that predates this rewrite.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum SymbolKind {
    Function,
    GlobalVar,
    StaticVar,
    LocalVar,
    Typedef,
    Struct,
    Enum,
    Alias,
    #[default]
    Unknown,
}

impl From<SymbolKind> for u8 {
    fn from(kind: SymbolKind) -> u8 {
        match kind {
            SymbolKind::Function => 0,
            SymbolKind::GlobalVar => 1,
            SymbolKind::StaticVar => 2,
            SymbolKind::LocalVar => 3,
            SymbolKind::Typedef => 4,
            SymbolKind::Struct => 5,
            SymbolKind::Enum => 6,
            SymbolKind::Alias => 7,
            SymbolKind::Unknown => 8,
        }
    }
}

impl TryFrom<u8> for SymbolKind {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, String> {
        match code {
            0 => Ok(SymbolKind::Function),
            1 => Ok(SymbolKind::GlobalVar),
            2 => Ok(SymbolKind::StaticVar),
            3 => Ok(SymbolKind::LocalVar),
            4 => Ok(SymbolKind::Typedef),
            5 => Ok(SymbolKind::Struct),
            6 => Ok(SymbolKind::Enum),
            7 => Ok(SymbolKind::Alias),
            8 => Ok(SymbolKind::Unknown),
            other => Err(format!("unknown symbol kind code: {other}")),
        }
    }
}

/// Symbol linkage, serialized as an integer code like [`SymbolKind`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u8", try_from = "u8")]
pub enum Linkage {
    #[default]
    External,
    Internal,
    Weak,
    Common,
}

impl From<Linkage> for u8 {
    fn from(linkage: Linkage) -> u8 {
        match linkage {
            Linkage::External => 0,
            Linkage::Internal => 1,
            Linkage::Weak => 2,
            Linkage::Common => 3,
        }
    }
}

impl TryFrom<u8> for Linkage {
    type Error = String;

    fn try_from(code: u8) -> Result<Self, String> {
        match code {
            0 => Ok(Linkage::External),
            1 => Ok(Linkage::Internal),
            2 => Ok(Linkage::Weak),
            3 => Ok(Linkage::Common),
            other => Err(format!("unknown linkage code: {other}")),
        }
    }
}

/// A symbol discovered in a translation unit.
///
/// Descriptors live for the duration of one driver invocation; the mapping
/// entries derived from them outlive the run via the mapping store.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct SymbolInfo {
    /// Declared name, exactly as spelled in the unit.
    pub name: String,
    pub kind: SymbolKind,
    pub linkage: Linkage,
    /// File the declaration was found in, when known.
    pub source_file: Option<String>,
    /// 1-based line of the declaration, when known.
    pub line: Option<u32>,
    /// Load address, when known (0 otherwise).
    pub address: u64,
    /// Object size in bytes, when known (0 otherwise).
    pub size: u64,
}

impl SymbolInfo {
    pub fn new(name: impl Into<String>, kind: SymbolKind, linkage: Linkage) -> Self {
        Self {
            name: name.into(),
            kind,
            linkage,
            ..Self::default()
        }
    }

    /// Returns true if this symbol is a function.
    pub fn is_function(&self) -> bool {
        matches!(self.kind, SymbolKind::Function)
    }

    /// Returns true if this symbol is a global or static variable.
    pub fn is_variable(&self) -> bool {
        matches!(
            self.kind,
            SymbolKind::GlobalVar | SymbolKind::StaticVar | SymbolKind::LocalVar
        )
    }

    /// Returns true if this symbol is visible outside its unit.
    pub fn is_external(&self) -> bool {
        matches!(self.linkage, Linkage::External | Linkage::Weak)
    }
}
