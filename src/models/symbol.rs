use std::fmt;
use std::str::FromStr;

use super::BitMatrix;

/// QR Code version (1-40 for Model 2)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Version(u8);

impl Version {
    /// Smallest symbol (21x21)
    pub const MIN: Version = Version(1);
    /// Largest symbol (177x177)
    pub const MAX: Version = Version(40);

    /// Create a version, `None` outside 1-40
    pub fn new(number: u8) -> Option<Self> {
        (1..=40).contains(&number).then_some(Self(number))
    }

    /// Recover the version from a symbol's side length
    pub fn from_size(size: usize) -> Option<Self> {
        if size < 21 || (size - 17) % 4 != 0 {
            return None;
        }
        u8::try_from((size - 17) / 4).ok().and_then(Self::new)
    }

    /// Get the version number
    pub fn number(&self) -> u8 {
        self.0
    }
}

/// Error correction level
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ECLevel {
    /// Low (~7% recovery capacity)
    L = 0,
    /// Medium (~15% recovery capacity)
    #[default]
    M = 1,
    /// Quartile (~25% recovery capacity)
    Q = 2,
    /// High (~30% recovery capacity)
    H = 3,
}

impl ECLevel {
    /// All levels from least to most redundant
    pub const ALL: [ECLevel; 4] = [ECLevel::L, ECLevel::M, ECLevel::Q, ECLevel::H];

    /// Single-letter name
    pub fn as_str(&self) -> &'static str {
        match self {
            ECLevel::L => "L",
            ECLevel::M => "M",
            ECLevel::Q => "Q",
            ECLevel::H => "H",
        }
    }

    /// Next less strict level, if any
    pub fn lower(&self) -> Option<Self> {
        match self {
            ECLevel::L => None,
            ECLevel::M => Some(ECLevel::L),
            ECLevel::Q => Some(ECLevel::M),
            ECLevel::H => Some(ECLevel::Q),
        }
    }
}

impl fmt::Display for ECLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown error correction level
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown error correction level {0:?} (expected L, M, Q or H)")]
pub struct ParseLevelError(pub String);

impl FromStr for ECLevel {
    type Err = ParseLevelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "L" | "LOW" => Ok(ECLevel::L),
            "M" | "MEDIUM" => Ok(ECLevel::M),
            "Q" | "QUARTILE" => Ok(ECLevel::Q),
            "H" | "HIGH" => Ok(ECLevel::H),
            _ => Err(ParseLevelError(s.to_string())),
        }
    }
}

/// Encoder output: the module grid plus what it was built with
#[derive(Debug, Clone)]
pub struct EncodedSymbol {
    /// Module matrix (true = dark)
    pub modules: BitMatrix,
    /// QR code version chosen by the encoder
    pub version: Version,
    /// Error correction level used
    pub error_correction: ECLevel,
}

impl EncodedSymbol {
    /// Side length in modules
    pub fn module_count(&self) -> usize {
        self.modules.width()
    }
}
