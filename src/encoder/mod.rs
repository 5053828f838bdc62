//! QR encoding boundary
//!
//! The crate never builds QR symbols itself. Everything goes through
//! [`QrEncoder`], so a session can run against `qrcodegen` in production and
//! against a fixed matrix in tests.

use qrcodegen::{QrCode, QrCodeEcc, QrSegment};

use crate::models::{BitMatrix, ECLevel, EncodedSymbol, ModuleGrid, Version};

/// Version hint asking the encoder to pick the smallest version that fits
pub const AUTO_VERSION: u8 = 0;

/// Failure reported by a [`QrEncoder`]
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum EncodeError {
    /// Text does not fit in any allowed version at the requested level
    #[error("data too long for error correction level {level} ({len} bytes)")]
    DataTooLong {
        /// Requested level
        level: ECLevel,
        /// Encoded payload length in bytes
        len: usize,
    },
    /// Version hint outside 0-40
    #[error("invalid QR version {0} (expected 0 for automatic, or 1-40)")]
    InvalidVersion(u8),
    /// Any other encoder fault
    #[error("encoder failure: {0}")]
    Internal(String),
}

/// Opaque text-to-matrix encoder
pub trait QrEncoder {
    /// Encode `text` at `level`
    ///
    /// `version` is [`AUTO_VERSION`] to let the encoder choose, or a fixed
    /// version number 1-40.
    fn encode(&self, text: &str, version: u8, level: ECLevel) -> Result<EncodedSymbol, EncodeError>;
}

impl<T: QrEncoder + ?Sized> QrEncoder for &T {
    fn encode(&self, text: &str, version: u8, level: ECLevel) -> Result<EncodedSymbol, EncodeError> {
        (**self).encode(text, version, level)
    }
}

impl From<ECLevel> for QrCodeEcc {
    fn from(level: ECLevel) -> Self {
        match level {
            ECLevel::L => QrCodeEcc::Low,
            ECLevel::M => QrCodeEcc::Medium,
            ECLevel::Q => QrCodeEcc::Quartile,
            ECLevel::H => QrCodeEcc::High,
        }
    }
}

/// [`QrEncoder`] backed by the `qrcodegen` crate
///
/// The level is never boosted, so the symbol is built at exactly the level
/// the caller asked for.
#[derive(Debug, Clone, Copy, Default)]
pub struct QrcodegenEncoder;

impl QrcodegenEncoder {
    /// Create a new encoder
    pub fn new() -> Self {
        Self
    }
}

impl QrEncoder for QrcodegenEncoder {
    fn encode(&self, text: &str, version: u8, level: ECLevel) -> Result<EncodedSymbol, EncodeError> {
        let (min, max) = if version == AUTO_VERSION {
            (qrcodegen::Version::MIN, qrcodegen::Version::MAX)
        } else {
            let fixed = Version::new(version).ok_or(EncodeError::InvalidVersion(version))?;
            let fixed = qrcodegen::Version::new(fixed.number());
            (fixed, fixed)
        };

        let segments = QrSegment::make_segments(text);
        let qr = QrCode::encode_segments_advanced(&segments, level.into(), min, max, None, false)
            .map_err(|_| EncodeError::DataTooLong {
                level,
                len: text.len(),
            })?;

        let modules = to_bit_matrix(&qr);
        let version = Version::from_size(modules.width())
            .ok_or_else(|| EncodeError::Internal(format!("unexpected symbol size {}", modules.width())))?;

        Ok(EncodedSymbol {
            modules,
            version,
            error_correction: level,
        })
    }
}

fn to_bit_matrix(grid: &impl ModuleGrid) -> BitMatrix {
    let size = grid.module_count();
    let mut matrix = BitMatrix::square(size);
    for row in 0..size {
        for col in 0..size {
            if grid.is_dark(row, col) {
                matrix.set(col, row, true);
            }
        }
    }
    matrix
}

/// Encoder that always returns the same matrix, regardless of input
///
/// Handy for driving a session from a hand-built grid.
#[derive(Debug, Clone)]
pub struct FixedEncoder {
    modules: BitMatrix,
}

impl FixedEncoder {
    /// Wrap a square module matrix
    pub fn new(modules: BitMatrix) -> Self {
        Self { modules }
    }
}

impl QrEncoder for FixedEncoder {
    fn encode(&self, _text: &str, _version: u8, level: ECLevel) -> Result<EncodedSymbol, EncodeError> {
        let size = self.modules.module_count();
        Ok(EncodedSymbol {
            modules: self.modules.clone(),
            version: Version::from_size(size).unwrap_or(Version::MIN),
            error_correction: level,
        })
    }
}
