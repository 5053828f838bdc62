use std::path::PathBuf;

use thiserror::Error;

use crate::encoder::EncodeError;
use crate::surface::SurfaceError;

/// Failure saving the rendered symbol
#[derive(Debug, Error)]
pub enum SaveError {
    /// No module has been drawn yet
    #[error("nothing has been drawn yet")]
    NothingDrawn,
    /// The surface could not export an image
    #[error(transparent)]
    Surface(#[from] SurfaceError),
    /// Writing the file failed
    #[error("failed to write {}: {source}", path.display())]
    Io {
        /// Destination path
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Errors reported by a session
#[derive(Debug, Error)]
pub enum Error {
    /// Input text is blank after trimming
    #[error("please enter some text to encode")]
    EmptyInput,
    /// Module size outside `1..=MAX_MODULE_SIZE`
    #[error("invalid module size {0}: must be between 1 and {max} pixels", max = crate::models::MAX_MODULE_SIZE)]
    InvalidModuleSize(u32),
    /// The encoder rejected the text
    #[error("error generating QR code ({0}); try reducing text length or lowering the error correction level")]
    Encoding(#[from] EncodeError),
    /// Export or file write failed
    #[error("error saving image: {0}")]
    Save(#[from] SaveError),
}

/// Error category carried by error notifications
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// [`Error::EmptyInput`]
    EmptyInput,
    /// [`Error::InvalidModuleSize`]
    InvalidConfig,
    /// [`Error::Encoding`]
    Encoding,
    /// [`Error::Save`]
    Save,
}

impl Error {
    /// Category of this error
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::EmptyInput => ErrorKind::EmptyInput,
            Error::InvalidModuleSize(_) => ErrorKind::InvalidConfig,
            Error::Encoding(_) => ErrorKind::Encoding,
            Error::Save(_) => ErrorKind::Save,
        }
    }
}

/// Result alias for session operations
pub type Result<T> = std::result::Result<T, Error>;
