//! Error types for the try-on pipeline library.

use thiserror::Error;

/// Main error type for the library
#[derive(Error, Debug)]
pub enum Error {
    /// Requested asset id is not present in the registry
    #[error("unknown asset: {0}")]
    UnknownAsset(String),

    /// Preview mode outside the recognized set
    #[error("unsupported preview mode: {0}")]
    UnsupportedMode(String),

    /// Detector creation or model load failed
    #[error("detector load error: {0}")]
    DetectorLoad(String),

    /// Detector running-mode switch failed
    #[error("detector mode switch error: {0}")]
    ModeSwitch(String),

    /// Detection call failed mid-frame
    #[error("detection error: {0}")]
    Detection(String),

    /// Camera acquisition failed or was denied
    #[error("camera error: {0}")]
    Camera(String),

    /// Model or overlay artifact could not be fetched
    #[error("artifact fetch error: {0}")]
    ArtifactFetch(String),

    /// Configuration error
    #[error("configuration error: {0}")]
    Config(String),

    /// Invalid input parameters provided
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// File I/O operation failed
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl Error {
    /// HTTP-equivalent status code for classified errors.
    ///
    /// Session commands surface unknown assets as 422 and unsupported
    /// modes as 400; everything else is an internal 500-class failure.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        match self {
            Error::UnknownAsset(_) => 422,
            Error::UnsupportedMode(_) | Error::InvalidInput(_) => 400,
            _ => 500,
        }
    }
}

/// Convenience type alias for Results with our Error type
pub type Result<T> = std::result::Result<T, Error>;
