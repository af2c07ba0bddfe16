//! Error types shared by the card pipeline.

use thiserror::Error;

/// Result alias used across the crate.
pub type Result<T> = std::result::Result<T, CardError>;

/// Errors that can abort (or, for markup, degrade) a card render.
#[derive(Error, Debug)]
pub enum CardError {
    /// The request named no author or mod.
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// The statistics API or the icon host could not deliver usable data.
    #[error("Upstream fetch failed: {0}")]
    UpstreamFetchFailed(String),

    /// No usable font face could be loaded.
    #[error("Failed to load font: {0}")]
    FontLoadFailed(String),

    /// A color directive is cut off before its `:` or closing `]`.
    #[error("Malformed markup at character {position}: {reason}")]
    MalformedMarkup { position: usize, reason: &'static str },

    /// The finished canvas could not be encoded.
    #[error("Failed to encode image: {0}")]
    Encode(String),
}

impl CardError {
    /// `true` for errors caused by the caller rather than by the service.
    pub fn is_client_error(&self) -> bool {
        matches!(self, CardError::InvalidInput(_))
    }
}

impl From<reqwest::Error> for CardError {
    fn from(err: reqwest::Error) -> Self {
        CardError::UpstreamFetchFailed(err.to_string())
    }
}

impl From<image::ImageError> for CardError {
    fn from(err: image::ImageError) -> Self {
        CardError::Encode(err.to_string())
    }
}
