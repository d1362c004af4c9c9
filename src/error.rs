use thiserror::Error;

/// Errors that can occur while loading or browsing a recipe catalog
#[derive(Error, Debug)]
pub enum CatalogError {
    /// Page size must be at least one recipe
    #[error("Invalid page size: {0} (must be greater than zero)")]
    InvalidPageSize(usize),

    /// Failed to read the recipe feed
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The recipe feed is not valid JSON
    #[error("Failed to parse recipe feed: {0}")]
    Json(#[from] serde_json::Error),

    /// The recipe feed is valid JSON but not a list of records
    #[error("Recipe feed must be a JSON array, found {0}")]
    NotAnArray(&'static str),

    /// Failed to set up the HTTP client
    #[error("HTTP client error: {0}")]
    Http(#[from] reqwest::Error),

    /// Builder configuration error
    #[error("Builder error: {0}")]
    BuilderError(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    ConfigError(#[from] config::ConfigError),
}

/// Reasons an image could not be resolved to a local file.
///
/// None of these are fatal: the recipe keeps its remote reference and the
/// display falls back to a placeholder.
#[derive(Error, Debug)]
pub enum ImageError {
    /// The server answered with a non-success HTTP status
    #[error("Server responded with status {0}")]
    Status(u16),

    /// The request never completed (connection, timeout, body read)
    #[error("Transport error: {0}")]
    Transport(String),

    /// The URL path has no last segment to name the file after
    #[error("Cannot derive a file name from {0}")]
    NoFileName(String),

    /// The downloaded bytes could not be saved
    #[error("Failed to write image file: {0}")]
    Write(#[from] std::io::Error),
}

impl From<reqwest::Error> for ImageError {
    fn from(err: reqwest::Error) -> Self {
        match err.status() {
            Some(status) => ImageError::Status(status.as_u16()),
            None => ImageError::Transport(err.to_string()),
        }
    }
}
