//! Registry client error types

use thiserror::Error;

/// Registry client result type
pub type RegistryClientResult<T> = Result<T, RegistryClientError>;

/// Errors that can occur while fetching or decoding the registry snapshot.
///
/// All variants mean the same thing to the dispatch decision (registry
/// state is unknown, so no dispatch may happen), but they are kept distinct
/// so operators can tell a network fault from a corrupted document.
#[derive(Debug, Error)]
pub enum RegistryClientError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("URL parsing error: {0}")]
    Url(#[from] url::ParseError),

    #[error("Registry returned status {status}: {body}")]
    UnexpectedStatus { status: reqwest::StatusCode, body: String },

    #[error("Malformed registry document: {0}")]
    Malformed(#[from] serde_json::Error),
}
