//! Error types shared by every stream in the crate.
//!
//! Errors travel through streams as terminal notifications, so the type is
//! `Clone`: a shared stream hands the same error to each of its subscribers.

use thiserror::Error;

/// Failure surfaced by a stream or by page setup.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    /// A projection function could not produce its derived stream.
    #[error("projection failed: {0}")]
    Projection(String),

    /// A selector required by page setup matched no element.
    #[error("no element matches selector `{0}`")]
    MissingElement(String),

    /// Site configuration could not be parsed.
    #[error("invalid site configuration: {0}")]
    Config(String),
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
