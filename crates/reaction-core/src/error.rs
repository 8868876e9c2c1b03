//! Error types for the reaction-time core

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// A submission arrived without an established user identity
    #[error("No user identifier established; visit the index page first")]
    MissingUser,

    /// The submitted value is absent, non-numeric, non-finite or out of bounds
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// A sample write referenced a user the store does not know.
    /// Not user-correctable.
    #[error("Sample references unknown user: {0}")]
    Referential(String),

    #[error("Storage error: {0}")]
    Storage(#[from] sqlx::Error),
}

impl Error {
    /// True for errors the client caused and can correct by resubmitting.
    pub fn is_client_error(&self) -> bool {
        matches!(self, Error::MissingUser | Error::InvalidInput(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;
