//! Engine error type.
//!
//! ```text
//! EngineError
//! ├── Core(CoreError)    - the request was refused; safe to show the client
//! └── Storage(DbError)   - the store failed; log it, answer generically
//! ```

use stockroom_core::{CoreError, ValidationError};
use stockroom_db::DbError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Core(#[from] CoreError),

    #[error(transparent)]
    Storage(#[from] DbError),
}

impl From<ValidationError> for EngineError {
    fn from(err: ValidationError) -> Self {
        EngineError::Core(err.into())
    }
}

impl EngineError {
    /// Whether the caller caused this error (as opposed to the store).
    pub fn is_client_error(&self) -> bool {
        matches!(self, EngineError::Core(_))
    }
}

pub type EngineResult<T> = Result<T, EngineError>;
