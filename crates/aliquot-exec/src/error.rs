//! Executor error types.

use thiserror::Error;

use aliquot_backend::BackendError;
use aliquot_core::InstrumentClass;

/// Result type alias for executor operations.
pub type ExecResult<T> = Result<T, ExecError>;

/// Errors that abort a protocol run.
///
/// A run that fails mid-sequence leaves robot and liquid state inconsistent
/// with the request set; callers must treat the run as failed in whole.
#[derive(Debug, Error)]
pub enum ExecError {
    #[error("backend operation failed: {0}")]
    Backend(#[source] BackendError),

    #[error("transfer failed for buffer '{buffer}' ({class} batches): {source}")]
    Transfer {
        buffer: String,
        class: InstrumentClass,
        #[source]
        source: BackendError,
    },
}

impl ExecError {
    pub(crate) fn transfer(buffer: &str, class: InstrumentClass, source: BackendError) -> Self {
        ExecError::Transfer {
            buffer: buffer.to_string(),
            class,
            source,
        }
    }
}
