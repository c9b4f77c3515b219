use std::io;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum CrateError {
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed crate at byte {offset}: {reason}")]
    Malformed { offset: usize, reason: String },

    #[error("path cannot be stored in a crate: {0}")]
    InvalidPath(String),

    #[error("payload of {0} bytes does not fit a 32-bit length field")]
    EncodingOverflow(usize),
}

impl CrateError {
    pub(crate) fn malformed(offset: usize, reason: impl Into<String>) -> Self {
        CrateError::Malformed { offset, reason: reason.into() }
    }
}

pub type CrateResult<T> = Result<T, CrateError>;
