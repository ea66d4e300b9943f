//! Error types for the Remote Control component

use hmi_types::ResultCode;
use thiserror::Error;

/// Convenience alias for handler outcomes.
pub type Result<T> = std::result::Result<T, RcError>;

/// Reasons a request is answered with an error reply.
///
/// Each variant maps to exactly one [`ResultCode`] at the dispatcher
/// boundary.
#[derive(Debug, Error, Clone, PartialEq)]
pub enum RcError {
    /// The requesting application is not the consented driver device, or
    /// remote control is switched off.
    #[error("Consent check failed")]
    ConsentRejected,

    /// A precondition on current subsystem state does not hold.
    #[error("{0}")]
    Ignored(String),

    /// A required field is missing or a value is out of range.
    #[error("{0}")]
    InvalidData(String),

    /// A subsystem model refused the operation.
    #[error(transparent)]
    Model(#[from] ModelError),

    /// The reply payload could not be encoded.
    #[error("Failed to encode result: {0}")]
    Encode(String),
}

impl RcError {
    /// Result code carried in the error reply.
    pub fn code(&self) -> ResultCode {
        match self {
            RcError::ConsentRejected => ResultCode::Rejected,
            RcError::Ignored(_) => ResultCode::Ignored,
            RcError::InvalidData(_) => ResultCode::InvalidData,
            RcError::Model(e) => e.code(),
            RcError::Encode(_) => ResultCode::GenericError,
        }
    }

    /// Human-readable message; consent rejections carry none.
    pub fn message(&self) -> Option<String> {
        match self {
            RcError::ConsentRejected => None,
            other => Some(other.to_string()),
        }
    }

    /// Wrap a params decoding failure.
    pub fn invalid_params(err: serde_json::Error) -> Self {
        RcError::InvalidData(format!("Invalid params: {}", err))
    }
}

/// Errors raised by climate and radio subsystem models.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ModelError {
    /// A value lies outside what the subsystem accepts. The message is
    /// forwarded to the caller unchanged.
    #[error("{0}")]
    InvalidData(String),
}

impl ModelError {
    pub fn code(&self) -> ResultCode {
        match self {
            ModelError::InvalidData(_) => ResultCode::InvalidData,
        }
    }
}
