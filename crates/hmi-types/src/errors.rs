//! # Error Types
//!
//! Errors raised while decoding frames from the bus.

use thiserror::Error;

/// Errors that can occur when decoding bus frames.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum TypesError {
    /// The frame is not a JSON object.
    #[error("Frame is not a JSON object")]
    NotAnObject,

    /// The frame matches none of request, response, error or notification.
    #[error("Unrecognized frame shape: {0}")]
    UnrecognizedFrame(String),

    /// A recognised frame failed to deserialize.
    #[error("Malformed {kind} frame: {reason}")]
    Malformed {
        /// Which kind of frame was being decoded.
        kind: &'static str,
        /// Deserializer message.
        reason: String,
    },

    /// Integer does not correspond to a known result code.
    #[error("Unknown result code: {0}")]
    UnknownResultCode(i64),

    /// Name does not correspond to a known result code.
    #[error("Unknown result code name: {0}")]
    UnknownResultCodeName(String),
}
