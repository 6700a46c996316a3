//! Error types for the error contract itself.
//!
//! This module defines the failures of the contract machinery (building an
//! error type, decoding an envelope), distinct from the service errors in
//! the `service_error` module that travel over the wire.

/// Failures raised by the error contract machinery.
///
/// These are implementation-level errors, separate from the
/// [`ServiceError`](crate::ServiceError) values that handlers return and
/// that are written to clients.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The error code is not one of the registered codes.
    #[error("invalid error code: {0:?}")]
    InvalidCode(String),

    /// An error type was built with an empty name.
    #[error("error name must not be empty")]
    EmptyName,

    /// The response body is not a well-formed error envelope.
    #[error("malformed error envelope: {0}")]
    MalformedEnvelope(String),

    /// The envelope names an error code that is not registered.
    #[error("unknown error type: code {code:?}, name {name:?}")]
    UnknownErrorType { code: String, name: String },

    /// Every envelope encoding strategy failed.
    #[error("failed to encode error envelope: {0}")]
    Encode(#[from] serde_json::Error),
}

impl Error {
    /// Create a new malformed envelope error.
    pub fn malformed(message: impl Into<String>) -> Self {
        Self::MalformedEnvelope(message.into())
    }
}
