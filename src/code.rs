//! Error codes and error types.
//!
//! An [`ErrorCode`] is a stable wire token paired with exactly one HTTP
//! status. An [`ErrorType`] binds a code to a namespaced error name such as
//! `"Service:InvalidArgument"`.

use std::fmt;
use std::str::FromStr;

use http::StatusCode;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::Error;

/// The closed set of error codes understood on the wire.
///
/// Codes are wire identifiers: their tokens and status codes never change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    PermissionDenied,
    InvalidArgument,
    NotFound,
    Conflict,
    RequestEntityTooLarge,
    FailedPrecondition,
    Internal,
    Timeout,
    CustomClient,
    CustomServer,
}

impl ErrorCode {
    /// Every registered code, in wire-table order.
    pub const ALL: [ErrorCode; 10] = [
        ErrorCode::PermissionDenied,
        ErrorCode::InvalidArgument,
        ErrorCode::NotFound,
        ErrorCode::Conflict,
        ErrorCode::RequestEntityTooLarge,
        ErrorCode::FailedPrecondition,
        ErrorCode::Internal,
        ErrorCode::Timeout,
        ErrorCode::CustomClient,
        ErrorCode::CustomServer,
    ];

    /// The canonical wire token, e.g. `NOT_FOUND`.
    pub const fn as_str(self) -> &'static str {
        match self {
            ErrorCode::PermissionDenied => "PERMISSION_DENIED",
            ErrorCode::InvalidArgument => "INVALID_ARGUMENT",
            ErrorCode::NotFound => "NOT_FOUND",
            ErrorCode::Conflict => "CONFLICT",
            ErrorCode::RequestEntityTooLarge => "REQUEST_ENTITY_TOO_LARGE",
            ErrorCode::FailedPrecondition => "FAILED_PRECONDITION",
            ErrorCode::Internal => "INTERNAL",
            ErrorCode::Timeout => "TIMEOUT",
            ErrorCode::CustomClient => "CUSTOM_CLIENT",
            ErrorCode::CustomServer => "CUSTOM_SERVER",
        }
    }

    /// The HTTP status written for errors carrying this code.
    ///
    /// Both the server response writer and client-side interpretation use
    /// this mapping.
    pub const fn status_code(self) -> StatusCode {
        match self {
            ErrorCode::PermissionDenied => StatusCode::FORBIDDEN,
            ErrorCode::InvalidArgument | ErrorCode::CustomClient => StatusCode::BAD_REQUEST,
            ErrorCode::NotFound => StatusCode::NOT_FOUND,
            ErrorCode::Conflict => StatusCode::CONFLICT,
            ErrorCode::RequestEntityTooLarge => StatusCode::PAYLOAD_TOO_LARGE,
            ErrorCode::FailedPrecondition
            | ErrorCode::Internal
            | ErrorCode::Timeout
            | ErrorCode::CustomServer => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Name used by the convenience constructors, e.g. `Default:NotFound`.
    pub const fn default_name(self) -> &'static str {
        match self {
            ErrorCode::PermissionDenied => "Default:PermissionDenied",
            ErrorCode::InvalidArgument => "Default:InvalidArgument",
            ErrorCode::NotFound => "Default:NotFound",
            ErrorCode::Conflict => "Default:Conflict",
            ErrorCode::RequestEntityTooLarge => "Default:RequestEntityTooLarge",
            ErrorCode::FailedPrecondition => "Default:FailedPrecondition",
            ErrorCode::Internal => "Default:Internal",
            ErrorCode::Timeout => "Default:Timeout",
            ErrorCode::CustomClient => "Default:CustomClient",
            ErrorCode::CustomServer => "Default:CustomServer",
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ErrorCode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ErrorCode::ALL
            .into_iter()
            .find(|code| code.as_str() == s)
            .ok_or_else(|| Error::InvalidCode(s.to_string()))
    }
}

impl Serialize for ErrorCode {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl<'de> Deserialize<'de> for ErrorCode {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let token = String::deserialize(deserializer)?;
        token.parse().map_err(serde::de::Error::custom)
    }
}

/// An error code bound to a namespaced error name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ErrorType {
    code: ErrorCode,
    name: String,
}

impl ErrorType {
    /// Create an error type. Fails if `name` is empty.
    pub fn new(code: ErrorCode, name: impl Into<String>) -> Result<Self, Error> {
        let name = name.into();
        if name.is_empty() {
            return Err(Error::EmptyName);
        }
        Ok(Self { code, name })
    }

    /// Create an error type from a wire code token.
    ///
    /// Fails with [`Error::InvalidCode`] if the token is not registered.
    pub fn parse(code: &str, name: impl Into<String>) -> Result<Self, Error> {
        Self::new(code.parse()?, name)
    }

    /// The default error type for a code, e.g. `NOT_FOUND` / `Default:NotFound`.
    pub fn default_for(code: ErrorCode) -> Self {
        Self {
            code,
            name: code.default_name().to_string(),
        }
    }

    pub fn code(&self) -> ErrorCode {
        self.code
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.code, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_code_parses_from_its_token() {
        for code in ErrorCode::ALL {
            assert_eq!(code.as_str().parse::<ErrorCode>().unwrap(), code);
        }
    }

    #[test]
    fn tokens_are_unique() {
        let mut tokens: Vec<_> = ErrorCode::ALL.iter().map(|c| c.as_str()).collect();
        tokens.sort();
        tokens.dedup();
        assert_eq!(tokens.len(), ErrorCode::ALL.len());
    }

    #[test]
    fn status_codes() {
        assert_eq!(ErrorCode::PermissionDenied.status_code().as_u16(), 403);
        assert_eq!(ErrorCode::InvalidArgument.status_code().as_u16(), 400);
        assert_eq!(ErrorCode::NotFound.status_code().as_u16(), 404);
        assert_eq!(ErrorCode::Conflict.status_code().as_u16(), 409);
        assert_eq!(ErrorCode::RequestEntityTooLarge.status_code().as_u16(), 413);
        assert_eq!(ErrorCode::FailedPrecondition.status_code().as_u16(), 500);
        assert_eq!(ErrorCode::Internal.status_code().as_u16(), 500);
        assert_eq!(ErrorCode::Timeout.status_code().as_u16(), 500);
        assert_eq!(ErrorCode::CustomClient.status_code().as_u16(), 400);
        assert_eq!(ErrorCode::CustomServer.status_code().as_u16(), 500);
    }

    #[test]
    fn unknown_token_is_invalid_code() {
        let err = "TEAPOT".parse::<ErrorCode>().unwrap_err();
        assert!(matches!(err, Error::InvalidCode(token) if token == "TEAPOT"));
    }

    #[test]
    fn error_type_requires_name() {
        assert!(matches!(
            ErrorType::new(ErrorCode::NotFound, ""),
            Err(Error::EmptyName)
        ));

        let error_type = ErrorType::new(ErrorCode::NotFound, "Service:MissingWidget").unwrap();
        assert_eq!(error_type.code(), ErrorCode::NotFound);
        assert_eq!(error_type.name(), "Service:MissingWidget");
    }

    #[test]
    fn parse_rejects_unregistered_code() {
        assert!(matches!(
            ErrorType::parse("NOPE", "Service:Nope"),
            Err(Error::InvalidCode(_))
        ));
        assert!(ErrorType::parse("CONFLICT", "Service:Clash").is_ok());
    }

    #[test]
    fn code_serializes_as_token() {
        let json = serde_json::to_string(&ErrorCode::RequestEntityTooLarge).unwrap();
        assert_eq!(json, r#""REQUEST_ENTITY_TOO_LARGE""#);

        let code: ErrorCode = serde_json::from_str(r#""TIMEOUT""#).unwrap();
        assert_eq!(code, ErrorCode::Timeout);
    }
}
