//! The service error value.
//!
//! A [`ServiceError`] is created once at the point of failure and is
//! immutable afterwards. It carries an [`ErrorType`], a per-occurrence
//! instance id and a set of safe and unsafe parameters.

use std::fmt;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};
use uuid::Uuid;

use crate::code::{ErrorCode, ErrorType};
use crate::params::{Param, Params};

/// An expected failure with a stable code and name.
///
/// # Example
///
/// ```
/// use rest_errors::{ErrorCode, ServiceError, safe_param, unsafe_param};
///
/// let err = ServiceError::not_found([
///     safe_param("resource", "widget-7"),
///     unsafe_param("owner", "alice@example.com"),
/// ]);
///
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.name(), "Default:NotFound");
/// assert_eq!(err.parameters()["resource"], "widget-7");
/// assert!(!err.parameters().contains_key("owner"));
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct ServiceError {
    error_type: ErrorType,
    instance_id: Uuid,
    params: Params,
}

impl ServiceError {
    /// Create an error with a fresh instance id.
    pub fn new(error_type: ErrorType, params: impl IntoIterator<Item = Param>) -> Self {
        Self::builder(error_type).params(params).build()
    }

    pub fn builder(error_type: ErrorType) -> ServiceErrorBuilder {
        ServiceErrorBuilder {
            error_type,
            instance_id: None,
            params: Params::new(),
        }
    }

    fn with_default_type(code: ErrorCode, params: impl IntoIterator<Item = Param>) -> Self {
        Self::new(ErrorType::default_for(code), params)
    }

    pub fn permission_denied(params: impl IntoIterator<Item = Param>) -> Self {
        Self::with_default_type(ErrorCode::PermissionDenied, params)
    }

    pub fn invalid_argument(params: impl IntoIterator<Item = Param>) -> Self {
        Self::with_default_type(ErrorCode::InvalidArgument, params)
    }

    pub fn not_found(params: impl IntoIterator<Item = Param>) -> Self {
        Self::with_default_type(ErrorCode::NotFound, params)
    }

    pub fn conflict(params: impl IntoIterator<Item = Param>) -> Self {
        Self::with_default_type(ErrorCode::Conflict, params)
    }

    pub fn request_entity_too_large(params: impl IntoIterator<Item = Param>) -> Self {
        Self::with_default_type(ErrorCode::RequestEntityTooLarge, params)
    }

    pub fn failed_precondition(params: impl IntoIterator<Item = Param>) -> Self {
        Self::with_default_type(ErrorCode::FailedPrecondition, params)
    }

    pub fn internal(params: impl IntoIterator<Item = Param>) -> Self {
        Self::with_default_type(ErrorCode::Internal, params)
    }

    pub fn timeout(params: impl IntoIterator<Item = Param>) -> Self {
        Self::with_default_type(ErrorCode::Timeout, params)
    }

    pub fn code(&self) -> ErrorCode {
        self.error_type.code()
    }

    pub fn name(&self) -> &str {
        self.error_type.name()
    }

    pub fn error_type(&self) -> &ErrorType {
        &self.error_type
    }

    pub fn instance_id(&self) -> Uuid {
        self.instance_id
    }

    /// Safe parameters. Never includes unsafe values.
    pub fn parameters(&self) -> Map<String, Value> {
        self.params.safe_json()
    }

    /// Unsafe parameters, for local logging only.
    pub fn unsafe_parameters(&self) -> Map<String, Value> {
        self.params.unsafe_json()
    }

    pub(crate) fn params(&self) -> &Params {
        &self.params
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.error_type, self.instance_id)
    }
}

impl std::error::Error for ServiceError {}

impl Serialize for ServiceError {
    /// Serializes as the full wire envelope, safe parameters included.
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        crate::wire::Envelope::with_parameters(self).serialize(serializer)
    }
}

/// Builder for [`ServiceError`] values with an explicit instance id.
#[derive(Debug, Clone)]
pub struct ServiceErrorBuilder {
    error_type: ErrorType,
    instance_id: Option<Uuid>,
    params: Params,
}

impl ServiceErrorBuilder {
    /// Use a known instance id instead of generating one.
    pub fn instance_id(mut self, instance_id: Uuid) -> Self {
        self.instance_id = Some(instance_id);
        self
    }

    pub fn param(mut self, param: Param) -> Self {
        self.params.insert(param);
        self
    }

    pub fn params(mut self, params: impl IntoIterator<Item = Param>) -> Self {
        for param in params {
            self.params.insert(param);
        }
        self
    }

    /// Replace all parameters. Used when rebuilding an error read off the wire.
    pub(crate) fn with_params(mut self, params: Params) -> Self {
        self.params = params;
        self
    }

    pub fn build(self) -> ServiceError {
        ServiceError {
            error_type: self.error_type,
            instance_id: self.instance_id.unwrap_or_else(Uuid::new_v4),
            params: self.params,
        }
    }
}
