//! Wire codec for service errors.
//!
//! Errors travel as a JSON envelope:
//!
//! ```json
//! {
//!   "errorCode": "NOT_FOUND",
//!   "errorName": "Default:NotFound",
//!   "errorInstanceID": "3c1b8a52-6d0e-4c43-9d6a-2d4f0e3b5f11",
//!   "parameters": {"resource": "foo"}
//! }
//! ```
//!
//! Only safe parameters are ever written. Decoding is strict about the code
//! and name and best-effort about the parameters.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::code::{ErrorCode, ErrorType};
use crate::error::Error;
use crate::params::{ParamValue, Params};
use crate::service_error::ServiceError;

/// Outgoing envelope, borrowing from the error it describes.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct Envelope<'a> {
    error_code: ErrorCode,
    error_name: &'a str,
    #[serde(rename = "errorInstanceID")]
    error_instance_id: Uuid,
    #[serde(skip_serializing_if = "Option::is_none")]
    parameters: Option<&'a BTreeMap<String, ParamValue>>,
}

impl<'a> Envelope<'a> {
    pub(crate) fn with_parameters(error: &'a ServiceError) -> Self {
        Self {
            parameters: Some(error.params().safe()),
            ..Self::without_parameters(error)
        }
    }

    pub(crate) fn without_parameters(error: &'a ServiceError) -> Self {
        Self {
            error_code: error.code(),
            error_name: error.name(),
            error_instance_id: error.instance_id(),
            parameters: None,
        }
    }
}

/// Incoming envelope. Code and name stay strings so that an unknown code
/// can be reported as such.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireEnvelope {
    error_code: String,
    error_name: String,
    #[serde(rename = "errorInstanceID", default)]
    error_instance_id: Uuid,
    #[serde(default)]
    parameters: Option<Value>,
}

/// Ways of encoding an error, tried in order until one succeeds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum EncodeStrategy {
    /// Full envelope with safe parameters. Fails if a parameter value has
    /// no JSON representation.
    WithParameters,
    /// Code, name and instance id only. These are a registered token, a
    /// string and a UUID, none of which can fail to encode.
    WithoutParameters,
}

impl EncodeStrategy {
    const ORDER: [EncodeStrategy; 2] = [
        EncodeStrategy::WithParameters,
        EncodeStrategy::WithoutParameters,
    ];

    fn encode(self, error: &ServiceError) -> Result<Vec<u8>, serde_json::Error> {
        let envelope = match self {
            EncodeStrategy::WithParameters => Envelope::with_parameters(error),
            EncodeStrategy::WithoutParameters => Envelope::without_parameters(error),
        };
        serde_json::to_vec(&envelope)
    }
}

/// Encode an error as a wire envelope.
///
/// If the parameters cannot be encoded the envelope is re-encoded without
/// them, so code, name and instance id always reach the wire. An `Err` is
/// only returned if every strategy fails.
pub fn encode(error: &ServiceError) -> Result<Vec<u8>, Error> {
    let mut last_error = None;
    for strategy in EncodeStrategy::ORDER {
        match strategy.encode(error) {
            Ok(bytes) => return Ok(bytes),
            Err(e) => {
                debug!(?strategy, error = %e, "Error envelope encoding failed, degrading");
                last_error = Some(e);
            }
        }
    }

    match last_error {
        Some(e) => Err(Error::Encode(e)),
        None => Err(Error::malformed("no encoding strategy available")),
    }
}

/// Decode a wire envelope into a [`ServiceError`].
///
/// Fails with [`Error::MalformedEnvelope`] if the body is not an envelope or
/// lacks `errorCode`/`errorName`, and with [`Error::UnknownErrorType`] if the
/// code is not registered. Parameters that are not a JSON object are dropped
/// rather than failing the decode.
pub fn decode(bytes: &[u8]) -> Result<ServiceError, Error> {
    let envelope: WireEnvelope =
        serde_json::from_slice(bytes).map_err(|e| Error::malformed(e.to_string()))?;

    let error_type = match ErrorType::parse(&envelope.error_code, envelope.error_name.as_str()) {
        Ok(error_type) => error_type,
        Err(Error::EmptyName) => return Err(Error::malformed("errorName must not be empty")),
        Err(_) => {
            return Err(Error::UnknownErrorType {
                code: envelope.error_code,
                name: envelope.error_name,
            });
        }
    };

    let params = match envelope.parameters {
        Some(Value::Object(map)) => Params::from(map),
        Some(Value::Null) | None => Params::new(),
        Some(other) => {
            warn!(
                error_code = %error_type.code(),
                error_name = error_type.name(),
                "Ignoring error parameters that are not a JSON object: {}",
                other
            );
            Params::new()
        }
    };

    Ok(ServiceError::builder(error_type)
        .instance_id(envelope.error_instance_id)
        .with_params(params)
        .build())
}

/// Reconstruct the service error carried by an HTTP response.
pub fn error_from_response<B: AsRef<[u8]>>(
    response: &http::Response<B>,
) -> Result<ServiceError, Error> {
    debug!(status = %response.status(), "Decoding error response");
    decode(response.body().as_ref())
}
