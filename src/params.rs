//! Safe and unsafe error parameters.
//!
//! Safe parameters may be logged and are written to the wire body. Unsafe
//! parameters are for local diagnostics only and are never serialized into
//! a response.

use std::collections::BTreeMap;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

/// Whether a parameter may leave the process.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Safety {
    Safe,
    Unsafe,
}

/// A parameter value captured at construction time.
///
/// Values are converted to JSON eagerly. A value that has no JSON
/// representation is kept as [`ParamValue::Unencodable`] so that the error
/// can still be built; encoding it later fails.
#[derive(Debug, Clone, PartialEq)]
pub enum ParamValue {
    Json(Value),
    Unencodable(String),
}

impl ParamValue {
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Self {
        match serde_json::to_value(value) {
            Ok(json) => ParamValue::Json(json),
            Err(e) => ParamValue::Unencodable(e.to_string()),
        }
    }

    pub fn as_json(&self) -> Option<&Value> {
        match self {
            ParamValue::Json(value) => Some(value),
            ParamValue::Unencodable(_) => None,
        }
    }
}

impl Serialize for ParamValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            ParamValue::Json(value) => value.serialize(serializer),
            ParamValue::Unencodable(reason) => Err(serde::ser::Error::custom(format!(
                "unencodable parameter value: {reason}"
            ))),
        }
    }
}

/// A named parameter tagged with its safety.
#[derive(Debug, Clone, PartialEq)]
pub struct Param {
    pub key: String,
    pub value: ParamValue,
    pub safety: Safety,
}

/// Create a parameter that may be logged and written to the wire.
pub fn safe_param<T: Serialize + ?Sized>(key: impl Into<String>, value: &T) -> Param {
    Param {
        key: key.into(),
        value: ParamValue::from_serialize(value),
        safety: Safety::Safe,
    }
}

/// Create a parameter that is only ever logged locally.
pub fn unsafe_param<T: Serialize + ?Sized>(key: impl Into<String>, value: &T) -> Param {
    Param {
        key: key.into(),
        value: ParamValue::from_serialize(value),
        safety: Safety::Unsafe,
    }
}

/// Two disjoint parameter maps.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Params {
    safe: BTreeMap<String, ParamValue>,
    unsafe_: BTreeMap<String, ParamValue>,
}

impl Params {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a parameter. A key lives in only one of the two maps; the
    /// latest insertion decides which.
    pub fn insert(&mut self, param: Param) {
        let Param { key, value, safety } = param;
        match safety {
            Safety::Safe => {
                self.unsafe_.remove(&key);
                self.safe.insert(key, value);
            }
            Safety::Unsafe => {
                self.safe.remove(&key);
                self.unsafe_.insert(key, value);
            }
        }
    }

    pub(crate) fn safe(&self) -> &BTreeMap<String, ParamValue> {
        &self.safe
    }

    /// JSON-representable safe parameters.
    pub fn safe_json(&self) -> Map<String, Value> {
        to_json_map(&self.safe)
    }

    /// JSON-representable unsafe parameters.
    pub fn unsafe_json(&self) -> Map<String, Value> {
        to_json_map(&self.unsafe_)
    }
}

impl FromIterator<Param> for Params {
    fn from_iter<I: IntoIterator<Item = Param>>(iter: I) -> Self {
        let mut params = Params::new();
        for param in iter {
            params.insert(param);
        }
        params
    }
}

impl From<Map<String, Value>> for Params {
    /// Parameters read off the wire are safe by construction.
    fn from(map: Map<String, Value>) -> Self {
        Self {
            safe: map
                .into_iter()
                .map(|(key, value)| (key, ParamValue::Json(value)))
                .collect(),
            unsafe_: BTreeMap::new(),
        }
    }
}

fn to_json_map(params: &BTreeMap<String, ParamValue>) -> Map<String, Value> {
    params
        .iter()
        .filter_map(|(key, value)| value.as_json().map(|json| (key.clone(), json.clone())))
        .collect()
}
