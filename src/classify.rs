//! Failure classification.
//!
//! A handler failure is either a [`ServiceError`] somewhere at the root of
//! its `source()` chain, or an opaque error that must not leak past the
//! process boundary.

use std::error::Error as StdError;
use std::fmt;

use crate::service_error::ServiceError;

/// Maximum number of errors in a `source()` chain, the outermost included.
/// Longer chains, including ones that loop back on themselves, are opaque.
pub const MAX_CAUSE_DEPTH: usize = 32;

/// The two kinds of handler failure.
#[derive(Debug)]
pub enum Failure<'a> {
    /// An expected error, exposed with its code, name and safe parameters.
    Domain(&'a ServiceError),
    /// Anything else. Masked behind a generic internal error on the wire.
    Opaque(&'a (dyn StdError + 'static)),
}

impl Failure<'_> {
    /// The error written to the client for this failure.
    ///
    /// Opaque failures get a fresh internal error with no parameters.
    pub fn to_service_error(&self) -> ServiceError {
        match self {
            Failure::Domain(err) => (*err).clone(),
            Failure::Opaque(_) => ServiceError::internal([]),
        }
    }
}

/// Classify a failure by its root cause.
///
/// The `source()` chain is walked to its end. If the root cause is a
/// [`ServiceError`] it is adopted as-is; otherwise, or if the chain is longer
/// than [`MAX_CAUSE_DEPTH`], the failure is opaque.
pub fn classify<'a>(err: &'a (dyn StdError + 'static)) -> Failure<'a> {
    match root_cause(err) {
        Some(root) => match root.downcast_ref::<ServiceError>() {
            Some(service_error) => Failure::Domain(service_error),
            None => Failure::Opaque(err),
        },
        None => Failure::Opaque(err),
    }
}

/// The last error in the `source()` chain, or `None` if the chain holds more
/// than [`MAX_CAUSE_DEPTH`] errors. A cyclic chain never ends and so always
/// hits the bound.
pub fn root_cause<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a (dyn StdError + 'static)> {
    let mut current = err;
    for _ in 0..MAX_CAUSE_DEPTH {
        match current.source() {
            Some(next) => current = next,
            None => return Some(current),
        }
    }
    None
}

/// Displays an error followed by its sources, separated by `": "`.
///
/// Stops after [`MAX_CAUSE_DEPTH`] errors.
pub struct CauseChain<'a>(pub &'a (dyn StdError + 'static));

impl fmt::Display for CauseChain<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)?;
        let mut current = self.0.source();
        let mut depth = 1;
        while let Some(err) = current {
            if depth == MAX_CAUSE_DEPTH {
                return write!(f, ": ...");
            }
            write!(f, ": {}", err)?;
            current = err.source();
            depth += 1;
        }
        Ok(())
    }
}
