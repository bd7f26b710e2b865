//! Turning panics into errors
//!
//! [`catch_panic`] must directly enclose the code that may panic. A panic
//! raised outside of its closure, for example in code running after it
//! returns, is not observed.

use crate::error::{Error, IntoError};
use crate::tracer::Tracer;
use log::warn;
use std::any::Any;
use std::panic::{self, AssertUnwindSafe};

/// Error created from a panic payload
#[derive(Debug, thiserror::Error)]
pub enum PanicError {
    /// The panic carried an [`Error`]
    #[error("panic: {0}")]
    Error(#[source] Error),
    /// The panic carried a message
    #[error("panic: {0}")]
    Message(String),
    /// The panic carried a value that is neither an error nor a string
    #[error("panic: <non-string payload>")]
    NonString,
}

impl PanicError {
    /// Convert a payload as returned by [`std::panic::catch_unwind`]
    #[must_use]
    pub fn from_payload(payload: Box<dyn Any + Send>) -> Self {
        let payload = match payload.downcast::<Error>() {
            Ok(err) => return Self::Error(*err),
            Err(payload) => payload,
        };
        let payload = match payload.downcast::<String>() {
            Ok(msg) => return Self::Message(*msg),
            Err(payload) => payload,
        };
        match payload.downcast_ref::<&'static str>() {
            Some(msg) => Self::Message((*msg).to_string()),
            None => Self::NonString,
        }
    }

    /// The error carried by the panic, if it carried one
    #[must_use]
    pub fn payload_error(&self) -> Option<&Error> {
        match self {
            Self::Error(err) => Some(err),
            _ => None,
        }
    }
}

/// Run `f`, merging a panic raised by it into `dest`
///
/// Returns `f`'s value, or `None` when it panicked. The panic is merged with
/// the same rules as [`append_into`](crate::multi::append_into); an [`Error`]
/// carried by the panic stays reachable through the chain.
///
/// ```
/// let mut err = None;
/// let res = errkit::catch_panic(&mut err, || -> u32 { panic!("boom") });
///
/// assert!(res.is_none());
/// assert_eq!(err.unwrap().to_string(), "panic: boom");
/// ```
#[inline(never)]
pub fn catch_panic<F, R>(dest: &mut Option<Error>, f: F) -> Option<R>
where
    F: FnOnce() -> R,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => Some(value),
        Err(payload) => {
            let err = PanicError::from_payload(payload).into_error();
            warn!("Captured panic: {err}");
            Tracer::global().append_into(dest, Some(err));
            None
        }
    }
}

/// Return the value of `res`, panicking with the detailed error otherwise
///
/// # Panics
///
/// Panics when `res` is an `Err`.
#[track_caller]
pub fn must<T, E: IntoError>(res: Result<T, E>) -> T {
    match res {
        Ok(value) => value,
        Err(err) => panic!("errkit::must: {:#}", err.into_error()),
    }
}

/// Panic with the detailed rendering of `err` when there is one
///
/// # Panics
///
/// Panics when `err` is `Some`.
#[track_caller]
pub fn panic_on_err<E: IntoError>(err: Option<E>) {
    if let Some(err) = err {
        panic!("{:#}", err.into_error());
    }
}

/// Run `f`, prefixing the message of a panic raised by it
///
/// # Panics
///
/// Re-panics with `"<prefix>: <payload>"` when `f` panics.
pub fn wrap_panic<F, R>(prefix: &str, f: F) -> R
where
    F: FnOnce() -> R,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(value) => value,
        Err(payload) => match PanicError::from_payload(payload) {
            PanicError::Error(err) => panic::panic_any(Error::wrap(err, prefix.to_string())),
            PanicError::Message(msg) => panic!("{prefix}: {msg}"),
            PanicError::NonString => panic!("{prefix}: <non-string payload>"),
        },
    }
}
