//! Metadata attachment and lookup for any error value
//!
//! The free functions accept anything convertible into an [`Error`]; a foreign
//! error is boxed once, an `Error` is updated in place. [`OptionExt`] and
//! [`ResultExt`] apply the same operations to optional errors and results, with
//! `None` and `Ok` passing through untouched.
//!
//! The `get_*` lookups work on any `dyn Error` and walk its chain until an
//! error of this crate carrying the requested value is found.

use super::chain::Chain;
use super::types::{Error, IntoError, Result};
use crate::kind::{Kind, Msg};
use crate::stack::StackTrace;
use crate::tracer::Tracer;
use chrono::{DateTime, Utc};
use std::error::Error as StdError;

/// Wrap `cause` with a message, recording a stack trace
pub fn wrap<C: IntoError, M: Into<Msg>>(cause: C, msg: M) -> Error {
    Tracer::global().wrap(cause, msg)
}

/// Record a stack trace on `err` unless it already carries one
pub fn with_stack<E: IntoError>(err: E) -> Error {
    Tracer::global().with_stack(err)
}

/// Attach a kind to `err`
pub fn with_kind<E: IntoError, K: Into<Kind>>(err: E, kind: K) -> Error {
    err.into_error().with_kind(kind)
}

/// Attach an exit code to `err`
pub fn with_exit_code<E: IntoError>(err: E, exit_code: i32) -> Error {
    err.into_error().with_exit_code(exit_code)
}

/// Attach a status code to `err`
pub fn with_status_code<E: IntoError>(err: E, status_code: u16) -> Error {
    err.into_error().with_status_code(status_code)
}

/// Attach the time the error occurred to `err`
pub fn with_time<E: IntoError>(err: E, when: DateTime<Utc>) -> Error {
    err.into_error().with_time(when)
}

fn errors_in<'a>(err: &'a (dyn StdError + 'static)) -> impl Iterator<Item = &'a Error> {
    Chain::new(err).filter_map(|link| link.downcast_ref::<Error>())
}

/// Kind of the first error in the chain that has one
pub fn get_kind<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a Kind> {
    errors_in(err).find_map(|err| err.metadata().kind.as_ref())
}

/// Kind of the chain, or `default` when none is set
pub fn get_kind_or<'a>(err: &'a (dyn StdError + 'static), default: &'a Kind) -> &'a Kind {
    get_kind(err).unwrap_or(default)
}

/// Exit code of the first error in the chain that has one
pub fn get_exit_code(err: &(dyn StdError + 'static)) -> Option<i32> {
    errors_in(err).find_map(|err| err.metadata().exit_code)
}

/// Exit code of the chain, or `default` when none is set
pub fn get_exit_code_or(err: &(dyn StdError + 'static), default: i32) -> i32 {
    get_exit_code(err).unwrap_or(default)
}

/// Status code of the first error in the chain that has one
pub fn get_status_code(err: &(dyn StdError + 'static)) -> Option<u16> {
    errors_in(err).find_map(|err| err.metadata().status_code)
}

/// Status code of the chain, or `default` when none is set
pub fn get_status_code_or(err: &(dyn StdError + 'static), default: u16) -> u16 {
    get_status_code(err).unwrap_or(default)
}

/// Time of the first error in the chain that has one
pub fn get_time(err: &(dyn StdError + 'static)) -> Option<DateTime<Utc>> {
    errors_in(err).find_map(|err| err.metadata().time)
}

/// Stack trace of the first error in the chain that recorded one
pub fn get_stack_trace<'a>(err: &'a (dyn StdError + 'static)) -> Option<&'a StackTrace> {
    errors_in(err).find_map(Error::own_stack_trace)
}

/// The foreign error boxed by `err`, or `err` itself when it boxes nothing
pub fn original<'a>(err: &'a (dyn StdError + 'static)) -> &'a (dyn StdError + 'static) {
    match err.downcast_ref::<Error>().and_then(Error::original) {
        Some(boxed) => boxed,
        None => err,
    }
}

/// Metadata operations on an optional error
///
/// Every operation returns `None` for `None`.
pub trait OptionExt {
    /// Convert the contained error into an [`Error`]
    fn into_error(self) -> Option<Error>;

    /// Wrap the contained error with a message
    fn wrap_err<M: Into<Msg>>(self, msg: M) -> Option<Error>;

    /// Record a stack trace on the contained error
    fn with_stack(self) -> Option<Error>;

    /// Attach a kind to the contained error
    fn with_kind<K: Into<Kind>>(self, kind: K) -> Option<Error>;

    /// Attach an exit code to the contained error
    fn with_exit_code(self, exit_code: i32) -> Option<Error>;

    /// Attach a status code to the contained error
    fn with_status_code(self, status_code: u16) -> Option<Error>;

    /// Attach the time the error occurred to the contained error
    fn with_time(self, when: DateTime<Utc>) -> Option<Error>;
}

impl<E: IntoError> OptionExt for Option<E> {
    fn into_error(self) -> Option<Error> {
        self.map(IntoError::into_error)
    }

    fn wrap_err<M: Into<Msg>>(self, msg: M) -> Option<Error> {
        match self {
            Some(cause) => Some(Tracer::global().wrap(cause, msg)),
            None => None,
        }
    }

    fn with_stack(self) -> Option<Error> {
        match self {
            Some(err) => Some(Tracer::global().with_stack(err)),
            None => None,
        }
    }

    fn with_kind<K: Into<Kind>>(self, kind: K) -> Option<Error> {
        self.map(|err| err.into_error().with_kind(kind))
    }

    fn with_exit_code(self, exit_code: i32) -> Option<Error> {
        self.map(|err| err.into_error().with_exit_code(exit_code))
    }

    fn with_status_code(self, status_code: u16) -> Option<Error> {
        self.map(|err| err.into_error().with_status_code(status_code))
    }

    fn with_time(self, when: DateTime<Utc>) -> Option<Error> {
        self.map(|err| err.into_error().with_time(when))
    }
}

/// Error conversion and metadata operations on results
///
/// ```
/// use errkit::ResultExt;
///
/// fn read_config(path: &str) -> errkit::Result<String> {
///     std::fs::read_to_string(path)
///         .wrap_err_with(|| format!("reading {path}"))
///         .with_exit_code(78)
/// }
///
/// let err = read_config("/does/not/exist").unwrap_err();
/// assert_eq!(err.exit_code(), Some(78));
/// ```
pub trait ResultExt<T> {
    /// Convert the error into an [`Error`] without recording a stack trace
    ///
    /// # Errors
    ///
    /// Returns the converted error of an `Err`.
    fn boxed(self) -> Result<T>;

    /// Wrap the error with a message
    ///
    /// # Errors
    ///
    /// Returns the wrapped error of an `Err`.
    fn wrap_err<M: Into<Msg>>(self, msg: M) -> Result<T>;

    /// Wrap the error with a lazily built message
    ///
    /// # Errors
    ///
    /// Returns the wrapped error of an `Err`.
    fn wrap_err_with<M, F>(self, msg: F) -> Result<T>
    where
        M: Into<Msg>,
        F: FnOnce() -> M;

    /// Record a stack trace on the error
    ///
    /// # Errors
    ///
    /// Returns the traced error of an `Err`.
    fn with_stack(self) -> Result<T>;

    /// Attach a kind to the error
    ///
    /// # Errors
    ///
    /// Returns the updated error of an `Err`.
    fn with_kind<K: Into<Kind>>(self, kind: K) -> Result<T>;

    /// Attach an exit code to the error
    ///
    /// # Errors
    ///
    /// Returns the updated error of an `Err`.
    fn with_exit_code(self, exit_code: i32) -> Result<T>;

    /// Attach a status code to the error
    ///
    /// # Errors
    ///
    /// Returns the updated error of an `Err`.
    fn with_status_code(self, status_code: u16) -> Result<T>;

    /// Attach the time the error occurred to the error
    ///
    /// # Errors
    ///
    /// Returns the updated error of an `Err`.
    fn with_time(self, when: DateTime<Utc>) -> Result<T>;
}

impl<T, E: IntoError> ResultExt<T> for std::result::Result<T, E> {
    fn boxed(self) -> Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(err.into_error()),
        }
    }

    fn wrap_err<M: Into<Msg>>(self, msg: M) -> Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(cause) => Err(Tracer::global().wrap(cause, msg)),
        }
    }

    fn wrap_err_with<M, F>(self, msg: F) -> Result<T>
    where
        M: Into<Msg>,
        F: FnOnce() -> M,
    {
        match self {
            Ok(value) => Ok(value),
            Err(cause) => Err(Tracer::global().wrap(cause, msg())),
        }
    }

    fn with_stack(self) -> Result<T> {
        match self {
            Ok(value) => Ok(value),
            Err(err) => Err(Tracer::global().with_stack(err)),
        }
    }

    fn with_kind<K: Into<Kind>>(self, kind: K) -> Result<T> {
        self.boxed().map_err(|err| err.with_kind(kind))
    }

    fn with_exit_code(self, exit_code: i32) -> Result<T> {
        self.boxed().map_err(|err| err.with_exit_code(exit_code))
    }

    fn with_status_code(self, status_code: u16) -> Result<T> {
        self.boxed().map_err(|err| err.with_status_code(status_code))
    }

    fn with_time(self, when: DateTime<Utc>) -> Result<T> {
        self.boxed().map_err(|err| err.with_time(when))
    }
}
