//! Combining several errors into one
//!
//! An aggregate's message lists every constituent on its own numbered line:
//!
//! ```text
//! multiple errors occurred:
//! [1/2] first error;
//! [2/2] second error
//! ```
//!
//! Matching helpers such as [`Error::is`] and [`Error::find`] search every
//! constituent of an aggregate.

use crate::error::{Error, IntoError};
use crate::tracer::Tracer;

/// Drop the `None` entries, keeping order
///
/// The returned vector has at least the capacity of `errs`.
///
/// ```
/// use errkit::{multi, Error};
///
/// let errs = vec![Some(Error::new("a")), None, Some(Error::new("b"))];
/// let errs = multi::filter(errs);
/// assert_eq!(errs.len(), 2);
/// assert_eq!(errs[1].to_string(), "b");
/// ```
#[must_use]
pub fn filter<E>(errs: Vec<Option<E>>) -> Vec<E> {
    let mut res = Vec::with_capacity(errs.capacity());
    res.extend(errs.into_iter().flatten());
    res
}

/// Combine errors into one, see [`Tracer::join`]
#[inline(never)]
pub fn join<I>(errs: I) -> Option<Error>
where
    I: IntoIterator,
    I::Item: IntoError,
{
    Tracer::global().join(errs)
}

/// Combine the non-`None` errors of `errs`
#[inline(never)]
pub fn join_opt<I, E>(errs: I) -> Option<Error>
where
    I: IntoIterator<Item = Option<E>>,
    E: IntoError,
{
    Tracer::global().join(errs.into_iter().flatten())
}

/// Combine two optional errors
///
/// Returns the other error when either is `None`.
#[inline(never)]
pub fn append(left: Option<Error>, right: Option<Error>) -> Option<Error> {
    let mut dest = left;
    Tracer::global().append_into(&mut dest, right);
    dest
}

/// Merge `errs` into the error held by `dest`, see [`Tracer::append_into`]
#[inline(never)]
pub fn append_into<I>(dest: &mut Option<Error>, errs: I) -> bool
where
    I: IntoIterator,
    I::Item: IntoError,
{
    Tracer::global().append_into(dest, errs)
}

/// Run `f` and merge its error into `dest`
///
/// Intended for cleanup code at the end of a function, where a failure must
/// not replace an error already being returned:
///
/// ```
/// use errkit::{multi, Error};
///
/// fn close() -> errkit::Result<()> {
///     Err(Error::new("close failed"))
/// }
///
/// fn process() -> errkit::Result<()> {
///     let mut err = Some(Error::new("process failed"));
///     multi::append_with(&mut err, close);
///     multi::into_result(err)
/// }
///
/// let err = process().unwrap_err();
/// assert_eq!(err.errors().map(<[_]>::len), Some(2));
/// ```
#[inline(never)]
pub fn append_with<F, E>(dest: &mut Option<Error>, f: F) -> bool
where
    F: FnOnce() -> Result<(), E>,
    E: IntoError,
{
    match f() {
        Ok(()) => false,
        Err(err) => Tracer::global().append_into(dest, Some(err)),
    }
}

/// Turn an optional error into a result
///
/// # Errors
///
/// Returns the contained error.
pub fn into_result(err: Option<Error>) -> crate::Result<()> {
    match err {
        Some(err) => Err(err),
        None => Ok(()),
    }
}
