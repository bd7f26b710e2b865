//! Core error types and definitions

use crate::kind::{Kind, Msg};
use crate::stack::StackTrace;
use chrono::{DateTime, Utc};
use std::sync::Arc;

/// Any error that can be boxed into an [`Error`]
pub type DynError = dyn std::error::Error + Send + Sync + 'static;

/// Error with optional stack trace, classification and codes
///
/// Cloning is cheap and preserves identity: clones compare equal under
/// [`Error::ptr_eq`] and [`Error::contains`]. Attaching metadata to a shared
/// error copies it, and the copy still matches the original under
/// [`Error::contains`].
#[derive(Clone)]
pub struct Error {
    pub(crate) inner: Arc<ErrorInner>,
}

#[derive(Clone)]
pub(crate) struct ErrorInner {
    /// Identity shared by every copy made while upserting metadata
    pub id: u64,
    /// What the error is
    pub repr: Repr,
    /// Metadata attached with the `with_*` functions
    pub meta: Metadata,
    /// Stack trace captured at creation, wrap or aggregation time
    pub stack: Option<StackTrace>,
}

#[derive(Clone)]
pub(crate) enum Repr {
    /// Text message, optionally wrapping a cause
    ///
    /// With `inline` set the message already renders the cause.
    Message {
        msg: Msg,
        cause: Option<Error>,
        inline: bool,
    },
    /// Foreign error boxed to carry metadata
    Embed(Arc<DynError>),
    /// Several errors combined into one
    ///
    /// Without `msg` the message lists every constituent.
    Multi { errs: Vec<Error>, msg: Option<String> },
    /// Rendered message of an error whose chain is hidden
    Opaque(String),
}

/// Side-channel data attached to an error
///
/// Every slot is optional; attaching a value to an error that already has one
/// overwrites it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Metadata {
    /// Classification tag
    pub kind: Option<Kind>,
    /// Process exit code
    pub exit_code: Option<i32>,
    /// Status code, typically HTTP
    pub status_code: Option<u16>,
    /// When the error occurred
    pub time: Option<DateTime<Utc>>,
}

impl Metadata {
    /// Whether no slot is set
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.kind.is_none()
            && self.exit_code.is_none()
            && self.status_code.is_none()
            && self.time.is_none()
    }
}

/// Result type alias using our Error
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Conversion of any error value into an [`Error`]
///
/// Values that already are an `Error` are returned as is, so their identity
/// is preserved. A [`Msg`] becomes a message error; everything else is boxed.
pub trait IntoError {
    /// Convert into an [`Error`]
    fn into_error(self) -> Error;
}

impl<E> IntoError for E
where
    E: std::error::Error + Send + Sync + 'static,
{
    fn into_error(self) -> Error {
        Error::from_std(self)
    }
}
