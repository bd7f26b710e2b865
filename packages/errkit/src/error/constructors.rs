//! Error constructors and metadata upserts

use super::types::{DynError, Error, ErrorInner, Metadata, Repr};
use crate::kind::{Kind, Msg};
use crate::stack::StackTrace;
use crate::tracer::Tracer;
use chrono::{DateTime, Utc};
use std::any::Any;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

static NEXT_ID: AtomicU64 = AtomicU64::new(1);

impl Error {
    pub(crate) fn from_parts(repr: Repr, stack: Option<StackTrace>) -> Self {
        Self {
            inner: Arc::new(ErrorInner {
                id: NEXT_ID.fetch_add(1, Ordering::Relaxed),
                repr,
                meta: Metadata::default(),
                stack,
            }),
        }
    }

    /// Create a new error from a message, recording a stack trace
    ///
    /// Each call returns a distinct error, even for identical messages.
    ///
    /// ```
    /// let err = errkit::Error::new("something happened");
    /// assert_eq!(err.to_string(), "something happened");
    /// ```
    pub fn new<M: Into<Msg>>(msg: M) -> Self {
        Tracer::global().new_error(msg)
    }

    /// Wrap a causing error with a message, recording a stack trace
    ///
    /// The message is displayed as `"<msg>: <cause>"`.
    pub fn wrap<C, M>(cause: C, msg: M) -> Self
    where
        C: crate::IntoError,
        M: Into<Msg>,
    {
        Tracer::global().wrap(cause, msg)
    }

    /// Box any error without recording a stack trace
    ///
    /// An `Error` passed in is returned as is. A [`Msg`] becomes a message
    /// error matching that `Msg`.
    pub fn from_std<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        let any = &err as &dyn Any;
        if let Some(existing) = any.downcast_ref::<Error>() {
            return existing.clone();
        }
        if let Some(msg) = any.downcast_ref::<Msg>() {
            return Self::from_parts(
                Repr::Message {
                    msg: msg.clone(),
                    cause: None,
                    inline: false,
                },
                None,
            );
        }

        Self::from_parts(Repr::Embed(Arc::new(err)), None)
    }

    /// Box an already boxed error without recording a stack trace
    #[must_use]
    pub fn from_boxed(err: Box<DynError>) -> Self {
        match err.downcast::<Error>() {
            Ok(existing) => *existing,
            Err(err) => match err.downcast::<Msg>() {
                Ok(msg) => Self::from_parts(
                    Repr::Message {
                        msg: *msg,
                        cause: None,
                        inline: false,
                    },
                    None,
                ),
                Err(err) => Self::from_parts(Repr::Embed(Arc::from(err)), None),
            },
        }
    }

    /// Create an error from a message that already renders its causes
    ///
    /// The message is displayed as is. A single cause becomes the source of
    /// the error; several causes are combined like an aggregate that keeps
    /// `msg` as its message. This is what [`errorf!`](crate::errorf) builds
    /// for its `; name = cause` arguments.
    pub fn wrap_inline<M: Into<Msg>>(msg: M, causes: Vec<Error>) -> Self {
        Tracer::global().wrap_inline(msg, causes)
    }

    /// Create an error with the same message that hides the chain
    ///
    /// The result neither unwraps to nor matches anything in this error's chain.
    #[must_use]
    pub fn opaque(&self) -> Self {
        Self::from_parts(Repr::Opaque(self.to_string()), None)
    }

    /// Record a stack trace unless the error already carries one
    #[must_use]
    pub fn with_stack(self) -> Self {
        Tracer::global().with_stack(self)
    }

    /// Set the kind, overwriting a kind set before
    #[must_use]
    pub fn with_kind<K: Into<Kind>>(self, kind: K) -> Self {
        let kind = kind.into();
        self.upsert(|inner| inner.meta.kind = Some(kind))
    }

    /// Set the exit code, overwriting a code set before
    ///
    /// The code can be handed to [`std::process::exit`], see [`crate::fatal`].
    #[must_use]
    pub fn with_exit_code(self, exit_code: i32) -> Self {
        self.upsert(|inner| inner.meta.exit_code = Some(exit_code))
    }

    /// Set the (HTTP) status code, overwriting a code set before
    #[must_use]
    pub fn with_status_code(self, status_code: u16) -> Self {
        self.upsert(|inner| inner.meta.status_code = Some(status_code))
    }

    /// Set when the error occurred, overwriting a time set before
    #[must_use]
    pub fn with_time(self, when: DateTime<Utc>) -> Self {
        self.upsert(|inner| inner.meta.time = Some(when))
    }

    /// Set the current time as when the error occurred
    #[must_use]
    pub fn with_time_now(self) -> Self {
        self.with_time(Utc::now())
    }

    /// Modify this error's own holder
    ///
    /// Overwrites in place when this handle is the only one; a shared error is
    /// copied first so other handles never observe the change.
    pub(crate) fn upsert<F>(mut self, update: F) -> Self
    where
        F: FnOnce(&mut ErrorInner),
    {
        update(Arc::make_mut(&mut self.inner));
        self
    }

    /// Add `err` to this aggregate, hiding frames it shares with the aggregate's trace
    pub(crate) fn push_error(self, err: Error) -> Self {
        self.upsert(|inner| {
            if let (Some(outer), Some(own)) = (&inner.stack, err.recorded_stack()) {
                own.hide_shared_with(outer);
            }
            if let Repr::Multi { errs, .. } = &mut inner.repr {
                errs.push(err);
            }
        })
    }

    /// Stack trace recorded on this error itself, ignoring its chain
    ///
    /// A trace none of whose frames could be resolved is reported as `None`.
    #[must_use]
    pub fn own_stack_trace(&self) -> Option<&StackTrace> {
        self.recorded_stack().filter(|stack| !stack.is_empty())
    }

    /// Raw recorded trace, frames not yet resolved
    pub(crate) fn recorded_stack(&self) -> Option<&StackTrace> {
        self.inner.stack.as_ref()
    }

    /// Metadata set on this error itself, ignoring its chain
    #[must_use]
    pub fn metadata(&self) -> &Metadata {
        &self.inner.meta
    }

    /// Message of this error without its cause, kind or code
    ///
    /// For boxed errors this is the boxed error's message; for aggregates it
    /// is the combined message.
    #[must_use]
    pub fn message(&self) -> String {
        match &self.inner.repr {
            Repr::Message { msg, .. } => msg.to_string(),
            Repr::Embed(err) => err.to_string(),
            Repr::Multi { msg: Some(msg), .. } => msg.clone(),
            Repr::Multi { errs, msg: None } => super::display::multi_message(errs),
            Repr::Opaque(msg) => msg.clone(),
        }
    }

    /// Errors combined in this aggregate, `None` when it is not one
    #[must_use]
    pub fn errors(&self) -> Option<&[Error]> {
        match &self.inner.repr {
            Repr::Multi { errs, .. } => Some(errs),
            _ => None,
        }
    }

    /// Whether this error combines several errors
    #[must_use]
    pub fn is_multi(&self) -> bool {
        matches!(self.inner.repr, Repr::Multi { .. })
    }

    /// Whether this is an aggregate that grows when errors are appended to it
    ///
    /// Errors built by [`errorf!`](crate::errorf) with several causes keep
    /// their formatted message and never grow.
    pub(crate) fn is_aggregate(&self) -> bool {
        matches!(self.inner.repr, Repr::Multi { msg: None, .. })
    }

    /// Whether both handles refer to the same allocation
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Whether both errors stem from the same construction, ignoring metadata updates
    #[must_use]
    pub fn same_identity(&self, other: &Self) -> bool {
        self.inner.id == other.inner.id
    }
}

impl From<Msg> for Error {
    fn from(msg: Msg) -> Self {
        Self::new(msg)
    }
}

impl From<Box<DynError>> for Error {
    fn from(err: Box<DynError>) -> Self {
        Self::from_boxed(err)
    }
}
