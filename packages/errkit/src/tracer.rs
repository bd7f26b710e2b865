//! Error factory with injected trace configuration
//!
//! Every constructor of this crate that records a stack trace goes through a
//! [`Tracer`]. The free functions and `Error` constructors use
//! [`Tracer::global`]; code that needs deterministic behavior, such as tests
//! asserting on traces, builds its own:
//!
//! ```
//! use errkit::Tracer;
//!
//! let tracer = Tracer::untraced();
//! let err = tracer.wrap(tracer.new_error("disk full"), "saving report");
//! assert!(err.stack_trace().is_none());
//! assert_eq!(err.to_string(), "saving report: disk full");
//! ```

use crate::config::{self, TraceConfig};
use crate::error::{Error, IntoError, Repr};
use crate::kind::Msg;
use crate::stack::StackTrace;

/// Traced or untraced error factory
///
/// The default factory is [`Tracer::global`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Tracer {
    config: TraceConfig,
}

impl Default for Tracer {
    fn default() -> Self {
        Self::global()
    }
}

impl Tracer {
    /// Factory using `config`
    #[must_use]
    pub const fn new(config: TraceConfig) -> Self {
        Self { config }
    }

    /// Factory using the process-wide configuration
    #[must_use]
    pub fn global() -> Self {
        Self::new(*config::global())
    }

    /// Factory recording traces with the default frame bound
    #[must_use]
    pub const fn traced() -> Self {
        Self::new(TraceConfig::enabled())
    }

    /// Factory never recording traces
    #[must_use]
    pub const fn untraced() -> Self {
        Self::new(TraceConfig::disabled())
    }

    /// Configuration of this factory
    #[must_use]
    pub const fn config(&self) -> &TraceConfig {
        &self.config
    }

    /// Whether errors built by this factory carry stack traces
    #[must_use]
    pub const fn is_tracing(&self) -> bool {
        self.config.captures()
    }

    /// Capture the current call stack according to this factory's configuration
    #[inline(never)]
    #[must_use]
    pub fn capture(&self) -> Option<StackTrace> {
        StackTrace::capture(&self.config)
    }

    /// Create a new error from a message
    #[inline(never)]
    pub fn new_error<M: Into<Msg>>(&self, msg: M) -> Error {
        Error::from_parts(
            Repr::Message {
                msg: msg.into(),
                cause: None,
                inline: false,
            },
            self.capture(),
        )
    }

    /// Wrap a causing error with a message
    ///
    /// Frames the cause's trace shares with the new trace are hidden when
    /// printing.
    #[inline(never)]
    pub fn wrap<C: IntoError, M: Into<Msg>>(&self, cause: C, msg: M) -> Error {
        let cause = cause.into_error();
        let stack = self.capture();
        if let (Some(outer), Some(own)) = (&stack, cause.recorded_stack()) {
            own.hide_shared_with(outer);
        }

        Error::from_parts(
            Repr::Message {
                msg: msg.into(),
                cause: Some(cause),
                inline: false,
            },
            stack,
        )
    }

    /// Create an error from a message that already renders its causes
    ///
    /// No causes result in a plain message error and a single cause becomes
    /// the source. Several causes are combined like an aggregate keeping `msg`
    /// as its message.
    #[inline(never)]
    pub fn wrap_inline<M: Into<Msg>>(&self, msg: M, mut causes: Vec<Error>) -> Error {
        let stack = self.capture();
        if let Some(outer) = &stack {
            for cause in &causes {
                if let Some(own) = cause.recorded_stack() {
                    own.hide_shared_with(outer);
                }
            }
        }

        let msg = msg.into();
        let repr = match causes.len() {
            0 => Repr::Message {
                msg,
                cause: None,
                inline: false,
            },
            1 => Repr::Message {
                msg,
                cause: causes.pop(),
                inline: true,
            },
            _ => Repr::Multi {
                errs: causes,
                msg: Some(msg.to_string()),
            },
        };
        Error::from_parts(repr, stack)
    }

    /// Record a stack trace on `err` unless it already carries one
    #[inline(never)]
    pub fn with_stack<E: IntoError>(&self, err: E) -> Error {
        let err = err.into_error();
        if err.own_stack_trace().is_some() {
            return err;
        }

        match self.capture() {
            Some(stack) => err.upsert(|inner| inner.stack = Some(stack)),
            None => err,
        }
    }

    /// Combine errors into one
    ///
    /// No errors result in `None` and a single error is returned traced but
    /// otherwise unchanged. Two or more errors become an aggregate.
    #[inline(never)]
    pub fn join<I>(&self, errs: I) -> Option<Error>
    where
        I: IntoIterator,
        I::Item: IntoError,
    {
        let mut errs: Vec<Error> = errs.into_iter().map(IntoError::into_error).collect();
        match errs.len() {
            0 => None,
            1 => errs.pop().map(|err| self.with_stack(err)),
            _ => Some(self.multi(errs)),
        }
    }

    /// Aggregate `errs` regardless of their number
    #[inline(never)]
    pub fn multi(&self, errs: Vec<Error>) -> Error {
        let stack = self.capture();
        if let Some(outer) = &stack {
            for err in &errs {
                if let Some(own) = err.recorded_stack() {
                    own.hide_shared_with(outer);
                }
            }
        }

        Error::from_parts(Repr::Multi { errs, msg: None }, stack)
    }

    /// Merge `errs` into the error held by `dest`
    ///
    /// An empty `dest` takes the first error as is. An aggregate in `dest`
    /// grows by the new error; any other error is promoted into a new
    /// aggregate holding both. Returns whether an aggregate was created or grown.
    #[inline(never)]
    pub fn append_into<I>(&self, dest: &mut Option<Error>, errs: I) -> bool
    where
        I: IntoIterator,
        I::Item: IntoError,
    {
        let mut aggregated = false;
        for err in errs {
            let err = err.into_error();
            *dest = Some(match dest.take() {
                None => err,
                Some(existing) if existing.is_aggregate() => {
                    aggregated = true;
                    existing.push_error(err)
                }
                Some(existing) => {
                    aggregated = true;
                    self.multi(vec![existing, err])
                }
            });
        }
        aggregated
    }
}
