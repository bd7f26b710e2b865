//! Chain traversal and matching
//!
//! The chain of an error is the error itself followed by every error reached
//! through [`std::error::Error::source`]. Matching helpers additionally descend
//! into the constituents of aggregates.

use super::types::{DynError, Error, Repr};
use crate::kind::{Kind, Msg};
use crate::stack::StackTrace;
use chrono::{DateTime, Utc};
use std::any::Any;
use std::error::Error as StdError;

/// Iterator over an error and its sources
#[derive(Clone)]
pub struct Chain<'a> {
    next: Option<&'a (dyn StdError + 'static)>,
}

impl<'a> Chain<'a> {
    /// Start iterating at `err`
    #[must_use]
    pub fn new(err: &'a (dyn StdError + 'static)) -> Self {
        Self { next: Some(err) }
    }
}

impl<'a> Iterator for Chain<'a> {
    type Item = &'a (dyn StdError + 'static);

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = current.source();
        Some(current)
    }
}

impl std::iter::FusedIterator for Chain<'_> {}

/// Visit every link of the chain, descending into aggregate constituents
///
/// Stops at the first link for which `visit` returns a value.
pub(crate) fn search<'a, R>(
    err: &'a (dyn StdError + 'static),
    visit: &mut dyn FnMut(&'a (dyn StdError + 'static)) -> Option<R>,
) -> Option<R> {
    for link in Chain::new(err) {
        if let Some(found) = visit(link) {
            return Some(found);
        }
        if let Some(errs) = link.downcast_ref::<Error>().and_then(Error::errors) {
            for constituent in errs {
                if let Some(found) = search(constituent, &mut *visit) {
                    return Some(found);
                }
            }
        }
    }
    None
}

/// Whether a single link equals `target`
///
/// Errors of this crate match a [`Msg`] by their message and a [`Kind`] by
/// their kind.
fn link_is<T>(link: &(dyn StdError + 'static), target: &T) -> bool
where
    T: StdError + PartialEq + 'static,
{
    if let Some(err) = link.downcast_ref::<Error>() {
        let target = target as &dyn Any;
        if let Some(msg) = target.downcast_ref::<Msg>() {
            return matches!(&err.inner.repr, Repr::Message { msg: own, .. } if own == msg);
        }
        if let Some(kind) = target.downcast_ref::<Kind>() {
            return err.inner.meta.kind.as_ref() == Some(kind);
        }
        return false;
    }

    link.downcast_ref::<T>().is_some_and(|link| link == target)
}

impl Error {
    /// Iterate over this error and its sources
    #[must_use]
    pub fn chain(&self) -> Chain<'_> {
        Chain::new(self)
    }

    /// The last error of the chain
    #[must_use]
    pub fn root_cause(&self) -> &(dyn StdError + 'static) {
        let mut root: &(dyn StdError + 'static) = self;
        for link in self.chain() {
            root = link;
        }
        root
    }

    /// Whether this error does not wrap another error
    ///
    /// A boxed foreign error is a root cause when the boxed error itself has no
    /// source.
    #[must_use]
    pub fn is_root_cause(&self) -> bool {
        match &self.inner.repr {
            Repr::Message { cause, .. } => cause.is_none(),
            Repr::Embed(err) => err.source().is_none(),
            Repr::Multi { .. } | Repr::Opaque(_) => true,
        }
    }

    /// Every link of the chain, starting with this error and ending with the root cause
    #[must_use]
    pub fn unwrap_all(&self) -> Vec<&(dyn StdError + 'static)> {
        self.chain().collect()
    }

    /// Whether any error in the chain, or in an aggregate's constituents, equals `target`
    ///
    /// ```
    /// use errkit::{Error, Msg};
    ///
    /// const ERR_NOT_FOUND: Msg = Msg::from_static("not found");
    ///
    /// let err = Error::wrap(Error::new(ERR_NOT_FOUND), "loading user");
    /// assert!(err.is(&ERR_NOT_FOUND));
    /// ```
    pub fn is<T>(&self, target: &T) -> bool
    where
        T: StdError + PartialEq + 'static,
    {
        search(self, &mut |link| link_is(link, target).then_some(())).is_some()
    }

    /// First error of type `T` in the chain or in an aggregate's constituents
    #[must_use]
    pub fn find<T>(&self) -> Option<&T>
    where
        T: StdError + 'static,
    {
        search(self, &mut |link| link.downcast_ref::<T>())
    }

    /// Whether `target`, or a metadata-updated copy of it, is part of this error
    #[must_use]
    pub fn contains(&self, target: &Error) -> bool {
        search(self, &mut |link| {
            link.downcast_ref::<Error>()
                .filter(|link| link.same_identity(target))
                .map(|_| ())
        })
        .is_some()
    }

    /// Whether this error's chain matches `target`
    ///
    /// Besides identity, a root cause message matches another root cause with
    /// the same message, and boxed foreign errors match when they box the same
    /// value.
    #[must_use]
    pub fn matches(&self, target: &Error) -> bool {
        search(self, &mut |link| {
            let link = link.downcast_ref::<Error>()?;
            let found = link.same_identity(target)
                || match (&link.inner.repr, &target.inner.repr) {
                    (
                        Repr::Message { msg, cause: None, .. },
                        Repr::Message {
                            msg: other,
                            cause: None,
                            ..
                        },
                    ) => msg == other,
                    (Repr::Embed(err), Repr::Embed(other)) => std::ptr::addr_eq(
                        std::sync::Arc::as_ptr(err),
                        std::sync::Arc::as_ptr(other),
                    ),
                    _ => false,
                };
            found.then_some(())
        })
        .is_some()
    }

    /// Kind set on the first error of the chain that has one
    #[must_use]
    pub fn kind(&self) -> Option<&Kind> {
        self.chain_errors().find_map(|err| err.inner.meta.kind.as_ref())
    }

    /// Kind of the chain, or `default` when none is set
    #[must_use]
    pub fn kind_or<'a>(&'a self, default: &'a Kind) -> &'a Kind {
        self.kind().unwrap_or(default)
    }

    /// Exit code set on the first error of the chain that has one
    #[must_use]
    pub fn exit_code(&self) -> Option<i32> {
        self.chain_errors().find_map(|err| err.inner.meta.exit_code)
    }

    /// Exit code of the chain, or `default` when none is set
    #[must_use]
    pub fn exit_code_or(&self, default: i32) -> i32 {
        self.exit_code().unwrap_or(default)
    }

    /// Status code set on the first error of the chain that has one
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.chain_errors().find_map(|err| err.inner.meta.status_code)
    }

    /// Status code of the chain, or `default` when none is set
    #[must_use]
    pub fn status_code_or(&self, default: u16) -> u16 {
        self.status_code().unwrap_or(default)
    }

    /// Time set on the first error of the chain that has one
    #[must_use]
    pub fn time(&self) -> Option<DateTime<Utc>> {
        self.chain_errors().find_map(|err| err.inner.meta.time)
    }

    /// Stack trace of the first error of the chain that recorded one
    #[must_use]
    pub fn stack_trace(&self) -> Option<&StackTrace> {
        self.chain_errors().find_map(Error::own_stack_trace)
    }

    /// The foreign error boxed by this error, if any
    #[must_use]
    pub fn original(&self) -> Option<&DynError> {
        match &self.inner.repr {
            Repr::Embed(err) => Some(err.as_ref()),
            _ => None,
        }
    }

    fn chain_errors(&self) -> impl Iterator<Item = &Error> {
        self.chain().filter_map(|link| link.downcast_ref::<Error>())
    }
}
