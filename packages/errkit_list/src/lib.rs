//! Thread-safe list of errors
//!
//! A [`List`] collects errors from several threads or tasks behind a single
//! read-write lock. Reads (`len`, `all`, `contains`, ...) share the lock,
//! mutations take it exclusively. Only actual errors are stored: appending
//! `None` is a no-op that returns `false`.
//!
//! ```
//! use errkit::Error;
//! use errkit_list::List;
//!
//! let list = List::default();
//! assert!(list.append(Error::new("first")));
//! assert!(!list.append(None));
//! assert_eq!(list.len(), 1);
//! ```

use errkit::{Error, Tracer};
use log::trace;
use parking_lot::RwLock;
use std::fmt;

/// Capacity reserved when the first error is added to an empty list
pub const DEFAULT_CAPACITY: usize = 8;

/// Types exposing the errors they collected
pub trait ErrorLister {
    /// The list of collected errors
    fn error_list(&self) -> &List;
}

/// Error list safe for concurrent use; the default value is ready to use
#[derive(Default)]
pub struct List {
    list: RwLock<Vec<Error>>,
}

impl List {
    /// Create a list holding `errs`
    #[must_use]
    pub fn new(errs: Vec<Error>) -> Self {
        Self {
            list: RwLock::new(errs),
        }
    }

    /// Create an empty list with room for `capacity` errors
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::new(Vec::with_capacity(capacity))
    }

    /// Snapshot of the collected errors
    #[must_use]
    pub fn all(&self) -> Vec<Error> {
        self.list.read().clone()
    }

    /// Number of collected errors
    #[must_use]
    pub fn len(&self) -> usize {
        self.list.read().len()
    }

    /// Whether no error was collected
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.list.read().is_empty()
    }

    /// Whether an equivalent of `err` was collected
    ///
    /// An entry is equivalent when it is a root cause exactly when `err` is one,
    /// and `err`'s chain matches it.
    #[must_use]
    pub fn contains(&self, err: &Error) -> bool {
        contains(&self.list.read(), err)
    }

    /// Combine the collected errors into one
    ///
    /// Follows the rules of [`errkit::join`]: `None` for an empty list, the
    /// error itself for a single entry, an aggregate otherwise.
    #[must_use]
    pub fn join(&self) -> Option<Error> {
        Tracer::global().join(self.all())
    }

    /// Add an error to the end of the list
    ///
    /// Returns `false`, leaving the list untouched, for `None`.
    pub fn append<E: Into<Option<Error>>>(&self, err: E) -> bool {
        let Some(err) = err.into() else {
            return false;
        };

        let mut list = self.list.write();
        reserve_default(&mut list);
        list.push(err);
        true
    }

    /// Add an error to the front of the list
    ///
    /// Returns `false`, leaving the list untouched, for `None`.
    pub fn prepend<E: Into<Option<Error>>>(&self, err: E) -> bool {
        let Some(err) = err.into() else {
            return false;
        };

        let mut list = self.list.write();
        reserve_default(&mut list);
        list.insert(0, err);
        true
    }

    /// Add an error to the end of the list unless an equivalent is present
    ///
    /// Returns whether the error was added; see [`List::contains`] for
    /// equivalence.
    pub fn append_unique<E: Into<Option<Error>>>(&self, err: E) -> bool {
        let Some(err) = err.into() else {
            return false;
        };

        let mut list = self.list.write();
        if contains(&list, &err) {
            trace!("Skipping duplicate error: {err}");
            return false;
        }
        reserve_default(&mut list);
        list.push(err);
        true
    }

    /// Remove and return every collected error
    pub fn take(&self) -> Vec<Error> {
        std::mem::take(&mut *self.list.write())
    }
}

fn reserve_default(list: &mut Vec<Error>) {
    if list.capacity() == 0 {
        list.reserve(DEFAULT_CAPACITY);
    }
}

fn contains(list: &[Error], err: &Error) -> bool {
    let root_cause = err.is_root_cause();
    list.iter()
        .any(|entry| entry.is_root_cause() == root_cause && err.matches(entry))
}

impl ErrorLister for List {
    fn error_list(&self) -> &List {
        self
    }
}

impl From<Vec<Error>> for List {
    fn from(errs: Vec<Error>) -> Self {
        Self::new(errs)
    }
}

impl Extend<Error> for List {
    fn extend<I: IntoIterator<Item = Error>>(&mut self, iter: I) {
        self.list.get_mut().extend(iter);
    }
}

impl fmt::Debug for List {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let list = self.list.read();
        f.debug_list()
            .entries(list.iter().map(ToString::to_string))
            .finish()
    }
}
