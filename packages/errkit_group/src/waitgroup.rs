//! Thread-based wait group

use crate::panic_error;
use errkit::{logging, Error, IntoError};
use errkit_list::{ErrorLister, List};
use parking_lot::Mutex;
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Runs closures on OS threads and collects their errors
///
/// ```
/// use errkit::Error;
/// use errkit_group::WaitGroup;
///
/// let wg = WaitGroup::new();
/// wg.spawn(|| Ok::<_, Error>(()));
/// wg.spawn(|| Err(Error::new("worker failed")));
///
/// let err = wg.wait().unwrap();
/// assert_eq!(err.to_string(), "worker failed");
/// ```
#[derive(Default)]
pub struct WaitGroup {
    errs: Arc<List>,
    handles: Mutex<Vec<JoinHandle<()>>>,
}

impl WaitGroup {
    /// Create an empty group
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Run `f` on a new thread, collecting its error
    pub fn spawn<F, E>(&self, f: F)
    where
        F: FnOnce() -> Result<(), E> + Send + 'static,
        E: IntoError,
    {
        let errs = Arc::clone(&self.errs);
        let handle = thread::spawn(move || {
            if let Err(err) = f() {
                let err = err.into_error();
                logging::log_worker_error("thread", &err);
                errs.append(err);
            }
        });
        self.handles.lock().push(handle);
    }

    /// Wait for every spawned thread and combine the collected errors
    ///
    /// A thread that panicked contributes a [`PanicError`](errkit::PanicError).
    pub fn wait(&self) -> Option<Error> {
        let handles = std::mem::take(&mut *self.handles.lock());
        for handle in handles {
            if let Err(payload) = handle.join() {
                let err = panic_error(payload);
                logging::log_worker_error("thread", &err);
                self.errs.append(err);
            }
        }
        self.errs.join()
    }
}

impl ErrorLister for WaitGroup {
    fn error_list(&self) -> &List {
        &self.errs
    }
}
