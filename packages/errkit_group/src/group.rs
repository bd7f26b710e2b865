//! Tokio task group with optional cancellation

use crate::panic_error;
use errkit::{logging, Error, IntoError};
use errkit_list::{ErrorLister, List};
use futures::future::join_all;
use log::debug;
use parking_lot::Mutex;
use std::future::Future;
use std::sync::Arc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Runs futures as tokio tasks and collects their errors
///
/// Errors that are root causes are only collected once; wrapped errors are
/// always collected.
#[derive(Default)]
pub struct Group {
    errs: Arc<List>,
    handles: Mutex<Vec<JoinHandle<()>>>,
    token: Option<CancellationToken>,
}

impl Group {
    /// Create a group without cancellation
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a group cancelling a child of `parent` on the first error
    ///
    /// The returned token is cancelled when a worker fails, and in any case
    /// once [`Group::wait`] returns. Cancelling `parent` cancels it as well.
    ///
    /// ```
    /// use errkit::Error;
    /// use errkit_group::Group;
    /// use tokio_util::sync::CancellationToken;
    ///
    /// # tokio_test::block_on(async {
    /// let (group, token) = Group::with_cancellation(&CancellationToken::new());
    /// group.spawn(async { Err::<(), _>(Error::new("lost connection")) });
    ///
    /// let worker = token.clone();
    /// group.spawn(async move {
    ///     worker.cancelled().await;
    ///     Ok::<_, Error>(())
    /// });
    ///
    /// let err = group.wait().await.unwrap();
    /// assert_eq!(err.to_string(), "lost connection");
    /// assert!(token.is_cancelled());
    /// # });
    /// ```
    #[must_use]
    pub fn with_cancellation(parent: &CancellationToken) -> (Self, CancellationToken) {
        let token = parent.child_token();
        let group = Self {
            token: Some(token.clone()),
            ..Self::default()
        };
        (group, token)
    }

    /// Token cancelled by this group, if it was created with one
    #[must_use]
    pub fn token(&self) -> Option<&CancellationToken> {
        self.token.as_ref()
    }

    /// Run `fut` as a tokio task, collecting its error
    ///
    /// # Panics
    ///
    /// Panics when called outside of a tokio runtime.
    pub fn spawn<Fut, E>(&self, fut: Fut)
    where
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: IntoError,
    {
        let errs = Arc::clone(&self.errs);
        let token = self.token.clone();
        let handle = tokio::spawn(async move {
            if let Err(err) = fut.await {
                collect(&errs, token.as_ref(), err.into_error());
            }
        });
        self.handles.lock().push(handle);
    }

    /// Wait for every spawned task and combine the collected errors
    ///
    /// Cancels the group's token afterwards. A task that panicked contributes a
    /// [`PanicError`](errkit::PanicError).
    pub async fn wait(&self) -> Option<Error> {
        loop {
            let handles = std::mem::take(&mut *self.handles.lock());
            if handles.is_empty() {
                break;
            }

            for res in join_all(handles).await {
                match res {
                    Ok(()) => {}
                    Err(join_err) if join_err.is_panic() => {
                        collect(&self.errs, self.token.as_ref(), panic_error(join_err.into_panic()));
                    }
                    Err(join_err) => debug!("Group task did not complete: {join_err}"),
                }
            }
        }

        let err = self.errs.join();
        if let Some(token) = &self.token {
            token.cancel();
        }
        err
    }
}

fn collect(errs: &List, token: Option<&CancellationToken>, err: Error) {
    logging::log_worker_error("task", &err);
    if err.is_root_cause() {
        errs.append_unique(err);
    } else {
        errs.append(err);
    }

    if let Some(token) = token {
        token.cancel();
    }
}

impl ErrorLister for Group {
    fn error_list(&self) -> &List {
        &self.errs
    }
}
