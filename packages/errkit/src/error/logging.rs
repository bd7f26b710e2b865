//! Logging of errors through the `log` facade
//!
//! Provides env_logger-based initialization and helpers that write errors in
//! their detailed form. Configure levels with `RUST_LOG`:
//! - `RUST_LOG=errkit=debug` - trace configuration and worker failures
//! - `RUST_LOG=warn` - captured panics and above
//! - `RUST_LOG=error` - only errors and fatal exits

use crate::error::Error;
use crate::print::Detailed;
use log::{debug, error, info, warn};
use std::error::Error as StdError;
use std::sync::Once;

static INIT_LOGGER: Once = Once::new();

/// Initialize logging (should be called once at application startup)
///
/// Later calls, and calls after another logger was installed, do nothing.
pub fn init() {
    INIT_LOGGER.call_once(|| {
        if env_logger::Builder::from_default_env()
            .format_timestamp_micros()
            .try_init()
            .is_ok()
        {
            info!("Error logging initialized");
        }
    });
}

/// Initialize logging for test environments
///
/// Use this in tests to avoid initialization conflicts
pub fn init_test() {
    let _ = env_logger::Builder::from_default_env()
        .is_test(true)
        .try_init();
}

/// Log an error in detailed form
pub fn log_error(context: &str, err: &(dyn StdError + 'static)) {
    error!("{context}: {}", Detailed(err));
}

/// Log an error that is only reported, not returned
pub fn log_warning(context: &str, err: &(dyn StdError + 'static)) {
    warn!("{context}: {err}");
}

/// Log an error that is about to terminate the process
pub fn log_fatal(err: &Error) {
    error!(
        "Fatal error (exit code {}): {}",
        crate::fatal::exit_status(err),
        Detailed(err)
    );
}

/// Log the failure of a concurrent worker
pub fn log_worker_error(worker: &str, err: &Error) {
    debug!(
        "Worker {worker} failed (root cause: {}): {err}",
        err.is_root_cause()
    );
}
