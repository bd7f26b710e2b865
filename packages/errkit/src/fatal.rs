//! Process exit on unrecoverable errors

use crate::error::{logging, Error, IntoError};
use std::io::Write;

/// Exit code used for errors without one, or with an exit code of 0
pub const DEFAULT_EXIT_CODE: i32 = 1;

/// Exit code the process terminates with for `err`
#[must_use]
pub fn exit_status(err: &Error) -> i32 {
    match err.exit_code() {
        Some(0) | None => DEFAULT_EXIT_CODE,
        Some(code) => code,
    }
}

/// Message written to stderr before exiting
#[must_use]
pub fn fatal_message(err: &Error) -> String {
    format!("\nFatal error: {err:#}\n")
}

/// Write `err` to stderr and exit the process, if there is an error
///
/// The process exits with [`exit_status`].
pub fn fatal_on_err(err: Option<&Error>) {
    if let Some(err) = err {
        exit_with(err);
    }
}

/// Return the value of `res`, or write the error to stderr and exit the process
pub fn exit_on_err<T, E: IntoError>(res: Result<T, E>) -> T {
    match res {
        Ok(value) => value,
        Err(err) => exit_with(&err.into_error()),
    }
}

fn exit_with(err: &Error) -> ! {
    logging::log_fatal(err);

    let mut stderr = std::io::stderr().lock();
    let _ = stderr.write_all(fatal_message(err).as_bytes());
    let _ = stderr.flush();
    drop(stderr);

    std::process::exit(exit_status(err))
}
