//! # Worker groups collecting errors
//!
//! Both group types launch workers, wait for every one of them to finish and
//! combine the errors they returned:
//! - [`WaitGroup`] runs closures on OS threads
//! - [`Group`] runs futures as tokio tasks and can cancel a
//!   [`CancellationToken`](tokio_util::sync::CancellationToken) on the first error
//!
//! Waiting never short-circuits; cancellation is advisory and workers observe
//! it by checking the token themselves.

pub mod group;
pub mod waitgroup;

pub use errkit_list::{ErrorLister, List};
pub use group::Group;
pub use waitgroup::WaitGroup;

use errkit::{Error, PanicError};

/// Convert the payload of a panicked worker into an error
fn panic_error(payload: Box<dyn std::any::Any + Send>) -> Error {
    Error::from_std(PanicError::from_payload(payload))
}
