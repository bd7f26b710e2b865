//! Error type with stack traces, metadata and chain matching
//!
//! Provides:
//! - Message, wrapping, boxed and aggregate errors behind one cheap handle
//! - Copy-on-write metadata upserts
//! - Chain traversal and matching that descends into aggregates
//! - Logging of errors through env_logger

pub mod chain;
pub mod constructors;
pub mod display;
pub mod extensions;
pub mod logging;
pub mod macros;
pub mod types;

pub use chain::Chain;
pub use extensions::{OptionExt, ResultExt};
pub use types::{DynError, Error, IntoError, Metadata, Result};

pub(crate) use types::Repr;
