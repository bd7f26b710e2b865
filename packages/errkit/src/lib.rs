//! Errors with stack traces, kinds, exit codes, timestamps and aggregation
//!
//! This crate augments ordinary error values with optional side-channel data:
//! - a stack trace captured when an error is created, wrapped or aggregated
//! - a classification [`Kind`], an exit code, a status code and a timestamp
//! - aggregation of several errors into one, searchable by chain matching
//! - plain (`{}`) and detailed (`{:#}`) rendering of the whole chain
//! - conversion of panics into errors and a process exit helper
//!
//! ```
//! use errkit::{Error, Kind, ResultExt};
//!
//! const CONFIG_ERROR: Kind = Kind::from_static("config error");
//!
//! fn load(path: &str) -> errkit::Result<String> {
//!     std::fs::read_to_string(path)
//!         .wrap_err("loading settings")
//!         .with_kind(CONFIG_ERROR)
//!         .with_exit_code(78)
//! }
//!
//! let err = load("/does/not/exist").unwrap_err();
//! assert_eq!(err.kind(), Some(&CONFIG_ERROR));
//! assert!(err.to_string().starts_with("[exit 78] config error: loading settings: "));
//! ```
//!
//! Stack capture is configured through [`config`]; see [`Tracer`] for building
//! errors with an explicit configuration.

pub mod config;
pub mod error;
pub mod fatal;
pub mod kind;
pub mod multi;
pub mod panic;
pub mod print;
pub mod stack;
pub mod tracer;

pub use config::{ConfigError, TraceConfig};
pub use error::extensions::{
    get_exit_code, get_exit_code_or, get_kind, get_kind_or, get_stack_trace, get_status_code,
    get_status_code_or, get_time, original, with_exit_code, with_kind, with_stack,
    with_status_code, with_time, wrap,
};
pub use error::logging;
pub use error::{Chain, DynError, Error, IntoError, Metadata, OptionExt, Result, ResultExt};
pub use fatal::{exit_on_err, exit_status, fatal_on_err};
pub use kind::{Kind, Msg, UNKNOWN_KIND};
pub use multi::{append, append_into, append_with, filter, join};
pub use panic::{catch_panic, must, panic_on_err, wrap_panic, PanicError};
pub use print::Detailed;
pub use stack::{Frame, StackTrace};
pub use tracer::Tracer;
