//! Plain and detailed rendering of error chains
//!
//! The plain form is the error's `Display` output. The detailed form starts
//! with the plain form and adds the recorded stack frames and every further
//! error of the chain:
//!
//! ```text
//! saving report: disk full:
//!     my_app::main
//!         src/main.rs:12
//!     my_app::save_report
//!         src/report.rs:40
//! caused by: disk full:
//!     my_app::write_file
//!         src/report.rs:71
//! ```
//!
//! Aggregates list the detailed form of each constituent as `[i/N] ...`, with
//! continuation lines indented by four spaces.

use crate::error::Error;
use crate::stack::StackTrace;
use std::error::Error as StdError;
use std::fmt::{self, Write};

const INDENT: &str = "    ";

/// Plain rendering, the same as `err.to_string()`
#[must_use]
pub fn plain(err: &(dyn StdError + 'static)) -> String {
    err.to_string()
}

/// Detailed rendering with stack frames and causes
#[must_use]
pub fn detailed(err: &(dyn StdError + 'static)) -> String {
    Detailed(err).to_string()
}

/// Plain rendering of an optional error, empty for `None`
#[must_use]
pub fn plain_opt(err: Option<&(dyn StdError + 'static)>) -> String {
    err.map(plain).unwrap_or_default()
}

/// Detailed rendering of an optional error, empty for `None`
#[must_use]
pub fn detailed_opt(err: Option<&(dyn StdError + 'static)>) -> String {
    err.map(detailed).unwrap_or_default()
}

/// Displays any error in detailed form
#[derive(Clone, Copy)]
pub struct Detailed<'a>(pub &'a (dyn StdError + 'static));

impl fmt::Display for Detailed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_link(f, self.0)
    }
}

impl fmt::Debug for Detailed<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write_link(f, self.0)
    }
}

pub(crate) fn write_detailed(f: &mut fmt::Formatter<'_>, err: &Error) -> fmt::Result {
    write_link(f, err)
}

fn write_link(f: &mut fmt::Formatter<'_>, err: &(dyn StdError + 'static)) -> fmt::Result {
    let mut link = Some(err);
    let mut first = true;
    while let Some(current) = link {
        if !first {
            f.write_str("\ncaused by: ")?;
        }
        first = false;

        write!(f, "{current}")?;
        link = match current.downcast_ref::<Error>() {
            Some(err) => {
                write_frames(f, err.own_stack_trace())?;
                write_constituents(f, err)?;
                next_link(err)
            }
            None => current.source(),
        };
    }
    Ok(())
}

/// Next link to print after `err`
///
/// The boxed error of an embedding error is part of its plain message already,
/// so printing continues with the boxed error's source.
fn next_link(err: &Error) -> Option<&(dyn StdError + 'static)> {
    match err.original() {
        Some(boxed) => boxed.source(),
        None => err.source(),
    }
}

fn write_frames(f: &mut fmt::Formatter<'_>, stack: Option<&StackTrace>) -> fmt::Result {
    let Some(stack) = stack else {
        return Ok(());
    };
    let frames = stack.visible_frames();
    if frames.is_empty() {
        return Ok(());
    }

    f.write_char(':')?;
    for frame in frames {
        write!(
            f,
            "\n{INDENT}{}\n{INDENT}{INDENT}{}",
            frame.function(),
            frame.location()
        )?;
    }
    Ok(())
}

fn write_constituents(f: &mut fmt::Formatter<'_>, err: &Error) -> fmt::Result {
    let Some(errs) = err.errors() else {
        return Ok(());
    };

    let total = errs.len();
    for (i, constituent) in errs.iter().enumerate() {
        let rendered = detailed(constituent);
        write!(f, "\n[{}/{total}] ", i + 1)?;
        for (n, line) in rendered.lines().enumerate() {
            if n > 0 {
                write!(f, "\n{INDENT}")?;
            }
            f.write_str(line)?;
        }
    }
    Ok(())
}
