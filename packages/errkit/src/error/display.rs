//! Display and trait implementations for Error

use super::types::{Error, Metadata, Repr};
use crate::print;
use std::fmt;

impl Metadata {
    /// Writes the `"[exit <code>] <kind>: "` prefix of the plain message
    fn write_prefix(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(code) = self.exit_code {
            write!(f, "[exit {code}] ")?;
        }
        if let Some(kind) = self.kind.as_ref().filter(|kind| !kind.is_unknown()) {
            write!(f, "{kind}: ")?;
        }
        Ok(())
    }
}

pub(crate) fn multi_message(errs: &[Error]) -> String {
    let mut msg = String::from("multiple errors occurred:");
    let total = errs.len();
    for (i, err) in errs.iter().enumerate() {
        msg.push_str(&format!("\n[{}/{total}] {err}", i + 1));
        if i + 1 < total {
            msg.push(';');
        }
    }
    msg
}

impl Error {
    fn write_plain(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.meta.write_prefix(f)?;

        match &self.inner.repr {
            Repr::Message { msg, cause, inline } => match cause {
                Some(cause) if !*inline && msg.is_empty() => write!(f, "{cause}"),
                Some(cause) if !*inline => write!(f, "{msg}: {cause}"),
                _ => write!(f, "{msg}"),
            },
            Repr::Embed(err) => write!(f, "{err}"),
            Repr::Multi { msg: Some(msg), .. } => f.write_str(msg),
            Repr::Multi { errs, msg: None } => f.write_str(&multi_message(errs)),
            Repr::Opaque(msg) => f.write_str(msg),
        }
    }
}

/// `{}` prints the plain message, `{:#}` the detailed report with stack traces
impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if f.alternate() {
            print::write_detailed(f, self)
        } else {
            self.write_plain(f)
        }
    }
}

impl fmt::Debug for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        print::write_detailed(f, self)
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match &self.inner.repr {
            Repr::Message { cause, .. } => cause
                .as_ref()
                .map(|cause| cause as &(dyn std::error::Error + 'static)),
            Repr::Embed(err) => Some(err.as_ref() as &(dyn std::error::Error + 'static)),
            Repr::Multi { .. } | Repr::Opaque(_) => None,
        }
    }
}
