//! Classification tags and sentinel messages
//!
//! A [`Kind`] describes the category of an error, for example `"auth error"` or
//! `"unmarshal error"`, so errors can share a kind while carrying different
//! messages. A [`Msg`] is a plain message that doubles as a sentinel: an error
//! created from a `Msg` matches that same `Msg` under [`Error::is`].
//!
//! Both are best declared as constants:
//!
//! ```
//! use errkit::{Error, Kind, Msg};
//!
//! const AUTH: Kind = Kind::from_static("auth error");
//! const ERR_TOKEN_EXPIRED: Msg = Msg::from_static("token expired");
//!
//! let err = Error::new(ERR_TOKEN_EXPIRED).with_kind(AUTH);
//! assert!(err.is(&ERR_TOKEN_EXPIRED));
//! assert_eq!(err.kind(), Some(&AUTH));
//! ```
//!
//! [`Error::is`]: crate::Error::is

use std::borrow::Cow;
use std::fmt;

/// Kind used for errors created without a distinct classification
pub const UNKNOWN_KIND: Kind = Kind::from_static("");

/// Classification tag attached to an error
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Kind(Cow<'static, str>);

impl Kind {
    /// Create a kind from any string
    pub fn new<S: Into<Cow<'static, str>>>(kind: S) -> Self {
        Self(kind.into())
    }

    /// Create a kind from a static string, usable in constants
    #[must_use]
    pub const fn from_static(kind: &'static str) -> Self {
        Self(Cow::Borrowed(kind))
    }

    /// Get the kind as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether this is the [`UNKNOWN_KIND`]
    #[must_use]
    pub fn is_unknown(&self) -> bool {
        self.0.is_empty()
    }
}

impl Default for Kind {
    fn default() -> Self {
        UNKNOWN_KIND
    }
}

impl fmt::Display for Kind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for Kind {}

impl From<&str> for Kind {
    fn from(kind: &str) -> Self {
        Self(Cow::Owned(kind.to_owned()))
    }
}

impl From<String> for Kind {
    fn from(kind: String) -> Self {
        Self(Cow::Owned(kind))
    }
}

impl From<Cow<'static, str>> for Kind {
    fn from(kind: Cow<'static, str>) -> Self {
        Self(kind)
    }
}

impl PartialEq<str> for Kind {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Kind {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}

/// Error message which can also be used as a sentinel error
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Msg(Cow<'static, str>);

impl Msg {
    /// Create a message from any string
    pub fn new<S: Into<Cow<'static, str>>>(msg: S) -> Self {
        Self(msg.into())
    }

    /// Create a message from a static string, usable in constants
    #[must_use]
    pub const fn from_static(msg: &'static str) -> Self {
        Self(Cow::Borrowed(msg))
    }

    /// Get the message as a string slice
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the message is empty
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl fmt::Display for Msg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl std::error::Error for Msg {}

impl From<&str> for Msg {
    fn from(msg: &str) -> Self {
        Self(Cow::Owned(msg.to_owned()))
    }
}

impl From<String> for Msg {
    fn from(msg: String) -> Self {
        Self(Cow::Owned(msg))
    }
}

impl From<&String> for Msg {
    fn from(msg: &String) -> Self {
        Self(Cow::Owned(msg.clone()))
    }
}

impl From<Cow<'static, str>> for Msg {
    fn from(msg: Cow<'static, str>) -> Self {
        Self(msg)
    }
}

impl PartialEq<str> for Msg {
    fn eq(&self, other: &str) -> bool {
        self.as_str() == other
    }
}

impl PartialEq<&str> for Msg {
    fn eq(&self, other: &&str) -> bool {
        self.as_str() == *other
    }
}
