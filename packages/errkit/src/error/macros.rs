//! Macros for error creation and handling

/// Create an error from a format string, recording a stack trace
///
/// ```
/// let err = errkit::errorf!("user {} not found", 42);
/// assert_eq!(err.to_string(), "user 42 not found");
/// ```
///
/// Causes named after a `;` are rendered where the format string places them
/// and become the error's causes. The message is the formatted string as is.
///
/// ```
/// use errkit::Error;
///
/// let refused = Error::new("connection refused");
/// let err = errkit::errorf!("dial {} failed ({w}) retrying", "db"; w = refused.clone());
/// assert_eq!(err.to_string(), "dial db failed (connection refused) retrying");
/// assert!(err.contains(&refused));
/// ```
///
/// With several causes the error combines them the way [`join`](crate::join)
/// does, but keeps the formatted message.
#[macro_export]
macro_rules! errorf {
    ($fmt:literal $(, $arg:expr)* ; $($name:ident = $cause:expr),+ $(,)?) => {{
        $(let $name = $crate::IntoError::into_error($cause);)+
        $crate::Error::wrap_inline(
            ::std::format!($fmt $(, $arg)* $(, $name = $name)+),
            ::std::vec![$($name),+],
        )
    }};
    ($($arg:tt)*) => {
        $crate::Error::new(::std::format!($($arg)*))
    };
}

/// Wrap a causing error with a formatted message, recording a stack trace
///
/// ```
/// let cause = errkit::Error::new("connection refused");
/// let err = errkit::wrapf!(cause, "dialing {}:{}", "localhost", 5432);
/// assert_eq!(err.to_string(), "dialing localhost:5432: connection refused");
/// ```
#[macro_export]
macro_rules! wrapf {
    ($cause:expr, $($arg:tt)*) => {
        $crate::Error::wrap($cause, ::std::format!($($arg)*))
    };
}

/// Return early with an error built from a format string
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return ::std::result::Result::Err($crate::errorf!($($arg)*).into())
    };
}

/// Return early with an error when a condition does not hold
#[macro_export]
macro_rules! ensure {
    ($cond:expr, $($arg:tt)*) => {
        if !$cond {
            $crate::bail!($($arg)*);
        }
    };
}
