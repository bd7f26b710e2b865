//! Tests for error construction, display and chain matching

use errkit::{Error, IntoError, Kind, Msg, Tracer};
use std::error::Error as StdError;
use std::fmt;

const ERR_NOT_FOUND: Msg = Msg::from_static("not found");
const STORAGE: Kind = Kind::from_static("storage error");

#[derive(Debug, Clone, PartialEq, Eq)]
struct CodeError(u32);

impl fmt::Display for CodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "code {}", self.0)
    }
}

impl StdError for CodeError {}

#[test]
fn test_new_error_message() {
    let err = Error::new("something happened");
    assert_eq!(err.to_string(), "something happened");
    assert_eq!(err.message(), "something happened");
    assert!(err.is_root_cause());
    assert!(err.source().is_none());
}

#[test]
fn test_new_errors_are_distinct() {
    let a = Error::new("same");
    let b = Error::new("same");

    assert!(!a.ptr_eq(&b));
    assert!(!a.contains(&b));
    assert!(a.contains(&a.clone()));
}

#[test]
fn test_wrap_message() {
    let cause = Error::new("disk full");
    let err = Error::wrap(cause.clone(), "saving report");

    assert_eq!(err.to_string(), "saving report: disk full");
    assert_eq!(err.message(), "saving report");
    assert!(!err.is_root_cause());
    assert!(err.contains(&cause));
    assert_eq!(err.chain().count(), 2);
}

#[test]
fn test_wrap_with_empty_message_shows_cause() {
    let err = Error::wrap(Error::new("disk full"), "");
    assert_eq!(err.to_string(), "disk full");
}

#[test]
fn test_wrap_foreign_error() {
    let io = std::io::Error::new(std::io::ErrorKind::NotFound, "no such file");
    let err = Error::wrap(io, "opening settings");

    assert_eq!(err.to_string(), "opening settings: no such file");
    let found = err.find::<std::io::Error>();
    assert_eq!(found.map(std::io::Error::kind), Some(std::io::ErrorKind::NotFound));
}

#[test]
fn test_from_std_preserves_identity() {
    let err = Error::new("boom");
    let converted = Error::from_std(err.clone());
    assert!(converted.ptr_eq(&err));

    let converted = err.clone().into_error();
    assert!(converted.ptr_eq(&err));
}

#[test]
fn test_from_boxed() {
    let boxed: Box<errkit::DynError> = Box::new(CodeError(7));
    let err = Error::from_boxed(boxed);
    assert_eq!(err.to_string(), "code 7");
    assert_eq!(err.find::<CodeError>(), Some(&CodeError(7)));

    let original = Error::new("inner");
    let boxed: Box<errkit::DynError> = Box::new(original.clone());
    let err: Error = boxed.into();
    assert!(err.ptr_eq(&original));
}

#[test]
fn test_msg_sentinel_matching() {
    let err = Error::wrap(Error::new(ERR_NOT_FOUND), "loading user");
    assert!(err.is(&ERR_NOT_FOUND));
    assert!(!err.is(&Msg::from_static("loading")));

    let converted = ERR_NOT_FOUND.into_error();
    assert!(converted.is(&ERR_NOT_FOUND));
    assert_eq!(converted.to_string(), "not found");
}

#[test]
fn test_kind_matching() {
    let err = Error::wrap(Error::new("disk full").with_kind(STORAGE), "saving");
    assert!(err.is(&STORAGE));
    assert!(!err.is(&Kind::from_static("auth error")));
}

#[test]
fn test_foreign_error_matching() {
    let err = Error::wrap(CodeError(3), "request failed");
    assert!(err.is(&CodeError(3)));
    assert!(!err.is(&CodeError(4)));
}

#[test]
fn test_root_cause() {
    let err = Error::wrap(Error::wrap(CodeError(1), "middle"), "outer");

    assert_eq!(err.root_cause().to_string(), "code 1");
    assert!(err.root_cause().downcast_ref::<CodeError>().is_some());

    let links: Vec<String> = err.unwrap_all().iter().map(ToString::to_string).collect();
    assert_eq!(
        links,
        vec!["outer: middle: code 1", "middle: code 1", "code 1", "code 1"]
    );
}

#[test]
fn test_matches_root_messages() {
    let a = Error::new(ERR_NOT_FOUND);
    let b = Error::new(ERR_NOT_FOUND);
    let wrapped = Error::wrap(a.clone(), "lookup");

    assert!(wrapped.matches(&b));
    assert!(wrapped.matches(&a));
    assert!(!wrapped.matches(&Error::new("other")));
}

#[test]
fn test_opaque_hides_chain() {
    let cause = Error::new(ERR_NOT_FOUND);
    let err = Error::wrap(cause.clone(), "lookup");
    let opaque = err.opaque();

    assert_eq!(opaque.to_string(), err.to_string());
    assert!(opaque.source().is_none());
    assert!(!opaque.contains(&cause));
    assert!(!opaque.is(&ERR_NOT_FOUND));
}

#[test]
fn test_macros() {
    let err = errkit::errorf!("user {} not found", 42);
    assert_eq!(err.to_string(), "user 42 not found");

    let wrapped = errkit::wrapf!(err.clone(), "request {}", "/users/42");
    assert_eq!(wrapped.to_string(), "request /users/42: user 42 not found");
    assert!(wrapped.contains(&err));
}

#[test]
fn test_errorf_inline_cause() {
    let refused = Error::new("connection refused");
    let err = errkit::errorf!("dial {} failed ({w}) retrying", "db"; w = refused.clone());

    assert_eq!(err.to_string(), "dial db failed (connection refused) retrying");
    assert_eq!(err.message(), "dial db failed (connection refused) retrying");
    assert!(!err.is_root_cause());
    assert!(err.contains(&refused));
    assert!(err.source().is_some_and(|source| source.to_string() == "connection refused"));
    assert_eq!(err.root_cause().to_string(), "connection refused");
}

#[test]
fn test_errorf_inline_foreign_cause() {
    let err = errkit::errorf!("lookup failed [{cause}]"; cause = CodeError(7));

    assert_eq!(err.to_string(), "lookup failed [code 7]");
    assert!(err.is(&CodeError(7)));
    assert_eq!(err.find::<CodeError>(), Some(&CodeError(7)));
}

#[test]
fn test_errorf_inline_causes() {
    let read = Error::new(ERR_NOT_FOUND);
    let parse = Error::new("invalid header");
    let err = errkit::errorf!("loading {}: {a}, then {b}", "config"; a = read.clone(), b = parse.clone());

    assert_eq!(err.to_string(), "loading config: not found, then invalid header");
    assert!(err.is_multi());
    assert_eq!(err.errors().map(<[Error]>::len), Some(2));
    assert!(err.contains(&read));
    assert!(err.contains(&parse));
    assert!(err.is(&ERR_NOT_FOUND));
}

#[test]
fn test_errorf_inline_causes_do_not_grow() {
    let mut dest = Some(errkit::errorf!("{a} and {b}"; a = Error::new("x"), b = Error::new("y")));
    let late = Error::new("z");

    assert!(errkit::append_into(&mut dest, [late.clone()]));
    let err = dest.expect("merged error");
    assert_eq!(err.errors().map(<[Error]>::len), Some(2));
    assert!(err.contains(&late));
    assert!(err.to_string().starts_with("multiple errors occurred:\n[1/2] x and y;"));
}

#[test]
fn test_bail_and_ensure() {
    fn check(value: u32) -> errkit::Result<u32> {
        errkit::ensure!(value > 0, "value must be positive, got {}", value);
        if value > 100 {
            errkit::bail!("value {} too large", value);
        }
        Ok(value)
    }

    assert_eq!(check(5).ok(), Some(5));
    assert_eq!(
        check(0).map_err(|err| err.to_string()),
        Err("value must be positive, got 0".to_string())
    );
    assert_eq!(
        check(200).map_err(|err| err.to_string()),
        Err("value 200 too large".to_string())
    );
}

#[test]
fn test_untraced_tracer() {
    let tracer = Tracer::untraced();
    let err = tracer.wrap(tracer.new_error("disk full"), "saving");

    assert!(!tracer.is_tracing());
    assert!(err.stack_trace().is_none());
    assert_eq!(err.to_string(), "saving: disk full");
}

#[test]
fn test_error_is_send_and_sync() {
    fn assert_send_sync<T: Send + Sync + 'static>() {}
    assert_send_sync::<Error>();
}
