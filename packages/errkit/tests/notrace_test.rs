//! Process-wide trace toggle
//!
//! Kept in its own test binary: the configuration is set once per process and
//! must be installed before any error is created.

use errkit::config::{self, TraceConfig};
use errkit::{catch_panic, multi, print, Error, Tracer};

fn assert_untraced(err: &Error) {
    assert!(err.stack_trace().is_none(), "unexpected trace on {err}");
    assert!(err.own_stack_trace().is_none());

    let detailed = print::detailed(err);
    assert!(
        !detailed.lines().any(|line| line.starts_with("    ")),
        "unexpected frames in {detailed:?}"
    );
}

#[test]
fn test_disabled_globally_records_nothing() {
    config::init(TraceConfig::disabled()).expect("first initialization");
    assert!(!config::global().captures());
    assert!(!Tracer::global().is_tracing());
    assert!(!Tracer::default().is_tracing());

    let cause = Error::new("connection refused");
    assert_untraced(&cause);
    assert_untraced(&Error::wrap(cause.clone(), "dialing db"));
    assert_untraced(&Error::from_std(std::fmt::Error).with_stack());
    assert_untraced(&errkit::errorf!("dial {} failed ({w})", "db"; w = cause.clone()));
    assert_untraced(&errkit::wrapf!(cause.clone(), "attempt {}", 3));

    let joined = multi::join([Error::new("a"), Error::new("b")]).expect("joined error");
    assert!(joined.is_multi());
    assert_untraced(&joined);

    let single = multi::join([Error::new("only")]).expect("single error");
    assert_untraced(&single);

    let mut dest = Some(Error::new("first"));
    assert!(multi::append_into(&mut dest, [Error::new("second")]));
    assert_untraced(dest.as_ref().expect("merged error"));

    let mut dest = Some(Error::new("before panic"));
    let value: Option<()> = catch_panic(&mut dest, || panic!("boom"));
    assert!(value.is_none());
    let err = dest.expect("panic error");
    assert_eq!(err.errors().map(<[Error]>::len), Some(2));
    assert_untraced(&err);
}
