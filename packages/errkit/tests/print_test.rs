//! Tests for plain and detailed rendering

use errkit::{print, Error, Tracer};
use std::error::Error as StdError;

#[derive(Debug, thiserror::Error)]
#[error("connection reset")]
struct ResetError {
    #[source]
    source: std::io::Error,
}

fn reset() -> ResetError {
    ResetError {
        source: std::io::Error::new(std::io::ErrorKind::ConnectionReset, "peer gone"),
    }
}

#[test]
fn test_plain_is_display() {
    let err = Error::wrap(Error::new("disk full"), "saving");
    assert_eq!(print::plain(&err), "saving: disk full");
    assert_eq!(print::plain(&reset()), "connection reset");
}

#[test]
fn test_optional_rendering() {
    assert_eq!(print::plain_opt(None), "");
    assert_eq!(print::detailed_opt(None), "");

    let err = Error::new("boom");
    assert_eq!(print::plain_opt(Some(&err)), "boom");
    assert!(print::detailed_opt(Some(&err)).starts_with("boom"));
}

#[test]
fn test_untraced_detailed_layout() {
    let tracer = Tracer::untraced();
    let err = tracer
        .wrap(tracer.new_error("disk full"), "saving report")
        .with_exit_code(74);

    assert_eq!(
        print::detailed(&err),
        "[exit 74] saving report: disk full\ncaused by: disk full"
    );
    assert_eq!(format!("{err:#}"), print::detailed(&err));
    assert_eq!(format!("{err:?}"), print::detailed(&err));
}

#[test]
fn test_single_untraced_error_detailed_equals_plain() {
    let err = Tracer::untraced().new_error("boom");
    assert_eq!(print::detailed(&err), "boom");
}

#[test]
fn test_boxed_error_is_not_printed_twice() {
    let err = Tracer::untraced().with_stack(reset());
    assert_eq!(
        print::detailed(&err),
        "connection reset\ncaused by: peer gone"
    );
}

#[test]
fn test_foreign_chain_detailed() {
    let err = reset();
    assert_eq!(
        print::detailed(&err),
        "connection reset\ncaused by: peer gone"
    );
    assert!(err.source().is_some());
}

#[test]
fn test_untraced_aggregate_detailed() {
    let tracer = Tracer::untraced();
    let joined = tracer
        .join(vec![
            tracer.wrap(tracer.new_error("inner"), "outer"),
            tracer.new_error("second"),
        ])
        .expect("joined error");

    assert_eq!(
        print::detailed(&joined),
        "multiple errors occurred:\n\
         [1/2] outer: inner;\n\
         [2/2] second\n\
         [1/2] outer: inner\n    caused by: inner\n\
         [2/2] second"
    );
}

#[test]
fn test_detailed_starts_with_plain() {
    let tracer = Tracer::traced();
    let errs = vec![
        tracer.new_error("boom"),
        tracer.wrap(tracer.new_error("disk full"), "saving"),
        tracer.wrap(reset(), "syncing"),
        tracer
            .join(vec![tracer.new_error("a"), tracer.new_error("b")])
            .expect("joined error"),
    ];

    for err in errs {
        let plain = print::plain(&err);
        let detailed = print::detailed(&err);
        assert!(detailed.starts_with(&plain), "{detailed:?} lacks prefix {plain:?}");
    }
}

#[test]
fn test_traced_detailed_lists_frames() {
    let tracer = Tracer::traced();
    let err = tracer.new_error("boom");
    let Some(stack) = err.stack_trace() else {
        return;
    };
    if stack.visible_frames().is_empty() {
        return;
    }

    let detailed = print::detailed(&err);
    assert!(detailed.starts_with("boom:\n    "));

    let lines: Vec<&str> = detailed.lines().skip(1).collect();
    assert_eq!(lines.len(), stack.visible_frames().len() * 2);
    for pair in lines.chunks(2) {
        assert!(pair[0].starts_with("    ") && !pair[0].starts_with("        "));
        assert!(pair[1].starts_with("        "));
    }
}

#[test]
fn test_detailed_wrapper() {
    let err = Tracer::untraced().new_error("boom");
    assert_eq!(print::Detailed(&err).to_string(), "boom");
    assert_eq!(errkit::Detailed(&reset()).to_string(), "connection reset\ncaused by: peer gone");
}
