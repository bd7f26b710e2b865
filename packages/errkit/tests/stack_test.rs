//! Tests for stack capture and trace configuration

use errkit::config::{self, TraceConfig, DEFAULT_MAX_FRAMES, MAX_FRAMES_ENV, TRACE_ENV};
use errkit::Tracer;
use std::collections::HashMap;

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let vars: HashMap<String, String> = vars
        .iter()
        .map(|(key, value)| ((*key).to_string(), (*value).to_string()))
        .collect();
    move |key| vars.get(key).cloned()
}

#[test]
fn test_config_defaults() {
    let config = TraceConfig::from_lookup(lookup(&[]));
    assert!(config.capture);
    assert_eq!(config.max_frames, DEFAULT_MAX_FRAMES);
    assert_eq!(config, TraceConfig::default());
}

#[test]
fn test_config_from_env_values() {
    let config = TraceConfig::from_lookup(lookup(&[(TRACE_ENV, "off"), (MAX_FRAMES_ENV, "8")]));
    assert!(!config.capture);
    assert_eq!(config.max_frames, 8);
    assert!(!config.captures());

    let config = TraceConfig::from_lookup(lookup(&[(TRACE_ENV, "1")]));
    assert!(config.capture);
}

#[test]
fn test_config_ignores_invalid_values() {
    let config = TraceConfig::from_lookup(lookup(&[(TRACE_ENV, "maybe"), (MAX_FRAMES_ENV, "-3")]));
    assert!(config.capture);
    assert_eq!(config.max_frames, DEFAULT_MAX_FRAMES);

    let config = TraceConfig::from_lookup(lookup(&[(MAX_FRAMES_ENV, "0")]));
    assert_eq!(config.max_frames, DEFAULT_MAX_FRAMES);
}

#[test]
fn test_config_init_after_resolution_fails() {
    let resolved = *config::global();
    let err = config::init(TraceConfig::disabled().with_max_frames(3));
    assert!(err.is_err());
    assert_eq!(*config::global(), resolved);
}

#[test]
fn test_default_tracer_follows_global_config() {
    assert_eq!(Tracer::default(), Tracer::global());
    assert_eq!(Tracer::default().config(), config::global());
}

#[test]
fn test_disabled_tracer_records_nothing() {
    let tracer = Tracer::untraced();
    let errs = [
        tracer.new_error("a"),
        tracer.wrap(tracer.new_error("b"), "c"),
        tracer.with_stack(std::fmt::Error),
        tracer
            .join(vec![tracer.new_error("d"), tracer.new_error("e")])
            .expect("joined error"),
    ];

    for err in errs {
        assert!(err.stack_trace().is_none());
        assert!(errkit::get_stack_trace(&err).is_none());
        assert!(!format!("{err:#}").contains("\n    "));
    }
}

#[cfg(feature = "full-backtrace")]
mod traced {
    use super::*;
    use errkit::{Error, StackTrace};

    #[inline(never)]
    fn failing_operation(tracer: &Tracer) -> Error {
        tracer.new_error("operation failed")
    }

    #[test]
    fn test_capture_skips_internal_frames() {
        let tracer = Tracer::traced();
        let err = failing_operation(&tracer);
        let stack = err.stack_trace().expect("stack trace");

        assert!(!stack.is_empty());
        assert!(stack.len() <= DEFAULT_MAX_FRAMES);
        for frame in stack.frames() {
            assert!(!frame.function().starts_with("errkit::"), "{}", frame.function());
            assert!(!frame.function().starts_with("backtrace::"), "{}", frame.function());
        }

        let innermost = stack.frames().last().expect("innermost frame");
        assert!(
            innermost.function().contains("failing_operation"),
            "innermost frame is {}",
            innermost.function()
        );
    }

    #[test]
    fn test_max_frames_bound() {
        let tracer = Tracer::new(TraceConfig::enabled().with_max_frames(2));
        let err = failing_operation(&tracer);
        let stack = err.stack_trace().expect("stack trace");
        assert!(stack.len() <= 2);
    }

    #[test]
    fn test_with_stack_keeps_existing_trace() {
        let tracer = Tracer::traced();
        let err = failing_operation(&tracer);
        let stack = err.stack_trace().expect("stack trace").clone();

        let again = tracer.with_stack(err);
        assert!(again.stack_trace().is_some_and(|other| other.ptr_eq(&stack)));

        let boxed = tracer.with_stack(std::fmt::Error);
        assert!(boxed.own_stack_trace().is_some());
    }

    #[test]
    fn test_wrap_hides_shared_frames() {
        let tracer = Tracer::traced();
        let cause = failing_operation(&tracer);
        let err = tracer.wrap(cause.clone(), "outer");

        let cause_stack = cause.stack_trace().expect("cause stack");
        assert!(err.own_stack_trace().is_some());
        assert!(cause_stack.skip() < cause_stack.len());
        assert!(cause_stack
            .visible_frames()
            .iter()
            .any(|frame| frame.function().contains("failing_operation")));
    }

    #[test]
    fn test_set_skip() {
        let err = failing_operation(&Tracer::traced());
        let stack = err.stack_trace().expect("stack trace");

        stack.set_skip(usize::MAX - 10);
        assert_eq!(stack.visible_frames().len(), 1);

        stack.set_skip(0);
        assert_eq!(stack.visible_frames().len(), stack.len());
    }

    #[test]
    fn test_stack_display_lists_all_frames() {
        let stack = StackTrace::capture(&TraceConfig::enabled()).expect("stack trace");
        let rendered = stack.to_string();
        assert_eq!(rendered.lines().count(), stack.len() * 2);
    }
}
