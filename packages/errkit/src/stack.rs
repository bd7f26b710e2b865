//! Stack trace capture
//!
//! A [`StackTrace`] records raw instruction pointers when it is captured and
//! resolves them into [`Frame`]s only when first inspected. Frames belonging to
//! the capture machinery and to this crate's constructors are dropped, so the
//! innermost frame is the caller that created or wrapped the error.

use crate::config::TraceConfig;
use once_cell::sync::OnceCell;
use std::ffi::c_void;
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Extra raw frames recorded on top of `max_frames` to make room for internal frames
const INTERNAL_FRAME_ALLOWANCE: usize = 16;

const INTERNAL_PREFIXES: &[&str] = &[
    "backtrace::",
    "<backtrace::",
    "errkit::",
    "<errkit::",
    "errkit_list::",
    "<errkit_list::",
    "errkit_group::",
    "<errkit_group::",
];

const GLUE_PREFIXES: &[&str] = &["core::", "<core::", "alloc::", "<alloc::", "std::", "<std::"];

const RUNTIME_PREFIXES: &[&str] = &[
    "std::rt::",
    "std::sys::backtrace::",
    "std::sys_common::backtrace::",
    "std::panicking::",
    "std::panic::catch_unwind",
    "std::thread::",
    "core::ops::function::FnOnce::call_once",
    "test::",
    "__rust_try",
    "__rust_begin_short_backtrace",
    "__libc_start",
    "_start",
    "start_thread",
    "clone3",
    "__clone",
];

/// Single resolved call site
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    function: String,
    file: Option<PathBuf>,
    line: Option<u32>,
    /// Position of the raw frame this symbol was resolved from, innermost first
    depth: usize,
}

impl Frame {
    fn from_symbol(depth: usize, symbol: &backtrace::Symbol) -> Option<Self> {
        let function = symbol.name().map(|name| format!("{name:#}"));
        let file = symbol.filename().map(Path::to_path_buf);
        if function.is_none() && file.is_none() {
            return None;
        }

        Some(Self {
            function: function.unwrap_or_else(|| "<unknown>".to_string()),
            file,
            line: symbol.lineno(),
            depth,
        })
    }

    /// Demangled function name without its hash suffix
    #[must_use]
    pub fn function(&self) -> &str {
        &self.function
    }

    /// Source file of the call site, if known
    #[must_use]
    pub fn file(&self) -> Option<&Path> {
        self.file.as_deref()
    }

    /// Line number of the call site, if known
    #[must_use]
    pub fn line(&self) -> Option<u32> {
        self.line
    }

    /// `file:line` of the call site, `<unknown>` when no file is known
    #[must_use]
    pub fn location(&self) -> String {
        match (&self.file, self.line) {
            (Some(file), Some(line)) => format!("{}:{line}", file.display()),
            (Some(file), None) => file.display().to_string(),
            (None, _) => "<unknown>".to_string(),
        }
    }

    fn is_internal(&self) -> bool {
        let name = self.function.as_str();
        if name.contains("::tests::") {
            return false;
        }
        INTERNAL_PREFIXES.iter().any(|prefix| name.starts_with(prefix)) || name.contains(" as errkit")
    }

    /// Standard library frames that may sit between internal frames
    fn is_glue(&self) -> bool {
        GLUE_PREFIXES
            .iter()
            .any(|prefix| self.function.starts_with(prefix))
    }

    fn is_runtime(&self) -> bool {
        RUNTIME_PREFIXES
            .iter()
            .any(|prefix| self.function.starts_with(prefix))
    }
}

impl fmt::Display for Frame {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}\n    {}", self.function, self.location())
    }
}

/// Captured call stack, cheap to clone
#[derive(Clone)]
pub struct StackTrace {
    inner: Arc<TraceInner>,
}

struct TraceInner {
    /// Raw instruction pointers, innermost first
    ips: Vec<usize>,
    max_frames: usize,
    /// Resolved frames, outermost first
    frames: OnceCell<Vec<Frame>>,
    /// Number of outermost raw frames shared with an enclosing trace
    shared: AtomicUsize,
    /// Skip set with `set_skip`, `NO_SKIP` when unset
    explicit_skip: AtomicUsize,
}

const NO_SKIP: usize = usize::MAX;

impl StackTrace {
    /// Capture the current call stack
    ///
    /// Returns `None` when `config` disables capture or when no frame could be
    /// obtained from the runtime. Frames are resolved on first use; a trace
    /// left without frames after resolution counts as no capture, and the
    /// error accessors report it as `None`.
    #[inline(never)]
    #[must_use]
    pub fn capture(config: &TraceConfig) -> Option<Self> {
        if !config.captures() {
            return None;
        }

        let limit = config.max_frames.saturating_add(INTERNAL_FRAME_ALLOWANCE);
        let mut ips = Vec::with_capacity(limit.min(64));
        backtrace::trace(|frame| {
            ips.push(frame.ip() as usize);
            ips.len() < limit
        });

        if ips.is_empty() {
            return None;
        }
        Some(Self::from_ips(ips, config.max_frames))
    }

    fn from_ips(ips: Vec<usize>, max_frames: usize) -> Self {
        Self {
            inner: Arc::new(TraceInner {
                ips,
                max_frames,
                frames: OnceCell::new(),
                shared: AtomicUsize::new(0),
                explicit_skip: AtomicUsize::new(NO_SKIP),
            }),
        }
    }

    /// All resolved frames, outermost first
    #[must_use]
    pub fn frames(&self) -> &[Frame] {
        self.inner.frames.get_or_init(|| self.resolve())
    }

    /// Frames left after hiding those shared with an enclosing trace
    #[must_use]
    pub fn visible_frames(&self) -> &[Frame] {
        &self.frames()[self.skip()..]
    }

    /// Number of outermost frames hidden when printing
    ///
    /// Set when the error owning this trace is wrapped, joined or appended, so
    /// frames already printed for the enclosing error are not repeated. At
    /// least one frame always stays visible.
    #[must_use]
    pub fn skip(&self) -> usize {
        let explicit = self.inner.explicit_skip.load(Ordering::Relaxed);
        if explicit != NO_SKIP {
            return explicit.min(self.len().saturating_sub(1));
        }

        let shared = self.inner.shared.load(Ordering::Relaxed);
        if shared == 0 {
            return 0;
        }

        let boundary = self.inner.ips.len().saturating_sub(shared);
        let frames = self.frames();
        let hidden = frames
            .iter()
            .take_while(|frame| frame.depth >= boundary)
            .count();
        hidden.min(frames.len().saturating_sub(1))
    }

    /// Hide the `skip` outermost frames when printing
    ///
    /// Overrides the count derived from enclosing traces.
    pub fn set_skip(&self, skip: usize) {
        self.inner
            .explicit_skip
            .store(skip.min(NO_SKIP - 1), Ordering::Relaxed);
    }

    /// Number of resolved frames
    #[must_use]
    pub fn len(&self) -> usize {
        self.frames().len()
    }

    /// Whether no frame could be resolved
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.frames().is_empty()
    }

    /// Whether both handles refer to the same capture
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Hide the outermost frames this trace shares with `outer`
    pub(crate) fn hide_shared_with(&self, outer: &StackTrace) {
        if self.ptr_eq(outer) {
            return;
        }

        let shared = self
            .inner
            .ips
            .iter()
            .rev()
            .zip(outer.inner.ips.iter().rev())
            .take_while(|(own, other)| own == other)
            .count();
        self.inner.shared.store(shared, Ordering::Relaxed);
    }

    fn resolve(&self) -> Vec<Frame> {
        let mut frames = Vec::new();
        for (depth, &ip) in self.inner.ips.iter().enumerate() {
            backtrace::resolve(ip as *mut c_void, |symbol| {
                if let Some(frame) = Frame::from_symbol(depth, symbol) {
                    frames.push(frame);
                }
            });
        }

        let start = frames
            .iter()
            .position(Frame::is_internal)
            .map_or(0, |first| {
                first
                    + frames[first..]
                        .iter()
                        .take_while(|frame| frame.is_internal() || frame.is_glue())
                        .count()
            });

        let mut frames: Vec<Frame> = frames
            .into_iter()
            .skip(start)
            .filter(|frame| !frame.is_runtime())
            .take(self.inner.max_frames)
            .collect();
        frames.reverse();
        frames
    }
}

impl fmt::Display for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for frame in self.frames() {
            writeln!(f, "{}\n    {}", frame.function, frame.location())?;
        }
        Ok(())
    }
}

impl fmt::Debug for StackTrace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StackTrace")
            .field("frames", &self.frames())
            .field("skip", &self.skip())
            .finish()
    }
}
