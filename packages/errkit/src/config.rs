//! Stack trace configuration
//!
//! Capture is controlled at three levels:
//! - the `full-backtrace` cargo feature (default on); without it nothing is ever captured
//! - a process-lifetime [`TraceConfig`], set once with [`init`] or resolved lazily
//!   from the environment by [`global`]
//! - an explicit [`Tracer`](crate::Tracer) built from any `TraceConfig`
//!
//! Environment variables read by [`TraceConfig::from_env`]:
//! - `ERRKIT_TRACE=0|false|off|no` disables capture
//! - `ERRKIT_MAX_FRAMES=<n>` bounds the number of recorded frames

use log::{debug, warn};
use once_cell::sync::OnceCell;

/// Environment variable toggling stack capture
pub const TRACE_ENV: &str = "ERRKIT_TRACE";

/// Environment variable bounding the number of captured frames
pub const MAX_FRAMES_ENV: &str = "ERRKIT_MAX_FRAMES";

/// Default upper bound on recorded frames per trace
pub const DEFAULT_MAX_FRAMES: usize = 32;

static GLOBAL: OnceCell<TraceConfig> = OnceCell::new();

/// Errors from configuring the process-wide trace settings
#[derive(Debug, Clone, thiserror::Error)]
pub enum ConfigError {
    /// The process-wide configuration was already resolved
    #[error("trace configuration already initialized as {0:?}")]
    AlreadyInitialized(TraceConfig),
}

/// Controls whether and how deep stack traces are captured
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TraceConfig {
    /// Capture a stack trace when errors are created or wrapped
    pub capture: bool,
    /// Upper bound on recorded frames per trace
    pub max_frames: usize,
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self::enabled()
    }
}

impl TraceConfig {
    /// Capture enabled with the default frame bound
    #[must_use]
    pub const fn enabled() -> Self {
        Self {
            capture: true,
            max_frames: DEFAULT_MAX_FRAMES,
        }
    }

    /// Capture disabled
    #[must_use]
    pub const fn disabled() -> Self {
        Self {
            capture: false,
            max_frames: DEFAULT_MAX_FRAMES,
        }
    }

    /// Replace the frame bound
    #[must_use]
    pub const fn with_max_frames(mut self, max_frames: usize) -> Self {
        self.max_frames = max_frames;
        self
    }

    /// Resolve the configuration from the process environment
    #[must_use]
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Resolve the configuration from an arbitrary key lookup
    ///
    /// Unparsable values are logged and replaced by their defaults.
    pub fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::enabled();

        if let Some(value) = lookup(TRACE_ENV) {
            match value.trim().to_ascii_lowercase().as_str() {
                "0" | "false" | "off" | "no" => config.capture = false,
                "1" | "true" | "on" | "yes" | "" => config.capture = true,
                other => warn!("Ignoring unrecognized {TRACE_ENV} value: {other}"),
            }
        }

        if let Some(value) = lookup(MAX_FRAMES_ENV) {
            match value.trim().parse::<usize>() {
                Ok(max_frames) if max_frames > 0 => config.max_frames = max_frames,
                _ => warn!("Ignoring invalid {MAX_FRAMES_ENV} value: {value}"),
            }
        }

        config
    }

    /// Whether this configuration results in captured traces
    ///
    /// Always false when built without the `full-backtrace` feature.
    #[must_use]
    pub const fn captures(&self) -> bool {
        cfg!(feature = "full-backtrace") && self.capture && self.max_frames > 0
    }
}

/// Set the process-wide configuration
///
/// # Errors
///
/// Returns `ConfigError::AlreadyInitialized` when the configuration was set
/// before or already resolved by [`global`].
pub fn init(config: TraceConfig) -> Result<(), ConfigError> {
    GLOBAL
        .set(config)
        .map_err(|_| ConfigError::AlreadyInitialized(*global()))?;
    debug!("Trace configuration initialized: {config:?}");
    Ok(())
}

/// Get the process-wide configuration, resolving it from the environment on first use
pub fn global() -> &'static TraceConfig {
    GLOBAL.get_or_init(|| {
        let config = TraceConfig::from_env();
        debug!("Trace configuration resolved from environment: {config:?}");
        config
    })
}
