//! Debug logging to stderr.
//!
//! Off by default. Turned on with the `--debug` flag or `HEATMAP_DEBUG=1`.
//! Each line reads `[+0012ms] [INFO ] [component] message`.

use std::io::{self, IsTerminal, Write};
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::{Instant, SystemTime, UNIX_EPOCH};

/// Environment variable that enables logging when set to `1` or `true`.
pub const ENV_VAR: &str = "HEATMAP_DEBUG";

static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

/// Millis since the UNIX epoch at the moment logging was enabled.
static START_TIME_MS: AtomicU64 = AtomicU64::new(0);

fn now_ms() -> u64 {
    SystemTime::now().duration_since(UNIX_EPOCH).map_or(0, |d| d.as_millis() as u64)
}

/// Enables debug logging and restarts the elapsed clock.
pub fn enable() {
    START_TIME_MS.store(now_ms(), Ordering::SeqCst);
    DEBUG_ENABLED.store(true, Ordering::SeqCst);
}

/// Disables debug logging.
pub fn disable() {
    DEBUG_ENABLED.store(false, Ordering::SeqCst);
}

/// Returns true if debug logging is on.
#[inline]
pub fn is_enabled() -> bool {
    DEBUG_ENABLED.load(Ordering::Relaxed)
}

/// Whether an environment value asks for logging.
#[must_use]
pub fn env_requests_debug(value: Option<&str>) -> bool {
    value.is_some_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Enables logging if `flag` is set or [`ENV_VAR`] asks for it.
pub fn init(flag: bool) {
    if flag || env_requests_debug(std::env::var(ENV_VAR).ok().as_deref()) {
        enable();
    }
}

fn elapsed_ms() -> u64 {
    match START_TIME_MS.load(Ordering::Relaxed) {
        0 => 0,
        start => now_ms().saturating_sub(start),
    }
}

/// Log levels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Level {
    /// Function entry/exit and timings
    Trace,
    /// Intermediate values
    Debug,
    /// Pipeline steps
    Info,
    /// Recoverable problems
    Warn,
    /// Failures
    Error,
}

impl Level {
    /// Fixed-width tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Trace => "TRACE",
            Self::Debug => "DEBUG",
            Self::Info => "INFO",
            Self::Warn => "WARN",
            Self::Error => "ERROR",
        }
    }

    const fn color_code(self) -> &'static str {
        match self {
            Self::Trace => "\x1b[90m", // Gray
            Self::Debug => "\x1b[36m", // Cyan
            Self::Info => "\x1b[32m",  // Green
            Self::Warn => "\x1b[33m",  // Yellow
            Self::Error => "\x1b[31m", // Red
        }
    }
}

/// Format one log line, with ANSI colors when `color` is set.
#[must_use]
pub fn format_line(level: Level, component: &str, message: &str, elapsed_ms: u64, color: bool) -> String {
    let (start, reset) = if color { (level.color_code(), "\x1b[0m") } else { ("", "") };
    format!("[+{elapsed_ms:04}ms] {start}[{:5}]{reset} [{component}] {message}", level.as_str())
}

/// Logs a message if logging is enabled.
pub fn log(level: Level, component: &str, message: &str) {
    if !is_enabled() {
        return;
    }

    let stderr = io::stderr();
    let line = format_line(level, component, message, elapsed_ms(), stderr.is_terminal());
    let _ = writeln!(stderr.lock(), "{line}");
}

/// Logs with format arguments.
#[macro_export]
macro_rules! debug_log {
    ($level:expr, $component:expr, $($arg:tt)*) => {
        if $crate::debug::is_enabled() {
            $crate::debug::log($level, $component, &format!($($arg)*));
        }
    };
}

/// Logs at trace level.
#[macro_export]
macro_rules! trace {
    ($component:expr, $($arg:tt)*) => {
        $crate::debug_log!($crate::debug::Level::Trace, $component, $($arg)*)
    };
}

/// Logs at debug level.
#[macro_export]
macro_rules! debug {
    ($component:expr, $($arg:tt)*) => {
        $crate::debug_log!($crate::debug::Level::Debug, $component, $($arg)*)
    };
}

/// Logs at info level.
#[macro_export]
macro_rules! info {
    ($component:expr, $($arg:tt)*) => {
        $crate::debug_log!($crate::debug::Level::Info, $component, $($arg)*)
    };
}

/// Logs at warn level.
#[macro_export]
macro_rules! warn {
    ($component:expr, $($arg:tt)*) => {
        $crate::debug_log!($crate::debug::Level::Warn, $component, $($arg)*)
    };
}

/// Logs at error level.
#[macro_export]
macro_rules! error {
    ($component:expr, $($arg:tt)*) => {
        $crate::debug_log!($crate::debug::Level::Error, $component, $($arg)*)
    };
}

/// RAII guard that logs entry and, on drop, the time spent in a scope.
pub struct TimingGuard {
    component: &'static str,
    operation: String,
    start: Instant,
}

impl TimingGuard {
    /// Starts timing `operation`.
    pub fn new(component: &'static str, operation: impl Into<String>) -> Self {
        let operation = operation.into();
        if is_enabled() {
            log(Level::Trace, component, &format!("-> {operation}"));
        }
        Self { component, operation, start: Instant::now() }
    }
}

impl Drop for TimingGuard {
    fn drop(&mut self) {
        if is_enabled() {
            let ms = self.start.elapsed().as_secs_f64() * 1000.0;
            log(Level::Trace, self.component, &format!("<- {} ({ms:.2}ms)", self.operation));
        }
    }
}

/// Times the rest of the enclosing scope.
#[macro_export]
macro_rules! time_scope {
    ($component:expr, $operation:expr) => {
        let _guard = $crate::debug::TimingGuard::new($component, $operation);
    };
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_level_as_str() {
        assert_eq!(Level::Trace.as_str(), "TRACE");
        assert_eq!(Level::Info.as_str(), "INFO");
        assert_eq!(Level::Error.as_str(), "ERROR");
        assert!(Level::Trace < Level::Error);
    }

    #[test]
    fn test_format_line_plain() {
        let line = format_line(Level::Info, "pipeline", "saved chart.png", 12, false);
        assert_eq!(line, "[+0012ms] [INFO ] [pipeline] saved chart.png");
    }

    #[test]
    fn test_format_line_colored() {
        let line = format_line(Level::Warn, "config", "x", 0, true);
        assert!(line.contains("\x1b[33m[WARN ]\x1b[0m"));
    }

    #[test]
    fn test_env_requests_debug() {
        assert!(env_requests_debug(Some("1")));
        assert!(env_requests_debug(Some("TRUE")));
        assert!(!env_requests_debug(Some("0")));
        assert!(!env_requests_debug(None));
    }

    #[test]
    fn test_enable_log_and_time_scope() {
        enable();
        assert!(is_enabled());
        log(Level::Debug, "test", "message");
        {
            let guard = TimingGuard::new("test", "operation");
            assert_eq!(guard.operation, "operation");
        }
        disable();
        // Logging while disabled is a no-op
        log(Level::Error, "test", "dropped");
    }
}
