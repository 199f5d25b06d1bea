use std::fmt::Debug;
use tracing::metadata::LevelFilter;
use tracing::Dispatch;

/// Log level of a single [crate::TestHelper]. Verbose runs log at debug level, otherwise nothing is
/// logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LoggingConfig {
    pub level: LevelFilter,
}

impl LoggingConfig {
    pub fn from_verbose(verbose: bool) -> Self {
        let level = if verbose {
            LevelFilter::DEBUG
        } else {
            LevelFilter::OFF
        };
        Self { level }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self::from_verbose(false)
    }
}

/// Owns the subscriber built from a [LoggingConfig]. Nothing is installed globally: code only logs
/// through it while running inside [Logger::in_scope].
#[derive(Clone)]
pub struct Logger {
    dispatch: Dispatch,
}

impl Debug for Logger {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Logger").finish_non_exhaustive()
    }
}

impl Logger {
    pub fn new(config: LoggingConfig) -> Self {
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(config.level)
            .with_target(false)
            .with_test_writer()
            .finish();

        Self {
            dispatch: Dispatch::new(subscriber),
        }
    }

    /// Runs `f` with this logger as the default subscriber of the current thread.
    pub fn in_scope<T>(&self, f: impl FnOnce() -> T) -> T {
        tracing::dispatcher::with_default(&self.dispatch, f)
    }
}
