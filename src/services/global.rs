//! Process-wide logger and free-function facade
//!
//! The global [`Logger`] is created on first use with default settings and
//! is never dropped. Call [`shutdown`] before the process exits to stop the
//! rotation monitor and close the file.

use std::future::Future;
use std::path::PathBuf;
use std::sync::{Arc, OnceLock};

use super::logger::Logger;
use super::verbose::Verbose;
use crate::domain::error::Result;
use crate::domain::models::Severity;
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::naming::strip_trailing_separators;
use crate::infrastructure::logging::LoggerConfig;

static GLOBAL: OnceLock<Arc<Logger>> = OnceLock::new();

fn global() -> &'static Arc<Logger> {
    GLOBAL.get_or_init(|| Arc::new(Logger::new()))
}

/// The process-wide logger.
pub fn logger() -> &'static Logger {
    global()
}

/// A shared reference to the process-wide logger, e.g. for a tracing bridge.
pub fn shared() -> Arc<Logger> {
    Arc::clone(global())
}

/// Point the global logger at `{log_dir}/{YYYY-MM-DD}/{base_name}.*.log`.
///
/// Trailing `/` and `\` are stripped from `log_dir`. Calling this again
/// switches to the new target and closes the previous file.
pub fn init(log_dir: &str, base_name: &str) -> Result<PathBuf> {
    logger().attach(strip_trailing_separators(log_dir), base_name)
}

/// Initialize from a loaded configuration.
///
/// File size limit, monitor interval and crash directory only take effect if
/// this is the first use of the global logger; the remaining settings are
/// applied every time.
pub fn init_with_config(config: &LoggerConfig) -> Result<PathBuf> {
    ConfigLoader::validate(config)?;
    let logger = GLOBAL.get_or_init(|| Arc::new(Logger::builder().config(config).build()));
    logger.set_threshold(config.threshold);
    logger.set_console_enabled(config.console);
    logger.set_console_prefix(&config.console_prefix);
    logger.attach(&config.log_dir, &config.base_name)
}

pub fn set_console(enabled: bool) {
    logger().set_console_enabled(enabled);
}

pub fn set_console_prefix(prefix: &str) {
    logger().set_console_prefix(prefix);
}

pub fn set_threshold(threshold: Severity) {
    logger().set_threshold(threshold);
}

/// See [`Logger::verbose`].
pub fn v(level: Severity) -> Verbose<'static> {
    logger().verbose(level)
}

/// See [`Logger::capture_crash`].
pub fn catch_crash<T>(f: impl FnOnce() -> T) -> Option<T> {
    logger().capture_crash(f)
}

/// See [`Logger::capture_crash_async`].
pub async fn catch_crash_async<F: Future>(future: F) -> Option<F::Output> {
    logger().capture_crash_async(future).await
}

/// Stop the global rotation monitor and close the file.
pub fn shutdown() {
    if let Some(logger) = GLOBAL.get() {
        logger.shutdown();
    }
}

macro_rules! global_emission_functions {
    ($($plain:ident, $formatted:ident, $joined:ident;)+) => {
        $(
            #[doc = concat!("See [`Logger::", stringify!($plain), "`].")]
            #[track_caller]
            pub fn $plain(value: impl std::fmt::Display) {
                logger().$plain(value);
            }

            #[doc = concat!("See [`Logger::", stringify!($formatted), "`].")]
            #[track_caller]
            pub fn $formatted(args: std::fmt::Arguments<'_>) {
                logger().$formatted(args);
            }

            #[doc = concat!("See [`Logger::", stringify!($joined), "`].")]
            #[track_caller]
            pub fn $joined(values: &[&dyn std::fmt::Display]) {
                logger().$joined(values);
            }
        )+
    };
}

global_emission_functions! {
    debug, debugf, debugln;
    info, infof, infoln;
    warn, warnf, warnln;
    error, errorf, errorln;
    fatal, fatalf, fatalln;
}
