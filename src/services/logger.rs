//! The dispatcher: level filtering, rendering and fan-out to file and console.

use std::fmt::{self, Write as _};
use std::future::Future;
use std::panic::Location;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};
use std::time::Duration;
use tracing::info;

use super::emission::emission_methods;
use super::settings::Settings;
use super::verbose::Verbose;
use crate::domain::error::{LogError, Result};
use crate::domain::models::{should_emit, Record, Severity};
use crate::domain::ports::{Clock, ConsoleWriter, FileProbe, OsFileProbe, SystemClock};
use crate::infrastructure::config::ConfigLoader;
use crate::infrastructure::logging::crash::DEFAULT_CRASH_DIR;
use crate::infrastructure::logging::monitor::DEFAULT_CHECK_INTERVAL;
use crate::infrastructure::logging::rotation::DEFAULT_MAX_FILE_SIZE;
use crate::infrastructure::logging::{
    fallback, format, panic_scope, ActiveLogHandle, CrashRecorder, LoggerConfig, MonitorHandle,
    RotationMonitor, TermConsole,
};

/// Configures a [`Logger`] before it is attached to a directory.
pub struct LoggerBuilder {
    console: Arc<dyn ConsoleWriter>,
    clock: Arc<dyn Clock>,
    probe: Arc<dyn FileProbe>,
    max_file_size: u64,
    check_interval: Duration,
    crash_dir: PathBuf,
    threshold: Severity,
    console_enabled: bool,
    console_prefix: String,
}

impl LoggerBuilder {
    #[must_use]
    pub fn console(mut self, console: Arc<dyn ConsoleWriter>) -> Self {
        self.console = console;
        self
    }

    #[must_use]
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    #[must_use]
    pub fn probe(mut self, probe: Arc<dyn FileProbe>) -> Self {
        self.probe = probe;
        self
    }

    /// Size at which the active file is rotated. Zero keeps the default.
    #[must_use]
    pub const fn max_file_size(mut self, bytes: u64) -> Self {
        self.max_file_size = if bytes == 0 {
            DEFAULT_MAX_FILE_SIZE
        } else {
            bytes
        };
        self
    }

    /// How often the rotation monitor wakes up. Zero keeps the default.
    #[must_use]
    pub const fn check_interval(mut self, interval: Duration) -> Self {
        self.check_interval = if interval.is_zero() {
            DEFAULT_CHECK_INTERVAL
        } else {
            interval
        };
        self
    }

    #[must_use]
    pub fn crash_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.crash_dir = dir.into();
        self
    }

    #[must_use]
    pub const fn threshold(mut self, threshold: Severity) -> Self {
        self.threshold = threshold;
        self
    }

    #[must_use]
    pub const fn console_enabled(mut self, enabled: bool) -> Self {
        self.console_enabled = enabled;
        self
    }

    #[must_use]
    pub fn console_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.console_prefix = prefix.into();
        self
    }

    /// Apply every setting from `config` except the target directory and name,
    /// which are passed to [`Logger::attach`].
    #[must_use]
    pub fn config(self, config: &LoggerConfig) -> Self {
        self.max_file_size(config.max_file_size)
            .check_interval(Duration::from_secs(config.monitor_interval_secs))
            .crash_dir(config.crash_dir.clone())
            .threshold(config.threshold)
            .console_enabled(config.console)
            .console_prefix(config.console_prefix.clone())
    }

    pub fn build(self) -> Logger {
        let crash = CrashRecorder::new(
            self.crash_dir,
            Arc::clone(&self.clock),
            Arc::clone(&self.probe),
            Arc::clone(&self.console),
        );

        Logger {
            settings: Settings::new(self.threshold, self.console_enabled, self.console_prefix),
            console: self.console,
            clock: self.clock,
            probe: self.probe,
            max_file_size: self.max_file_size,
            check_interval: self.check_interval,
            handle: OnceLock::new(),
            monitor: Mutex::new(None),
            crash,
        }
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self {
            console: Arc::new(TermConsole::stderr()),
            clock: Arc::new(SystemClock),
            probe: Arc::new(OsFileProbe),
            max_file_size: DEFAULT_MAX_FILE_SIZE,
            check_interval: DEFAULT_CHECK_INTERVAL,
            crash_dir: PathBuf::from(DEFAULT_CRASH_DIR),
            threshold: Severity::All,
            console_enabled: true,
            console_prefix: String::new(),
        }
    }
}

/// Leveled logger writing to a rotating file and, optionally, the console.
///
/// Every emission method is infallible from the caller's side: I/O errors,
/// formatting errors and panics raised by user `Display` impls are reported
/// on the fallback channel instead.
///
/// # Example
///
/// ```rust,no_run
/// use rotolog::{Logger, Severity};
///
/// # fn example() -> anyhow::Result<()> {
/// let logger = Logger::builder().threshold(Severity::Info).build();
/// logger.attach("./log", "server")?;
///
/// logger.info("listening");
/// logger.warnf(format_args!("{} connections dropped", 3));
/// logger.errorln(&[&"peer", &"10.0.0.7", &"reset"]);
///
/// logger.shutdown();
/// # Ok(())
/// # }
/// ```
pub struct Logger {
    settings: Settings,
    console: Arc<dyn ConsoleWriter>,
    clock: Arc<dyn Clock>,
    probe: Arc<dyn FileProbe>,
    max_file_size: u64,
    check_interval: Duration,
    handle: OnceLock<Arc<ActiveLogHandle>>,
    monitor: Mutex<Option<MonitorHandle>>,
    crash: CrashRecorder,
}

impl Logger {
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::default()
    }

    /// A logger with default settings, not yet attached to any directory.
    pub fn new() -> Self {
        Self::builder().build()
    }

    /// Build a logger from `config` and attach it to the configured directory.
    ///
    /// The configuration is validated first; an empty base name or a zero
    /// size limit or interval is rejected with [`LogError::InvalidConfig`].
    pub fn from_config(config: &LoggerConfig) -> Result<Self> {
        ConfigLoader::validate(config).map_err(LogError::from)?;
        let logger = Self::builder().config(config).build();
        logger.attach(&config.log_dir, &config.base_name)?;
        Ok(logger)
    }

    /// Start writing to `{dir}/{YYYY-MM-DD}/{base_name}.{HH}_{MM}_{SS}.log`.
    ///
    /// The first call opens the file and starts the rotation monitor. Later
    /// calls switch to the new target and close the previous file. Failing
    /// to open the file is the only error callers ever see from this logger.
    pub fn attach(&self, dir: impl AsRef<Path>, base_name: &str) -> Result<PathBuf> {
        let mut monitor = self.monitor.lock().unwrap_or_else(PoisonError::into_inner);

        let (handle, path) = if let Some(handle) = self.handle.get() {
            let rotated = handle.retarget(dir, base_name)?;
            (Arc::clone(handle), rotated.current)
        } else {
            let opened = Arc::new(ActiveLogHandle::open_with(
                dir,
                base_name,
                Arc::clone(&self.clock),
                Arc::clone(&self.probe),
                self.max_file_size,
            )?);
            let path = opened.current_path();
            (Arc::clone(self.handle.get_or_init(|| opened)), path)
        };

        if monitor.as_ref().is_none_or(|running| !running.is_running()) {
            match RotationMonitor::new(handle, Arc::clone(&self.console))
                .with_interval(self.check_interval)
                .spawn()
            {
                Ok(started) => *monitor = Some(started),
                Err(e) => fallback::report(
                    self.console.as_ref(),
                    "rotation monitor could not start",
                    &LogError::io(&path, e),
                ),
            }
        }
        drop(monitor);

        info!(path = %path.display(), base_name, "logger attached");
        Ok(path)
    }

    pub fn threshold(&self) -> Severity {
        self.settings.threshold()
    }

    /// Records below `threshold` are dropped. [`Severity::All`] lets everything through.
    pub fn set_threshold(&self, threshold: Severity) {
        self.settings.set_threshold(threshold);
    }

    pub fn console_enabled(&self) -> bool {
        self.settings.console_enabled()
    }

    pub fn set_console_enabled(&self, enabled: bool) {
        self.settings.set_console_enabled(enabled);
    }

    pub fn console_prefix(&self) -> String {
        self.settings.console_prefix()
    }

    /// Tag console lines with `@prefix`. An empty prefix removes the tag.
    pub fn set_console_prefix(&self, prefix: &str) {
        self.settings.set_console_prefix(prefix);
    }

    /// Path of the file currently receiving records, if attached.
    pub fn current_path(&self) -> Option<PathBuf> {
        self.handle.get().map(|handle| handle.current_path())
    }

    /// Whether a record at `severity` would currently be emitted.
    pub fn enabled(&self, severity: Severity) -> bool {
        should_emit(severity, self.threshold())
    }

    /// Gate a batch of emissions on `level` once, up front.
    ///
    /// ```rust,no_run
    /// # use rotolog::{Logger, Severity};
    /// # let logger = Logger::new();
    /// let v = logger.verbose(Severity::Debug);
    /// if v.is_enabled() {
    ///     v.info("expensive state dump follows");
    /// }
    /// ```
    pub fn verbose(&self, level: Severity) -> Verbose<'_> {
        Verbose::new(self, self.enabled(level))
    }

    emission_methods! {
        Debug: debug, debugf, debugln;
        Info: info, infof, infoln;
        Warn: warn, warnf, warnln;
        Error: error, errorf, errorln;
        Fatal: fatal, fatalf, fatalln;
    }

    /// Log an already rendered message with an explicit source location.
    pub fn log(&self, severity: Severity, message: &str, file: &'static str, line: u32) {
        self.emit_guarded(severity, self.enabled(severity), file, line, |buf| {
            buf.push_str(message);
            Ok(())
        });
    }

    /// Run `f`; if it panics, write a crash dump and return `None`.
    pub fn capture_crash<T>(&self, f: impl FnOnce() -> T) -> Option<T> {
        self.crash.capture(f)
    }

    /// Await `future`; if it panics, write a crash dump and return `None`.
    pub async fn capture_crash_async<F: Future>(&self, future: F) -> Option<F::Output> {
        self.crash.capture_async(future).await
    }

    pub fn crash_dir(&self) -> &Path {
        self.crash.dir()
    }

    /// Push written records to disk.
    pub fn flush(&self) -> Result<()> {
        self.handle.get().map_or(Ok(()), |handle| handle.flush())
    }

    /// Stop the rotation monitor and close the file.
    ///
    /// Records emitted afterwards still reach the console if it is enabled.
    /// A later [`attach`](Self::attach) starts over.
    pub fn shutdown(&self) {
        let monitor = self
            .monitor
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(monitor) = monitor {
            monitor.stop();
        }

        if let Some(handle) = self.handle.get() {
            if let Err(e) = handle.close() {
                fallback::report(self.console.as_ref(), "closing log file failed", &e);
            }
        }
    }

    fn emit_value(
        &self,
        severity: Severity,
        value: &dyn fmt::Display,
        location: &'static Location<'static>,
    ) {
        self.dispatch_value(severity, self.enabled(severity), value, location);
    }

    fn emit_args(
        &self,
        severity: Severity,
        args: fmt::Arguments<'_>,
        location: &'static Location<'static>,
    ) {
        self.dispatch_args(severity, self.enabled(severity), args, location);
    }

    fn emit_joined(
        &self,
        severity: Severity,
        values: &[&dyn fmt::Display],
        location: &'static Location<'static>,
    ) {
        self.dispatch_joined(severity, self.enabled(severity), values, location);
    }

    pub(crate) fn dispatch_value(
        &self,
        severity: Severity,
        open: bool,
        value: &dyn fmt::Display,
        location: &'static Location<'static>,
    ) {
        self.emit_guarded(severity, open, location.file(), location.line(), |buf| {
            write!(buf, "{value}")
        });
    }

    pub(crate) fn dispatch_args(
        &self,
        severity: Severity,
        open: bool,
        args: fmt::Arguments<'_>,
        location: &'static Location<'static>,
    ) {
        self.emit_guarded(severity, open, location.file(), location.line(), |buf| {
            buf.write_fmt(args)
        });
    }

    pub(crate) fn dispatch_joined(
        &self,
        severity: Severity,
        open: bool,
        values: &[&dyn fmt::Display],
        location: &'static Location<'static>,
    ) {
        self.emit_guarded(severity, open, location.file(), location.line(), |buf| {
            join_into(buf, values)
        });
    }

    /// Render and write one record if `open`, absorbing every failure.
    fn emit_guarded(
        &self,
        severity: Severity,
        open: bool,
        file: &'static str,
        line: u32,
        render: impl FnOnce(&mut String) -> fmt::Result,
    ) {
        if !open {
            return;
        }

        let outcome = panic_scope::catch(|| -> Result<()> {
            let mut message = String::new();
            render(&mut message)?;
            let record = Record::new(severity, message, file, line, self.clock.now());
            self.write_record(&record)
        });

        let error = match outcome {
            Ok(Ok(())) => return,
            Ok(Err(e)) => e,
            Err(panic) => LogError::Panic(panic.value),
        };
        fallback::report(self.console.as_ref(), "log write failed", &error);
    }

    fn write_record(&self, record: &Record) -> Result<()> {
        let written = match self.handle.get() {
            Some(handle) => match handle.write(&format::file_line(record)) {
                Err(LogError::Closed) => Ok(()),
                other => other,
            },
            None => Ok(()),
        };

        if self.settings.console_enabled() {
            let prefix = self.settings.console_prefix();
            self.console.write_line(&format::console_line(record, &prefix));
        }

        written
    }
}

fn join_into(buf: &mut String, values: &[&dyn fmt::Display]) -> fmt::Result {
    for (i, value) in values.iter().enumerate() {
        if i > 0 {
            buf.push(' ');
        }
        write!(buf, "{value}")?;
    }
    Ok(())
}

impl Default for Logger {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        self.shutdown();
    }
}

impl fmt::Debug for Logger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Logger")
            .field("settings", &self.settings)
            .field("path", &self.current_path())
            .field("crash", &self.crash)
            .finish_non_exhaustive()
    }
}
