//! Forwards `tracing` events into a [`Logger`].

use std::fmt::{self, Write as _};
use std::sync::Arc;
use tracing::field::{Field, Visit};
use tracing::level_filters::LevelFilter;
use tracing::{Event, Subscriber};
use tracing_subscriber::filter::Targets;
use tracing_subscriber::layer::{Context, SubscriberExt};
use tracing_subscriber::registry::LookupSpan;
use tracing_subscriber::util::{SubscriberInitExt, TryInitError};
use tracing_subscriber::{EnvFilter, Layer};

use super::logger::Logger;
use crate::domain::models::Severity;

/// Target prefix of this crate's own diagnostics, never forwarded.
const OWN_TARGET: &str = "rotolog";

/// A tracing layer that writes events through a [`Logger`].
pub struct RotologLayer {
    logger: Arc<Logger>,
}

impl RotologLayer {
    pub fn new(logger: Arc<Logger>) -> Self {
        Self { logger }
    }
}

/// TRACE has no counterpart and is folded into DEBUG.
pub fn severity_for(level: tracing::Level) -> Severity {
    match level {
        tracing::Level::ERROR => Severity::Error,
        tracing::Level::WARN => Severity::Warn,
        tracing::Level::INFO => Severity::Info,
        tracing::Level::DEBUG | tracing::Level::TRACE => Severity::Debug,
    }
}

impl<S> Layer<S> for RotologLayer
where
    S: Subscriber + for<'a> LookupSpan<'a>,
{
    fn on_event(&self, event: &Event<'_>, ctx: Context<'_, S>) {
        let metadata = event.metadata();
        if metadata.target().starts_with(OWN_TARGET) {
            return;
        }

        let severity = severity_for(*metadata.level());
        if !self.logger.enabled(severity) {
            return;
        }

        let mut visitor = EventText::default();
        event.record(&mut visitor);

        let spans: Vec<&str> = ctx
            .event_scope(event)
            .map(|scope| scope.from_root().map(|span| span.name()).collect())
            .unwrap_or_default();
        let message = if spans.is_empty() {
            visitor.finish()
        } else {
            format!("{}: {}", spans.join("::"), visitor.finish())
        };

        self.logger.log(
            severity,
            &message,
            metadata.file().unwrap_or(metadata.target()),
            metadata.line().unwrap_or(0),
        );
    }
}

/// Collects the `message` field and every other field as `key=value`.
#[derive(Default)]
struct EventText {
    message: String,
    fields: String,
}

impl EventText {
    fn finish(self) -> String {
        match (self.message.is_empty(), self.fields.is_empty()) {
            (_, true) => self.message,
            (true, false) => self.fields,
            (false, false) => format!("{} {}", self.message, self.fields),
        }
    }
}

impl Visit for EventText {
    fn record_str(&mut self, field: &Field, value: &str) {
        if field.name() == "message" {
            value.clone_into(&mut self.message);
        } else {
            self.record_debug(field, &format_args!("{value}"));
        }
    }

    fn record_debug(&mut self, field: &Field, value: &dyn fmt::Debug) {
        if field.name() == "message" {
            self.message = format!("{value:?}");
            return;
        }
        if !self.fields.is_empty() {
            self.fields.push(' ');
        }
        let _ = write!(self.fields, "{}={value:?}", field.name());
    }
}

/// Install a global subscriber that forwards events into `logger`.
///
/// Forwarded events are filtered by `RUST_LOG` (default `info`). This
/// crate's own diagnostics go to stderr as JSON at `warn` and above.
///
/// ```rust,no_run
/// use rotolog::services::{bridge, global};
///
/// global::init("./log", "server").expect("log directory must be writable");
/// bridge::init_tracing_bridge(global::shared()).expect("subscriber already set");
/// tracing::info!(port = 8080, "listening");
/// ```
pub fn init_tracing_bridge(logger: Arc<Logger>) -> Result<(), TryInitError> {
    let bridge_filter = EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy();

    let diagnostics = tracing_subscriber::fmt::layer()
        .json()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_filter(Targets::new().with_target(OWN_TARGET, LevelFilter::WARN));

    tracing_subscriber::registry()
        .with(RotologLayer::new(logger).with_filter(bridge_filter))
        .with(diagnostics)
        .try_init()
}
