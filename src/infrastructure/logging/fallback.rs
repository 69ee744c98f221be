//! Last-resort reporting for failures inside the logger itself.
//!
//! Nothing here may fail or call back into the file sink: the message goes to
//! the console writer and to a `tracing` event targeted at this crate (the
//! tracing bridge ignores those, so there is no feedback loop).

use tracing::warn;

use crate::domain::error::LogError;
use crate::domain::ports::ConsoleWriter;

/// Prefix marking fallback lines on the console.
pub const FALLBACK_PREFIX: &str = "rotolog:";

/// Report an internal failure without propagating it.
pub fn report(console: &dyn ConsoleWriter, context: &str, error: &LogError) {
    warn!(error = %error, "{context}");
    console.write_line(&format!("{FALLBACK_PREFIX} {context}: {error}"));
}
