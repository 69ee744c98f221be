use std::fmt;
use std::panic::Location;

use super::emission::emission_methods;
use super::logger::Logger;
use crate::domain::models::Severity;

/// Emission handle whose gate was decided once, when it was created.
///
/// Records go out at their own severity label but are not compared against
/// the threshold again; the console switch still applies.
#[derive(Debug, Clone, Copy)]
pub struct Verbose<'a> {
    logger: &'a Logger,
    enabled: bool,
}

impl<'a> Verbose<'a> {
    pub(crate) const fn new(logger: &'a Logger, enabled: bool) -> Self {
        Self { logger, enabled }
    }

    pub const fn is_enabled(&self) -> bool {
        self.enabled
    }

    emission_methods! {
        Debug: debug, debugf, debugln;
        Info: info, infof, infoln;
        Warn: warn, warnf, warnln;
        Error: error, errorf, errorln;
        Fatal: fatal, fatalf, fatalln;
    }

    fn emit_value(
        &self,
        severity: Severity,
        value: &dyn fmt::Display,
        location: &'static Location<'static>,
    ) {
        self.logger
            .dispatch_value(severity, self.enabled, value, location);
    }

    fn emit_args(
        &self,
        severity: Severity,
        args: fmt::Arguments<'_>,
        location: &'static Location<'static>,
    ) {
        self.logger.dispatch_args(severity, self.enabled, args, location);
    }

    fn emit_joined(
        &self,
        severity: Severity,
        values: &[&dyn fmt::Display],
        location: &'static Location<'static>,
    ) {
        self.logger
            .dispatch_joined(severity, self.enabled, values, location);
    }
}
