//! Generates the fifteen emission methods shared by [`Logger`](super::Logger)
//! and [`Verbose`](super::Verbose).
//!
//! The host type supplies `emit_value`, `emit_args` and `emit_joined`, each
//! taking the severity and the caller's location.

macro_rules! emission_methods {
    ($($severity:ident: $plain:ident, $formatted:ident, $joined:ident;)+) => {
        $(
            #[doc = concat!("Log `value` at `", stringify!($severity), "`.")]
            #[track_caller]
            pub fn $plain(&self, value: impl ::std::fmt::Display) {
                self.emit_value(
                    $crate::domain::models::Severity::$severity,
                    &value,
                    ::std::panic::Location::caller(),
                );
            }

            #[doc = concat!(
                "Log pre-built [`format_args!`] arguments at `",
                stringify!($severity),
                "`."
            )]
            #[track_caller]
            pub fn $formatted(&self, args: ::std::fmt::Arguments<'_>) {
                self.emit_args(
                    $crate::domain::models::Severity::$severity,
                    args,
                    ::std::panic::Location::caller(),
                );
            }

            #[doc = concat!(
                "Log `values` joined by single spaces at `",
                stringify!($severity),
                "`."
            )]
            #[track_caller]
            pub fn $joined(&self, values: &[&dyn ::std::fmt::Display]) {
                self.emit_joined(
                    $crate::domain::models::Severity::$severity,
                    values,
                    ::std::panic::Location::caller(),
                );
            }
        )+
    };
}

pub(crate) use emission_methods;
