//! Formatting macros over the process-wide logger.
//!
//! `*f!` macros take [`format!`]-style arguments; `*ln!` macros take any
//! number of `Display` values and join them with single spaces. The call
//! site of the macro is recorded as the record's location.

/// Log at `Debug` with [`format!`]-style arguments.
#[macro_export]
macro_rules! debugf {
    ($($arg:tt)+) => {
        $crate::services::global::debugf(::std::format_args!($($arg)+))
    };
}

/// Log at `Info` with [`format!`]-style arguments.
#[macro_export]
macro_rules! infof {
    ($($arg:tt)+) => {
        $crate::services::global::infof(::std::format_args!($($arg)+))
    };
}

/// Log at `Warn` with [`format!`]-style arguments.
#[macro_export]
macro_rules! warnf {
    ($($arg:tt)+) => {
        $crate::services::global::warnf(::std::format_args!($($arg)+))
    };
}

/// Log at `Error` with [`format!`]-style arguments.
#[macro_export]
macro_rules! errorf {
    ($($arg:tt)+) => {
        $crate::services::global::errorf(::std::format_args!($($arg)+))
    };
}

/// Log at `Fatal` with [`format!`]-style arguments. The process keeps running.
#[macro_export]
macro_rules! fatalf {
    ($($arg:tt)+) => {
        $crate::services::global::fatalf(::std::format_args!($($arg)+))
    };
}

/// Log space-joined values at `Debug`.
#[macro_export]
macro_rules! debugln {
    ($($value:expr),* $(,)?) => {
        $crate::services::global::debugln(&[$(&$value as &dyn ::std::fmt::Display),*])
    };
}

/// Log space-joined values at `Info`.
#[macro_export]
macro_rules! infoln {
    ($($value:expr),* $(,)?) => {
        $crate::services::global::infoln(&[$(&$value as &dyn ::std::fmt::Display),*])
    };
}

/// Log space-joined values at `Warn`.
#[macro_export]
macro_rules! warnln {
    ($($value:expr),* $(,)?) => {
        $crate::services::global::warnln(&[$(&$value as &dyn ::std::fmt::Display),*])
    };
}

/// Log space-joined values at `Error`.
#[macro_export]
macro_rules! errorln {
    ($($value:expr),* $(,)?) => {
        $crate::services::global::errorln(&[$(&$value as &dyn ::std::fmt::Display),*])
    };
}

/// Log space-joined values at `Fatal`. The process keeps running.
#[macro_export]
macro_rules! fatalln {
    ($($value:expr),* $(,)?) => {
        $crate::services::global::fatalln(&[$(&$value as &dyn ::std::fmt::Display),*])
    };
}
