//! Domain layer for rotolog
//!
//! Pure types (severities, records, crash reports), the error enum and the
//! ports the infrastructure implements.

pub mod error;
pub mod models;
pub mod ports;

pub use error::LogError;
