//! Tracing setup shared by the relay binary: fmt logging, optional OTLP
//! export, and span builders.

pub mod config;
pub mod otlp;
pub mod spans;

pub use config::{OtlpProtocol, TracingConfig};
pub use otlp::{init_tracing, TracingGuard};
