//! # Varsel Engine Runtime
//!
//! Wires the event bus, detection engine, metrics, and alert sinks into one
//! pipeline with a single processing task.

pub mod error;
pub mod runtime;
pub mod sink;

pub use error::EngineError;
pub use runtime::EngineRuntime;
pub use sink::{AlertSink, LogSink};
