//! Logging infrastructure
//!
//! Structured logging using tracing and tracing-subscriber, to stderr and
//! optionally to a rolling JSON file.

pub mod logger;

pub use logger::LoggerImpl;
