//! In-memory adapters. State lives for the lifetime of the process.

pub mod task_registry;

pub use task_registry::InMemoryTaskRegistry;
