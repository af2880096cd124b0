//! Port trait definitions (Hexagonal Architecture)
//!
//! - TaskRegistry: lifecycle records for operator-driven tasks
//!
//! Adapters in `crate::adapters` implement these so that services stay
//! independent of how state is stored.

pub mod task_registry;

pub use task_registry::TaskRegistry;
