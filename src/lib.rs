//! human-in-mcp - Human-in-the-loop MCP server
//!
//! An agent calls the `human_interaction` tool to report progress. The call
//! blocks while the report is shown to an operator in a web gateway, and
//! returns the operator's next instruction (or a request to stop).
//!
//! # Architecture
//!
//! This crate follows Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Models, errors and the task registry port
//! - **Service Layer** (`services`): Id allocation, the rendezvous broker and
//!   the interaction coordinator
//! - **Adapters** (`adapters`): In-memory registry, operator gateway, MCP transports
//! - **Infrastructure Layer** (`infrastructure`): Configuration and logging
//! - **CLI Layer** (`cli`): Command-line interface
//!
//! # Example
//!
//! ```no_run
//! use human_in_mcp::cli::commands::serve::build_coordinator;
//! use human_in_mcp::services::InteractionRequest;
//! use human_in_mcp::Config;
//! use tokio_util::sync::CancellationToken;
//!
//! # async fn example() {
//! let coordinator = build_coordinator(&Config::default());
//! let reply = coordinator
//!     .interact(
//!         InteractionRequest {
//!             summary: "built feature X".into(),
//!             next_options: vec!["test".into(), "deploy".into()],
//!             ..Default::default()
//!         },
//!         &CancellationToken::new(),
//!     )
//!     .await;
//! println!("{}", reply.text);
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::memory::InMemoryTaskRegistry;
pub use domain::errors::{BrokerError, InteractionError, UpdateOutcome};
pub use domain::models::{
    Config, HumanResponse, RenderAnnouncement, Selection, Task, TaskStatus,
};
pub use domain::ports::TaskRegistry;
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::{InteractionCoordinator, RendezvousBroker};
