//! Domain models.

pub mod config;
pub mod render;
pub mod response;
pub mod task;

pub use config::{
    AddressingMode, BrokerConfig, Config, GatewayConfig, InteractionConfig, LoggingConfig,
    McpConfig, McpTransport, DEFAULT_CONTINUATION_TEMPLATE,
};
pub use render::{parse_next_options, RenderAnnouncement};
pub use response::{
    HumanResponse, Resolution, Selection, END_OF_CONVERSATION, FREE_TEXT_INDEX,
};
pub use task::{Task, TaskStatus};
