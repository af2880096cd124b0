use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Operator-facing HTTP gateway
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Agent-facing MCP transport
    #[serde(default)]
    pub mcp: McpConfig,

    /// Rendezvous broker tuning
    #[serde(default)]
    pub broker: BrokerConfig,

    /// Per-exchange behaviour of the coordinator
    #[serde(default)]
    pub interaction: InteractionConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// HTTP gateway configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GatewayConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_gateway_port")]
    pub port: u16,

    #[serde(default = "default_true")]
    pub enable_cors: bool,
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

const fn default_gateway_port() -> u16 {
    8094
}

const fn default_true() -> bool {
    true
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_gateway_port(),
            enable_cors: true,
        }
    }
}

/// How the MCP tool is exposed to the agent
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum McpTransport {
    /// Newline-delimited JSON-RPC on stdin/stdout
    #[default]
    Stdio,
    /// JSON-RPC over `POST /mcp`
    Http,
}


/// MCP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct McpConfig {
    #[serde(default)]
    pub transport: McpTransport,

    #[serde(default = "default_host")]
    pub host: String,

    /// Port for the HTTP transport (ignored for stdio)
    #[serde(default = "default_mcp_port")]
    pub port: u16,
}

const fn default_mcp_port() -> u16 {
    8093
}

impl Default for McpConfig {
    fn default() -> Self {
        Self {
            transport: McpTransport::default(),
            host: default_host(),
            port: default_mcp_port(),
        }
    }
}

/// How operator responses are matched to outstanding announcements
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AddressingMode {
    /// One implicit conversation; always answer the oldest announcement
    #[default]
    Fifo,
    /// Answer the oldest announcement of an explicitly named conversation
    Conversation,
}


/// Rendezvous broker configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct BrokerConfig {
    /// Capacity of the wake-signal queue and of each response lane
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,

    #[serde(default)]
    pub addressing: AddressingMode,

    /// Prefix for task ids
    #[serde(default = "default_id_prefix")]
    pub id_prefix: String,
}

const fn default_queue_capacity() -> usize {
    10
}

fn default_id_prefix() -> String {
    "id-".to_string()
}

impl Default for BrokerConfig {
    fn default() -> Self {
        Self {
            queue_capacity: default_queue_capacity(),
            addressing: AddressingMode::default(),
            id_prefix: default_id_prefix(),
        }
    }
}

/// Default continuation prompt. `{instruction}`, `{task_id}`, `{round}` and
/// `{conversation_id}` are substituted per exchange; the conversation id is
/// empty when the agent did not send one.
pub const DEFAULT_CONTINUATION_TEMPLATE: &str = "[USER TASK]
{instruction}

[IMPORTANT]
1. Carry out the task above now.
2. When you are done, call the human_interaction tool again to report the result.
3. Pass taskId \"{task_id}\" in that call so this task is marked completed.
4. Pass the same conversationId as before: \"{conversation_id}\" (omit it if empty).
5. Call parameters:
   - summary: what you did
   - difficulties: problems you hit, or \"none\"
   - nextOptions: suggested next steps (JSON array)
   - taskId: {task_id}
   - conversationId: {conversation_id}

[CONTEXT]
- Exchange round: {round}
This is a continuous loop: after every task, call human_interaction again.";

/// Coordinator configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct InteractionConfig {
    /// Give up waiting for the operator after this many seconds (none = wait forever)
    #[serde(default)]
    pub response_timeout_secs: Option<u64>,

    /// After a timeout, how long to wait for an answer that raced the deadline
    #[serde(default = "default_late_response_grace_ms")]
    pub late_response_grace_ms: u64,

    #[serde(default = "default_continuation_template")]
    pub continuation_template: String,
}

const fn default_late_response_grace_ms() -> u64 {
    2000
}

fn default_continuation_template() -> String {
    DEFAULT_CONTINUATION_TEMPLATE.to_string()
}

impl Default for InteractionConfig {
    fn default() -> Self {
        Self {
            response_timeout_secs: None,
            late_response_grace_ms: default_late_response_grace_ms(),
            continuation_template: default_continuation_template(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Log level: trace, debug, info, warn, error
    #[serde(default = "default_log_level")]
    pub level: String,

    /// Log format: json or pretty
    #[serde(default = "default_log_format")]
    pub format: String,

    /// Directory for rolling log files (none = stderr only)
    #[serde(default)]
    pub log_dir: Option<PathBuf>,

    /// File rotation: daily, hourly or never
    #[serde(default = "default_rotation")]
    pub rotation: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

fn default_log_format() -> String {
    "pretty".to_string()
}

fn default_rotation() -> String {
    "daily".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
            log_dir: None,
            rotation: default_rotation(),
        }
    }
}
