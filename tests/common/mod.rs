//! Common test utilities for integration tests
//!
//! Provides shared fixtures and helpers used across multiple integration
//! test files.

use std::sync::Arc;
use std::time::Duration;

use human_in_mcp::domain::models::{AddressingMode, BrokerConfig, InteractionConfig};
use human_in_mcp::{InMemoryTaskRegistry, InteractionCoordinator, RendezvousBroker};

/// Setup test logging
///
/// Initializes tracing subscriber for test output.
/// Call this at the beginning of tests that need logging.
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}

/// Broker over a fresh in-memory registry
#[allow(dead_code)]
pub fn broker(capacity: usize, addressing: AddressingMode) -> Arc<RendezvousBroker> {
    let config = BrokerConfig {
        queue_capacity: capacity,
        addressing,
        ..Default::default()
    };
    Arc::new(RendezvousBroker::new(
        Arc::new(InMemoryTaskRegistry::new()),
        &config,
    ))
}

/// Coordinator over a fresh FIFO broker
#[allow(dead_code)]
pub fn coordinator(config: &InteractionConfig) -> Arc<InteractionCoordinator> {
    Arc::new(InteractionCoordinator::new(
        broker(10, AddressingMode::Fifo),
        config,
    ))
}

/// Wait until `broker` lists at least `count` announcements.
///
/// Polls every 5ms; returns `false` on timeout.
#[allow(dead_code)]
pub async fn wait_for_announcements(broker: &RendezvousBroker, count: usize, timeout_ms: u64) -> bool {
    let deadline = tokio::time::Instant::now() + Duration::from_millis(timeout_ms);
    while tokio::time::Instant::now() < deadline {
        if broker.announcements().await.len() >= count {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(5)).await;
    }
    false
}
