//! Domain layer for the human-in-the-loop rendezvous
//!
//! This module contains core models, errors and ports.

pub mod errors;
pub mod models;
pub mod ports;

pub use errors::{BrokerError, InteractionError, UpdateOutcome};
