//! Core services: id allocation, the rendezvous broker and the exchange
//! coordinator built on top of it.

pub mod id_allocator;
pub mod interaction_coordinator;
pub mod rendezvous_broker;

pub use id_allocator::IdAllocator;
pub use interaction_coordinator::{
    ExchangePhase, InteractionCoordinator, InteractionOutcome, InteractionReply,
    InteractionRequest,
};
pub use rendezvous_broker::{
    BrokerStats, PublishReceipt, RendezvousBroker, WaitOutcome, DEFAULT_LANE,
};
