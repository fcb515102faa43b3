//! Port for pushing domain events to connected dashboards.
//!
//! Application handlers publish through this port after a mutation so that
//! REST changes reach subscribers the same way socket-originated ones do.

use async_trait::async_trait;

use crate::domain::realtime::{DomainEvent, Origin};

/// Fans a domain event out to the rooms that care about it.
///
/// Delivery is best-effort: connections that have gone away are skipped,
/// and publishing never fails the mutation that triggered it.
#[async_trait]
pub trait RealtimePublisher: Send + Sync {
    /// Returns the number of messages enqueued.
    async fn publish(&self, origin: Origin, event: DomainEvent) -> usize;
}
