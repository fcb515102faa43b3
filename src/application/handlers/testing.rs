//! Test doubles shared by the handler tests.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;

use crate::adapters::memory::InMemoryRiskRepository;
use crate::domain::realtime::{DomainEvent, Origin};
use crate::ports::RealtimePublisher;

/// Records every published event instead of delivering it.
#[derive(Default)]
pub struct RecordingPublisher {
    published: Mutex<Vec<(Origin, DomainEvent)>>,
}

impl RecordingPublisher {
    pub fn published(&self) -> Vec<(Origin, DomainEvent)> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl RealtimePublisher for RecordingPublisher {
    async fn publish(&self, origin: Origin, event: DomainEvent) -> usize {
        self.published.lock().unwrap().push((origin, event));
        1
    }
}

pub fn demo_risks() -> Arc<InMemoryRiskRepository> {
    Arc::new(InMemoryRiskRepository::with_demo_data().unwrap())
}
