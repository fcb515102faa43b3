//! KRI handlers.
//!
//! An update that takes a KRI from green to breached raises the same alert
//! a client-reported breach would.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, KriId};
use crate::domain::realtime::{DomainEvent, KriBreach, Origin};
use crate::domain::risk::{Kri, KriUpdate};
use crate::ports::{KriRepository, RealtimePublisher};

pub struct ListKrisHandler {
    repository: Arc<dyn KriRepository>,
}

impl ListKrisHandler {
    pub fn new(repository: Arc<dyn KriRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self) -> Result<Vec<Kri>, DomainError> {
        self.repository.list().await
    }
}

pub struct GetKriHandler {
    repository: Arc<dyn KriRepository>,
}

impl GetKriHandler {
    pub fn new(repository: Arc<dyn KriRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, id: KriId) -> Result<Kri, DomainError> {
        self.repository.find_by_id(&id).await?.ok_or_else(|| not_found(&id))
    }
}

#[derive(Debug, Clone)]
pub struct UpdateKriCommand {
    pub kri_id: KriId,
    pub update: KriUpdate,
    pub actor: Option<String>,
}

pub struct UpdateKriHandler {
    repository: Arc<dyn KriRepository>,
    publisher: Arc<dyn RealtimePublisher>,
}

impl UpdateKriHandler {
    pub fn new(repository: Arc<dyn KriRepository>, publisher: Arc<dyn RealtimePublisher>) -> Self {
        Self {
            repository,
            publisher,
        }
    }

    pub async fn handle(&self, cmd: UpdateKriCommand) -> Result<Kri, DomainError> {
        let was_breached = self
            .repository
            .find_by_id(&cmd.kri_id)
            .await?
            .ok_or_else(|| not_found(&cmd.kri_id))?
            .is_breached();

        let kri = self.repository.update(&cmd.kri_id, cmd.update).await?;

        tracing::info!(kri_id = %kri.id, status = ?kri.status, "KRI updated");

        if kri.is_breached() && !was_breached {
            let breach = KriBreach {
                kri_id: Some(kri.id.to_string()),
                name: Some(kri.name.clone()),
                threshold: kri.threshold,
                current_value: kri.current,
            };
            self.publisher
                .publish(Origin::server(cmd.actor), DomainEvent::KriBreach(breach))
                .await;
        }

        Ok(kri)
    }
}

fn not_found(id: &KriId) -> DomainError {
    DomainError::new(ErrorCode::KriNotFound, format!("KRI not found: {}", id))
}
