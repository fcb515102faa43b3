//! CreateRiskHandler - Command handler for registering new risks.

use std::sync::Arc;

use crate::domain::foundation::DomainError;
use crate::domain::realtime::{DomainEvent, Origin, RiskAction};
use crate::domain::risk::{NewRisk, Risk};
use crate::ports::{RealtimePublisher, RiskRepository};

use super::risk_value;

/// Command to register a new risk.
#[derive(Debug, Clone)]
pub struct CreateRiskCommand {
    pub input: NewRisk,
    /// Authenticated caller, if any.
    pub actor: Option<String>,
}

/// Handler for registering risks.
pub struct CreateRiskHandler {
    repository: Arc<dyn RiskRepository>,
    publisher: Arc<dyn RealtimePublisher>,
}

impl CreateRiskHandler {
    pub fn new(repository: Arc<dyn RiskRepository>, publisher: Arc<dyn RealtimePublisher>) -> Self {
        Self {
            repository,
            publisher,
        }
    }

    pub async fn handle(&self, cmd: CreateRiskCommand) -> Result<Risk, DomainError> {
        let risk = self.repository.create(cmd.input).await?;

        tracing::info!(risk_id = %risk.id, "risk registered");

        let event = DomainEvent::RiskChanged {
            action: RiskAction::Create,
            risk: risk_value(&risk),
        };
        self.publisher.publish(Origin::server(cmd.actor), event).await;

        Ok(risk)
    }
}
