//! DeleteRiskHandler - Command handler for removing a risk from the register.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, RiskId};
use crate::domain::realtime::{DomainEvent, Origin, RiskAction};
use crate::domain::risk::Risk;
use crate::ports::{RealtimePublisher, RiskRepository};

use super::risk_value;

#[derive(Debug, Clone)]
pub struct DeleteRiskCommand {
    pub risk_id: RiskId,
    pub actor: Option<String>,
}

pub struct DeleteRiskHandler {
    repository: Arc<dyn RiskRepository>,
    publisher: Arc<dyn RealtimePublisher>,
}

impl DeleteRiskHandler {
    pub fn new(repository: Arc<dyn RiskRepository>, publisher: Arc<dyn RealtimePublisher>) -> Self {
        Self {
            repository,
            publisher,
        }
    }

    /// Removes the risk and returns it as it was.
    pub async fn handle(&self, cmd: DeleteRiskCommand) -> Result<Risk, DomainError> {
        let risk = self.repository.delete(&cmd.risk_id).await?;

        tracing::info!(risk_id = %risk.id, "risk deleted");

        let event = DomainEvent::RiskChanged {
            action: RiskAction::Delete,
            risk: risk_value(&risk),
        };
        self.publisher.publish(Origin::server(cmd.actor), event).await;

        Ok(risk)
    }
}
