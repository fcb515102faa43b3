//! UpdateRiskHandler - Command handler for reassessing a risk.

use std::sync::Arc;

use serde_json::json;

use crate::domain::foundation::{DomainError, ErrorCode, RiskId};
use crate::domain::realtime::{DomainEvent, Origin, RiskAction};
use crate::domain::risk::{Risk, RiskUpdate};
use crate::ports::{RealtimePublisher, RiskRepository};

use super::risk_value;

/// Command to apply a partial update to a risk.
#[derive(Debug, Clone)]
pub struct UpdateRiskCommand {
    pub risk_id: RiskId,
    pub update: RiskUpdate,
    pub actor: Option<String>,
}

/// Handler for updating risks.
///
/// The published payload carries the previous matrix position under
/// `oldPosition`; routing compares it with the new position to decide
/// whether matrix views need to move the risk.
pub struct UpdateRiskHandler {
    repository: Arc<dyn RiskRepository>,
    publisher: Arc<dyn RealtimePublisher>,
}

impl UpdateRiskHandler {
    pub fn new(repository: Arc<dyn RiskRepository>, publisher: Arc<dyn RealtimePublisher>) -> Self {
        Self {
            repository,
            publisher,
        }
    }

    pub async fn handle(&self, cmd: UpdateRiskCommand) -> Result<Risk, DomainError> {
        let previous = self
            .repository
            .find_by_id(&cmd.risk_id)
            .await?
            .ok_or_else(|| {
                DomainError::new(
                    ErrorCode::RiskNotFound,
                    format!("Risk not found: {}", cmd.risk_id),
                )
            })?;

        let risk = self.repository.update(&cmd.risk_id, cmd.update).await?;

        tracing::info!(
            risk_id = %risk.id,
            inherent_risk = risk.inherent_risk,
            "risk reassessed"
        );

        let mut payload = risk_value(&risk);
        if let Some(object) = payload.as_object_mut() {
            object.insert(
                "oldPosition".to_string(),
                json!({ "likelihood": previous.likelihood, "impact": previous.impact }),
            );
        }
        let event = DomainEvent::RiskChanged {
            action: RiskAction::Update,
            risk: payload,
        };
        self.publisher.publish(Origin::server(cmd.actor), event).await;

        Ok(risk)
    }
}
