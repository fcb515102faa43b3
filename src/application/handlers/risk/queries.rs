//! Risk register query handlers.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, RiskId};
use crate::domain::risk::{Risk, RiskFilter};
use crate::ports::RiskRepository;

/// Lists risks matching a filter.
pub struct ListRisksHandler {
    repository: Arc<dyn RiskRepository>,
}

impl ListRisksHandler {
    pub fn new(repository: Arc<dyn RiskRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, filter: RiskFilter) -> Result<Vec<Risk>, DomainError> {
        self.repository.list(&filter).await
    }
}

/// Loads one risk, failing with `RiskNotFound` when absent.
pub struct GetRiskHandler {
    repository: Arc<dyn RiskRepository>,
}

impl GetRiskHandler {
    pub fn new(repository: Arc<dyn RiskRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, id: RiskId) -> Result<Risk, DomainError> {
        self.repository.find_by_id(&id).await?.ok_or_else(|| {
            DomainError::new(ErrorCode::RiskNotFound, format!("Risk not found: {}", id))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::handlers::testing::demo_risks;
    use crate::domain::risk::RiskStatus;

    #[tokio::test]
    async fn list_applies_filter() {
        let handler = ListRisksHandler::new(demo_risks());

        let all = handler.handle(RiskFilter::default()).await.unwrap();
        let monitored = handler
            .handle(RiskFilter {
                status: Some(RiskStatus::Monitored),
                ..Default::default()
            })
            .await
            .unwrap();

        assert_eq!(all.len(), 3);
        assert_eq!(monitored.len(), 1);
        assert_eq!(monitored[0].id.as_str(), "R002");
    }

    #[tokio::test]
    async fn get_missing_risk_is_not_found() {
        let handler = GetRiskHandler::new(demo_risks());

        let err = handler.handle(RiskId::from_sequence(42)).await.unwrap_err();

        assert!(err.is_not_found());
        assert_eq!(err.message, "Risk not found: R042");
    }
}
