//! KPI handlers.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, ErrorCode, KpiId};
use crate::domain::risk::{Kpi, KpiUpdate};
use crate::ports::KpiRepository;

pub struct ListKpisHandler {
    repository: Arc<dyn KpiRepository>,
}

impl ListKpisHandler {
    pub fn new(repository: Arc<dyn KpiRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self) -> Result<Vec<Kpi>, DomainError> {
        self.repository.list().await
    }
}

pub struct GetKpiHandler {
    repository: Arc<dyn KpiRepository>,
}

impl GetKpiHandler {
    pub fn new(repository: Arc<dyn KpiRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, id: KpiId) -> Result<Kpi, DomainError> {
        self.repository.find_by_id(&id).await?.ok_or_else(|| {
            DomainError::new(ErrorCode::KpiNotFound, format!("KPI not found: {}", id))
        })
    }
}

#[derive(Debug, Clone)]
pub struct UpdateKpiCommand {
    pub kpi_id: KpiId,
    pub update: KpiUpdate,
}

pub struct UpdateKpiHandler {
    repository: Arc<dyn KpiRepository>,
}

impl UpdateKpiHandler {
    pub fn new(repository: Arc<dyn KpiRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, cmd: UpdateKpiCommand) -> Result<Kpi, DomainError> {
        let kpi = self.repository.update(&cmd.kpi_id, cmd.update).await?;
        tracing::info!(kpi_id = %kpi.id, current = kpi.current, "KPI updated");
        Ok(kpi)
    }
}
