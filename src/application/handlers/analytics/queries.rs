//! AnalyticsService - Query handlers for dashboard and report views.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::domain::foundation::{DomainError, Timestamp};
use crate::domain::risk::{
    department_distribution, risk_matrix, DashboardMetrics, DashboardSummary,
    DepartmentBreakdown, ExecutiveSummary, MatrixCell, RiskFilter,
};
use crate::ports::{KpiRepository, KriRepository, RiskRepository};

/// Computes reports from the current repository contents.
pub struct AnalyticsService {
    risks: Arc<dyn RiskRepository>,
    kpis: Arc<dyn KpiRepository>,
    kris: Arc<dyn KriRepository>,
}

impl AnalyticsService {
    pub fn new(
        risks: Arc<dyn RiskRepository>,
        kpis: Arc<dyn KpiRepository>,
        kris: Arc<dyn KriRepository>,
    ) -> Self {
        Self { risks, kpis, kris }
    }

    /// Snapshot pushed to dashboards after a risk change.
    pub async fn dashboard_metrics(&self) -> Result<DashboardMetrics, DomainError> {
        let risks = self.risks.list(&RiskFilter::default()).await?;
        let kris = self.kris.list().await?;
        Ok(DashboardMetrics::compute(&risks, &kris))
    }

    pub async fn dashboard_summary(&self) -> Result<DashboardSummary, DomainError> {
        let risks = self.risks.list(&RiskFilter::default()).await?;
        let kpis = self.kpis.list().await?;
        let kris = self.kris.list().await?;
        Ok(DashboardSummary::compute(&risks, &kpis, &kris, Timestamp::now()))
    }

    pub async fn risk_matrix(&self) -> Result<Vec<MatrixCell>, DomainError> {
        let risks = self.risks.list(&RiskFilter::default()).await?;
        Ok(risk_matrix(&risks))
    }

    pub async fn department_distribution(
        &self,
    ) -> Result<BTreeMap<String, DepartmentBreakdown>, DomainError> {
        let risks = self.risks.list(&RiskFilter::default()).await?;
        Ok(department_distribution(&risks))
    }

    pub async fn executive_summary(&self) -> Result<ExecutiveSummary, DomainError> {
        let risks = self.risks.list(&RiskFilter::default()).await?;
        let kpis = self.kpis.list().await?;
        let kris = self.kris.list().await?;
        Ok(ExecutiveSummary::compute(&risks, &kpis, &kris, Timestamp::now()))
    }
}
