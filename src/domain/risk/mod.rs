//! Risk catalog: register risks, KPIs, KRIs and the aggregations over them.

mod analytics;
mod indicators;
mod level;
mod register;

pub use analytics::{
    department_distribution, risk_matrix, DashboardMetrics, DashboardSummary, DepartmentBreakdown,
    ExecutiveSummary, KpiStatusCounts, KriStatusCounts, LevelCounts, MatrixCell, SummaryFigures,
    STANDARD_RECOMMENDATIONS, TOP_RISK_COUNT,
};
pub use indicators::{
    Kpi, KpiStatus, KpiTrend, KpiUpdate, Kri, KriStatus, KriTrend, KriUpdate, NewKpi, NewKri,
};
pub use level::{RiskLevel, Severity};
pub use register::{
    inherent_risk, residual_risk, NewRisk, Risk, RiskFilter, RiskStatus, RiskUpdate,
};
