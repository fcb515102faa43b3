//! Pure aggregations over the risk catalog.
//!
//! Everything here takes slices of entities and returns serializable
//! reports; the repositories decide where the entities come from.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

use super::{Kpi, KpiStatus, Kri, KriStatus, Risk, RiskLevel};

/// Recommendations attached to every executive summary.
pub const STANDARD_RECOMMENDATIONS: [&str; 3] = [
    "Increase control measures for high-risk areas",
    "Review and update risk assessments quarterly",
    "Enhance monitoring of critical KRIs",
];

/// Number of risks listed in the executive summary.
pub const TOP_RISK_COUNT: usize = 5;

/// Counts of risks per level.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LevelCounts {
    pub critical: usize,
    pub high: usize,
    pub medium: usize,
    pub low: usize,
}

impl LevelCounts {
    pub fn record(&mut self, level: RiskLevel) {
        match level {
            RiskLevel::Critical => self.critical += 1,
            RiskLevel::High => self.high += 1,
            RiskLevel::Medium => self.medium += 1,
            RiskLevel::Low => self.low += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.critical + self.high + self.medium + self.low
    }

    /// Buckets raw scores, e.g. heatmap cells.
    pub fn from_scores(scores: impl IntoIterator<Item = f64>) -> Self {
        let mut counts = Self::default();
        for score in scores {
            counts.record(RiskLevel::from_score(score));
        }
        counts
    }
}

/// Snapshot pushed to dashboards after every risk change.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardMetrics {
    pub total_risks: usize,
    pub critical_risks: usize,
    pub high_risks: usize,
    pub medium_risks: usize,
    pub low_risks: usize,
    #[serde(rename = "activeKRIs")]
    pub active_kris: usize,
    #[serde(rename = "breachedKRIs")]
    pub breached_kris: usize,
}

impl DashboardMetrics {
    pub fn compute(risks: &[Risk], kris: &[Kri]) -> Self {
        let levels = level_counts(risks);
        Self {
            total_risks: risks.len(),
            critical_risks: levels.critical,
            high_risks: levels.high,
            medium_risks: levels.medium,
            low_risks: levels.low,
            active_kris: kris.len(),
            breached_kris: kris.iter().filter(|k| k.is_breached()).count(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiStatusCounts {
    pub on_track: usize,
    pub attention: usize,
    pub critical: usize,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct KriStatusCounts {
    pub green: usize,
    pub amber: usize,
    pub red: usize,
}

/// `GET /api/dashboard/summary`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardSummary {
    pub total_risks: usize,
    pub critical_risks: usize,
    pub high_risks: usize,
    pub medium_risks: usize,
    pub low_risks: usize,
    pub kpi_status: KpiStatusCounts,
    pub kri_status: KriStatusCounts,
    pub last_updated: Timestamp,
}

impl DashboardSummary {
    pub fn compute(risks: &[Risk], kpis: &[Kpi], kris: &[Kri], now: Timestamp) -> Self {
        let levels = level_counts(risks);

        let mut kpi_status = KpiStatusCounts::default();
        for kpi in kpis {
            match kpi.status {
                KpiStatus::OnTrack => kpi_status.on_track += 1,
                KpiStatus::Attention => kpi_status.attention += 1,
                KpiStatus::Critical => kpi_status.critical += 1,
            }
        }

        let mut kri_status = KriStatusCounts::default();
        for kri in kris {
            match kri.status {
                KriStatus::Green => kri_status.green += 1,
                KriStatus::Amber => kri_status.amber += 1,
                KriStatus::Red => kri_status.red += 1,
            }
        }

        Self {
            total_risks: risks.len(),
            critical_risks: levels.critical,
            high_risks: levels.high,
            medium_risks: levels.medium,
            low_risks: levels.low,
            kpi_status,
            kri_status,
            last_updated: now,
        }
    }
}

/// One occupied cell of the likelihood × impact matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixCell {
    pub likelihood: u8,
    pub impact: u8,
    pub count: usize,
    pub score: u32,
    pub level: RiskLevel,
}

/// Occupied cells, ordered by likelihood then impact.
pub fn risk_matrix(risks: &[Risk]) -> Vec<MatrixCell> {
    let mut cells: BTreeMap<(u8, u8), usize> = BTreeMap::new();
    for risk in risks {
        *cells.entry((risk.likelihood, risk.impact)).or_default() += 1;
    }

    cells
        .into_iter()
        .map(|((likelihood, impact), count)| {
            let score = u32::from(likelihood) * u32::from(impact);
            MatrixCell {
                likelihood,
                impact,
                count,
                score,
                level: RiskLevel::from_score(f64::from(score)),
            }
        })
        .collect()
}

/// Per-department totals and level counts.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct DepartmentBreakdown {
    pub total: usize,
    #[serde(flatten)]
    pub levels: LevelCounts,
}

pub fn department_distribution(risks: &[Risk]) -> BTreeMap<String, DepartmentBreakdown> {
    let mut distribution: BTreeMap<String, DepartmentBreakdown> = BTreeMap::new();
    for risk in risks {
        let entry = distribution.entry(risk.department.clone()).or_default();
        entry.total += 1;
        entry.levels.record(risk.level());
    }
    distribution
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SummaryFigures {
    pub total_risks: usize,
    pub average_inherent_risk: f64,
    pub average_residual_risk: f64,
    pub control_effectiveness_average: f64,
}

/// `GET /api/reports/executive-summary`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutiveSummary {
    pub generated_at: Timestamp,
    pub period: String,
    pub summary: SummaryFigures,
    pub top_risks: Vec<Risk>,
    pub kpi_performance: Vec<Kpi>,
    pub kri_alerts: Vec<Kri>,
    pub recommendations: Vec<String>,
}

impl ExecutiveSummary {
    /// Averages are zero for an empty register.
    pub fn compute(risks: &[Risk], kpis: &[Kpi], kris: &[Kri], now: Timestamp) -> Self {
        let mut top_risks = risks.to_vec();
        // Stable sort keeps register order among equal scores.
        top_risks.sort_by(|a, b| b.inherent_risk.cmp(&a.inherent_risk));
        top_risks.truncate(TOP_RISK_COUNT);

        Self {
            generated_at: now,
            period: now.quarter_label(),
            summary: SummaryFigures {
                total_risks: risks.len(),
                average_inherent_risk: mean(risks.iter().map(|r| f64::from(r.inherent_risk))),
                average_residual_risk: mean(risks.iter().map(|r| r.residual_risk)),
                control_effectiveness_average: mean(risks.iter().map(|r| r.control_effectiveness)),
            },
            top_risks,
            kpi_performance: kpis.to_vec(),
            kri_alerts: kris.iter().filter(|k| k.is_breached()).cloned().collect(),
            recommendations: STANDARD_RECOMMENDATIONS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

fn level_counts(risks: &[Risk]) -> LevelCounts {
    let mut counts = LevelCounts::default();
    for risk in risks {
        counts.record(risk.level());
    }
    counts
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, n) = values.fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    if n == 0 {
        0.0
    } else {
        sum / n as f64
    }
}
