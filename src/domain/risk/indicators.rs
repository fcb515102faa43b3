//! Key performance and key risk indicators.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{KpiId, KriId, ValidationError};

use super::Severity;

// ════════════════════════════════════════════════════════════════════════════════
// KPI
// ════════════════════════════════════════════════════════════════════════════════

/// Direction a KPI is moving in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum KpiTrend {
    Up,
    Down,
    #[default]
    Stable,
}

/// Whether a KPI is on course to meet its target.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "kebab-case")]
pub enum KpiStatus {
    #[default]
    OnTrack,
    Attention,
    Critical,
}

/// A key performance indicator with a target value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kpi {
    pub id: KpiId,
    pub name: String,
    pub category: String,
    pub current: f64,
    pub target: f64,
    pub unit: String,
    pub trend: KpiTrend,
    pub status: KpiStatus,
}

/// Input for creating a KPI.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewKpi {
    pub name: String,
    pub category: String,
    pub current: f64,
    pub target: f64,
    pub unit: String,
    #[serde(default)]
    pub trend: KpiTrend,
    #[serde(default)]
    pub status: KpiStatus,
}

/// Partial KPI update.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    pub current: Option<f64>,
    pub target: Option<f64>,
    pub unit: Option<String>,
    pub trend: Option<KpiTrend>,
    pub status: Option<KpiStatus>,
}

impl Kpi {
    pub fn create(id: KpiId, input: NewKpi) -> Result<Self, ValidationError> {
        if input.name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        Ok(Self {
            id,
            name: input.name,
            category: input.category,
            current: input.current,
            target: input.target,
            unit: input.unit,
            trend: input.trend,
            status: input.status,
        })
    }

    pub fn apply(&mut self, update: KpiUpdate) -> Result<(), ValidationError> {
        if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(ValidationError::empty_field("name"));
        }
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(current) = update.current {
            self.current = current;
        }
        if let Some(target) = update.target {
            self.target = target;
        }
        if let Some(unit) = update.unit {
            self.unit = unit;
        }
        if let Some(trend) = update.trend {
            self.trend = trend;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        Ok(())
    }
}

// ════════════════════════════════════════════════════════════════════════════════
// KRI
// ════════════════════════════════════════════════════════════════════════════════

/// Traffic-light status of a KRI.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KriStatus {
    Green,
    Amber,
    Red,
}

impl KriStatus {
    /// Green at or under threshold; over it, amber for low/medium breach
    /// severity and red for high/critical.
    pub fn evaluate(current: f64, threshold: f64) -> Self {
        if current <= threshold {
            return KriStatus::Green;
        }
        match Severity::from_breach(current, threshold) {
            Severity::Low | Severity::Medium => KriStatus::Amber,
            Severity::High | Severity::Critical => KriStatus::Red,
        }
    }
}

/// Direction a KRI is moving in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum KriTrend {
    Improving,
    #[default]
    Stable,
    Worsening,
}

/// A key risk indicator. `status` is always derived from the readings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Kri {
    pub id: KriId,
    pub name: String,
    pub threshold: f64,
    pub current: f64,
    pub status: KriStatus,
    pub trend: KriTrend,
}

/// Input for creating a KRI.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewKri {
    pub name: String,
    pub threshold: f64,
    pub current: f64,
    #[serde(default)]
    pub trend: KriTrend,
}

/// Partial KRI update; status is recomputed afterwards.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KriUpdate {
    pub name: Option<String>,
    pub threshold: Option<f64>,
    pub current: Option<f64>,
    pub trend: Option<KriTrend>,
}

impl Kri {
    pub fn create(id: KriId, input: NewKri) -> Result<Self, ValidationError> {
        if input.name.trim().is_empty() {
            return Err(ValidationError::empty_field("name"));
        }
        Ok(Self {
            id,
            name: input.name,
            threshold: input.threshold,
            current: input.current,
            status: KriStatus::evaluate(input.current, input.threshold),
            trend: input.trend,
        })
    }

    pub fn apply(&mut self, update: KriUpdate) -> Result<(), ValidationError> {
        if update.name.as_deref().is_some_and(|n| n.trim().is_empty()) {
            return Err(ValidationError::empty_field("name"));
        }
        if let Some(name) = update.name {
            self.name = name;
        }
        if let Some(threshold) = update.threshold {
            self.threshold = threshold;
        }
        if let Some(current) = update.current {
            self.current = current;
        }
        if let Some(trend) = update.trend {
            self.trend = trend;
        }
        self.status = KriStatus::evaluate(self.current, self.threshold);
        Ok(())
    }

    pub fn is_breached(&self) -> bool {
        self.status != KriStatus::Green
    }

    /// Breach severity, if the KRI is over its threshold.
    pub fn severity(&self) -> Option<Severity> {
        self.is_breached()
            .then(|| Severity::from_breach(self.current, self.threshold))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kri(threshold: f64, current: f64) -> Kri {
        Kri::create(
            KriId::from_sequence(1),
            NewKri {
                name: "System Downtime (hours)".to_string(),
                threshold,
                current,
                trend: KriTrend::Worsening,
            },
        )
        .unwrap()
    }

    #[test]
    fn kri_status_is_green_at_threshold() {
        assert_eq!(KriStatus::evaluate(5.0, 5.0), KriStatus::Green);
        assert_eq!(KriStatus::evaluate(0.0, 0.0), KriStatus::Green);
    }

    #[test]
    fn kri_status_follows_breach_severity() {
        assert_eq!(KriStatus::evaluate(11.0, 10.0), KriStatus::Amber);
        assert_eq!(KriStatus::evaluate(12.5, 10.0), KriStatus::Amber);
        assert_eq!(KriStatus::evaluate(12.6, 10.0), KriStatus::Red);
        assert_eq!(KriStatus::evaluate(1.0, 0.0), KriStatus::Red);
    }

    #[test]
    fn kri_update_recomputes_status() {
        let mut indicator = kri(4.0, 3.0);
        assert_eq!(indicator.status, KriStatus::Green);

        indicator
            .apply(KriUpdate {
                current: Some(5.2),
                ..Default::default()
            })
            .unwrap();

        assert_eq!(indicator.status, KriStatus::Red);
        assert_eq!(indicator.severity(), Some(Severity::High));
    }

    #[test]
    fn green_kri_has_no_severity() {
        assert_eq!(kri(5.0, 3.0).severity(), None);
    }

    #[test]
    fn kpi_status_serializes_kebab_case() {
        let json = serde_json::to_string(&KpiStatus::OnTrack).unwrap();
        assert_eq!(json, r#""on-track""#);
    }

    #[test]
    fn kpi_update_rejects_blank_name() {
        let mut kpi = Kpi::create(
            KpiId::from_sequence(1),
            NewKpi {
                name: "Revenue Growth".to_string(),
                category: "Financial".to_string(),
                current: 12.5,
                target: 15.0,
                unit: "%".to_string(),
                trend: KpiTrend::Up,
                status: KpiStatus::OnTrack,
            },
        )
        .unwrap();

        let result = kpi.apply(KpiUpdate {
            name: Some(" ".to_string()),
            ..Default::default()
        });
        assert!(result.is_err());
        assert_eq!(kpi.name, "Revenue Growth");
    }
}
