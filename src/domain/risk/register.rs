//! Register risk entity and its assessment arithmetic.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{RiskId, Timestamp, ValidationError};

use super::RiskLevel;

/// Lifecycle status of a register risk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum RiskStatus {
    #[default]
    Active,
    Monitored,
    Controlled,
    Closed,
}

/// Inherent risk: likelihood × impact, before controls.
pub fn inherent_risk(likelihood: u8, impact: u8) -> u32 {
    u32::from(likelihood) * u32::from(impact)
}

/// Residual risk: inherent risk scaled down by `1 - control_effectiveness / 100`.
pub fn residual_risk(inherent: u32, control_effectiveness: f64) -> f64 {
    f64::from(inherent) * (1.0 - control_effectiveness / 100.0)
}

/// A risk in the register.
///
/// `inherent_risk` and `residual_risk` are always derived from the
/// assessment inputs; they are recomputed on every change.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Risk {
    pub id: RiskId,
    pub title: String,
    pub category: String,
    pub department: String,
    pub owner: String,
    pub likelihood: u8,
    pub impact: u8,
    pub inherent_risk: u32,
    pub control_effectiveness: f64,
    pub residual_risk: f64,
    pub status: RiskStatus,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub mitigations: Vec<String>,
    pub last_assessed: Timestamp,
}

/// Input for registering a new risk.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewRisk {
    pub title: String,
    pub category: String,
    pub department: String,
    pub owner: String,
    pub likelihood: u8,
    pub impact: u8,
    pub control_effectiveness: f64,
    #[serde(default)]
    pub status: RiskStatus,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub mitigations: Vec<String>,
}

/// Partial update of a risk; absent fields keep their current value.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskUpdate {
    pub title: Option<String>,
    pub category: Option<String>,
    pub department: Option<String>,
    pub owner: Option<String>,
    pub likelihood: Option<u8>,
    pub impact: Option<u8>,
    pub control_effectiveness: Option<f64>,
    pub status: Option<RiskStatus>,
    pub description: Option<String>,
    pub mitigations: Option<Vec<String>>,
}

/// Filter for listing risks; `None` matches everything.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct RiskFilter {
    pub department: Option<String>,
    pub category: Option<String>,
    pub status: Option<RiskStatus>,
}

impl RiskFilter {
    pub fn matches(&self, risk: &Risk) -> bool {
        self.department.as_ref().map_or(true, |d| &risk.department == d)
            && self.category.as_ref().map_or(true, |c| &risk.category == c)
            && self.status.map_or(true, |s| risk.status == s)
    }
}

fn validate_scale(field: &str, value: u8) -> Result<(), ValidationError> {
    if !(1..=5).contains(&value) {
        return Err(ValidationError::out_of_range(field, 1.0, 5.0, f64::from(value)));
    }
    Ok(())
}

fn validate_effectiveness(value: f64) -> Result<(), ValidationError> {
    if !(0.0..=100.0).contains(&value) {
        return Err(ValidationError::out_of_range(
            "controlEffectiveness",
            0.0,
            100.0,
            value,
        ));
    }
    Ok(())
}

fn validate_text(field: &str, value: &str) -> Result<(), ValidationError> {
    if value.trim().is_empty() {
        return Err(ValidationError::empty_field(field));
    }
    Ok(())
}

impl NewRisk {
    pub fn validate(&self) -> Result<(), ValidationError> {
        validate_text("title", &self.title)?;
        validate_scale("likelihood", self.likelihood)?;
        validate_scale("impact", self.impact)?;
        validate_effectiveness(self.control_effectiveness)
    }
}

impl Risk {
    /// Assesses a new risk under the given identifier.
    pub fn register(id: RiskId, input: NewRisk) -> Result<Self, ValidationError> {
        input.validate()?;
        let inherent = inherent_risk(input.likelihood, input.impact);
        Ok(Self {
            id,
            title: input.title,
            category: input.category,
            department: input.department,
            owner: input.owner,
            likelihood: input.likelihood,
            impact: input.impact,
            inherent_risk: inherent,
            control_effectiveness: input.control_effectiveness,
            residual_risk: residual_risk(inherent, input.control_effectiveness),
            status: input.status,
            description: input.description,
            mitigations: input.mitigations,
            last_assessed: Timestamp::now(),
        })
    }

    /// Applies a partial update and reassesses the scores.
    ///
    /// Leaves `self` untouched when the merged values are invalid.
    pub fn apply(&mut self, update: RiskUpdate) -> Result<(), ValidationError> {
        if let Some(title) = &update.title {
            validate_text("title", title)?;
        }
        if let Some(likelihood) = update.likelihood {
            validate_scale("likelihood", likelihood)?;
        }
        if let Some(impact) = update.impact {
            validate_scale("impact", impact)?;
        }
        if let Some(ce) = update.control_effectiveness {
            validate_effectiveness(ce)?;
        }

        if let Some(title) = update.title {
            self.title = title;
        }
        if let Some(category) = update.category {
            self.category = category;
        }
        if let Some(department) = update.department {
            self.department = department;
        }
        if let Some(owner) = update.owner {
            self.owner = owner;
        }
        if let Some(likelihood) = update.likelihood {
            self.likelihood = likelihood;
        }
        if let Some(impact) = update.impact {
            self.impact = impact;
        }
        if let Some(ce) = update.control_effectiveness {
            self.control_effectiveness = ce;
        }
        if let Some(status) = update.status {
            self.status = status;
        }
        if let Some(description) = update.description {
            self.description = description;
        }
        if let Some(mitigations) = update.mitigations {
            self.mitigations = mitigations;
        }

        self.inherent_risk = inherent_risk(self.likelihood, self.impact);
        self.residual_risk = residual_risk(self.inherent_risk, self.control_effectiveness);
        self.last_assessed = Timestamp::now();
        Ok(())
    }

    pub fn level(&self) -> RiskLevel {
        RiskLevel::from_score(f64::from(self.inherent_risk))
    }
}
