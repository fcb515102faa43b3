//! In-memory risk register.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, RiskId};
use crate::domain::risk::{NewRisk, Risk, RiskFilter, RiskUpdate};
use crate::ports::RiskRepository;

use super::seed;

/// Risk register held in memory, in insertion order.
#[derive(Debug, Clone, Default)]
pub struct InMemoryRiskRepository {
    register: Arc<RwLock<Register>>,
}

#[derive(Debug, Default)]
struct Register {
    risks: Vec<Risk>,
    /// Highest sequence ever issued; only grows, so deleted ids stay retired.
    last_sequence: u32,
}

impl InMemoryRiskRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_risks(risks: Vec<Risk>) -> Self {
        let last_sequence = risks.iter().filter_map(|r| r.id.sequence()).max().unwrap_or(0);
        Self {
            register: Arc::new(RwLock::new(Register {
                risks,
                last_sequence,
            })),
        }
    }

    /// Register preloaded with the demo risks.
    pub fn with_demo_data() -> Result<Self, DomainError> {
        Ok(Self::with_risks(seed::demo_risks()?))
    }

    pub async fn len(&self) -> usize {
        self.register.read().await.risks.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.register.read().await.risks.is_empty()
    }
}

fn not_found(id: &RiskId) -> DomainError {
    DomainError::new(ErrorCode::RiskNotFound, format!("Risk not found: {}", id))
}

#[async_trait]
impl RiskRepository for InMemoryRiskRepository {
    async fn list(&self, filter: &RiskFilter) -> Result<Vec<Risk>, DomainError> {
        let register = self.register.read().await;
        Ok(register.risks.iter().filter(|r| filter.matches(r)).cloned().collect())
    }

    async fn find_by_id(&self, id: &RiskId) -> Result<Option<Risk>, DomainError> {
        let register = self.register.read().await;
        Ok(register.risks.iter().find(|r| &r.id == id).cloned())
    }

    async fn create(&self, input: NewRisk) -> Result<Risk, DomainError> {
        let mut register = self.register.write().await;
        let sequence = register.last_sequence + 1;
        let risk = Risk::register(RiskId::from_sequence(sequence), input)?;
        register.last_sequence = sequence;
        register.risks.push(risk.clone());
        Ok(risk)
    }

    async fn update(&self, id: &RiskId, update: RiskUpdate) -> Result<Risk, DomainError> {
        let mut register = self.register.write().await;
        let risk = register
            .risks
            .iter_mut()
            .find(|r| &r.id == id)
            .ok_or_else(|| not_found(id))?;
        risk.apply(update)?;
        Ok(risk.clone())
    }

    async fn delete(&self, id: &RiskId) -> Result<Risk, DomainError> {
        let mut register = self.register.write().await;
        let index = register
            .risks
            .iter()
            .position(|r| &r.id == id)
            .ok_or_else(|| not_found(id))?;
        Ok(register.risks.remove(index))
    }
}
