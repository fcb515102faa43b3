//! In-memory KPI and KRI stores.

use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::domain::foundation::{DomainError, ErrorCode, KpiId, KriId};
use crate::domain::risk::{Kpi, KpiUpdate, Kri, KriUpdate, NewKpi, NewKri};
use crate::ports::{KpiRepository, KriRepository};

use super::seed;

#[derive(Debug, Clone, Default)]
pub struct InMemoryKpiRepository {
    kpis: Arc<RwLock<Vec<Kpi>>>,
}

impl InMemoryKpiRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_demo_data() -> Result<Self, DomainError> {
        Ok(Self {
            kpis: Arc::new(RwLock::new(seed::demo_kpis()?)),
        })
    }
}

#[async_trait]
impl KpiRepository for InMemoryKpiRepository {
    async fn list(&self) -> Result<Vec<Kpi>, DomainError> {
        Ok(self.kpis.read().await.clone())
    }

    async fn find_by_id(&self, id: &KpiId) -> Result<Option<Kpi>, DomainError> {
        let kpis = self.kpis.read().await;
        Ok(kpis.iter().find(|k| &k.id == id).cloned())
    }

    async fn create(&self, input: NewKpi) -> Result<Kpi, DomainError> {
        let mut kpis = self.kpis.write().await;
        let max = kpis.iter().filter_map(|k| k.id.sequence()).max().unwrap_or(0);
        let kpi = Kpi::create(KpiId::from_sequence(max + 1), input)?;
        kpis.push(kpi.clone());
        Ok(kpi)
    }

    async fn update(&self, id: &KpiId, update: KpiUpdate) -> Result<Kpi, DomainError> {
        let mut kpis = self.kpis.write().await;
        let kpi = kpis.iter_mut().find(|k| &k.id == id).ok_or_else(|| {
            DomainError::new(ErrorCode::KpiNotFound, format!("KPI not found: {}", id))
        })?;
        kpi.apply(update)?;
        Ok(kpi.clone())
    }
}

#[derive(Debug, Clone, Default)]
pub struct InMemoryKriRepository {
    kris: Arc<RwLock<Vec<Kri>>>,
}

impl InMemoryKriRepository {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_demo_data() -> Result<Self, DomainError> {
        Ok(Self {
            kris: Arc::new(RwLock::new(seed::demo_kris()?)),
        })
    }
}

#[async_trait]
impl KriRepository for InMemoryKriRepository {
    async fn list(&self) -> Result<Vec<Kri>, DomainError> {
        Ok(self.kris.read().await.clone())
    }

    async fn find_by_id(&self, id: &KriId) -> Result<Option<Kri>, DomainError> {
        let kris = self.kris.read().await;
        Ok(kris.iter().find(|k| &k.id == id).cloned())
    }

    async fn create(&self, input: NewKri) -> Result<Kri, DomainError> {
        let mut kris = self.kris.write().await;
        let max = kris.iter().filter_map(|k| k.id.sequence()).max().unwrap_or(0);
        let kri = Kri::create(KriId::from_sequence(max + 1), input)?;
        kris.push(kri.clone());
        Ok(kri)
    }

    async fn update(&self, id: &KriId, update: KriUpdate) -> Result<Kri, DomainError> {
        let mut kris = self.kris.write().await;
        let kri = kris.iter_mut().find(|k| &k.id == id).ok_or_else(|| {
            DomainError::new(ErrorCode::KriNotFound, format!("KRI not found: {}", id))
        })?;
        kri.apply(update)?;
        Ok(kri.clone())
    }
}
