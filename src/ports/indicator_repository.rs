//! KPI and KRI repository ports.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, KpiId, KriId};
use crate::domain::risk::{Kpi, KpiUpdate, Kri, KriUpdate, NewKpi, NewKri};

/// Repository port for key performance indicators.
#[async_trait]
pub trait KpiRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Kpi>, DomainError>;

    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &KpiId) -> Result<Option<Kpi>, DomainError>;

    async fn create(&self, input: NewKpi) -> Result<Kpi, DomainError>;

    /// # Errors
    ///
    /// - `KpiNotFound` if the KPI doesn't exist
    async fn update(&self, id: &KpiId, update: KpiUpdate) -> Result<Kpi, DomainError>;
}

/// Repository port for key risk indicators.
///
/// Implementations must store the status derived from the merged readings,
/// never a caller-supplied one.
#[async_trait]
pub trait KriRepository: Send + Sync {
    async fn list(&self) -> Result<Vec<Kri>, DomainError>;

    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &KriId) -> Result<Option<Kri>, DomainError>;

    async fn create(&self, input: NewKri) -> Result<Kri, DomainError>;

    /// # Errors
    ///
    /// - `KriNotFound` if the KRI doesn't exist
    async fn update(&self, id: &KriId, update: KriUpdate) -> Result<Kri, DomainError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_repositories_are_send_sync() {
        fn assert_send_sync<T: Send + Sync + ?Sized>() {}
        assert_send_sync::<dyn KpiRepository>();
        assert_send_sync::<dyn KriRepository>();
    }
}
