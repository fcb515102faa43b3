//! Risk register repository port.
//!
//! Implementations own identifier assignment and score derivation: callers
//! hand over the assessment inputs and receive the stored risk back.
//!
//! # Example
//!
//! ```ignore
//! let risk = repo.create(new_risk).await?;
//! let high_it = repo
//!     .list(&RiskFilter { department: Some("IT".into()), ..Default::default() })
//!     .await?;
//! ```

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, RiskId};
use crate::domain::risk::{NewRisk, Risk, RiskFilter, RiskUpdate};

/// Repository port for register risks.
#[async_trait]
pub trait RiskRepository: Send + Sync {
    /// Risks matching the filter, in register order.
    async fn list(&self, filter: &RiskFilter) -> Result<Vec<Risk>, DomainError>;

    /// Find a risk by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &RiskId) -> Result<Option<Risk>, DomainError>;

    /// Assess and store a new risk under the next free identifier.
    ///
    /// # Errors
    ///
    /// - Validation codes if the inputs are out of range
    async fn create(&self, input: NewRisk) -> Result<Risk, DomainError>;

    /// Merge a partial update and reassess.
    ///
    /// # Errors
    ///
    /// - `RiskNotFound` if the risk doesn't exist
    /// - Validation codes if the merged inputs are out of range
    async fn update(&self, id: &RiskId, update: RiskUpdate) -> Result<Risk, DomainError>;

    /// Remove a risk, returning it.
    ///
    /// # Errors
    ///
    /// - `RiskNotFound` if the risk doesn't exist
    async fn delete(&self, id: &RiskId) -> Result<Risk, DomainError>;
}
