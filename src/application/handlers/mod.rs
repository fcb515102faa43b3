//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod analytics;
pub mod indicators;
pub mod risk;

#[cfg(test)]
pub(crate) mod testing;

pub use analytics::AnalyticsService;
pub use indicators::{
    GetKpiHandler, GetKriHandler, ListKpisHandler, ListKrisHandler, UpdateKpiCommand,
    UpdateKpiHandler, UpdateKriCommand, UpdateKriHandler,
};
pub use risk::{
    CreateRiskCommand, CreateRiskHandler, DeleteRiskCommand, DeleteRiskHandler, GetRiskHandler,
    ListRisksHandler, UpdateRiskCommand, UpdateRiskHandler,
};
