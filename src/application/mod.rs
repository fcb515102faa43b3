//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Command handlers publish the resulting domain event after persisting;
//! query handlers only read.

pub mod handlers;

pub use handlers::{
    AnalyticsService, CreateRiskCommand, CreateRiskHandler, DeleteRiskCommand, DeleteRiskHandler,
    GetKpiHandler, GetKriHandler, GetRiskHandler, ListKpisHandler, ListKrisHandler,
    ListRisksHandler, UpdateKpiCommand, UpdateKpiHandler, UpdateKriCommand, UpdateKriHandler,
    UpdateRiskCommand, UpdateRiskHandler,
};
