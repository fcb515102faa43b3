//! Read-side reports over the catalog.

mod queries;

pub use queries::AnalyticsService;
