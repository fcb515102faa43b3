//! In-memory catalog repositories.
//!
//! The only storage backend: data lives for the lifetime of the process and
//! starts from the demo catalog.

mod indicators;
mod risks;
mod seed;

pub use indicators::{InMemoryKpiRepository, InMemoryKriRepository};
pub use risks::InMemoryRiskRepository;
pub use seed::{demo_kpis, demo_kris, demo_risks};
