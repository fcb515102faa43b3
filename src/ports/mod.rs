//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! - `RiskRepository`, `KpiRepository`, `KriRepository` - Catalog storage
//! - `SessionValidator` - Bearer credential validation
//! - `RealtimePublisher` - Fan-out of domain events to connected clients

mod indicator_repository;
mod realtime_publisher;
mod risk_repository;
mod session_validator;

pub use indicator_repository::{KpiRepository, KriRepository};
pub use realtime_publisher::RealtimePublisher;
pub use risk_repository::RiskRepository;
pub use session_validator::SessionValidator;
