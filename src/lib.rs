//! Risk Pulse - Enterprise Risk Dashboard Backend
//!
//! Serves the risk register, KPIs and KRIs over REST, and keeps every open
//! dashboard in sync through room-scoped WebSocket broadcasts. The `client`
//! module is the matching synchronizer for Rust dashboards.

pub mod adapters;
pub mod application;
pub mod client;
pub mod config;
pub mod domain;
pub mod ports;
