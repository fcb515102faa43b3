//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `auth` - Bearer credential validation (JWT, mock)
//! - `memory` - In-memory catalog repositories
//! - `websocket` - Room registry, event router and socket handler
//! - `http` - REST endpoints and application assembly

pub mod auth;
pub mod http;
pub mod memory;
pub mod websocket;
