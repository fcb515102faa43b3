//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, errors, auth)
//! - `risk` - Risk register, KPIs, KRIs and their analytics
//! - `realtime` - Rooms, connections and routable domain events

pub mod foundation;
pub mod realtime;
pub mod risk;
