//! KPI and KRI command and query handlers.

mod kpis;
mod kris;

pub use kpis::{GetKpiHandler, ListKpisHandler, UpdateKpiCommand, UpdateKpiHandler};
pub use kris::{GetKriHandler, ListKrisHandler, UpdateKriCommand, UpdateKriHandler};
