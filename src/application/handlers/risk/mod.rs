//! Risk register command and query handlers.

mod create_risk;
mod delete_risk;
mod queries;
mod update_risk;

pub use create_risk::{CreateRiskCommand, CreateRiskHandler};
pub use delete_risk::{DeleteRiskCommand, DeleteRiskHandler};
pub use queries::{GetRiskHandler, ListRisksHandler};
pub use update_risk::{UpdateRiskCommand, UpdateRiskHandler};

use serde_json::Value;

use crate::domain::risk::Risk;

fn risk_value(risk: &Risk) -> Value {
    serde_json::to_value(risk).unwrap_or(Value::Null)
}
