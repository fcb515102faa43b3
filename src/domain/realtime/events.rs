//! Inbound domain events and their tolerant payload decoding.
//!
//! Payloads come straight from clients. Decoding never fails for a known
//! event kind: numeric fields that are missing or not numbers read as zero,
//! string fields that are missing read as absent.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::domain::foundation::ConnectionId;
use crate::domain::risk::Severity;

/// Lifecycle action carried by a risk change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskAction {
    Create,
    Update,
    Delete,
}

impl RiskAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            RiskAction::Create => "create",
            RiskAction::Update => "update",
            RiskAction::Delete => "delete",
        }
    }
}

/// A KRI reading over its threshold.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct KriBreach {
    #[serde(deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub kri_id: Option<String>,
    #[serde(deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    pub threshold: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub current_value: f64,
}

impl KriBreach {
    pub fn severity(&self) -> Severity {
        Severity::from_breach(self.current_value, self.threshold)
    }
}

/// One heatmap cell. Fields other than `score` are relayed untouched.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HeatmapCell {
    #[serde(deserialize_with = "lenient::number", default)]
    pub score: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// A full refresh of the risk matrix.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MatrixUpdate {
    #[serde(deserialize_with = "lenient::cells")]
    pub cells: Vec<HeatmapCell>,
    #[serde(deserialize_with = "lenient::number")]
    pub total_risks: f64,
}

/// A single dashboard metric reading.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MetricUpdate {
    #[serde(deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
    #[serde(deserialize_with = "lenient::number")]
    pub value: f64,
    #[serde(deserialize_with = "lenient::number")]
    pub change: f64,
    #[serde(deserialize_with = "lenient::string", skip_serializing_if = "Option::is_none")]
    pub trend: Option<String>,
}

/// Event emitted by a client (or by the server itself) for fan-out.
#[derive(Debug, Clone, PartialEq)]
pub enum DomainEvent {
    /// The risk object is relayed as received.
    RiskChanged { action: RiskAction, risk: Value },
    KriBreach(KriBreach),
    MatrixUpdate(MatrixUpdate),
    MetricUpdate(MetricUpdate),
}

impl DomainEvent {
    pub const RISK_CREATE: &'static str = "risk:create";
    pub const RISK_UPDATE: &'static str = "risk:update";
    pub const RISK_DELETE: &'static str = "risk:delete";
    pub const KRI_BREACH: &'static str = "kri:breach";
    pub const MATRIX_UPDATE: &'static str = "matrix:update";
    pub const METRIC_UPDATE: &'static str = "metric:update";

    /// Decodes an inbound event. `None` means the kind is not routable.
    pub fn decode(kind: &str, data: Value) -> Option<Self> {
        let event = match kind {
            Self::RISK_CREATE => Self::risk(RiskAction::Create, data),
            Self::RISK_UPDATE => Self::risk(RiskAction::Update, data),
            Self::RISK_DELETE => Self::risk(RiskAction::Delete, data),
            Self::KRI_BREACH => DomainEvent::KriBreach(decode_or_default(data)),
            Self::MATRIX_UPDATE => DomainEvent::MatrixUpdate(decode_or_default(data)),
            Self::METRIC_UPDATE => DomainEvent::MetricUpdate(decode_or_default(data)),
            _ => return None,
        };
        Some(event)
    }

    fn risk(action: RiskAction, risk: Value) -> Self {
        DomainEvent::RiskChanged { action, risk }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            DomainEvent::RiskChanged { action, .. } => match action {
                RiskAction::Create => Self::RISK_CREATE,
                RiskAction::Update => Self::RISK_UPDATE,
                RiskAction::Delete => Self::RISK_DELETE,
            },
            DomainEvent::KriBreach(_) => Self::KRI_BREACH,
            DomainEvent::MatrixUpdate(_) => Self::MATRIX_UPDATE,
            DomainEvent::MetricUpdate(_) => Self::METRIC_UPDATE,
        }
    }

    /// Payload as sent on the wire.
    pub fn payload(&self) -> Value {
        match self {
            DomainEvent::RiskChanged { risk, .. } => risk.clone(),
            DomainEvent::KriBreach(breach) => to_value(breach),
            DomainEvent::MatrixUpdate(update) => to_value(update),
            DomainEvent::MetricUpdate(update) => to_value(update),
        }
    }
}

fn decode_or_default<T: for<'de> Deserialize<'de> + Default>(data: Value) -> T {
    serde_json::from_value(data).unwrap_or_default()
}

fn to_value<T: Serialize>(payload: &T) -> Value {
    serde_json::to_value(payload).unwrap_or(Value::Null)
}

/// Read-only view over a relayed risk object.
pub struct RiskPayload<'a>(pub &'a Value);

impl RiskPayload<'_> {
    pub fn id(&self) -> Option<String> {
        self.0.get("id").and_then(lenient::string_of)
    }

    /// Whether the risk moved on the matrix.
    ///
    /// With an `oldPosition` object the carried likelihood and impact are
    /// compared against it. Without one, any truthy likelihood or impact
    /// counts as a move.
    pub fn position_changed(&self) -> bool {
        const AXES: [&str; 2] = ["likelihood", "impact"];
        match self.0.get("oldPosition").and_then(Value::as_object) {
            Some(old) => AXES.iter().any(|axis| {
                self.0.get(*axis).is_some_and(|new| {
                    lenient::number_of(new) != old.get(*axis).map_or(0.0, lenient::number_of)
                })
            }),
            None => AXES
                .iter()
                .any(|axis| self.0.get(*axis).is_some_and(is_truthy)),
        }
    }

    pub fn old_position(&self) -> Value {
        self.0.get("oldPosition").cloned().unwrap_or(Value::Null)
    }

    pub fn likelihood(&self) -> Value {
        self.0.get("likelihood").cloned().unwrap_or(Value::Null)
    }

    pub fn impact(&self) -> Value {
        self.0.get("impact").cloned().unwrap_or(Value::Null)
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0 && !f.is_nan()),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

/// Where a routed event came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Origin {
    /// Excluded from peer fan-out; `None` for server-originated events.
    pub connection_id: Option<ConnectionId>,
    pub user_id: String,
}

impl Origin {
    pub const SERVER_USER: &'static str = "server";

    pub fn connection(connection_id: ConnectionId, user_id: impl Into<String>) -> Self {
        Self {
            connection_id: Some(connection_id),
            user_id: user_id.into(),
        }
    }

    /// Server-side mutation on behalf of `user_id`.
    pub fn server(user_id: Option<String>) -> Self {
        Self {
            connection_id: None,
            user_id: user_id.unwrap_or_else(|| Self::SERVER_USER.to_string()),
        }
    }
}

mod lenient {
    use super::*;

    pub fn number<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(number_of(&value))
    }

    pub fn string<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        Ok(string_of(&value))
    }

    pub fn cells<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<HeatmapCell>, D::Error> {
        let value = Value::deserialize(deserializer)?;
        let Value::Array(items) = value else {
            return Ok(Vec::new());
        };
        Ok(items
            .into_iter()
            .map(|item| match item {
                Value::Object(mut fields) => {
                    let score = fields.remove("score").map_or(0.0, |v| number_of(&v));
                    HeatmapCell { score, extra: fields }
                }
                _ => HeatmapCell::default(),
            })
            .collect())
    }

    /// Finite number carried by `value`, or 0.
    pub fn number_of(value: &Value) -> f64 {
        let parsed = match value {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse::<f64>().ok(),
            _ => None,
        };
        parsed.filter(|f| f.is_finite()).unwrap_or(0.0)
    }

    pub fn string_of(value: &Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s.clone()),
            Value::Number(n) => Some(n.to_string()),
            _ => None,
        }
    }
}
