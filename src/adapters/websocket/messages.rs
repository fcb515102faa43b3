//! WebSocket message types for real-time dashboard updates.
//!
//! Every frame in both directions is a JSON text message of the form
//! `{"event": "<name>", "data": <payload>}`.
//!
//! - Server → Client: [`ServerMessage`], one variant per outbound event
//! - Client → Server: [`ClientMessage`], room subscriptions and domain events

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::domain::foundation::Timestamp;
use crate::domain::realtime::{DomainEvent, HeatmapCell, RiskAction, Room};
use crate::domain::risk::{DashboardMetrics, LevelCounts, Severity};

/// Raw wire frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Frame {
    pub event: String,
    #[serde(default)]
    pub data: Value,
}

impl Frame {
    pub fn new(event: impl Into<String>, data: Value) -> Self {
        Self {
            event: event.into(),
            data,
        }
    }

    pub fn parse(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// Adds `serverTime` to object payloads; other payloads are left alone.
    pub fn with_server_time(mut self, at: Timestamp) -> Self {
        if let Value::Object(fields) = &mut self.data {
            fields.insert("serverTime".to_string(), Value::String(at.to_rfc3339()));
        }
        self
    }
}

// ============================================
// Server → Client Messages
// ============================================

/// All message types that can be sent from server to client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", content = "data")]
pub enum ServerMessage {
    /// Connection established; identity negotiated.
    #[serde(rename = "connected")]
    Connected(ConnectedPayload),

    /// Sent to the joiner only.
    #[serde(rename = "room:joined")]
    RoomJoined(RoomJoinedPayload),

    #[serde(rename = "user:joined")]
    UserJoined(PresencePayload),

    #[serde(rename = "user:left")]
    UserLeft(PresencePayload),

    #[serde(rename = "risk:changed")]
    RiskChanged(RiskChangedPayload),

    #[serde(rename = "dashboard:update")]
    DashboardUpdate(DashboardUpdatePayload),

    #[serde(rename = "matrix:changed")]
    MatrixChanged(MatrixChangedPayload),

    #[serde(rename = "matrix:refresh")]
    MatrixRefresh(MatrixRefreshPayload),

    #[serde(rename = "kri:alert")]
    KriAlert(KriAlertPayload),

    #[serde(rename = "metric:changed")]
    MetricChanged(MetricChangedPayload),

    #[serde(rename = "notification")]
    Notification(NotificationPayload),

    /// Heatmap bucket counts of the latest matrix refresh.
    #[serde(rename = "heatmap:update")]
    HeatmapUpdate(HeatmapPayload),
}

impl ServerMessage {
    pub fn event_name(&self) -> &'static str {
        match self {
            ServerMessage::Connected(_) => "connected",
            ServerMessage::RoomJoined(_) => "room:joined",
            ServerMessage::UserJoined(_) => "user:joined",
            ServerMessage::UserLeft(_) => "user:left",
            ServerMessage::RiskChanged(_) => "risk:changed",
            ServerMessage::DashboardUpdate(_) => "dashboard:update",
            ServerMessage::MatrixChanged(_) => "matrix:changed",
            ServerMessage::MatrixRefresh(_) => "matrix:refresh",
            ServerMessage::KriAlert(_) => "kri:alert",
            ServerMessage::MetricChanged(_) => "metric:changed",
            ServerMessage::Notification(_) => "notification",
            ServerMessage::HeatmapUpdate(_) => "heatmap:update",
        }
    }

    pub fn to_text(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string(self)
    }

    /// `None` for frames this client version does not understand.
    pub fn from_frame(frame: Frame) -> Option<Self> {
        serde_json::to_value(frame)
            .and_then(serde_json::from_value)
            .ok()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectedPayload {
    pub user_id: String,
    pub role: String,
    pub server_time: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoomJoinedPayload {
    pub room: Room,
    pub participants: usize,
}

/// Presence change in a room, sent to the other members.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PresencePayload {
    pub user_id: String,
    pub room: Room,
    pub participants: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RiskChangedPayload {
    pub action: RiskAction,
    pub risk: Value,
    pub updated_by: String,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardUpdatePayload {
    /// What changed; always `"risk"` today.
    #[serde(rename = "type")]
    pub kind: String,
    pub action: RiskAction,
    pub data: DashboardMetrics,
    pub timestamp: Timestamp,
}

/// Bucket counts sent as top-level fields next to `timestamp`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HeatmapPayload {
    #[serde(flatten)]
    pub counts: LevelCounts,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub likelihood: Value,
    pub impact: Value,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixChangedPayload {
    #[serde(default)]
    pub risk_id: Option<String>,
    #[serde(default)]
    pub old_position: Value,
    pub new_position: Position,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MatrixRefreshPayload {
    pub cells: Vec<HeatmapCell>,
    pub total_risks: f64,
    pub updated_by: String,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KriAlertPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kri_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    pub threshold: f64,
    pub current_value: f64,
    pub severity: Severity,
    pub timestamp: Timestamp,
    pub triggered_by: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricChangedPayload {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metric: Option<String>,
    pub value: f64,
    pub change: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub trend: Option<String>,
    pub updated_by: String,
    pub timestamp: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NotificationPayload {
    #[serde(rename = "type")]
    pub kind: String,
    pub severity: Severity,
    pub message: String,
    pub data: KriAlertPayload,
    pub timestamp: Timestamp,
}

// ============================================
// Client → Server Messages
// ============================================

/// All message types that can be received from client.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    /// Join a room by wire name; unknown names are ignored by the registry.
    Subscribe(String),
    Unsubscribe(String),
    Event(DomainEvent),
}

impl ClientMessage {
    pub const SUBSCRIBE: &'static str = "subscribe";
    pub const UNSUBSCRIBE: &'static str = "unsubscribe";

    /// Interprets a frame. `None` for unknown events and for subscription
    /// frames whose payload is not a string.
    pub fn from_frame(frame: Frame) -> Option<Self> {
        match frame.event.as_str() {
            Self::SUBSCRIBE => room_name(frame.data).map(ClientMessage::Subscribe),
            Self::UNSUBSCRIBE => room_name(frame.data).map(ClientMessage::Unsubscribe),
            kind => DomainEvent::decode(kind, frame.data).map(ClientMessage::Event),
        }
    }

    pub fn to_frame(&self) -> Frame {
        match self {
            ClientMessage::Subscribe(room) => {
                Frame::new(Self::SUBSCRIBE, Value::String(room.clone()))
            }
            ClientMessage::Unsubscribe(room) => {
                Frame::new(Self::UNSUBSCRIBE, Value::String(room.clone()))
            }
            ClientMessage::Event(event) => Frame::new(event.kind(), event.payload()),
        }
    }
}

fn room_name(data: Value) -> Option<String> {
    match data {
        Value::String(name) => Some(name),
        _ => None,
    }
}
