//! Turns server events into view patches.
//!
//! [`patch_for`] is pure: one inbound event, one [`StatePatch`]. Rendering is
//! left to a [`Renderer`](super::Renderer).

use serde_json::Value;

use crate::adapters::websocket::{Position, ServerMessage};
use crate::domain::realtime::{HeatmapCell, RiskAction, RiskPayload, Room};
use crate::domain::risk::{DashboardMetrics, LevelCounts, Severity};

/// A change to apply to the dashboard view.
#[derive(Debug, Clone, PartialEq)]
pub enum StatePatch {
    /// `connected`
    Identity { user_id: String, role: String },
    /// `room:joined`, `user:joined` and `user:left`
    Participants { room: Room, participants: usize },
    /// `risk:changed`
    RiskRow {
        risk_id: Option<String>,
        action: RiskAction,
        risk: Value,
        message: String,
    },
    /// `dashboard:update`
    DashboardCards(DashboardMetrics),
    /// `matrix:changed`
    MatrixMove {
        risk_id: Option<String>,
        position: Position,
    },
    /// `matrix:refresh`
    MatrixRedraw {
        cells: Vec<HeatmapCell>,
        total_risks: f64,
    },
    /// `kri:alert`
    KriFlag {
        kri_id: Option<String>,
        severity: Severity,
        message: String,
    },
    /// `metric:changed`
    Metric {
        metric: Option<String>,
        value: f64,
        change: f64,
        trend: Option<String>,
    },
    /// `notification`
    Notify { severity: Severity, message: String },
    /// `heatmap:update`
    Heatmap(LevelCounts),
}

pub fn patch_for(message: &ServerMessage) -> StatePatch {
    match message {
        ServerMessage::Connected(payload) => StatePatch::Identity {
            user_id: payload.user_id.clone(),
            role: payload.role.clone(),
        },
        ServerMessage::RoomJoined(payload) => StatePatch::Participants {
            room: payload.room,
            participants: payload.participants,
        },
        ServerMessage::UserJoined(payload) | ServerMessage::UserLeft(payload) => {
            StatePatch::Participants {
                room: payload.room,
                participants: payload.participants,
            }
        }
        ServerMessage::RiskChanged(payload) => {
            let risk_id = RiskPayload(&payload.risk).id();
            let message = format!(
                "Risk {} {}d by {}",
                risk_id.as_deref().unwrap_or("unknown"),
                payload.action.as_str(),
                payload.updated_by
            );
            StatePatch::RiskRow {
                risk_id,
                action: payload.action,
                risk: payload.risk.clone(),
                message,
            }
        }
        ServerMessage::DashboardUpdate(payload) => StatePatch::DashboardCards(payload.data),
        ServerMessage::MatrixChanged(payload) => StatePatch::MatrixMove {
            risk_id: payload.risk_id.clone(),
            position: payload.new_position.clone(),
        },
        ServerMessage::MatrixRefresh(payload) => StatePatch::MatrixRedraw {
            cells: payload.cells.clone(),
            total_risks: payload.total_risks,
        },
        ServerMessage::KriAlert(alert) => {
            let label = alert
                .name
                .as_deref()
                .or(alert.kri_id.as_deref())
                .unwrap_or("unnamed KRI");
            StatePatch::KriFlag {
                kri_id: alert.kri_id.clone(),
                severity: alert.severity,
                message: format!(
                    "KRI Alert: {label} exceeded threshold ({} > {})",
                    alert.current_value, alert.threshold
                ),
            }
        }
        ServerMessage::MetricChanged(payload) => StatePatch::Metric {
            metric: payload.metric.clone(),
            value: payload.value,
            change: payload.change,
            trend: payload.trend.clone(),
        },
        ServerMessage::Notification(payload) => StatePatch::Notify {
            severity: payload.severity,
            message: payload.message.clone(),
        },
        ServerMessage::HeatmapUpdate(heatmap) => StatePatch::Heatmap(heatmap.counts),
    }
}

/// Connectivity changes, surfaced alongside patches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Notice {
    Connected { user_id: String },
    ConnectionLost,
    Reconnected,
    /// Reconnection gave up after this many attempts.
    Offline { attempts: u32 },
}

impl Notice {
    pub fn message(&self) -> String {
        match self {
            Notice::Connected { .. } => "Connected to real-time updates".to_string(),
            Notice::ConnectionLost => "Connection lost. Attempting to reconnect...".to_string(),
            Notice::Reconnected => "Reconnected to server".to_string(),
            Notice::Offline { attempts } => {
                format!("Could not reconnect after {attempts} attempts; working offline")
            }
        }
    }
}

/// Everything the client hands to the UI layer.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientUpdate {
    Patch(StatePatch),
    Notice(Notice),
}
