//! Event router connecting domain events to room members.
//!
//! Every inbound event, whether a client emitted it over the socket or a
//! REST handler published it, goes through [`EventRouter::route`].
//!
//! # Routing Table
//!
//! ```text
//! risk:create/update/delete ──► riskRegister  risk:changed      (peers)
//!                           └─► dashboard     dashboard:update  (peers)
//!                           └─► riskMatrix    matrix:changed    (peers, moved risks only)
//! kri:breach               ──► kri           kri:alert         (everyone)
//!                           └─► dashboard     notification      (everyone)
//! matrix:update            ──► riskMatrix    matrix:refresh    (peers)
//!                           └─► dashboard     heatmap:update    (peers)
//! metric:update            ──► dashboard     metric:changed    (peers)
//! ```

use std::sync::Arc;

use async_trait::async_trait;

use crate::application::AnalyticsService;
use crate::domain::foundation::Timestamp;
use crate::domain::realtime::{
    DomainEvent, KriBreach, MatrixUpdate, MetricUpdate, Origin, RiskAction, RiskPayload, Room,
};
use crate::domain::risk::{DashboardMetrics, LevelCounts};
use crate::ports::RealtimePublisher;

use super::messages::{
    DashboardUpdatePayload, HeatmapPayload, KriAlertPayload, MatrixChangedPayload,
    MatrixRefreshPayload, MetricChangedPayload, NotificationPayload, Position, RiskChangedPayload,
    ServerMessage,
};
use super::rooms::{Dispatch, RoomManager};

/// `notification.type` for KRI breaches.
pub const KRI_BREACH_NOTIFICATION: &str = "kri_breach";

/// Routes domain events to the rooms that care about them.
pub struct EventRouter {
    rooms: Arc<RoomManager>,
    analytics: Arc<AnalyticsService>,
}

impl EventRouter {
    pub fn new(rooms: Arc<RoomManager>, analytics: Arc<AnalyticsService>) -> Self {
        Self { rooms, analytics }
    }

    /// Routes one event and returns the number of messages enqueued.
    pub async fn route(&self, origin: Origin, event: DomainEvent) -> usize {
        let metrics = match &event {
            DomainEvent::RiskChanged { .. } => match self.analytics.dashboard_metrics().await {
                Ok(metrics) => Some(metrics),
                Err(e) => {
                    tracing::warn!(error = %e, "dashboard metrics unavailable, skipping snapshot");
                    None
                }
            },
            _ => None,
        };

        let kind = event.kind();
        let dispatches = plan(&origin, event, metrics, Timestamp::now());
        let delivered = self.rooms.deliver(dispatches).await;

        tracing::debug!(
            kind,
            user_id = %origin.user_id,
            delivered,
            "event routed"
        );
        delivered
    }
}

#[async_trait]
impl RealtimePublisher for EventRouter {
    async fn publish(&self, origin: Origin, event: DomainEvent) -> usize {
        self.route(origin, event).await
    }
}

/// Resolves the messages an event produces and where they go.
///
/// `metrics` is the dashboard snapshot for risk events; without it the
/// `dashboard:update` is left out.
pub fn plan(
    origin: &Origin,
    event: DomainEvent,
    metrics: Option<DashboardMetrics>,
    now: Timestamp,
) -> Vec<Dispatch> {
    match event {
        DomainEvent::RiskChanged { action, risk } => plan_risk(origin, action, risk, metrics, now),
        DomainEvent::KriBreach(breach) => plan_kri_breach(origin, breach, now),
        DomainEvent::MatrixUpdate(update) => plan_matrix(origin, update, now),
        DomainEvent::MetricUpdate(update) => plan_metric(origin, update, now),
    }
}

fn plan_risk(
    origin: &Origin,
    action: RiskAction,
    risk: serde_json::Value,
    metrics: Option<DashboardMetrics>,
    now: Timestamp,
) -> Vec<Dispatch> {
    let peers = origin.connection_id.clone();
    let mut dispatches = Vec::with_capacity(3);

    if action == RiskAction::Update && RiskPayload(&risk).position_changed() {
        let payload = RiskPayload(&risk);
        let moved = MatrixChangedPayload {
            risk_id: payload.id(),
            old_position: payload.old_position(),
            new_position: Position {
                likelihood: payload.likelihood(),
                impact: payload.impact(),
            },
            timestamp: now,
        };
        dispatches.push(Dispatch::to_peers(
            Room::RiskMatrix,
            peers.clone(),
            ServerMessage::MatrixChanged(moved),
        ));
    }

    if let Some(data) = metrics {
        let update = DashboardUpdatePayload {
            kind: "risk".to_string(),
            action,
            data,
            timestamp: now,
        };
        dispatches.push(Dispatch::to_peers(
            Room::Dashboard,
            peers.clone(),
            ServerMessage::DashboardUpdate(update),
        ));
    }

    let changed = RiskChangedPayload {
        action,
        risk,
        updated_by: origin.user_id.clone(),
        timestamp: now,
    };
    dispatches.insert(
        0,
        Dispatch::to_peers(Room::RiskRegister, peers, ServerMessage::RiskChanged(changed)),
    );
    dispatches
}

fn plan_kri_breach(origin: &Origin, breach: KriBreach, now: Timestamp) -> Vec<Dispatch> {
    let severity = breach.severity();
    let alert = KriAlertPayload {
        kri_id: breach.kri_id,
        name: breach.name,
        threshold: breach.threshold,
        current_value: breach.current_value,
        severity,
        timestamp: now,
        triggered_by: origin.user_id.clone(),
    };

    let label = alert
        .name
        .as_deref()
        .or(alert.kri_id.as_deref())
        .unwrap_or("unnamed KRI");
    let notification = NotificationPayload {
        kind: KRI_BREACH_NOTIFICATION.to_string(),
        severity,
        message: format!("KRI Alert: {} exceeded threshold", label),
        data: alert.clone(),
        timestamp: now,
    };

    tracing::info!(
        kri_id = alert.kri_id.as_deref().unwrap_or("-"),
        severity = %severity,
        "KRI breach reported"
    );

    vec![
        Dispatch::to_all(Room::Kri, ServerMessage::KriAlert(alert)),
        Dispatch::to_all(Room::Dashboard, ServerMessage::Notification(notification)),
    ]
}

fn plan_matrix(origin: &Origin, update: MatrixUpdate, now: Timestamp) -> Vec<Dispatch> {
    let heatmap = HeatmapPayload {
        counts: LevelCounts::from_scores(update.cells.iter().map(|cell| cell.score)),
        timestamp: now,
    };
    let refresh = MatrixRefreshPayload {
        cells: update.cells,
        total_risks: update.total_risks,
        updated_by: origin.user_id.clone(),
        timestamp: now,
    };

    vec![
        Dispatch::to_peers(
            Room::RiskMatrix,
            origin.connection_id.clone(),
            ServerMessage::MatrixRefresh(refresh),
        ),
        Dispatch::to_peers(
            Room::Dashboard,
            origin.connection_id.clone(),
            ServerMessage::HeatmapUpdate(heatmap),
        ),
    ]
}

fn plan_metric(origin: &Origin, update: MetricUpdate, now: Timestamp) -> Vec<Dispatch> {
    let changed = MetricChangedPayload {
        metric: update.metric,
        value: update.value,
        change: update.change,
        trend: update.trend,
        updated_by: origin.user_id.clone(),
        timestamp: now,
    };
    vec![Dispatch::to_peers(
        Room::Dashboard,
        origin.connection_id.clone(),
        ServerMessage::MetricChanged(changed),
    )]
}
