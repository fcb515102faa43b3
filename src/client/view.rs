//! Applying patches to a rendered dashboard.

use std::collections::{BTreeMap, VecDeque};

use serde_json::Value;

use crate::adapters::websocket::Position;
use crate::domain::realtime::{HeatmapCell, RiskAction, Room};
use crate::domain::risk::{DashboardMetrics, LevelCounts, Severity};

use super::{ClientUpdate, Notice, StatePatch};

/// Something that can show patches and notices to a user.
pub trait Renderer {
    fn apply(&mut self, patch: &StatePatch);

    fn notify(&mut self, notice: &Notice);

    fn render(&mut self, update: &ClientUpdate) {
        match update {
            ClientUpdate::Patch(patch) => self.apply(patch),
            ClientUpdate::Notice(notice) => self.notify(notice),
        }
    }
}

/// Oldest notifications are dropped past this many.
pub const MAX_NOTIFICATIONS: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Tone {
    Info,
    Success,
    Warning,
    Alert(Severity),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub tone: Tone,
    pub message: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MatrixGrid {
    pub cells: Vec<HeatmapCell>,
    pub total_risks: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct MetricReading {
    pub value: f64,
    pub change: f64,
    pub trend: Option<String>,
}

/// In-memory dashboard.
///
/// Elements exist only once mounted. A patch aimed at an element that was
/// never mounted changes nothing; notifications are always recorded.
#[derive(Debug, Default)]
pub struct DashboardView {
    identity: Option<(String, String)>,
    room_badges: BTreeMap<Room, usize>,
    risk_rows: BTreeMap<String, Value>,
    cards: Option<DashboardMetrics>,
    matrix_dots: BTreeMap<String, Option<Position>>,
    matrix: Option<MatrixGrid>,
    kri_flags: BTreeMap<String, Option<Severity>>,
    metrics: BTreeMap<String, Option<MetricReading>>,
    heatmap: Option<LevelCounts>,
    notifications: VecDeque<Notification>,
}

impl DashboardView {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn mount_room_badge(&mut self, room: Room) {
        self.room_badges.entry(room).or_insert(0);
    }

    pub fn mount_risk_row(&mut self, id: impl Into<String>, risk: Value) {
        self.risk_rows.insert(id.into(), risk);
    }

    pub fn mount_cards(&mut self) {
        self.cards.get_or_insert_with(DashboardMetrics::default);
    }

    pub fn mount_matrix_dot(&mut self, risk_id: impl Into<String>) {
        self.matrix_dots.entry(risk_id.into()).or_insert(None);
    }

    pub fn mount_matrix(&mut self) {
        self.matrix.get_or_insert_with(|| MatrixGrid {
            cells: Vec::new(),
            total_risks: 0.0,
        });
    }

    pub fn mount_kri(&mut self, kri_id: impl Into<String>) {
        self.kri_flags.entry(kri_id.into()).or_insert(None);
    }

    pub fn mount_metric(&mut self, metric: impl Into<String>) {
        self.metrics.entry(metric.into()).or_insert(None);
    }

    pub fn mount_heatmap(&mut self) {
        self.heatmap.get_or_insert_with(LevelCounts::default);
    }

    pub fn identity(&self) -> Option<(&str, &str)> {
        self.identity
            .as_ref()
            .map(|(user, role)| (user.as_str(), role.as_str()))
    }

    pub fn participants(&self, room: Room) -> Option<usize> {
        self.room_badges.get(&room).copied()
    }

    pub fn risk_row(&self, id: &str) -> Option<&Value> {
        self.risk_rows.get(id)
    }

    pub fn cards(&self) -> Option<&DashboardMetrics> {
        self.cards.as_ref()
    }

    pub fn matrix_dot(&self, risk_id: &str) -> Option<&Position> {
        self.matrix_dots.get(risk_id).and_then(Option::as_ref)
    }

    pub fn matrix(&self) -> Option<&MatrixGrid> {
        self.matrix.as_ref()
    }

    pub fn kri_flag(&self, kri_id: &str) -> Option<Severity> {
        self.kri_flags.get(kri_id).copied().flatten()
    }

    pub fn metric(&self, metric: &str) -> Option<&MetricReading> {
        self.metrics.get(metric).and_then(Option::as_ref)
    }

    pub fn heatmap(&self) -> Option<&LevelCounts> {
        self.heatmap.as_ref()
    }

    pub fn notifications(&self) -> impl Iterator<Item = &Notification> {
        self.notifications.iter()
    }

    fn push_notification(&mut self, tone: Tone, message: String) {
        if self.notifications.len() == MAX_NOTIFICATIONS {
            self.notifications.pop_front();
        }
        self.notifications.push_back(Notification { tone, message });
    }
}

/// Overwrites the slot only when the element has been mounted.
fn patch_slot<V>(slots: &mut BTreeMap<String, V>, key: Option<&str>, value: V) {
    if let Some(slot) = key.and_then(|k| slots.get_mut(k)) {
        *slot = value;
    }
}

impl Renderer for DashboardView {
    fn apply(&mut self, patch: &StatePatch) {
        match patch {
            StatePatch::Identity { user_id, role } => {
                self.identity = Some((user_id.clone(), role.clone()));
            }
            StatePatch::Participants { room, participants } => {
                if let Some(badge) = self.room_badges.get_mut(room) {
                    *badge = *participants;
                }
            }
            StatePatch::RiskRow {
                risk_id,
                action,
                risk,
                message,
            } => {
                match (action, risk_id.as_deref()) {
                    (RiskAction::Delete, Some(id)) => {
                        self.risk_rows.remove(id);
                    }
                    (_, id) => patch_slot(&mut self.risk_rows, id, risk.clone()),
                }
                self.push_notification(Tone::Info, message.clone());
            }
            StatePatch::DashboardCards(metrics) => {
                if let Some(cards) = self.cards.as_mut() {
                    *cards = *metrics;
                }
            }
            StatePatch::MatrixMove { risk_id, position } => {
                patch_slot(
                    &mut self.matrix_dots,
                    risk_id.as_deref(),
                    Some(position.clone()),
                );
            }
            StatePatch::MatrixRedraw { cells, total_risks } => {
                if let Some(grid) = self.matrix.as_mut() {
                    grid.cells = cells.clone();
                    grid.total_risks = *total_risks;
                }
            }
            StatePatch::KriFlag {
                kri_id,
                severity,
                message,
            } => {
                patch_slot(&mut self.kri_flags, kri_id.as_deref(), Some(*severity));
                self.push_notification(Tone::Alert(*severity), message.clone());
            }
            StatePatch::Metric {
                metric,
                value,
                change,
                trend,
            } => {
                let reading = MetricReading {
                    value: *value,
                    change: *change,
                    trend: trend.clone(),
                };
                patch_slot(&mut self.metrics, metric.as_deref(), Some(reading));
            }
            StatePatch::Notify { severity, message } => {
                self.push_notification(Tone::Alert(*severity), message.clone());
            }
            StatePatch::Heatmap(counts) => {
                if let Some(heatmap) = self.heatmap.as_mut() {
                    *heatmap = *counts;
                }
            }
        }
    }

    fn notify(&mut self, notice: &Notice) {
        let tone = match notice {
            Notice::Connected { .. } | Notice::Reconnected => Tone::Success,
            Notice::ConnectionLost | Notice::Offline { .. } => Tone::Warning,
        };
        self.push_notification(tone, notice.message());
    }
}
