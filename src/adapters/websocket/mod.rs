//! WebSocket adapters for real-time dashboard collaboration.
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────────────────────┐     ┌──────────────────────────────┐
//! │  Client frame (risk:update)  │     │  REST handler (PUT /risks)   │
//! └──────────────────────────────┘     └──────────────────────────────┘
//!                │ handle_text                        │ RealtimePublisher
//!                ▼                                    ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                           EventRouter                               │
//! │   - Resolves target rooms and derived events                        │
//! │   - Stamps timestamps and originator                                │
//! └─────────────────────────────────────────────────────────────────────┘
//!                                   │ deliver
//!                                   ▼
//! ┌─────────────────────────────────────────────────────────────────────┐
//! │                           RoomManager                               │
//! │   dashboard   riskRegister   riskMatrix   kri   kpi                 │
//! │   (per-connection unbounded queues, drained by writer tasks)        │
//! └─────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! # Components
//!
//! - [`messages`] - Wire frames and message payloads
//! - [`rooms`] - Connection tracking and room membership
//! - [`event_router`] - Routing table from domain events to rooms
//! - [`handler`] - Axum WebSocket upgrade handler

pub mod event_router;
pub mod handler;
pub mod messages;
pub mod rooms;

pub use event_router::{plan, EventRouter, KRI_BREACH_NOTIFICATION};
pub use handler::{authenticate, websocket_router, ws_handler, ConnectParams, WebSocketState};
pub use messages::{
    ClientMessage, ConnectedPayload, DashboardUpdatePayload, Frame, HeatmapPayload,
    KriAlertPayload, MatrixChangedPayload, MatrixRefreshPayload, MetricChangedPayload,
    NotificationPayload, Position, PresencePayload, RiskChangedPayload, RoomJoinedPayload,
    ServerMessage,
};
pub use rooms::{ConnectionStats, Dispatch, Outbound, RoomManager};
