//! Client synchronizer for dashboards.
//!
//! Keeps one WebSocket connection to the server alive, replays room
//! subscriptions after every reconnect, and turns server events into
//! [`StatePatch`]es for a [`Renderer`].
//!
//! ```text
//! RiskSocketClient ──commands──▶ driver task ◀──frames──▶ server
//!                                    │
//!                                    ▼
//!                      ClientUpdate (Patch | Notice) ──▶ Renderer
//! ```

mod dispatch;
mod error;
mod session;
mod state;
mod transport;
mod view;

pub use dispatch::{patch_for, ClientUpdate, Notice, StatePatch};
pub use error::ClientError;
pub use session::RiskSocketClient;
pub use state::{ConnectionState, ReconnectPolicy};
pub use transport::{Connector, FrameSink, FrameStream, WebSocketConnector};
pub use view::{
    DashboardView, MatrixGrid, MetricReading, Notification, Renderer, Tone, MAX_NOTIFICATIONS,
};
