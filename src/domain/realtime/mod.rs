//! Real-time collaboration vocabulary: rooms, connections, and the events
//! clients exchange through them.

mod connection;
mod events;
mod room;

pub use connection::{Connection, Identity};
pub use events::{
    DomainEvent, HeatmapCell, KriBreach, MatrixUpdate, MetricUpdate, Origin, RiskAction,
    RiskPayload,
};
pub use room::{Room, UnknownRoom};
