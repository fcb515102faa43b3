//! Room registry and connection tracker.
//!
//! Rooms are the fixed set of [`Room`] channels. Each live connection has an
//! outbound queue drained by its socket writer task; fan-out enqueues
//! serialized frames on those queues.
//!
//! ```text
//! Room: dashboard      Room: riskRegister    Room: kri
//! ├── conn-a           ├── conn-a            └── conn-c
//! └── conn-b           └── conn-c
//! ```
//!
//! # Consistency
//!
//! Memberships and connection records sit behind one `RwLock`. Join, leave
//! and disconnect take the write lock; delivery resolves recipients and
//! enqueues under the read lock. A connection is in a room's member set iff
//! that room is in the connection's joined set, and a disconnect is fully
//! applied before any later delivery observes the registry.

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet};

use serde::Serialize;
use serde_json::Value;
use tokio::sync::{mpsc, RwLock};

use crate::domain::foundation::{ConnectionId, Timestamp};
use crate::domain::realtime::{Connection, Room};

use super::messages::{Frame, PresencePayload, RoomJoinedPayload, ServerMessage};

/// Queue of serialized frames waiting to be written to a socket.
pub type Outbound = mpsc::UnboundedSender<String>;

/// A message bound for one room, optionally skipping its originator.
#[derive(Debug, Clone, PartialEq)]
pub struct Dispatch {
    pub room: Room,
    pub exclude: Option<ConnectionId>,
    pub message: ServerMessage,
}

impl Dispatch {
    /// Delivered to every member, the originator included.
    pub fn to_all(room: Room, message: ServerMessage) -> Self {
        Self {
            room,
            exclude: None,
            message,
        }
    }

    /// Delivered to every member except `origin`.
    pub fn to_peers(room: Room, origin: Option<ConnectionId>, message: ServerMessage) -> Self {
        Self {
            room,
            exclude: origin,
            message,
        }
    }
}

/// Connection and membership counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConnectionStats {
    pub total_connections: usize,
    pub rooms: BTreeMap<Room, usize>,
}

struct Member {
    connection: Connection,
    outbound: Outbound,
}

impl Member {
    fn enqueue(&self, text: &str) -> bool {
        self.outbound.send(text.to_string()).is_ok()
    }
}

struct RegistryState {
    rooms: HashMap<Room, HashSet<ConnectionId>>,
    connections: HashMap<ConnectionId, Member>,
}

impl RegistryState {
    fn new() -> Self {
        Self {
            rooms: Room::ALL.into_iter().map(|r| (r, HashSet::new())).collect(),
            connections: HashMap::new(),
        }
    }

    fn member_count(&self, room: Room) -> usize {
        self.rooms.get(&room).map_or(0, HashSet::len)
    }

    fn is_member(&self, id: &ConnectionId, room: Room) -> bool {
        self.rooms.get(&room).is_some_and(|m| m.contains(id))
    }

    /// Enqueues `text` on every member of `room` except `exclude`.
    fn enqueue_room(&self, room: Room, exclude: Option<&ConnectionId>, text: &str) -> usize {
        self.rooms
            .get(&room)
            .into_iter()
            .flatten()
            .filter(|id| Some(*id) != exclude)
            .filter_map(|id| self.connections.get(id))
            .filter(|member| member.enqueue(text))
            .count()
    }

    /// Removes `id` from `room` on both sides and tells the remaining
    /// members. Returns the new member count, or `None` if `id` was not in
    /// the room.
    fn remove_membership(&mut self, id: &ConnectionId, room: Room) -> Option<usize> {
        let removed = self.rooms.get_mut(&room).is_some_and(|m| m.remove(id));
        if !removed {
            return None;
        }
        let user_id = match self.connections.get_mut(id) {
            Some(member) => {
                member.connection.rooms.remove(&room);
                member.connection.user_id().to_string()
            }
            None => String::new(),
        };

        let participants = self.member_count(room);
        let left = ServerMessage::UserLeft(PresencePayload {
            user_id: user_id.clone(),
            room,
            participants,
        });
        if let Some(text) = serialize(&left) {
            self.enqueue_room(room, Some(id), &text);
        }

        tracing::info!(
            connection_id = %id,
            user_id = %user_id,
            room = %room,
            participants,
            "Left room"
        );
        Some(participants)
    }
}

fn serialize(message: &ServerMessage) -> Option<String> {
    match message.to_text() {
        Ok(text) => Some(text),
        Err(e) => {
            tracing::error!(event = message.event_name(), "Failed to serialize message: {}", e);
            None
        }
    }
}

/// Tracks live connections and their room memberships.
pub struct RoomManager {
    state: RwLock<RegistryState>,
}

impl RoomManager {
    pub fn new() -> Self {
        Self {
            state: RwLock::new(RegistryState::new()),
        }
    }

    /// Starts tracking a connection. Replaces any previous record with the
    /// same id.
    pub async fn register(&self, connection: Connection, outbound: Outbound) {
        let mut state = self.state.write().await;
        tracing::info!(
            connection_id = %connection.id,
            user_id = %connection.user_id(),
            role = %connection.identity.role,
            "Connection registered"
        );
        state
            .connections
            .insert(connection.id.clone(), Member { connection, outbound });
    }

    /// Adds the connection to `room`.
    ///
    /// The joiner always receives `room:joined`; the other members receive
    /// `user:joined` only when the membership is new. Returns the member
    /// count, or `None` for an unknown connection.
    pub async fn join(&self, id: &ConnectionId, room: Room) -> Option<usize> {
        let mut state = self.state.write().await;

        let member = state.connections.get_mut(id)?;
        let newly_joined = member.connection.rooms.insert(room);
        let user_id = member.connection.user_id().to_string();
        if let Some(members) = state.rooms.get_mut(&room) {
            members.insert(id.clone());
        }
        let participants = state.member_count(room);

        let joined = ServerMessage::RoomJoined(RoomJoinedPayload { room, participants });
        if let (Some(member), Some(text)) = (state.connections.get(id), serialize(&joined)) {
            member.enqueue(&text);
        }

        if newly_joined {
            let presence = ServerMessage::UserJoined(PresencePayload {
                user_id: user_id.clone(),
                room,
                participants,
            });
            if let Some(text) = serialize(&presence) {
                state.enqueue_room(room, Some(id), &text);
            }
            tracing::info!(
                connection_id = %id,
                user_id = %user_id,
                room = %room,
                participants,
                "Joined room"
            );
        }

        Some(participants)
    }

    /// Joins by wire name; unknown room names are ignored.
    pub async fn join_named(&self, id: &ConnectionId, room: &str) -> Option<usize> {
        match room.parse::<Room>() {
            Ok(room) => self.join(id, room).await,
            Err(e) => {
                tracing::debug!(connection_id = %id, "Ignoring subscribe: {}", e);
                None
            }
        }
    }

    /// Removes the connection from `room`, telling the remaining members.
    /// No-op (returning `None`) when it was not a member.
    pub async fn leave(&self, id: &ConnectionId, room: Room) -> Option<usize> {
        self.state.write().await.remove_membership(id, room)
    }

    pub async fn leave_named(&self, id: &ConnectionId, room: &str) -> Option<usize> {
        match room.parse::<Room>() {
            Ok(room) => self.leave(id, room).await,
            Err(e) => {
                tracing::debug!(connection_id = %id, "Ignoring unsubscribe: {}", e);
                None
            }
        }
    }

    /// Leaves every joined room, then forgets the connection.
    ///
    /// Idempotent; returns `false` if the connection was already gone.
    pub async fn disconnect(&self, id: &ConnectionId) -> bool {
        let mut state = self.state.write().await;

        let joined: Vec<Room> = match state.connections.get(id) {
            Some(member) => member.connection.rooms.iter().copied().collect(),
            None => return false,
        };
        for room in joined {
            state.remove_membership(id, room);
        }
        state.connections.remove(id);

        tracing::info!(connection_id = %id, "Connection removed");
        true
    }

    /// Enqueues each dispatch on its room's members. Returns the number of
    /// messages enqueued.
    pub async fn deliver(&self, dispatches: Vec<Dispatch>) -> usize {
        let state = self.state.read().await;
        dispatches
            .iter()
            .filter_map(|d| serialize(&d.message).map(|text| (d, text)))
            .map(|(d, text)| state.enqueue_room(d.room, d.exclude.as_ref(), &text))
            .sum()
    }

    /// Server-originated event for one room, stamped with `serverTime`.
    pub async fn emit_to_room(&self, room: Room, event: &str, data: Value) -> usize {
        let frame = Frame::new(event, data).with_server_time(Timestamp::now());
        let Ok(text) = frame.to_text() else {
            return 0;
        };
        self.state.read().await.enqueue_room(room, None, &text)
    }

    /// Server-originated event for every connection, stamped with `serverTime`.
    pub async fn broadcast(&self, event: &str, data: Value) -> usize {
        let frame = Frame::new(event, data).with_server_time(Timestamp::now());
        let Ok(text) = frame.to_text() else {
            return 0;
        };
        let state = self.state.read().await;
        state
            .connections
            .values()
            .filter(|member| member.enqueue(&text))
            .count()
    }

    pub async fn stats(&self) -> ConnectionStats {
        let state = self.state.read().await;
        ConnectionStats {
            total_connections: state.connections.len(),
            rooms: Room::ALL
                .into_iter()
                .map(|room| (room, state.member_count(room)))
                .collect(),
        }
    }

    pub async fn member_count(&self, room: Room) -> usize {
        self.state.read().await.member_count(room)
    }

    /// Snapshot of one connection record.
    pub async fn connection(&self, id: &ConnectionId) -> Option<Connection> {
        let state = self.state.read().await;
        state.connections.get(id).map(|m| m.connection.clone())
    }

    /// Rooms a connection has joined; `None` for an unknown connection.
    pub async fn rooms_of(&self, id: &ConnectionId) -> Option<BTreeSet<Room>> {
        let state = self.state.read().await;
        state.connections.get(id).map(|m| m.connection.rooms.clone())
    }

    /// Ids of every live connection.
    pub async fn connection_ids(&self) -> Vec<ConnectionId> {
        self.state.read().await.connections.keys().cloned().collect()
    }

    #[cfg(test)]
    async fn is_consistent(&self) -> bool {
        let state = self.state.read().await;
        let rooms_agree = state.rooms.iter().all(|(room, members)| {
            members.iter().all(|id| {
                state
                    .connections
                    .get(id)
                    .is_some_and(|m| m.connection.rooms.contains(room))
            })
        });
        let connections_agree = state.connections.iter().all(|(id, member)| {
            member
                .connection
                .rooms
                .iter()
                .all(|room| state.is_member(id, *room))
        });
        rooms_agree && connections_agree
    }
}

impl Default for RoomManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::websocket::messages::HeatmapPayload;
    use crate::domain::realtime::Identity;
    use proptest::prelude::*;
    use serde_json::json;
    use tokio::sync::mpsc::UnboundedReceiver;

    async fn connect(manager: &RoomManager, user: &str) -> (ConnectionId, UnboundedReceiver<String>) {
        let id = ConnectionId::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let identity = Identity {
            user_id: user.to_string(),
            role: "viewer".to_string(),
        };
        manager.register(Connection::new(id.clone(), identity), tx).await;
        (id, rx)
    }

    fn drain(rx: &mut UnboundedReceiver<String>) -> Vec<Frame> {
        let mut frames = Vec::new();
        while let Ok(text) = rx.try_recv() {
            frames.push(Frame::parse(&text).unwrap());
        }
        frames
    }

    fn events(frames: &[Frame]) -> Vec<&str> {
        frames.iter().map(|f| f.event.as_str()).collect()
    }

    #[tokio::test]
    async fn join_notifies_joiner_and_existing_members() {
        let manager = RoomManager::new();
        let (a, mut rx_a) = connect(&manager, "alice").await;
        let (b, mut rx_b) = connect(&manager, "bob").await;

        assert_eq!(manager.join(&a, Room::Kri).await, Some(1));
        assert_eq!(manager.join(&b, Room::Kri).await, Some(2));

        let a_frames = drain(&mut rx_a);
        assert_eq!(events(&a_frames), vec!["room:joined", "user:joined"]);
        assert_eq!(a_frames[1].data["userId"], "bob");
        assert_eq!(a_frames[1].data["participants"], 2);

        let b_frames = drain(&mut rx_b);
        assert_eq!(events(&b_frames), vec!["room:joined"]);
        assert_eq!(b_frames[0].data, json!({"room": "kri", "participants": 2}));
    }

    #[tokio::test]
    async fn duplicate_join_does_not_reannounce() {
        let manager = RoomManager::new();
        let (a, _rx_a) = connect(&manager, "alice").await;
        let (b, mut rx_b) = connect(&manager, "bob").await;
        manager.join(&b, Room::Dashboard).await;
        manager.join(&a, Room::Dashboard).await;
        drain(&mut rx_b);

        assert_eq!(manager.join(&a, Room::Dashboard).await, Some(2));

        assert!(drain(&mut rx_b).is_empty());
    }

    #[tokio::test]
    async fn unknown_room_name_is_ignored() {
        let manager = RoomManager::new();
        let (a, mut rx_a) = connect(&manager, "alice").await;

        assert_eq!(manager.join_named(&a, "admin").await, None);

        assert!(drain(&mut rx_a).is_empty());
        assert!(manager.rooms_of(&a).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn leave_when_not_member_is_noop() {
        let manager = RoomManager::new();
        let (a, _rx_a) = connect(&manager, "alice").await;
        let (b, mut rx_b) = connect(&manager, "bob").await;
        manager.join(&b, Room::Kpi).await;
        drain(&mut rx_b);

        assert_eq!(manager.leave(&a, Room::Kpi).await, None);

        assert!(drain(&mut rx_b).is_empty());
    }

    #[tokio::test]
    async fn leave_notifies_remaining_members() {
        let manager = RoomManager::new();
        let (a, _rx_a) = connect(&manager, "alice").await;
        let (b, mut rx_b) = connect(&manager, "bob").await;
        manager.join(&a, Room::RiskMatrix).await;
        manager.join(&b, Room::RiskMatrix).await;
        drain(&mut rx_b);

        assert_eq!(manager.leave_named(&a, "riskMatrix").await, Some(1));

        let frames = drain(&mut rx_b);
        assert_eq!(events(&frames), vec!["user:left"]);
        assert_eq!(frames[0].data["participants"], 1);
    }

    #[tokio::test]
    async fn disconnect_is_idempotent() {
        let manager = RoomManager::new();
        let (a, _rx_a) = connect(&manager, "alice").await;
        let (b, mut rx_b) = connect(&manager, "bob").await;
        manager.join(&a, Room::Dashboard).await;
        manager.join(&a, Room::Kri).await;
        manager.join(&b, Room::Kri).await;
        drain(&mut rx_b);

        assert!(manager.disconnect(&a).await);
        assert!(!manager.disconnect(&a).await);

        assert_eq!(events(&drain(&mut rx_b)), vec!["user:left"]);
        assert_eq!(manager.member_count(Room::Dashboard).await, 0);
        assert_eq!(manager.member_count(Room::Kri).await, 1);
        assert!(manager.connection(&a).await.is_none());
    }

    #[tokio::test]
    async fn deliver_respects_exclusion() {
        let manager = RoomManager::new();
        let (a, mut rx_a) = connect(&manager, "alice").await;
        let (b, mut rx_b) = connect(&manager, "bob").await;
        manager.join(&a, Room::Kpi).await;
        manager.join(&b, Room::Kpi).await;
        drain(&mut rx_a);
        drain(&mut rx_b);

        let message = ServerMessage::HeatmapUpdate(HeatmapPayload {
            counts: Default::default(),
            timestamp: Timestamp::now(),
        });
        let sent = manager
            .deliver(vec![Dispatch::to_peers(Room::Kpi, Some(a.clone()), message)])
            .await;

        assert_eq!(sent, 1);
        assert!(drain(&mut rx_a).is_empty());
        assert_eq!(events(&drain(&mut rx_b)), vec!["heatmap:update"]);
    }

    #[tokio::test]
    async fn emit_and_broadcast_add_server_time() {
        let manager = RoomManager::new();
        let (a, mut rx_a) = connect(&manager, "alice").await;
        let (_b, mut rx_b) = connect(&manager, "bob").await;
        manager.join(&a, Room::Dashboard).await;
        drain(&mut rx_a);

        assert_eq!(
            manager
                .emit_to_room(Room::Dashboard, "system:notice", json!({"text": "maintenance"}))
                .await,
            1
        );
        assert_eq!(manager.broadcast("system:notice", json!({"text": "all"})).await, 2);

        let a_frames = drain(&mut rx_a);
        assert_eq!(a_frames.len(), 2);
        assert!(a_frames[0].data.get("serverTime").is_some());
        assert_eq!(drain(&mut rx_b).len(), 1);
    }

    #[tokio::test]
    async fn stats_report_every_room() {
        let manager = RoomManager::new();
        let (a, _rx) = connect(&manager, "alice").await;
        manager.join(&a, Room::RiskRegister).await;

        let stats = manager.stats().await;

        assert_eq!(stats.total_connections, 1);
        assert_eq!(stats.rooms.len(), 5);
        assert_eq!(stats.rooms[&Room::RiskRegister], 1);
        let json = serde_json::to_value(&stats).unwrap();
        assert_eq!(json["totalConnections"], 1);
        assert_eq!(json["rooms"]["riskRegister"], 1);
    }

    #[derive(Debug, Clone)]
    enum Op {
        Join(usize, Room),
        Leave(usize, Room),
        Disconnect(usize),
    }

    fn op() -> impl Strategy<Value = Op> {
        let room = prop::sample::select(Room::ALL.to_vec());
        prop_oneof![
            (0..4usize, room.clone()).prop_map(|(c, r)| Op::Join(c, r)),
            (0..4usize, room).prop_map(|(c, r)| Op::Leave(c, r)),
            (0..4usize).prop_map(Op::Disconnect),
        ]
    }

    proptest! {
        #[test]
        fn membership_stays_consistent(ops in prop::collection::vec(op(), 0..40)) {
            let rt = tokio::runtime::Builder::new_current_thread().build().unwrap();
            rt.block_on(async move {
                let manager = RoomManager::new();
                let mut ids = Vec::new();
                let mut receivers = Vec::new();
                for n in 0..4 {
                    let (id, rx) = connect(&manager, &format!("user-{n}")).await;
                    ids.push(id);
                    receivers.push(rx);
                }

                for op in ops {
                    match op {
                        Op::Join(c, room) => { manager.join(&ids[c], room).await; }
                        Op::Leave(c, room) => { manager.leave(&ids[c], room).await; }
                        Op::Disconnect(c) => { manager.disconnect(&ids[c]).await; }
                    }
                    assert!(manager.is_consistent().await);
                }

                let stats = manager.stats().await;
                let joined: usize = stats.rooms.values().sum();
                let mut tracked = 0;
                for id in &ids {
                    tracked += manager.rooms_of(id).await.map_or(0, |r| r.len());
                }
                assert_eq!(joined, tracked);
            });
        }
    }
}
