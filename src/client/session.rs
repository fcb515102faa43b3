//! The client connection driver.
//!
//! A [`RiskSocketClient`] is a cheap handle; the connection itself is owned
//! by a background task that reconnects on transport loss and replays the
//! subscription set every time the server greets it with `connected`.

use std::collections::BTreeSet;
use std::sync::Arc;

use futures::{SinkExt, StreamExt};
use secrecy::SecretString;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot, watch};

use crate::adapters::websocket::{ClientMessage, Frame, ServerMessage};
use crate::domain::realtime::{DomainEvent, KriBreach, MatrixUpdate, MetricUpdate, RiskAction, Room};

use super::{
    patch_for, ClientError, ClientUpdate, ConnectionState, Connector, FrameSink, FrameStream,
    Notice, ReconnectPolicy, WebSocketConnector,
};

enum Command {
    Subscribe(Room),
    Send(String),
    Shutdown(oneshot::Sender<()>),
}

/// Handle to a live dashboard connection.
pub struct RiskSocketClient {
    commands: mpsc::UnboundedSender<Command>,
    state: watch::Receiver<ConnectionState>,
    subscriptions: watch::Sender<BTreeSet<Room>>,
}

impl RiskSocketClient {
    /// Connects to `url` (e.g. `ws://localhost:3001/ws`) with the default
    /// reconnect policy. Patches and notices arrive on the returned receiver.
    pub fn connect(
        url: impl Into<String>,
        token: Option<SecretString>,
    ) -> (Self, mpsc::UnboundedReceiver<ClientUpdate>) {
        let connector = Arc::new(WebSocketConnector::new(url, token));
        Self::with_connector(connector, ReconnectPolicy::default())
    }

    pub fn with_connector(
        connector: Arc<dyn Connector>,
        policy: ReconnectPolicy,
    ) -> (Self, mpsc::UnboundedReceiver<ClientUpdate>) {
        let (commands_tx, commands_rx) = mpsc::unbounded_channel();
        let (updates_tx, updates_rx) = mpsc::unbounded_channel();
        let (state_tx, state_rx) = watch::channel(ConnectionState::Disconnected);
        let (subscriptions_tx, subscriptions_rx) = watch::channel(BTreeSet::new());

        let driver = Driver {
            connector,
            policy,
            commands: commands_rx,
            state: state_tx,
            subscriptions: subscriptions_rx,
            updates: updates_tx,
            has_connected: false,
        };
        tokio::spawn(driver.run());

        let client = Self {
            commands: commands_tx,
            state: state_rx,
            subscriptions: subscriptions_tx,
        };
        (client, updates_rx)
    }

    pub fn state(&self) -> ConnectionState {
        *self.state.borrow()
    }

    /// Receiver for awaiting state transitions.
    pub fn watch_state(&self) -> watch::Receiver<ConnectionState> {
        self.state.clone()
    }

    pub fn subscriptions(&self) -> BTreeSet<Room> {
        self.subscriptions.borrow().clone()
    }

    /// Adds `room` to the subscription set. The join is sent now if
    /// connected, and again after every reconnect.
    pub fn subscribe(&self, room: Room) -> Result<(), ClientError> {
        let added = self.subscriptions.send_if_modified(|rooms| rooms.insert(room));
        if added {
            self.command(Command::Subscribe(room))?;
        }
        Ok(())
    }

    pub fn unsubscribe(&self, room: Room) -> Result<(), ClientError> {
        let removed = self.subscriptions.send_if_modified(|rooms| rooms.remove(&room));
        if removed {
            let frame = ClientMessage::Unsubscribe(room.as_str().to_string()).to_frame();
            self.command(Command::Send(frame.to_text()?))?;
        }
        Ok(())
    }

    pub fn create_risk(&self, risk: Value) -> Result<(), ClientError> {
        self.emit(DomainEvent::RiskChanged {
            action: RiskAction::Create,
            risk,
        })
    }

    pub fn update_risk(&self, risk: Value) -> Result<(), ClientError> {
        self.emit(DomainEvent::RiskChanged {
            action: RiskAction::Update,
            risk,
        })
    }

    pub fn delete_risk(&self, risk: Value) -> Result<(), ClientError> {
        self.emit(DomainEvent::RiskChanged {
            action: RiskAction::Delete,
            risk,
        })
    }

    pub fn report_kri_breach(&self, breach: KriBreach) -> Result<(), ClientError> {
        self.emit(DomainEvent::KriBreach(breach))
    }

    pub fn update_matrix(&self, update: MatrixUpdate) -> Result<(), ClientError> {
        self.emit(DomainEvent::MatrixUpdate(update))
    }

    pub fn update_metric(&self, update: MetricUpdate) -> Result<(), ClientError> {
        self.emit(DomainEvent::MetricUpdate(update))
    }

    /// Closes the connection, forgets all subscriptions and stops
    /// reconnecting. Returns once the driver has stopped.
    pub async fn disconnect(&self) {
        self.subscriptions.send_modify(BTreeSet::clear);
        let (ack_tx, ack_rx) = oneshot::channel();
        if self.commands.send(Command::Shutdown(ack_tx)).is_ok() {
            let _ = ack_rx.await;
        }
    }

    /// Domain events are dropped while not connected.
    fn emit(&self, event: DomainEvent) -> Result<(), ClientError> {
        let text = ClientMessage::Event(event).to_frame().to_text()?;
        self.command(Command::Send(text))
    }

    fn command(&self, command: Command) -> Result<(), ClientError> {
        self.commands.send(command).map_err(|_| ClientError::Closed)
    }
}

enum SessionEnd {
    Lost,
    Stopped(Option<oneshot::Sender<()>>),
}

struct Driver {
    connector: Arc<dyn Connector>,
    policy: ReconnectPolicy,
    commands: mpsc::UnboundedReceiver<Command>,
    state: watch::Sender<ConnectionState>,
    subscriptions: watch::Receiver<BTreeSet<Room>>,
    updates: mpsc::UnboundedSender<ClientUpdate>,
    has_connected: bool,
}

impl Driver {
    async fn run(mut self) {
        let mut attempts = 0u32;

        loop {
            self.state.send_replace(ConnectionState::Connecting);

            let connector = Arc::clone(&self.connector);
            let opened = tokio::select! {
                opened = connector.connect() => opened,
                ack = next_shutdown(&mut self.commands) => {
                    self.stop(ack);
                    return;
                }
            };

            let end = match opened {
                Ok((sink, stream)) => self.session(sink, stream, &mut attempts).await,
                Err(e) if e.is_retryable() => {
                    tracing::warn!(error = %e, attempts, "Connect attempt failed");
                    SessionEnd::Lost
                }
                Err(e) => {
                    tracing::error!(error = %e, "Cannot connect; giving up");
                    self.go_offline(attempts);
                    return;
                }
            };

            if let SessionEnd::Stopped(ack) = end {
                self.stop(ack);
                return;
            }

            self.state.send_replace(ConnectionState::Disconnected);
            if !self.policy.allows(attempts) {
                self.go_offline(attempts);
                return;
            }
            attempts += 1;

            tokio::select! {
                _ = tokio::time::sleep(self.policy.delay) => {}
                ack = next_shutdown(&mut self.commands) => {
                    self.stop(ack);
                    return;
                }
            }
        }
    }

    async fn session(
        &mut self,
        mut sink: FrameSink,
        mut stream: FrameStream,
        attempts: &mut u32,
    ) -> SessionEnd {
        let mut connected = false;

        let end = loop {
            tokio::select! {
                biased;

                command = self.commands.recv() => match command {
                    None => break SessionEnd::Stopped(None),
                    Some(Command::Shutdown(ack)) => break SessionEnd::Stopped(Some(ack)),
                    Some(Command::Subscribe(room)) if connected => {
                        if let Err(e) = send_subscribe(&mut sink, room).await {
                            tracing::warn!(error = %e, "Send failed");
                            break SessionEnd::Lost;
                        }
                    }
                    Some(Command::Send(text)) if connected => {
                        if let Err(e) = sink.send(text).await {
                            tracing::warn!(error = %e, "Send failed");
                            break SessionEnd::Lost;
                        }
                    }
                    Some(_) => tracing::debug!("Not connected yet; outbound frame dropped"),
                },
                incoming = stream.next() => match incoming {
                    Some(Ok(text)) => {
                        let received = self.receive(&text, &mut sink, &mut connected, attempts);
                        if let Err(e) = received.await {
                            tracing::warn!(error = %e, "Resubscribe failed");
                            break SessionEnd::Lost;
                        }
                    }
                    Some(Err(e)) => {
                        tracing::warn!(error = %e, "Transport error");
                        break SessionEnd::Lost;
                    }
                    None => break SessionEnd::Lost,
                },
            }
        };

        match &end {
            SessionEnd::Stopped(_) => {
                let _ = sink.close().await;
            }
            SessionEnd::Lost if connected => {
                tracing::info!("Connection lost");
                self.publish(ClientUpdate::Notice(Notice::ConnectionLost));
            }
            SessionEnd::Lost => {}
        }
        end
    }

    async fn receive(
        &mut self,
        text: &str,
        sink: &mut FrameSink,
        connected: &mut bool,
        attempts: &mut u32,
    ) -> Result<(), ClientError> {
        let Some(message) = Frame::parse(text).ok().and_then(ServerMessage::from_frame) else {
            tracing::debug!(frame = %text, "Ignoring unrecognized server frame");
            return Ok(());
        };

        if let ServerMessage::Connected(payload) = &message {
            *connected = true;
            *attempts = 0;
            self.state.send_replace(ConnectionState::Connected);

            let rooms: Vec<Room> = self.subscriptions.borrow().iter().copied().collect();
            for room in rooms {
                send_subscribe(sink, room).await?;
            }

            let notice = if self.has_connected {
                Notice::Reconnected
            } else {
                Notice::Connected {
                    user_id: payload.user_id.clone(),
                }
            };
            self.has_connected = true;
            tracing::info!(user_id = %payload.user_id, "Connected");
            self.publish(ClientUpdate::Notice(notice));
        }

        self.publish(ClientUpdate::Patch(patch_for(&message)));
        Ok(())
    }

    fn publish(&self, update: ClientUpdate) {
        // Nobody listening is fine.
        let _ = self.updates.send(update);
    }

    fn go_offline(&self, attempts: u32) {
        tracing::warn!(attempts, "Reconnection exhausted; offline");
        self.state.send_replace(ConnectionState::Offline);
        self.publish(ClientUpdate::Notice(Notice::Offline { attempts }));
    }

    fn stop(&self, ack: Option<oneshot::Sender<()>>) {
        self.state.send_replace(ConnectionState::Disconnected);
        if let Some(ack) = ack {
            let _ = ack.send(());
        }
    }
}

/// Waits for a shutdown request, discarding anything sent while not connected.
async fn next_shutdown(
    commands: &mut mpsc::UnboundedReceiver<Command>,
) -> Option<oneshot::Sender<()>> {
    while let Some(command) = commands.recv().await {
        if let Command::Shutdown(ack) = command {
            return Some(ack);
        }
    }
    None
}

async fn send_subscribe(sink: &mut FrameSink, room: Room) -> Result<(), ClientError> {
    let text = ClientMessage::Subscribe(room.as_str().to_string())
        .to_frame()
        .to_text()?;
    sink.send(text).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicBool, AtomicU32, Ordering};
    use std::time::Duration;

    use async_trait::async_trait;
    use futures::channel::mpsc as duplex;
    use serde_json::json;

    use crate::client::StatePatch;

    const WAIT: Duration = Duration::from_secs(2);

    /// Server side of one accepted connection.
    struct ServerEnd {
        from_client: duplex::UnboundedReceiver<String>,
        to_client: duplex::UnboundedSender<String>,
    }

    impl ServerEnd {
        fn greet(&self, user_id: &str) {
            let frame = json!({
                "event": "connected",
                "data": {"userId": user_id, "role": "viewer", "serverTime": "2026-01-05T10:00:00Z"}
            });
            self.to_client.unbounded_send(frame.to_string()).unwrap();
        }

        fn push(&self, frame: serde_json::Value) {
            self.to_client.unbounded_send(frame.to_string()).unwrap();
        }

        async fn next_frame(&mut self) -> Frame {
            let text = tokio::time::timeout(WAIT, self.from_client.next())
                .await
                .expect("timed out waiting for client frame")
                .expect("client closed");
            Frame::parse(&text).unwrap()
        }

        fn try_frame(&mut self) -> Option<Frame> {
            self.from_client
                .try_next()
                .ok()
                .flatten()
                .map(|text| Frame::parse(&text).unwrap())
        }
    }

    struct FakeConnector {
        accepted: mpsc::UnboundedSender<ServerEnd>,
        refuse: AtomicBool,
        calls: AtomicU32,
    }

    #[async_trait]
    impl Connector for FakeConnector {
        async fn connect(&self) -> Result<(FrameSink, FrameStream), ClientError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.refuse.load(Ordering::SeqCst) {
                let refused = tokio_tungstenite::tungstenite::Error::ConnectionClosed;
                return Err(ClientError::Transport(refused));
            }
            let (to_server, from_client) = duplex::unbounded::<String>();
            let (to_client, from_server) = duplex::unbounded::<String>();
            let _ = self.accepted.send(ServerEnd {
                from_client,
                to_client,
            });
            let sink = to_server.sink_map_err(|_| ClientError::Closed);
            let stream = from_server.map(Ok::<String, ClientError>);
            Ok((Box::pin(sink), Box::pin(stream)))
        }
    }

    struct Harness {
        client: RiskSocketClient,
        updates: mpsc::UnboundedReceiver<ClientUpdate>,
        connector: Arc<FakeConnector>,
        accepted: mpsc::UnboundedReceiver<ServerEnd>,
    }

    impl Harness {
        fn start(max_attempts: u32) -> Self {
            let (accepted_tx, accepted) = mpsc::unbounded_channel();
            let connector = Arc::new(FakeConnector {
                accepted: accepted_tx,
                refuse: AtomicBool::new(false),
                calls: AtomicU32::new(0),
            });
            let policy = ReconnectPolicy::new(max_attempts, Duration::from_millis(10));
            let (client, updates) = RiskSocketClient::with_connector(connector.clone(), policy);
            Self {
                client,
                updates,
                connector,
                accepted,
            }
        }

        async fn accept(&mut self) -> ServerEnd {
            tokio::time::timeout(WAIT, self.accepted.recv())
                .await
                .expect("timed out waiting for connect")
                .expect("connector dropped")
        }

        async fn wait_for(&self, wanted: ConnectionState) {
            let mut state = self.client.watch_state();
            tokio::time::timeout(WAIT, state.wait_for(|s| *s == wanted))
                .await
                .expect("timed out waiting for state")
                .unwrap();
        }

        async fn next_notice(&mut self) -> Notice {
            loop {
                let update = tokio::time::timeout(WAIT, self.updates.recv())
                    .await
                    .expect("timed out waiting for update")
                    .expect("updates closed");
                if let ClientUpdate::Notice(notice) = update {
                    return notice;
                }
            }
        }
    }

    #[tokio::test]
    async fn greeting_connects_and_patches_identity() {
        let mut harness = Harness::start(5);
        let server = harness.accept().await;

        server.greet("alice");
        harness.wait_for(ConnectionState::Connected).await;

        assert_eq!(
            harness.next_notice().await,
            Notice::Connected {
                user_id: "alice".to_string()
            }
        );
        let patch = harness.updates.recv().await.unwrap();
        assert_eq!(
            patch,
            ClientUpdate::Patch(StatePatch::Identity {
                user_id: "alice".to_string(),
                role: "viewer".to_string(),
            })
        );
    }

    #[tokio::test]
    async fn subscriptions_made_early_are_sent_on_greeting() {
        let mut harness = Harness::start(5);
        let mut server = harness.accept().await;

        harness.client.subscribe(Room::Dashboard).unwrap();
        harness.client.subscribe(Room::Kri).unwrap();
        server.greet("alice");

        let first = server.next_frame().await;
        let second = server.next_frame().await;
        assert_eq!(first, Frame::new("subscribe", json!("dashboard")));
        assert_eq!(second, Frame::new("subscribe", json!("kri")));
    }

    #[tokio::test]
    async fn duplicate_subscribe_is_sent_once() {
        let mut harness = Harness::start(5);
        let mut server = harness.accept().await;
        server.greet("alice");
        harness.wait_for(ConnectionState::Connected).await;

        harness.client.subscribe(Room::RiskMatrix).unwrap();
        harness.client.subscribe(Room::RiskMatrix).unwrap();
        harness.client.update_risk(json!({"id": "R001"})).unwrap();

        assert_eq!(
            server.next_frame().await,
            Frame::new("subscribe", json!("riskMatrix"))
        );
        assert_eq!(server.next_frame().await.event, "risk:update");
    }

    #[tokio::test]
    async fn events_before_greeting_are_dropped() {
        let mut harness = Harness::start(5);
        let mut server = harness.accept().await;

        harness
            .client
            .report_kri_breach(KriBreach {
                kri_id: Some("KRI003".to_string()),
                name: None,
                threshold: 10.0,
                current_value: 16.0,
            })
            .unwrap();
        server.greet("alice");
        harness.wait_for(ConnectionState::Connected).await;
        harness.client.update_metric(MetricUpdate::default()).unwrap();

        assert_eq!(server.next_frame().await.event, "metric:update");
        assert!(server.try_frame().is_none());
    }

    #[tokio::test]
    async fn reconnect_replays_subscription_set() {
        let mut harness = Harness::start(5);
        let server = harness.accept().await;
        harness.client.subscribe(Room::Dashboard).unwrap();
        harness.client.subscribe(Room::Kri).unwrap();
        server.greet("alice");
        harness.wait_for(ConnectionState::Connected).await;
        assert!(matches!(harness.next_notice().await, Notice::Connected { .. }));

        drop(server);
        assert_eq!(harness.next_notice().await, Notice::ConnectionLost);

        let mut server = harness.accept().await;
        server.greet("alice");
        assert_eq!(
            server.next_frame().await,
            Frame::new("subscribe", json!("dashboard"))
        );
        assert_eq!(
            server.next_frame().await,
            Frame::new("subscribe", json!("kri"))
        );
        assert_eq!(harness.next_notice().await, Notice::Reconnected);
    }

    #[tokio::test]
    async fn goes_offline_after_cap() {
        let mut harness = Harness::start(2);
        let server = harness.accept().await;
        server.greet("alice");
        harness.wait_for(ConnectionState::Connected).await;

        harness.connector.refuse.store(true, Ordering::SeqCst);
        drop(server);

        harness.wait_for(ConnectionState::Offline).await;
        assert_eq!(harness.connector.calls.load(Ordering::SeqCst), 3);

        let mut notices = Vec::new();
        while let Ok(update) = harness.updates.try_recv() {
            if let ClientUpdate::Notice(notice) = update {
                notices.push(notice);
            }
        }
        assert_eq!(notices.last(), Some(&Notice::Offline { attempts: 2 }));
        assert!(harness.client.subscribe(Room::Kpi).is_err());
    }

    #[tokio::test]
    async fn disconnect_clears_subscriptions_and_stops() {
        let mut harness = Harness::start(5);
        let server = harness.accept().await;
        harness.client.subscribe(Room::Dashboard).unwrap();
        server.greet("alice");
        harness.wait_for(ConnectionState::Connected).await;

        harness.client.disconnect().await;

        assert_eq!(harness.client.state(), ConnectionState::Disconnected);
        assert!(harness.client.subscriptions().is_empty());
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(harness.connector.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn unknown_server_events_are_ignored() {
        let mut harness = Harness::start(5);
        let server = harness.accept().await;
        server.push(json!({"event": "system:maintenance", "data": {}}));
        server.push(json!({
            "event": "heatmap:update",
            "data": {
                "critical": 1,
                "high": 0,
                "medium": 0,
                "low": 2,
                "timestamp": "2026-01-01T00:00:00Z"
            }
        }));

        let update = tokio::time::timeout(WAIT, harness.updates.recv())
            .await
            .unwrap()
            .unwrap();
        match update {
            ClientUpdate::Patch(StatePatch::Heatmap(counts)) => assert_eq!(counts.total(), 3),
            other => panic!("unexpected update {other:?}"),
        }
    }
}
