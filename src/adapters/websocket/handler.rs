//! WebSocket upgrade handler for real-time dashboard connections.
//!
//! Handles the HTTP → WebSocket upgrade and manages the connection lifecycle:
//! 1. Resolve identity from an optional bearer credential
//! 2. Upgrade to WebSocket and register the connection
//! 3. Send `connected`
//! 4. Relay subscriptions and domain events until disconnect
//! 5. Remove the connection from every room

use std::sync::Arc;

use axum::{
    extract::{
        ws::{Message, WebSocket, WebSocketUpgrade},
        Query, State,
    },
    http::{header, HeaderMap},
    response::Response,
    routing::get,
    Router,
};
use futures::{SinkExt, StreamExt};
use serde::Deserialize;
use tokio::sync::mpsc;

use crate::domain::foundation::{AuthenticatedUser, ConnectionId, Timestamp};
use crate::domain::realtime::{Connection, Identity, Origin};
use crate::ports::SessionValidator;

use super::event_router::EventRouter;
use super::messages::{ClientMessage, ConnectedPayload, Frame, ServerMessage};
use super::rooms::RoomManager;

/// State required for WebSocket handling.
#[derive(Clone)]
pub struct WebSocketState {
    pub rooms: Arc<RoomManager>,
    pub router: Arc<EventRouter>,
    pub validator: Arc<dyn SessionValidator>,
}

impl WebSocketState {
    pub fn new(
        rooms: Arc<RoomManager>,
        router: Arc<EventRouter>,
        validator: Arc<dyn SessionValidator>,
    ) -> Self {
        Self {
            rooms,
            router,
            validator,
        }
    }
}

/// Query parameters accepted on the upgrade request.
#[derive(Debug, Default, Deserialize)]
pub struct ConnectParams {
    pub token: Option<String>,
}

/// Handle WebSocket upgrade requests.
///
/// Route: `GET /ws`
///
/// The credential comes from `Authorization: Bearer <jwt>` or `?token=<jwt>`,
/// header first. A missing or invalid credential never rejects the upgrade;
/// the connection proceeds as an anonymous viewer.
pub async fn ws_handler(
    ws: WebSocketUpgrade,
    Query(params): Query<ConnectParams>,
    headers: HeaderMap,
    State(state): State<WebSocketState>,
) -> Response {
    let token = bearer_token(&headers).or(params.token);
    let user = authenticate(state.validator.as_ref(), token.as_deref()).await;

    ws.on_upgrade(move |socket| handle_socket(socket, user, state))
}

fn bearer_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(str::to_string)
}

/// Validates an optional credential; failures are logged and ignored.
pub async fn authenticate(
    validator: &dyn SessionValidator,
    token: Option<&str>,
) -> Option<AuthenticatedUser> {
    let token = token.filter(|t| !t.is_empty())?;
    match validator.validate(token).await {
        Ok(user) => Some(user),
        Err(e) => {
            tracing::debug!(error = %e, "credential rejected, continuing anonymously");
            None
        }
    }
}

/// Handle an established WebSocket connection.
///
/// Outbound frames are queued on an unbounded channel by the room registry
/// and drained into the socket by a writer task; the reader loop handles
/// client frames in arrival order.
async fn handle_socket(socket: WebSocket, user: Option<AuthenticatedUser>, state: WebSocketState) {
    let (mut sender, mut receiver) = socket.split();

    let connection_id = ConnectionId::new();
    let identity = match user {
        Some(user) => Identity::from(user),
        None => Identity::anonymous(&connection_id),
    };

    let (outbound, mut queue) = mpsc::unbounded_channel::<String>();
    let connected = ServerMessage::Connected(ConnectedPayload {
        user_id: identity.user_id.clone(),
        role: identity.role.clone(),
        server_time: Timestamp::now(),
    });
    match connected.to_text() {
        Ok(text) => {
            let _ = outbound.send(text);
        }
        Err(e) => tracing::warn!(error = %e, "failed to encode connected message"),
    }

    let origin = Origin::connection(connection_id.clone(), identity.user_id.clone());
    state
        .rooms
        .register(Connection::new(connection_id.clone(), identity), outbound)
        .await;

    tracing::info!(
        connection_id = %connection_id,
        user_id = %origin.user_id,
        "client connected"
    );

    let mut send_task = {
        let connection_id = connection_id.clone();
        tokio::spawn(async move {
            while let Some(text) = queue.recv().await {
                if let Err(e) = sender.send(Message::Text(text)).await {
                    tracing::debug!(connection_id = %connection_id, "send error, closing: {}", e);
                    break;
                }
            }
        })
    };

    let rooms = state.rooms.clone();
    let router = state.router.clone();
    let mut recv_task = tokio::spawn(async move {
        while let Some(result) = receiver.next().await {
            match result {
                Ok(Message::Text(text)) => handle_text(&rooms, &router, &origin, &text).await,
                Ok(Message::Binary(_)) => {
                    tracing::warn!(user_id = %origin.user_id, "unsupported binary frame");
                }
                Ok(Message::Close(_)) => break,
                Ok(_) => {}
                Err(e) => {
                    tracing::debug!(user_id = %origin.user_id, "receive error: {}", e);
                    break;
                }
            }
        }
    });

    tokio::select! {
        _ = &mut send_task => recv_task.abort(),
        _ = &mut recv_task => send_task.abort(),
    }

    state.rooms.disconnect(&connection_id).await;
    tracing::info!(connection_id = %connection_id, "client disconnected");
}

/// Applies one text frame from a client.
pub(crate) async fn handle_text(
    rooms: &RoomManager,
    router: &EventRouter,
    origin: &Origin,
    text: &str,
) {
    let frame = match Frame::parse(text) {
        Ok(frame) => frame,
        Err(e) => {
            tracing::warn!(user_id = %origin.user_id, error = %e, "malformed frame dropped");
            return;
        }
    };
    let Some(connection_id) = origin.connection_id.as_ref() else {
        return;
    };

    let event = frame.event.clone();
    match ClientMessage::from_frame(frame) {
        Some(ClientMessage::Subscribe(room)) => {
            if rooms.join_named(connection_id, &room).await.is_none() {
                tracing::debug!(connection_id = %connection_id, room = %room, "subscribe ignored");
            }
        }
        Some(ClientMessage::Unsubscribe(room)) => {
            rooms.leave_named(connection_id, &room).await;
        }
        Some(ClientMessage::Event(domain_event)) => {
            router.route(origin.clone(), domain_event).await;
        }
        None => {
            tracing::warn!(user_id = %origin.user_id, event = %event, "unknown event dropped");
        }
    }
}

/// Create axum router for the WebSocket endpoint.
pub fn websocket_router(state: WebSocketState) -> Router {
    Router::new().route("/ws", get(ws_handler)).with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::auth::MockSessionValidator;
    use crate::adapters::memory::{
        InMemoryKpiRepository, InMemoryKriRepository, InMemoryRiskRepository,
    };
    use crate::application::AnalyticsService;
    use crate::domain::realtime::Room;
    use tokio::sync::mpsc::UnboundedReceiver;

    fn router(rooms: Arc<RoomManager>) -> EventRouter {
        let analytics = AnalyticsService::new(
            Arc::new(InMemoryRiskRepository::with_demo_data().unwrap()),
            Arc::new(InMemoryKpiRepository::with_demo_data().unwrap()),
            Arc::new(InMemoryKriRepository::with_demo_data().unwrap()),
        );
        EventRouter::new(rooms, Arc::new(analytics))
    }

    async fn connect(rooms: &RoomManager, user: &str) -> (Origin, UnboundedReceiver<String>) {
        let id = ConnectionId::new();
        let (tx, rx) = mpsc::unbounded_channel();
        let identity = Identity {
            user_id: user.to_string(),
            role: "viewer".to_string(),
        };
        rooms.register(Connection::new(id.clone(), identity), tx).await;
        (Origin::connection(id, user), rx)
    }

    #[tokio::test]
    async fn subscribe_and_unsubscribe_frames_change_membership() {
        let rooms = Arc::new(RoomManager::new());
        let router = router(rooms.clone());
        let (origin, _rx) = connect(&rooms, "alice").await;
        let id = origin.connection_id.clone().unwrap();

        handle_text(&rooms, &router, &origin, r#"{"event":"subscribe","data":"dashboard"}"#).await;
        handle_text(&rooms, &router, &origin, r#"{"event":"subscribe","data":"kri"}"#).await;
        handle_text(&rooms, &router, &origin, r#"{"event":"unsubscribe","data":"kri"}"#).await;

        let joined: Vec<_> = rooms.rooms_of(&id).await.unwrap().into_iter().collect();
        assert_eq!(joined, vec![Room::Dashboard]);
    }

    #[tokio::test]
    async fn unknown_and_malformed_frames_are_dropped() {
        let rooms = Arc::new(RoomManager::new());
        let router = router(rooms.clone());
        let (origin, mut rx) = connect(&rooms, "alice").await;
        let (peer, mut peer_rx) = connect(&rooms, "bob").await;
        for room in Room::ALL {
            rooms.join(peer.connection_id.as_ref().unwrap(), room).await;
        }
        while peer_rx.try_recv().is_ok() {}

        handle_text(&rooms, &router, &origin, r#"{"event":"risk:archive","data":{"id":"R001"}}"#)
            .await;
        handle_text(&rooms, &router, &origin, "not json").await;
        handle_text(&rooms, &router, &origin, r#"{"event":"subscribe","data":"admin"}"#).await;

        assert!(rx.try_recv().is_err());
        assert!(peer_rx.try_recv().is_err());
        assert_eq!(rooms.stats().await.total_connections, 2);
    }

    #[tokio::test]
    async fn authenticate_falls_back_to_anonymous() {
        let validator = MockSessionValidator::new().with_test_user("good", "alice");

        let user = authenticate(&validator, Some("good")).await.unwrap();
        assert_eq!(user.id.as_str(), "alice");

        assert!(authenticate(&validator, Some("bad")).await.is_none());
        assert!(authenticate(&validator, Some("")).await.is_none());
        assert!(authenticate(&validator, None).await.is_none());
    }

    #[test]
    fn bearer_token_requires_scheme() {
        let mut headers = HeaderMap::new();
        headers.insert(header::AUTHORIZATION, "Bearer abc".parse().unwrap());
        assert_eq!(bearer_token(&headers), Some("abc".to_string()));

        headers.insert(header::AUTHORIZATION, "Basic abc".parse().unwrap());
        assert_eq!(bearer_token(&headers), None);
    }
}
