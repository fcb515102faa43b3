//! Shared helpers: an in-process server on a random port and a raw
//! WebSocket peer.

#![allow(dead_code)]

use std::net::SocketAddr;
use std::time::Duration;

use futures::stream::{SplitSink, SplitStream};
use futures::{SinkExt, StreamExt};
use serde_json::{json, Value};
use tokio::net::{TcpListener, TcpStream};
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};

use risk_pulse::adapters::http::{build_router, AppServices};
use risk_pulse::config::{AuthConfig, ServerConfig};

pub const WAIT: Duration = Duration::from_secs(3);

type Socket = WebSocketStream<MaybeTlsStream<TcpStream>>;

pub struct TestServer {
    pub addr: SocketAddr,
    pub services: AppServices,
}

impl TestServer {
    pub async fn start() -> Self {
        let services = AppServices::demo(&AuthConfig::default()).expect("demo data");
        let app = build_router(&services, &ServerConfig::default());

        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        Self { addr, services }
    }

    pub fn ws_url(&self) -> String {
        format!("ws://{}/ws", self.addr)
    }

    pub fn api(&self, path: &str) -> String {
        format!("http://{}/api{}", self.addr, path)
    }
}

/// A raw protocol peer speaking `{event, data}` frames.
pub struct Peer {
    write: SplitSink<Socket, Message>,
    read: SplitStream<Socket>,
    pub user_id: String,
}

impl Peer {
    /// Connects and waits for the `connected` greeting.
    pub async fn connect(server: &TestServer, token: Option<&str>) -> Self {
        let url = match token {
            Some(token) => format!("{}?token={}", server.ws_url(), token),
            None => server.ws_url(),
        };
        let (socket, _) = connect_async(url).await.expect("websocket connect");
        let (write, read) = socket.split();
        let mut peer = Self {
            write,
            read,
            user_id: String::new(),
        };
        let hello = peer.expect("connected").await;
        peer.user_id = hello["userId"].as_str().unwrap().to_string();
        peer
    }

    pub async fn send(&mut self, event: &str, data: Value) {
        let frame = json!({"event": event, "data": data});
        self.write
            .send(Message::Text(frame.to_string()))
            .await
            .unwrap();
    }

    pub async fn join(&mut self, room: &str) {
        self.send("subscribe", json!(room)).await;
        let joined = self.expect("room:joined").await;
        assert_eq!(joined["room"], room);
    }

    /// Skips other events until `event` arrives; returns its payload.
    pub async fn expect(&mut self, event: &str) -> Value {
        tokio::time::timeout(WAIT, async {
            loop {
                match self.read.next().await {
                    Some(Ok(Message::Text(text))) => {
                        let frame: Value = serde_json::from_str(&text).unwrap();
                        if frame["event"] == event {
                            return frame["data"].clone();
                        }
                    }
                    Some(Ok(_)) => continue,
                    other => panic!("socket ended while waiting for {event}: {other:?}"),
                }
            }
        })
        .await
        .unwrap_or_else(|_| panic!("timed out waiting for {event}"))
    }

    /// True if no `event` frame arrives within `window`.
    pub async fn quiet_for(&mut self, event: &str, window: Duration) -> bool {
        let waited = tokio::time::timeout(window, async {
            loop {
                match self.read.next().await {
                    Some(Ok(Message::Text(text))) => {
                        let frame: Value = serde_json::from_str(&text).unwrap();
                        if frame["event"] == event {
                            return;
                        }
                    }
                    Some(Ok(_)) => continue,
                    _ => std::future::pending::<()>().await,
                }
            }
        })
        .await;
        waited.is_err()
    }
}
