//! Text-frame transport the client session runs over.

use std::pin::Pin;

use async_trait::async_trait;
use futures::{future, Sink, SinkExt, Stream, StreamExt};
use secrecy::{ExposeSecret, SecretString};
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::client::IntoClientRequest;
use tokio_tungstenite::tungstenite::http::header::AUTHORIZATION;
use tokio_tungstenite::tungstenite::http::HeaderValue;
use tokio_tungstenite::tungstenite::Message;

use super::ClientError;

/// Outgoing half of an open connection.
pub type FrameSink = Pin<Box<dyn Sink<String, Error = ClientError> + Send>>;

/// Incoming half of an open connection. Ends when the peer closes.
pub type FrameStream = Pin<Box<dyn Stream<Item = Result<String, ClientError>> + Send>>;

/// Opens a fresh connection each time it is called.
#[async_trait]
pub trait Connector: Send + Sync {
    async fn connect(&self) -> Result<(FrameSink, FrameStream), ClientError>;
}

/// Connects over WebSocket, presenting the credential as a bearer header.
pub struct WebSocketConnector {
    url: String,
    token: Option<SecretString>,
}

impl WebSocketConnector {
    pub fn new(url: impl Into<String>, token: Option<SecretString>) -> Self {
        Self {
            url: url.into(),
            token,
        }
    }
}

#[async_trait]
impl Connector for WebSocketConnector {
    async fn connect(&self) -> Result<(FrameSink, FrameStream), ClientError> {
        let mut request = self
            .url
            .as_str()
            .into_client_request()
            .map_err(|_| ClientError::InvalidUrl(self.url.clone()))?;

        if let Some(token) = &self.token {
            let value = HeaderValue::from_str(&format!("Bearer {}", token.expose_secret()))
                .map_err(|_| ClientError::InvalidCredential)?;
            request.headers_mut().insert(AUTHORIZATION, value);
        }

        let (socket, _) = connect_async(request).await?;
        let (sink, stream) = socket.split();

        let sink = sink
            .with(|text: String| future::ready(Ok::<_, ClientError>(Message::Text(text))));

        // Control frames are handled by tungstenite; binary frames are not part
        // of the protocol.
        let stream = stream.filter_map(|message| {
            future::ready(match message {
                Ok(Message::Text(text)) => Some(Ok(text)),
                Ok(_) => None,
                Err(e) => Some(Err(ClientError::from(e))),
            })
        });

        Ok((Box::pin(sink), Box::pin(stream)))
    }
}
