use futures::{SinkExt, StreamExt};
use log::{debug, info};
use shared::{ControlMessage, GameMessage, ServerEvent};
use std::time::Duration;
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::Message;
use tokio_tungstenite::{MaybeTlsStream, WebSocketStream};

use crate::error::ClientError;

/// Something the relay delivered to this client.
#[derive(Debug, Clone, PartialEq)]
pub enum Incoming {
    Event(ServerEvent),
    Binary(Vec<u8>),
}

impl Incoming {
    pub fn is_control(&self, message: ControlMessage) -> bool {
        matches!(self, Incoming::Event(ServerEvent::Control(c)) if *c == message)
    }
}

/// One WebSocket connection to the relay.
pub struct Client {
    ws: WebSocketStream<MaybeTlsStream<TcpStream>>,
    opponent_connected: bool,
}

impl Client {
    /// Connects to a relay URL such as `ws://127.0.0.1:8080/ws`.
    pub async fn connect(url: &str) -> Result<Self, ClientError> {
        info!("Connecting to {}", url);
        let (ws, _response) = tokio_tungstenite::connect_async(url).await?;

        Ok(Client {
            ws,
            opponent_connected: false,
        })
    }

    /// True between `opponentConnected` and `opponentDisconnected`.
    pub fn opponent_connected(&self) -> bool {
        self.opponent_connected
    }

    pub async fn send_game(&mut self, message: &GameMessage) -> Result<(), ClientError> {
        let text = message.encode()?;
        self.send_text(&text).await
    }

    pub async fn send_text(&mut self, text: &str) -> Result<(), ClientError> {
        self.ws.send(Message::text(text)).await?;
        Ok(())
    }

    pub async fn send_binary(&mut self, bytes: Vec<u8>) -> Result<(), ClientError> {
        self.ws.send(Message::binary(bytes)).await?;
        Ok(())
    }

    /// Waits for the next application message. `Ok(None)` once the relay has
    /// closed the connection.
    pub async fn next(&mut self) -> Result<Option<Incoming>, ClientError> {
        while let Some(message) = self.ws.next().await {
            let incoming = match message? {
                Message::Text(text) => Incoming::Event(ServerEvent::classify(text.as_str())),
                Message::Binary(bytes) => Incoming::Binary(bytes.to_vec()),
                Message::Close(_) => return Ok(None),
                other => {
                    debug!("Ignoring {:?}", other);
                    continue;
                }
            };

            match &incoming {
                Incoming::Event(ServerEvent::Control(ControlMessage::OpponentConnected)) => {
                    self.opponent_connected = true;
                }
                Incoming::Event(ServerEvent::Control(ControlMessage::OpponentDisconnected)) => {
                    self.opponent_connected = false;
                }
                _ => {}
            }

            return Ok(Some(incoming));
        }

        Ok(None)
    }

    /// Like [`Client::next`] but gives up after `wait` with
    /// [`ClientError::Timeout`], so silence is never mistaken for a close.
    pub async fn next_within(&mut self, wait: Duration) -> Result<Option<Incoming>, ClientError> {
        match tokio::time::timeout(wait, self.next()).await {
            Ok(result) => result,
            Err(_) => Err(ClientError::Timeout(wait)),
        }
    }

    /// Reads until the given control message arrives, discarding the rest.
    pub async fn wait_for(&mut self, message: ControlMessage) -> Result<(), ClientError> {
        loop {
            match self.next().await? {
                Some(incoming) if incoming.is_control(message) => return Ok(()),
                Some(other) => debug!("Skipping {:?} while waiting for {:?}", other, message),
                None => return Err(ClientError::Closed),
            }
        }
    }

    pub async fn close(mut self) -> Result<(), ClientError> {
        self.ws.close(None).await?;
        Ok(())
    }
}
