//! Transport-neutral message frames.
//!
//! The relay loops only ever see [`Frame`]s. The gateway converts WebSocket
//! messages into frames on the way in and back on the way out; ping, pong
//! and raw frames are transport chatter and never reach the relay.

use bytes::Bytes;
use shared::ControlMessage;
use tokio_tungstenite::tungstenite::Message;

use crate::error::RelayError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    Text(String),
    Binary(Bytes),
}

impl Frame {
    pub fn control(message: ControlMessage) -> Result<Self, RelayError> {
        Ok(Frame::Text(message.encode()?))
    }

    pub fn payload(&self) -> &[u8] {
        match self {
            Frame::Text(text) => text.as_bytes(),
            Frame::Binary(bytes) => bytes,
        }
    }

    pub fn len(&self) -> usize {
        self.payload().len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload().is_empty()
    }

    /// Maps an inbound transport message to a frame.
    ///
    /// `Ok(None)` means the message is not application data and should be
    /// skipped. A close message ends the stream with [`RelayError::Closed`].
    pub fn from_message(message: Message) -> Result<Option<Self>, RelayError> {
        match message {
            Message::Text(text) => Ok(Some(Frame::Text(text.as_str().to_owned()))),
            Message::Binary(bytes) => Ok(Some(Frame::Binary(bytes))),
            Message::Ping(_) | Message::Pong(_) | Message::Frame(_) => Ok(None),
            Message::Close(_) => Err(RelayError::Closed),
        }
    }
}

impl From<Frame> for Message {
    fn from(frame: Frame) -> Self {
        match frame {
            Frame::Text(text) => Message::text(text),
            Frame::Binary(bytes) => Message::binary(bytes),
        }
    }
}
