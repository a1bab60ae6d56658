use serde::{Deserialize, Serialize};

pub const DEFAULT_PORT: u16 = 8080;
pub const WS_PATH: &str = "/ws";
pub const OUTBOX_CAPACITY: usize = 256;

/// Notifications generated by the relay itself, sent on the same channel as
/// relayed payloads.
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum ControlMessage {
    OpponentConnected,
    OpponentDisconnected,
}

impl ControlMessage {
    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }

    pub fn decode(text: &str) -> Option<Self> {
        serde_json::from_str(text).ok()
    }
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    Left,
    Right,
}

#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Outcome {
    Win,
    GameOver,
}

/// Payloads the game clients exchange with each other. The relay never
/// looks at these; they exist for clients and tests.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum GameMessage {
    PaddleInput { direction: Direction },
    BrickDestroyed { x: f32, y: f32 },
    LivesUpdate { lives: u32 },
    GameOver { state: Outcome },
}

impl GameMessage {
    pub fn encode(&self) -> serde_json::Result<String> {
        serde_json::to_string(self)
    }
}

/// What a client makes of a text frame coming from the relay.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerEvent {
    Control(ControlMessage),
    Game(GameMessage),
    Unknown(String),
}

impl ServerEvent {
    pub fn classify(text: &str) -> Self {
        if let Some(control) = ControlMessage::decode(text) {
            return ServerEvent::Control(control);
        }

        match serde_json::from_str::<GameMessage>(text) {
            Ok(game) => ServerEvent::Game(game),
            Err(_) => ServerEvent::Unknown(text.to_string()),
        }
    }
}
