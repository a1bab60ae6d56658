//! Player identity and the outbound queue feeding each player's sender loop.

use log::warn;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use tokio::sync::mpsc::{self, error::TrySendError};

use crate::frame::Frame;

/// Receiving end of a player's outbox, drained by the sender loop.
pub type Outbox = mpsc::Receiver<Frame>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct PlayerId(pub u64);

impl fmt::Display for PlayerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "player-{}", self.0)
    }
}

/// Hands out process-unique player ids, starting at 1.
#[derive(Debug)]
pub struct PlayerIds {
    next: AtomicU64,
}

impl PlayerIds {
    pub fn new() -> Self {
        Self {
            next: AtomicU64::new(1),
        }
    }

    pub fn mint(&self) -> PlayerId {
        PlayerId(self.next.fetch_add(1, Ordering::Relaxed))
    }
}

impl Default for PlayerIds {
    fn default() -> Self {
        Self::new()
    }
}

/// Result of a non-blocking enqueue onto an outbox.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    Delivered,
    /// Outbox at capacity; the frame was discarded.
    Dropped,
    /// The sender loop has already exited.
    Closed,
    /// Nobody to deliver to.
    NoRecipient,
}

/// A seated player as the room sees it.
///
/// The room's copy of `outbox` is the only sender for that queue, so
/// dropping the `Player` closes the outbox and stops its sender loop once
/// the remaining frames are written.
#[derive(Debug)]
pub struct Player {
    id: PlayerId,
    outbox: mpsc::Sender<Frame>,
}

impl Player {
    pub fn new(id: PlayerId, capacity: usize) -> (Self, Outbox) {
        let (outbox, receiver) = mpsc::channel(capacity);
        (Self { id, outbox }, receiver)
    }

    pub fn id(&self) -> PlayerId {
        self.id
    }

    /// Enqueues without waiting. A full outbox drops the frame.
    pub fn try_deliver(&self, frame: Frame) -> Delivery {
        match self.outbox.try_send(frame) {
            Ok(()) => Delivery::Delivered,
            Err(TrySendError::Full(frame)) => {
                warn!(
                    "Outbox of {} full, dropping {}-byte message",
                    self.id,
                    frame.len()
                );
                Delivery::Dropped
            }
            Err(TrySendError::Closed(_)) => Delivery::Closed,
        }
    }
}
