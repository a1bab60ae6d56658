//! Room registry and matchmaking.
//!
//! Rooms live in an append-only arena indexed by [`RoomId`]. Assignment holds
//! the registry lock for the whole scan-and-maybe-create so two connections
//! can never both open a fresh room while an older one has a free seat.
//!
//! A room that has emptied stays in the arena and is handed out again by
//! the scan, starting from slot 0, so the arena only grows when every
//! existing room is full.

use log::info;
use shared::OUTBOX_CAPACITY;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::player::{Outbox, Player, PlayerId, PlayerIds};
use crate::room::{Room, RoomId, RoomState, Slot};

/// Result of placing a new player.
#[derive(Debug)]
pub struct Assignment {
    pub room: Arc<Room>,
    pub slot: Slot,
    pub player: PlayerId,
    /// Queue the player's sender loop drains.
    pub outbox: Outbox,
    /// This assignment filled the room.
    pub paired: bool,
}

#[derive(Debug)]
pub struct Registry {
    rooms: Mutex<Vec<Arc<Room>>>,
    player_ids: PlayerIds,
    outbox_capacity: usize,
}

impl Registry {
    pub fn new() -> Self {
        Self::with_outbox_capacity(OUTBOX_CAPACITY)
    }

    pub fn with_outbox_capacity(outbox_capacity: usize) -> Self {
        Self {
            rooms: Mutex::new(Vec::new()),
            player_ids: PlayerIds::new(),
            outbox_capacity,
        }
    }

    /// Places a new player in the first room (by id) with a free seat, or
    /// opens a new room if all are full. Always succeeds.
    pub async fn assign(&self) -> Assignment {
        let id = self.player_ids.mint();
        let (mut player, outbox) = Player::new(id, self.outbox_capacity);

        let mut rooms = self.rooms.lock().await;

        for room in rooms.iter() {
            match room.try_seat(player).await {
                Ok(seated) => {
                    info!("{} joined {} in {:?}", id, room.id(), seated.slot);
                    if seated.paired {
                        info!("{} is paired", room.id());
                    }
                    return Assignment {
                        room: Arc::clone(room),
                        slot: seated.slot,
                        player: id,
                        outbox,
                        paired: seated.paired,
                    };
                }
                Err(rejected) => player = rejected,
            }
        }

        let room = Arc::new(Room::opened_by(RoomId(rooms.len() + 1), player));
        rooms.push(Arc::clone(&room));

        info!("{} opened {}", id, room.id());

        Assignment {
            room,
            slot: Slot::First,
            player: id,
            outbox,
            paired: false,
        }
    }

    pub async fn room(&self, id: RoomId) -> Option<Arc<Room>> {
        let rooms = self.rooms.lock().await;
        id.0.checked_sub(1)
            .and_then(|index| rooms.get(index))
            .cloned()
    }

    /// Number of rooms ever opened.
    pub async fn len(&self) -> usize {
        self.rooms.lock().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rooms.lock().await.is_empty()
    }

    /// Snapshot of every room's state in scan order.
    pub async fn states(&self) -> Vec<(RoomId, RoomState)> {
        let rooms: Vec<Arc<Room>> = self.rooms.lock().await.clone();
        let mut states = Vec::with_capacity(rooms.len());
        for room in rooms {
            states.push((room.id(), room.state().await));
        }
        states
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::new()
    }
}
