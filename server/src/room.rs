//! Two-seat rooms.
//!
//! Every operation takes the room's lock for a constant-time slot update and
//! at most two non-blocking outbox enqueues. Nothing awaits while the lock is
//! held, so a slow client can never stall its opponent or the registry.

use log::{debug, error, info};
use shared::ControlMessage;
use std::fmt;
use tokio::sync::Mutex;

use crate::frame::Frame;
use crate::player::{Delivery, Player, PlayerId};

/// Stable handle of a room; doubles as its index in the registry arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RoomId(pub usize);

impl fmt::Display for RoomId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "room-{}", self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Slot {
    First,
    Second,
}

impl Slot {
    pub const ALL: [Slot; 2] = [Slot::First, Slot::Second];

    pub fn index(self) -> usize {
        match self {
            Slot::First => 0,
            Slot::Second => 1,
        }
    }

    pub fn other(self) -> Slot {
        match self {
            Slot::First => Slot::Second,
            Slot::Second => Slot::First,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoomState {
    Empty,
    Waiting,
    Paired,
}

/// Where a newly seated player landed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Seated {
    pub slot: Slot,
    /// The seat filled the room and both occupants were notified.
    pub paired: bool,
}

/// Outcome of a player leaving a room.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Departure {
    /// Slot the player held, `None` if they were not seated here.
    pub slot: Option<Slot>,
    pub remaining: Option<PlayerId>,
    /// What happened to the `opponentDisconnected` notice.
    pub notice: Delivery,
}

type Slots = [Option<Player>; 2];

fn slot_of(slots: &Slots, id: PlayerId) -> Option<Slot> {
    Slot::ALL.into_iter().find(|slot| {
        slots[slot.index()]
            .as_ref()
            .is_some_and(|player| player.id() == id)
    })
}

fn state_of(slots: &Slots) -> RoomState {
    match slots.iter().filter(|slot| slot.is_some()).count() {
        0 => RoomState::Empty,
        1 => RoomState::Waiting,
        _ => RoomState::Paired,
    }
}

fn notify(player: &Player, message: ControlMessage) -> Delivery {
    match Frame::control(message) {
        Ok(frame) => player.try_deliver(frame),
        Err(e) => {
            error!("Failed to build {:?} for {}: {}", message, player.id(), e);
            Delivery::Dropped
        }
    }
}

#[derive(Debug)]
pub struct Room {
    id: RoomId,
    slots: Mutex<Slots>,
}

impl Room {
    pub fn new(id: RoomId) -> Self {
        Self {
            id,
            slots: Mutex::new([None, None]),
        }
    }

    /// A room whose first slot is already taken by its creator.
    pub(crate) fn opened_by(id: RoomId, creator: Player) -> Self {
        Self {
            id,
            slots: Mutex::new([Some(creator), None]),
        }
    }

    pub fn id(&self) -> RoomId {
        self.id
    }

    pub async fn occupant(&self, slot: Slot) -> Option<PlayerId> {
        let slots = self.slots.lock().await;
        slots[slot.index()].as_ref().map(Player::id)
    }

    pub async fn opponent_of(&self, id: PlayerId) -> Option<PlayerId> {
        let slots = self.slots.lock().await;
        let slot = slot_of(&slots, id)?;
        slots[slot.other().index()].as_ref().map(Player::id)
    }

    pub async fn state(&self) -> RoomState {
        state_of(&*self.slots.lock().await)
    }

    /// Clears whichever slot holds `id` and returns the remaining occupant.
    pub async fn vacate(&self, id: PlayerId) -> Option<PlayerId> {
        let mut slots = self.slots.lock().await;
        if let Some(slot) = slot_of(&slots, id) {
            slots[slot.index()] = None;
        }
        slots.iter().flatten().map(Player::id).next()
    }

    /// Vacates `id` and tells the remaining occupant, if any, that their
    /// opponent is gone. The notice is sent only if `id` was actually seated,
    /// so calling this twice for the same player notifies once.
    pub async fn leave(&self, id: PlayerId) -> Departure {
        let mut slots = self.slots.lock().await;

        let Some(slot) = slot_of(&slots, id) else {
            return Departure {
                slot: None,
                remaining: slots.iter().flatten().map(Player::id).next(),
                notice: Delivery::NoRecipient,
            };
        };

        // Dropping the player closes its outbox.
        slots[slot.index()] = None;

        let (remaining, notice) = match &slots[slot.other().index()] {
            Some(opponent) => (
                Some(opponent.id()),
                notify(opponent, ControlMessage::OpponentDisconnected),
            ),
            None => (None, Delivery::NoRecipient),
        };

        info!(
            "{} left {} ({:?}), now {:?}",
            id,
            self.id,
            slot,
            state_of(&slots)
        );

        Departure {
            slot: Some(slot),
            remaining,
            notice,
        }
    }

    /// Forwards `frame` from `from` to the other occupant's outbox.
    pub async fn relay(&self, from: PlayerId, frame: Frame) -> Delivery {
        let slots = self.slots.lock().await;

        let Some(slot) = slot_of(&slots, from) else {
            return Delivery::NoRecipient;
        };

        match &slots[slot.other().index()] {
            Some(opponent) => {
                let delivery = opponent.try_deliver(frame);
                if delivery == Delivery::Closed {
                    debug!("{} relayed to {} after its sender stopped", from, opponent.id());
                }
                delivery
            }
            None => Delivery::NoRecipient,
        }
    }

    /// Seats `player` in the lowest free slot. When that fills the room,
    /// both occupants get `opponentConnected` before the lock is released.
    ///
    /// Hands the player back if both slots are taken.
    pub(crate) async fn try_seat(&self, player: Player) -> Result<Seated, Player> {
        let mut slots = self.slots.lock().await;

        let Some(slot) = Slot::ALL
            .into_iter()
            .find(|slot| slots[slot.index()].is_none())
        else {
            return Err(player);
        };

        slots[slot.index()] = Some(player);

        let paired = state_of(&slots) == RoomState::Paired;
        if paired {
            for occupant in slots.iter().flatten() {
                notify(occupant, ControlMessage::OpponentConnected);
            }
        }

        Ok(Seated { slot, paired })
    }
}
