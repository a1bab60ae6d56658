//! Per-player relay loops.
//!
//! Each connected player runs two tasks:
//! - **Receiver**: reads frames from the connection and relays each to the
//!   opponent's outbox. When the connection fails it leaves the room, which
//!   notifies the opponent and closes this player's outbox.
//! - **Sender**: drains the player's outbox onto the connection until the
//!   outbox closes or a write fails, then closes the connection. A failed
//!   write also stops the receiver, so the player leaves the room either way.
//!
//! The loops are generic over [`Stream`] and [`Sink`] so they run the same
//! on a WebSocket and on in-memory channels.

use futures::{Sink, SinkExt, Stream, StreamExt};
use log::{debug, info, warn};
use std::sync::Arc;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

use crate::error::RelayError;
use crate::frame::Frame;
use crate::player::{Outbox, PlayerId};
use crate::registry::Registry;
use crate::room::{Departure, Room, RoomId, Slot};

/// Relays inbound frames until the connection ends or `stop` fires, then
/// cleans up once.
pub async fn run_receiver<S>(
    room: Arc<Room>,
    player: PlayerId,
    mut stream: S,
    mut stop: oneshot::Receiver<()>,
) -> Departure
where
    S: Stream<Item = Result<Frame, RelayError>> + Unpin,
{
    loop {
        tokio::select! {
            next = stream.next() => match next {
                Some(Ok(frame)) => {
                    room.relay(player, frame).await;
                }
                Some(Err(RelayError::Closed)) | None => {
                    debug!("{} closed its connection", player);
                    break;
                }
                Some(Err(e)) => {
                    warn!("Read error from {}: {}", player, e);
                    break;
                }
            },
            // Fired on write failure, or dropped if the sender is gone.
            _ = &mut stop => {
                debug!("{} can no longer be written to", player);
                break;
            }
        }
    }

    drop(stream);
    room.leave(player).await
}

/// Writes queued frames to the connection. Returns the number written.
/// On a write error `stop` is fired before the connection is closed.
pub async fn run_sender<K>(
    player: PlayerId,
    mut outbox: Outbox,
    mut sink: K,
    stop: oneshot::Sender<()>,
) -> usize
where
    K: Sink<Frame, Error = RelayError> + Unpin,
{
    let mut written = 0;
    let mut failed = false;

    while let Some(frame) = outbox.recv().await {
        if let Err(e) = sink.send(frame).await {
            warn!("Write error to {}: {}", player, e);
            failed = true;
            break;
        }
        written += 1;
    }

    if failed {
        // Receiver may already be gone.
        let _ = stop.send(());
    }

    // Already-closed connections fail here too; nothing left to do.
    if let Err(e) = sink.close().await {
        debug!("Closing connection of {}: {}", player, e);
    }

    written
}

/// A running player: where it sits and the handles of its two loops.
#[derive(Debug)]
pub struct Session {
    pub player: PlayerId,
    pub room: RoomId,
    pub slot: Slot,
    pub receiver: JoinHandle<Departure>,
    pub sender: JoinHandle<usize>,
}

impl Session {
    /// Seats a new player and spawns its relay loops on the runtime.
    pub async fn start<S, K>(registry: &Registry, stream: S, sink: K) -> Session
    where
        S: Stream<Item = Result<Frame, RelayError>> + Unpin + Send + 'static,
        K: Sink<Frame, Error = RelayError> + Unpin + Send + 'static,
    {
        let assignment = registry.assign().await;
        let player = assignment.player;
        let room = assignment.room;

        info!(
            "Starting session for {} in {} ({:?})",
            player,
            room.id(),
            assignment.slot
        );

        let (stop, stopped) = oneshot::channel();
        let sender = tokio::spawn(run_sender(player, assignment.outbox, sink, stop));
        let receiver = tokio::spawn(run_receiver(Arc::clone(&room), player, stream, stopped));

        Session {
            player,
            room: room.id(),
            slot: assignment.slot,
            receiver,
            sender,
        }
    }
}
