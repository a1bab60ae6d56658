//! # Duel Relay Server Library
//!
//! Pairs incoming WebSocket connections into two-seat rooms and relays
//! every message one occupant sends to the other. The relay never looks
//! inside payloads; it only adds two notifications of its own:
//! `{"type":"opponentConnected"}` when a room fills and
//! `{"type":"opponentDisconnected"}` when one occupant leaves.
//!
//! ## Architecture
//!
//! ### Registry
//! One [`registry::Registry`] per server holds every room in an append-only
//! arena. Assignment scans rooms in id order under the registry lock and
//! seats the player in the first free slot it finds, opening a new room
//! only when every existing room is full. Emptied rooms are reused.
//!
//! ### Rooms
//! A [`room::Room`] guards its two slots with its own lock. All room
//! operations are constant-time slot updates plus non-blocking enqueues,
//! so no lock is ever held across network I/O.
//!
//! ### Sessions
//! Each player runs two tasks (see [`session`]):
//! - **Receiver**: reads frames and relays them to the opponent's outbox
//! - **Sender**: drains the player's own outbox onto the connection
//!
//! Outboxes hold at most 256 frames. A frame that finds its target outbox
//! full is dropped, never waited on, so one slow client cannot stall the
//! other or its room.
//!
//! ### Disconnects
//! A failed read ends the receiver, which vacates the player's slot,
//! notifies the remaining occupant and closes the leaver's outbox. The
//! sender then flushes what is queued and closes the connection. The
//! opponent's own tasks keep running.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use server::network::Server;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = Server::bind("0.0.0.0:8080").await?;
//!     server.run().await;
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod frame;
pub mod network;
pub mod player;
pub mod registry;
pub mod room;
pub mod session;
