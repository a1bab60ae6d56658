//! # Relay Client Library
//!
//! Headless client for the duel relay. It speaks the same protocol as the
//! browser game: connect to the `/ws` endpoint, wait for
//! `{"type":"opponentConnected"}`, then exchange game messages that the relay
//! passes through untouched.
//!
//! ## Module Organization
//!
//! ### Network Module (`network`)
//! The WebSocket connection: sending game messages, text or binary frames,
//! and classifying what the relay sends back into control notifications,
//! game messages, or unknown payloads.
//!
//! ### Bot Module (`bot`)
//! A scripted player used for smoke and load testing. It waits to be paired,
//! sends a stream of paddle moves, brick hits and life updates, and reports
//! what it sent and received.
//!
//! ## Usage Example
//!
//! ```rust,no_run
//! use client::bot::{play, BotConfig};
//! use client::network::Client;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let mut client = Client::connect("ws://127.0.0.1:8080/ws").await?;
//!     let report = play(&mut client, &BotConfig::default()).await?;
//!     println!("sent {} received {}", report.sent, report.received);
//!     Ok(())
//! }
//! ```

pub mod bot;
pub mod error;
pub mod network;
