//! A headless stand-in for the browser game: waits to be paired, then plays
//! a scripted match by sending the same kinds of messages the real client
//! does, while counting what the opponent sends back.

use log::{info, warn};
use rand::Rng;
use shared::{ControlMessage, Direction, GameMessage, Outcome, ServerEvent};
use std::time::Duration;
use tokio::time::interval;

use crate::error::ClientError;
use crate::network::{Client, Incoming};

pub const STARTING_LIVES: u32 = 3;

#[derive(Debug, Clone)]
pub struct BotConfig {
    /// Game messages to send before declaring the match over.
    pub messages: usize,
    pub interval: Duration,
}

impl Default for BotConfig {
    fn default() -> Self {
        Self {
            messages: 100,
            interval: Duration::from_millis(16),
        }
    }
}

#[derive(Debug, Default, Clone, PartialEq)]
pub struct BotReport {
    pub sent: usize,
    pub received: usize,
    pub opponent_left: bool,
    pub opponent_outcome: Option<Outcome>,
}

/// Picks the next message the way a player would generate them: mostly
/// paddle movement, occasionally a brick or a lost life.
pub fn next_message<R: Rng>(rng: &mut R, lives: &mut u32) -> GameMessage {
    match rng.gen_range(0..20) {
        0 if *lives > 1 => {
            *lives -= 1;
            GameMessage::LivesUpdate { lives: *lives }
        }
        1..=3 => GameMessage::BrickDestroyed {
            x: (rng.gen_range(0..8) * 60 + 20) as f32,
            y: (rng.gen_range(0..5) * 25 + 30) as f32,
        },
        _ => GameMessage::PaddleInput {
            direction: if rng.gen_bool(0.5) {
                Direction::Left
            } else {
                Direction::Right
            },
        },
    }
}

fn record(report: &mut BotReport, incoming: Incoming) {
    match incoming {
        Incoming::Event(ServerEvent::Control(ControlMessage::OpponentDisconnected)) => {
            report.opponent_left = true;
        }
        Incoming::Event(ServerEvent::Control(ControlMessage::OpponentConnected)) => {}
        Incoming::Event(ServerEvent::Game(GameMessage::GameOver { state })) => {
            report.opponent_outcome = Some(state);
            report.received += 1;
        }
        _ => report.received += 1,
    }
}

pub async fn play(client: &mut Client, config: &BotConfig) -> Result<BotReport, ClientError> {
    info!("Waiting for an opponent...");
    client.wait_for(ControlMessage::OpponentConnected).await?;
    info!("Opponent connected, starting match");

    let mut report = BotReport::default();
    let mut lives = STARTING_LIVES;
    let mut rng = rand::thread_rng();
    let mut ticker = interval(config.interval);

    while report.sent < config.messages && !report.opponent_left {
        tokio::select! {
            incoming = client.next() => {
                match incoming? {
                    Some(incoming) => record(&mut report, incoming),
                    None => return Err(ClientError::Closed),
                }
            }
            _ = ticker.tick() => {
                let message = next_message(&mut rng, &mut lives);
                client.send_game(&message).await?;
                report.sent += 1;
            }
        }
    }

    if report.opponent_left {
        warn!("Opponent left after {} messages", report.sent);
        return Ok(report);
    }

    client
        .send_game(&GameMessage::GameOver {
            state: Outcome::Win,
        })
        .await?;
    report.sent += 1;

    Ok(report)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_next_message_never_runs_out_of_lives() {
        let mut rng = StdRng::seed_from_u64(7);
        let mut lives = STARTING_LIVES;

        for _ in 0..1_000 {
            if let GameMessage::LivesUpdate { lives: reported } = next_message(&mut rng, &mut lives) {
                assert_eq!(reported, lives);
            }
        }

        assert_eq!(lives, 1);
    }

    #[test]
    fn test_brick_positions_match_grid() {
        let mut rng = StdRng::seed_from_u64(42);
        let mut lives = STARTING_LIVES;

        for _ in 0..500 {
            if let GameMessage::BrickDestroyed { x, y } = next_message(&mut rng, &mut lives) {
                assert_eq!((x as u32 - 20) % 60, 0);
                assert_eq!((y as u32 - 30) % 25, 0);
            }
        }
    }

    #[test]
    fn test_record_tracks_opponent() {
        let mut report = BotReport::default();
        record(
            &mut report,
            Incoming::Event(ServerEvent::Game(GameMessage::GameOver {
                state: Outcome::GameOver,
            })),
        );
        record(&mut report, Incoming::Binary(vec![1, 2]));
        record(
            &mut report,
            Incoming::Event(ServerEvent::Control(ControlMessage::OpponentDisconnected)),
        );

        assert_eq!(report.received, 2);
        assert_eq!(report.opponent_outcome, Some(Outcome::GameOver));
        assert!(report.opponent_left);
    }
}
