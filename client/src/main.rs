use clap::Parser;
use client::bot::{play, BotConfig};
use client::network::Client;
use log::info;
use std::time::Duration;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Relay WebSocket URL to connect to
    #[arg(short = 's', long, default_value = "ws://127.0.0.1:8080/ws")]
    server: String,

    /// Number of game messages to send once paired
    #[arg(short = 'm', long, default_value = "100")]
    messages: usize,

    /// Delay between messages in milliseconds
    #[arg(short = 'i', long, default_value = "16")]
    interval_ms: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    if std::env::var("RUST_LOG").is_err() {
        eprintln!("Set RUST_LOG=info for detailed logging");
    }

    let args = Args::parse();

    let config = BotConfig {
        messages: args.messages,
        interval: Duration::from_millis(args.interval_ms.max(1)),
    };

    let mut client = Client::connect(&args.server).await?;
    let report = play(&mut client, &config).await?;

    info!(
        "Match finished: sent {}, received {}, opponent left: {}",
        report.sent, report.received, report.opponent_left
    );
    if let Some(outcome) = report.opponent_outcome {
        info!("Opponent reported {:?}", outcome);
    }

    client.close().await?;

    Ok(())
}
