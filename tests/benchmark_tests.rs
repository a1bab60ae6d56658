//! Performance benchmarks for the matchmaking and relay hot paths

use futures::channel::mpsc;
use futures::{SinkExt, StreamExt};
use server::error::RelayError;
use server::frame::Frame;
use server::registry::Registry;
use server::session::Session;
use std::time::{Duration, Instant};

/// Benchmarks room assignment with a steadily growing arena
#[tokio::test]
async fn benchmark_assignment() {
    let registry = Registry::new();
    let iterations = 2_000;
    let mut assignments = Vec::with_capacity(iterations);

    let start = Instant::now();
    for _ in 0..iterations {
        assignments.push(registry.assign().await);
    }
    let duration = start.elapsed();

    println!(
        "Assignment: {} players in {:?} ({:.2} μs/player)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert_eq!(registry.len().await, iterations / 2);
    // The scan is linear in full rooms; keep it well under a few seconds
    assert!(duration.as_secs() < 5);
}

/// Benchmarks assignment when every room is recycled
#[tokio::test]
async fn benchmark_assignment_with_churn() {
    let registry = Registry::new();
    let iterations = 5_000;

    let start = Instant::now();
    for _ in 0..iterations {
        let a = registry.assign().await;
        let b = registry.assign().await;
        a.room.leave(a.player).await;
        b.room.leave(b.player).await;
    }
    let duration = start.elapsed();

    println!(
        "Churn: {} pairings in {:?} ({:.2} μs/pairing)",
        iterations,
        duration,
        duration.as_micros() as f64 / iterations as f64
    );

    assert_eq!(registry.len().await, 1);
    assert!(duration.as_secs() < 5);
}

/// Benchmarks end-to-end relay through two sessions on in-memory channels
#[tokio::test]
async fn benchmark_relay_throughput() {
    let registry = Registry::new();

    let (mut a_in, a_stream) = mpsc::unbounded::<Result<Frame, RelayError>>();
    let (a_sink, _a_out) = mpsc::unbounded::<Frame>();
    let _a = Session::start(
        &registry,
        a_stream,
        a_sink.sink_map_err(|_| RelayError::Closed),
    )
    .await;

    let (_b_in, b_stream) = mpsc::unbounded::<Result<Frame, RelayError>>();
    let (b_sink, mut b_out) = mpsc::unbounded::<Frame>();
    let _b = Session::start(
        &registry,
        b_stream,
        b_sink.sink_map_err(|_| RelayError::Closed),
    )
    .await;

    // Pairing notice
    assert!(b_out.next().await.is_some());

    let messages = 50_000;
    let start = Instant::now();

    // Send in windows below outbox capacity so nothing is dropped
    let mut received = 0;
    for chunk in 0..(messages / 100) {
        for i in 0..100 {
            let text = format!("{}", chunk * 100 + i);
            a_in.send(Ok(Frame::Text(text))).await.unwrap();
        }
        for _ in 0..100 {
            let frame = tokio::time::timeout(Duration::from_secs(2), b_out.next())
                .await
                .unwrap();
            assert!(frame.is_some());
            received += 1;
        }
    }
    let duration = start.elapsed();

    println!(
        "Relay: {} messages in {:?} ({:.0} msg/s)",
        received,
        duration,
        received as f64 / duration.as_secs_f64()
    );

    assert_eq!(received, messages);
    assert!(duration.as_secs() < 10);
}
