//! Bidirectional live relay between a caller and an upstream session.
//!
//! One drain task forwards upstream events to the caller while the calling
//! task forwards the caller's messages upstream. When the caller's inbound
//! stream ends, the drain task is aborted and awaited before [`relay`]
//! returns, so no task outlives the session.
//!
//! No route serves a live session yet; the relay is only driven by its tests.
#![cfg_attr(not(test), allow(dead_code))]

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

/// Message counts of a finished relay.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub(crate) struct RelaySummary {
    /// Caller messages forwarded upstream.
    pub(crate) sent_upstream: usize,
    /// Upstream events forwarded to the caller before the drain stopped.
    pub(crate) delivered: usize,
}

fn spawn_drain<E: Send + 'static>(
    mut upstream_events: mpsc::Receiver<E>,
    caller: mpsc::Sender<E>,
) -> JoinHandle<usize> {
    tokio::spawn(async move {
        let mut delivered = 0;
        while let Some(event) = upstream_events.recv().await {
            if caller.send(event).await.is_err() {
                break;
            }
            delivered += 1;
        }
        delivered
    })
}

/// Relays until `inbound` ends, then tears the drain task down.
pub(crate) async fn relay<M, E>(
    mut inbound: mpsc::Receiver<M>,
    upstream: mpsc::Sender<M>,
    upstream_events: mpsc::Receiver<E>,
    caller: mpsc::Sender<E>,
) -> RelaySummary
where
    M: Send + 'static,
    E: Send + 'static,
{
    let drain = spawn_drain(upstream_events, caller);

    let mut sent_upstream = 0;
    while let Some(message) = inbound.recv().await {
        if upstream.send(message).await.is_err() {
            break;
        }
        sent_upstream += 1;
    }

    drain.abort();
    // A cancelled drain reports nothing; a finished one reports its count.
    let delivered = drain.await.unwrap_or_default();
    debug!(sent_upstream, delivered, "relay closed");
    RelaySummary {
        sent_upstream,
        delivered,
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use tokio::sync::mpsc;

    use super::*;

    #[tokio::test]
    async fn test_messages_flow_both_ways_until_inbound_ends() {
        // Arrange
        let (caller_tx, inbound) = mpsc::channel::<&str>(8);
        let (upstream, mut upstream_rx) = mpsc::channel::<&str>(8);
        let (upstream_events_tx, upstream_events) = mpsc::channel::<u32>(8);
        let (caller_events, mut caller_rx) = mpsc::channel::<u32>(8);

        upstream_events_tx.send(1).await.unwrap();
        upstream_events_tx.send(2).await.unwrap();
        caller_tx.send("hello").await.unwrap();

        // Act
        let session = tokio::spawn(relay(inbound, upstream, upstream_events, caller_events));
        assert_eq!(caller_rx.recv().await, Some(1));
        assert_eq!(caller_rx.recv().await, Some(2));
        drop(caller_tx);
        let summary = session.await.unwrap();

        // Assert
        assert_eq!(upstream_rx.recv().await, Some("hello"));
        assert_eq!(summary.sent_upstream, 1);
        // The aborted drain dropped its receiver.
        assert!(upstream_events_tx.is_closed());
    }

    #[tokio::test]
    async fn test_relay_returns_even_when_upstream_never_closes() {
        // Arrange
        let (caller_tx, inbound) = mpsc::channel::<u8>(1);
        let (upstream, _upstream_rx) = mpsc::channel::<u8>(1);
        let (_upstream_events_tx, upstream_events) = mpsc::channel::<u8>(1);
        let (caller_events, _caller_rx) = mpsc::channel::<u8>(1);
        drop(caller_tx);

        // Act
        let summary = tokio::time::timeout(
            Duration::from_secs(1),
            relay(inbound, upstream, upstream_events, caller_events),
        )
        .await;

        // Assert
        assert_eq!(summary.unwrap(), RelaySummary::default());
    }
}
