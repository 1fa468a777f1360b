use std::collections::HashSet;
use std::sync::Arc;

use serde_json::json;
use tokio::sync::{broadcast, mpsc};

use crate::realtime::events::{decode_order_event, OrderEvent};
use crate::realtime::transport::{EventTransport, OutboundMessage, TransportSignal};
use crate::realtime::unread::UnreadTracker;

const JOIN_EVENT: &str = "join";

/// Transient, human-readable notification surfaced for every inbound order
/// event. `order_id` is the optional "view" target.
#[derive(Debug, Clone)]
pub struct Toast {
    pub message: String,
    pub order_id: Option<String>,
}

/// Fan-out to channel subscribers.
#[derive(Debug, Clone)]
pub enum ChannelUpdate {
    /// Connection came up (true) or went down (false).
    Connection(bool),
    Order(OrderEvent),
    Toast(Toast),
}

enum ChannelCommand {
    SetHub(String),
}

/// Consumes the transport's signal stream for the session.
///
/// Tracks the hub association and joins its channel on two independent
/// triggers (connection established, and hub becoming known while already
/// connected) because the relative order of connect and principal load is
/// unspecified. Joins are deduplicated per hub per connection; each join
/// sends both the bare hub id and the prefixed variant, since the backend's
/// channel naming convention has varied.
pub struct EventChannel {
    commands: mpsc::Sender<ChannelCommand>,
    updates: broadcast::Sender<ChannelUpdate>,
    tracker: Arc<UnreadTracker>,
}

impl EventChannel {
    pub fn spawn(
        transport: Arc<dyn EventTransport>,
        signals: mpsc::Receiver<TransportSignal>,
        tracker: Arc<UnreadTracker>,
        hub_prefix: String,
    ) -> Self {
        let (command_tx, command_rx) = mpsc::channel(16);
        let (update_tx, _) = broadcast::channel(128);
        tokio::spawn(run_consumer(
            transport,
            signals,
            command_rx,
            update_tx.clone(),
            tracker.clone(),
            hub_prefix,
        ));
        Self { commands: command_tx, updates: update_tx, tracker }
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ChannelUpdate> {
        self.updates.subscribe()
    }

    pub fn tracker(&self) -> Arc<UnreadTracker> {
        self.tracker.clone()
    }

    /// Second join trigger: the principal's hub association became known.
    pub async fn set_hub(&self, hub_id: String) {
        if self.commands.send(ChannelCommand::SetHub(hub_id)).await.is_err() {
            tracing::warn!("event channel consumer is gone, hub not set");
        }
    }
}

async fn run_consumer(
    transport: Arc<dyn EventTransport>,
    mut signals: mpsc::Receiver<TransportSignal>,
    mut commands: mpsc::Receiver<ChannelCommand>,
    updates: broadcast::Sender<ChannelUpdate>,
    tracker: Arc<UnreadTracker>,
    hub_prefix: String,
) {
    let mut connected = false;
    let mut hub: Option<String> = None;
    // Hubs already joined on the current connection. Cleared on disconnect
    // so a reconnect re-joins.
    let mut joined: HashSet<String> = HashSet::new();

    loop {
        tokio::select! {
            signal = signals.recv() => match signal {
                None => break,
                Some(TransportSignal::Connected) => {
                    connected = true;
                    joined.clear();
                    let _ = updates.send(ChannelUpdate::Connection(true));
                    if let Some(hub_id) = hub.clone() {
                        join_hub(transport.as_ref(), &mut joined, &hub_prefix, &hub_id).await;
                    }
                }
                Some(TransportSignal::Disconnected { reason }) => {
                    connected = false;
                    joined.clear();
                    tracing::info!(?reason, "event channel down, transport will retry");
                    let _ = updates.send(ChannelUpdate::Connection(false));
                }
                Some(TransportSignal::Fault { message }) => {
                    // Non-fatal: no live updates until the transport recovers.
                    tracing::warn!("event channel fault: {message}");
                }
                Some(TransportSignal::Message(message)) => {
                    let Some(event) = decode_order_event(&message) else {
                        tracing::debug!(event = %message.event, "ignoring untracked event");
                        continue;
                    };
                    if let Some(order_id) = &event.order_id {
                        tracker.on_event(order_id);
                    }
                    let _ = updates.send(ChannelUpdate::Toast(Toast {
                        message: event.message.clone(),
                        order_id: event.order_id.clone(),
                    }));
                    let _ = updates.send(ChannelUpdate::Order(event));
                }
            },
            command = commands.recv() => match command {
                None => break,
                Some(ChannelCommand::SetHub(hub_id)) => {
                    hub = Some(hub_id.clone());
                    if connected {
                        join_hub(transport.as_ref(), &mut joined, &hub_prefix, &hub_id).await;
                    }
                }
            },
        }
    }
}

async fn join_hub(
    transport: &dyn EventTransport,
    joined: &mut HashSet<String>,
    prefix: &str,
    hub_id: &str,
) {
    if !joined.insert(hub_id.to_string()) {
        tracing::debug!(hub_id, "already joined on this connection");
        return;
    }
    // Both historical namings of the hub channel.
    for channel in [hub_id.to_string(), format!("{}{}", prefix, hub_id)] {
        let message = OutboundMessage {
            event: JOIN_EVENT.to_string(),
            payload: json!({ "channel": &channel }),
        };
        if let Err(e) = transport.send(message).await {
            tracing::warn!(channel = %channel, "join send failed: {e}");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::RecordingTransport;
    use serde_json::json;
    use std::time::Duration;

    use crate::realtime::transport::InboundMessage;

    async fn settle() {
        tokio::time::sleep(Duration::from_millis(50)).await;
    }

    fn dispatched(order_id: &str) -> TransportSignal {
        TransportSignal::Message(InboundMessage {
            event: "vendor_order_dispatched".to_string(),
            payload: json!({ "vendorOrderId": order_id, "message": "order out" }),
        })
    }

    #[tokio::test]
    async fn joins_on_connect_when_hub_known_first() {
        let transport = Arc::new(RecordingTransport::new());
        let (signal_tx, signal_rx) = mpsc::channel(8);
        let tracker = Arc::new(UnreadTracker::new());
        let channel =
            EventChannel::spawn(transport.clone(), signal_rx, tracker, "hub_".to_string());

        channel.set_hub("h-7".to_string()).await;
        settle().await;
        assert!(transport.sent().is_empty());

        signal_tx.send(TransportSignal::Connected).await.unwrap();
        settle().await;

        let sent = transport.sent();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[0].payload["channel"], "h-7");
        assert_eq!(sent[1].payload["channel"], "hub_h-7");
    }

    #[tokio::test]
    async fn joins_when_hub_arrives_after_connect() {
        let transport = Arc::new(RecordingTransport::new());
        let (signal_tx, signal_rx) = mpsc::channel(8);
        let tracker = Arc::new(UnreadTracker::new());
        let channel =
            EventChannel::spawn(transport.clone(), signal_rx, tracker, "hub_".to_string());

        signal_tx.send(TransportSignal::Connected).await.unwrap();
        settle().await;
        assert!(transport.sent().is_empty());

        channel.set_hub("h-7".to_string()).await;
        settle().await;
        assert_eq!(transport.sent().len(), 2);
    }

    #[tokio::test]
    async fn joins_are_deduplicated_per_connection() {
        let transport = Arc::new(RecordingTransport::new());
        let (signal_tx, signal_rx) = mpsc::channel(8);
        let tracker = Arc::new(UnreadTracker::new());
        let channel =
            EventChannel::spawn(transport.clone(), signal_rx, tracker, "hub_".to_string());

        signal_tx.send(TransportSignal::Connected).await.unwrap();
        channel.set_hub("h-7".to_string()).await;
        channel.set_hub("h-7".to_string()).await;
        settle().await;
        assert_eq!(transport.sent().len(), 2);

        // Reconnect clears the dedup set and re-joins.
        signal_tx
            .send(TransportSignal::Disconnected { reason: None })
            .await
            .unwrap();
        signal_tx.send(TransportSignal::Connected).await.unwrap();
        settle().await;
        assert_eq!(transport.sent().len(), 4);
    }

    #[tokio::test]
    async fn duplicate_events_do_not_double_count() {
        let transport = Arc::new(RecordingTransport::new());
        let (signal_tx, signal_rx) = mpsc::channel(8);
        let tracker = Arc::new(UnreadTracker::new());
        let channel = EventChannel::spawn(
            transport.clone(),
            signal_rx,
            tracker.clone(),
            "hub_".to_string(),
        );
        let mut updates = channel.subscribe();

        signal_tx.send(dispatched("o-1")).await.unwrap();
        signal_tx.send(dispatched("o-1")).await.unwrap();
        signal_tx.send(dispatched("o-2")).await.unwrap();
        settle().await;

        assert_eq!(tracker.count(), 2);

        // Toast + Order per inbound event, duplicates included.
        let mut toasts = 0;
        let mut orders = 0;
        while let Ok(update) = updates.try_recv() {
            match update {
                ChannelUpdate::Toast(_) => toasts += 1,
                ChannelUpdate::Order(_) => orders += 1,
                ChannelUpdate::Connection(_) => {}
            }
        }
        assert_eq!(toasts, 3);
        assert_eq!(orders, 3);
    }
}
