use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::net::TcpStream;
use tokio::sync::mpsc;

/// Client-to-server message, e.g. a hub join.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutboundMessage {
    pub event: String,
    pub payload: Value,
}

/// Server-to-client message. Payload shape is not strictly versioned.
#[derive(Debug, Clone, Deserialize)]
pub struct InboundMessage {
    pub event: String,
    #[serde(default)]
    pub payload: Value,
}

/// Everything the application observes about the connection. Reconnection
/// policy lives inside the transport; consumers only see these signals.
#[derive(Debug)]
pub enum TransportSignal {
    Connected,
    Disconnected { reason: Option<String> },
    Fault { message: String },
    Message(InboundMessage),
}

#[derive(Debug, Error)]
pub enum ChannelError {
    #[error("transport send failed: {0}")]
    Send(String),
    #[error("transport closed")]
    Closed,
}

/// Outbound half of a realtime connection. The inbound half is the
/// `TransportSignal` stream handed out at spawn time.
#[async_trait]
pub trait EventTransport: Send + Sync {
    async fn send(&self, message: OutboundMessage) -> Result<(), ChannelError>;
}

/// TCP transport speaking newline-delimited JSON frames.
///
/// Reconnects internally with a fixed delay; every (re)connect surfaces a
/// `Connected` signal so consumers can re-join their channels. Outbound
/// messages queue while disconnected and flush on the next live connection.
pub struct TcpLineTransport {
    outbound: mpsc::Sender<OutboundMessage>,
}

impl TcpLineTransport {
    pub fn spawn(
        addr: String,
        reconnect_delay: Duration,
    ) -> (Arc<Self>, mpsc::Receiver<TransportSignal>) {
        let (signal_tx, signal_rx) = mpsc::channel(64);
        let (outbound_tx, outbound_rx) = mpsc::channel(64);
        tokio::spawn(run_connection_loop(addr, reconnect_delay, signal_tx, outbound_rx));
        (Arc::new(Self { outbound: outbound_tx }), signal_rx)
    }
}

#[async_trait]
impl EventTransport for TcpLineTransport {
    async fn send(&self, message: OutboundMessage) -> Result<(), ChannelError> {
        self.outbound.send(message).await.map_err(|_| ChannelError::Closed)
    }
}

async fn run_connection_loop(
    addr: String,
    reconnect_delay: Duration,
    signals: mpsc::Sender<TransportSignal>,
    mut outbound: mpsc::Receiver<OutboundMessage>,
) {
    loop {
        match TcpStream::connect(&addr).await {
            Ok(stream) => {
                tracing::info!(%addr, "event channel connected");
                if signals.send(TransportSignal::Connected).await.is_err() {
                    return;
                }
                let reason = serve_connection(stream, &signals, &mut outbound).await;
                tracing::info!(%addr, ?reason, "event channel disconnected");
                if signals
                    .send(TransportSignal::Disconnected { reason })
                    .await
                    .is_err()
                {
                    return;
                }
            }
            Err(e) => {
                if signals
                    .send(TransportSignal::Fault { message: format!("connect {addr}: {e}") })
                    .await
                    .is_err()
                {
                    return;
                }
            }
        }
        tokio::time::sleep(reconnect_delay).await;
    }
}

/// Pump one live connection until it drops. Returns the disconnect reason.
async fn serve_connection(
    stream: TcpStream,
    signals: &mpsc::Sender<TransportSignal>,
    outbound: &mut mpsc::Receiver<OutboundMessage>,
) -> Option<String> {
    let (read_half, mut write_half) = stream.into_split();
    let mut lines = BufReader::new(read_half).lines();
    let mut outbound_open = true;

    loop {
        tokio::select! {
            line = lines.next_line() => match line {
                Ok(Some(line)) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    match serde_json::from_str::<InboundMessage>(&line) {
                        Ok(message) => {
                            if signals.send(TransportSignal::Message(message)).await.is_err() {
                                return None;
                            }
                        }
                        Err(e) => {
                            // Malformed frame: log and keep the connection.
                            tracing::warn!("unparseable event frame: {e}");
                        }
                    }
                }
                Ok(None) => return Some("connection closed by peer".to_string()),
                Err(e) => return Some(e.to_string()),
            },
            message = outbound.recv(), if outbound_open => match message {
                Some(message) => {
                    let mut frame = match serde_json::to_string(&message) {
                        Ok(frame) => frame,
                        Err(e) => {
                            tracing::warn!("unencodable outbound message: {e}");
                            continue;
                        }
                    };
                    frame.push('\n');
                    if let Err(e) = write_half.write_all(frame.as_bytes()).await {
                        return Some(format!("write failed: {e}"));
                    }
                }
                // All senders dropped; keep the read side alive.
                None => outbound_open = false,
            },
        }
    }
}
