use std::sync::Arc;
use std::time::Duration;

use tokio::sync::broadcast::error::RecvError;

use crate::api::RinsrClient;
use crate::auth::resolver::PermissionResolver;
use crate::cli::OutputFormat;
use crate::notify::reconciler::NotificationFeed;
use crate::realtime::channel::{ChannelUpdate, EventChannel};
use crate::realtime::transport::TcpLineTransport;
use crate::realtime::unread::UnreadTracker;

/// Long-running session: resolve the principal, connect the event channel,
/// join the hub, and keep the unread badge and durable feed current.
pub async fn handle(_output_format: OutputFormat) -> anyhow::Result<()> {
    let cfg = crate::config::config();

    let client = Arc::new(RinsrClient::from_config()?);
    let resolver = PermissionResolver::new(client.clone());
    resolver.refresh().await;
    let principal = resolver
        .principal()
        .ok_or_else(|| anyhow::anyhow!("not authenticated against the backend"))?;

    let tracker = Arc::new(UnreadTracker::new());
    let (transport, signals) = TcpLineTransport::spawn(
        cfg.realtime.events_addr.clone(),
        Duration::from_secs(cfg.realtime.reconnect_delay_secs),
    );
    let channel = EventChannel::spawn(
        transport,
        signals,
        tracker.clone(),
        cfg.realtime.hub_channel_prefix.clone(),
    );
    if let Some(hub_id) = principal.hub_id.clone() {
        channel.set_hub(hub_id).await;
    }

    let feed = NotificationFeed::new(client);
    let listed = feed.refresh().await;
    println!(
        "watching as {} ({}), {} unread listed",
        principal.name,
        principal.role.as_str(),
        listed
    );

    let mut updates = channel.subscribe();
    loop {
        match updates.recv().await {
            Ok(ChannelUpdate::Connection(up)) => {
                println!("[channel] {}", if up { "connected" } else { "disconnected" });
            }
            Ok(ChannelUpdate::Toast(toast)) => match &toast.order_id {
                Some(order_id) => println!("[toast] {} (order {})", toast.message, order_id),
                None => println!("[toast] {}", toast.message),
            },
            Ok(ChannelUpdate::Order(event)) => {
                // Push-driven invalidation: every live event re-fetches the
                // durable list.
                let listed = feed.refresh().await;
                println!(
                    "[badge] {} live / {} listed (view {})",
                    tracker.count(),
                    listed,
                    event.kind.listing_path()
                );
            }
            Err(RecvError::Lagged(n)) => {
                tracing::warn!("missed {n} channel updates");
            }
            Err(RecvError::Closed) => break,
        }
    }

    Ok(())
}
