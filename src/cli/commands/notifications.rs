use std::sync::Arc;

use clap::Subcommand;
use serde_json::json;

use crate::api::RinsrClient;
use crate::cli::OutputFormat;
use crate::notify::reconciler::NotificationFeed;

#[derive(Subcommand)]
pub enum NotificationCommands {
    #[command(about = "List unread dispatch/decline notifications, grouped by order")]
    List,

    #[command(about = "Mark a whole order group as read")]
    MarkRead {
        #[arg(help = "Correlated order id of the group")]
        order_id: String,
    },
}

pub async fn handle(cmd: NotificationCommands, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = Arc::new(RinsrClient::from_config()?);
    let feed = NotificationFeed::new(client);
    feed.refresh().await;

    match cmd {
        NotificationCommands::List => {
            let groups = feed.groups();
            match output_format {
                OutputFormat::Json => {
                    let out: Vec<_> = groups
                        .iter()
                        .map(|g| {
                            json!({
                                "orderId": g.order_id(),
                                "latest": g.latest,
                                "items": g.member_ids(),
                            })
                        })
                        .collect();
                    println!("{}", serde_json::to_string_pretty(&json!({
                        "unread": feed.unread_count(),
                        "groups": out,
                    }))?);
                }
                OutputFormat::Text => {
                    println!("{} unread in {} groups", feed.unread_count(), groups.len());
                    for group in &groups {
                        let label = group.order_id().unwrap_or("(no order)");
                        println!("  {}: {} item(s), latest {}", label, group.items.len(), group.latest);
                        for item in &group.items {
                            println!("      [{}] {}", item.id, item.title);
                        }
                    }
                }
            }
            Ok(())
        }
        NotificationCommands::MarkRead { order_id } => {
            let group = feed
                .groups()
                .into_iter()
                .find(|g| g.order_id() == Some(order_id.as_str()))
                .ok_or_else(|| anyhow::anyhow!("no unread group for order {order_id}"))?;

            let outcome = feed.mark_group_read(&group.member_ids()).await;
            match output_format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&json!({
                        "requested": outcome.requested,
                        "succeeded": outcome.succeeded,
                        "failed": outcome.failed,
                    }))?);
                }
                OutputFormat::Text => println!("{}", outcome.summary()),
            }
            Ok(())
        }
    }
}
