use std::sync::Arc;

use serde_json::json;

use crate::api::RinsrClient;
use crate::auth::resolver::{AccessDecision, PermissionResolver};
use crate::cli::OutputFormat;

fn decision_label(decision: AccessDecision) -> &'static str {
    match decision {
        AccessDecision::Granted => "granted",
        AccessDecision::Denied => "denied",
        AccessDecision::Unauthenticated => "unauthenticated",
    }
}

pub async fn handle(paths: Vec<String>, output_format: OutputFormat) -> anyhow::Result<()> {
    let client = Arc::new(RinsrClient::from_config()?);
    let resolver = PermissionResolver::new(client);
    resolver.refresh().await;

    match output_format {
        OutputFormat::Json => {
            let checks: Vec<_> = paths
                .iter()
                .map(|path| {
                    json!({
                        "path": path,
                        "decision": decision_label(resolver.can_access(path)),
                    })
                })
                .collect();
            let principal = resolver.principal().map(|p| json!({
                "id": p.id,
                "role": p.role.as_str(),
            }));
            println!("{}", serde_json::to_string_pretty(&json!({
                "principal": principal,
                "checks": checks,
            }))?);
        }
        OutputFormat::Text => {
            match resolver.principal() {
                Some(p) => println!("principal: {} ({})", p.name, p.role.as_str()),
                None => println!("principal: none (not authenticated)"),
            }
            for path in &paths {
                println!("{:>16}  {}", decision_label(resolver.can_access(path)), path);
            }
        }
    }

    Ok(())
}
