pub mod commands;

use clap::{Parser, Subcommand};
use serde::{Deserialize, Serialize};

#[derive(Parser)]
#[command(name = "rinsr-console")]
#[command(about = "RINSR operations console core - page permissions and realtime vendor-order notifications")]
#[command(version)]
pub struct Cli {
    #[arg(long, global = true, help = "Output in human-readable text format")]
    pub text: bool,

    #[arg(long, global = true, help = "Output in JSON format")]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Check page access for the current principal")]
    Access {
        #[arg(required = true, help = "Page paths to check")]
        paths: Vec<String>,
    },

    #[command(about = "Unread vendor-order notifications")]
    Notifications {
        #[command(subcommand)]
        cmd: commands::notifications::NotificationCommands,
    },

    #[command(about = "Stream live dispatch/decline events and keep the unread badge current")]
    Watch,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

impl OutputFormat {
    pub fn from_cli(cli: &Cli) -> Self {
        if cli.json {
            OutputFormat::Json
        } else {
            OutputFormat::Text
        }
    }
}

pub async fn run(cli: Cli) -> anyhow::Result<()> {
    let output_format = OutputFormat::from_cli(&cli);

    match cli.command {
        Commands::Access { paths } => commands::access::handle(paths, output_format).await,
        Commands::Notifications { cmd } => commands::notifications::handle(cmd, output_format).await,
        Commands::Watch => commands::watch::handle(output_format).await,
    }
}
