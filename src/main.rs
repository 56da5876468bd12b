//! ACIP Security CLI.
//!
//! Runs the screening plugin standalone: either executes one administrative
//! command, or reads messages line by line from stdin and prints a JSON
//! analysis result per line.

use acip_security::commands::Caller;
use acip_security::store::JsonFileStore;
use acip_security::{AcipSecurityPlugin, IncomingMessage, PluginOptions};
use anyhow::Result;
use clap::Parser;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

/// ACIP prompt-injection screening for chat platforms
///
/// Scores message text against the ACIP pattern catalog and blocks at the
/// configured threshold. Without --command, messages are read from stdin.
#[derive(Parser, Debug)]
#[command(name = "acip-security")]
#[command(version, about, long_about = None)]
struct Args {
    /// Start with protection enabled
    #[arg(long, env = "ACIP_ENABLED", default_value = "true")]
    enabled: bool,

    /// Reply language tag
    #[arg(long, env = "ACIP_LANGUAGE", default_value = "fr")]
    language: String,

    /// Risk score at which messages are auto-blocked (inclusive)
    #[arg(long, env = "ACIP_THRESHOLD", default_value = "3")]
    threshold: u8,

    /// Persist settings changes to this JSON file
    #[arg(long, env = "ACIP_SETTINGS_FILE")]
    settings_file: Option<String>,

    /// Execute a single admin command (e.g. "!acip-status") and exit
    #[arg(long)]
    command: Option<String>,

    /// Role to execute the command as
    #[arg(long, default_value = "User")]
    role: String,

    /// Enable verbose debug logging
    #[arg(long, short, env = "VERBOSE", default_value = "false")]
    verbose: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let filter = if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };
    fmt().with_env_filter(filter).with_target(false).init();

    let options = PluginOptions {
        enabled: Some(args.enabled),
        language: Some(args.language),
        auto_block_threshold: Some(args.threshold),
        ..Default::default()
    };

    let mut plugin = AcipSecurityPlugin::new(options);
    if let Some(path) = &args.settings_file {
        plugin = plugin.with_store(Box::new(JsonFileStore::new(path)));
    }
    plugin.initialize().await;

    if let Some(command) = args.command {
        let reply = plugin
            .execute_command(&command, &Caller::with_role(args.role))
            .await;
        println!("{}", reply.content);
        return Ok(());
    }

    info!("Reading messages from stdin, one per line");
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        let message = IncomingMessage {
            content: Some(line),
            user: None,
        };
        let result = plugin.analyze(&message).await;
        println!("{}", serde_json::to_string(&result)?);
    }

    Ok(())
}
