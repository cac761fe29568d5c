use clap::{Parser, Subcommand};
use std::io::{stdout, Write};

use crate::api::types::LatestResponse;
use crate::collector::{apply_events, extract_events, FeedSource, HttpFeedSource};
use crate::config::AppConfig;
use crate::domain::FeedKind;
use crate::error::Result;
use crate::prediction::predict;
use crate::services::FeedTracker;

#[derive(Parser)]
#[command(name = "taixiu-tracker")]
#[command(version = "0.1.0")]
#[command(about = "Live dice-round feed tracker with next-round prediction", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Config directory
    #[arg(short, long, default_value = "config")]
    pub config: String,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Poll both feeds and serve the read API (default)
    Serve {
        /// Listen port (overrides config and PORT)
        #[arg(short, long)]
        port: Option<u16>,
        /// Bind address
        #[arg(long)]
        host: Option<String>,
    },
    /// Fetch one feed once and print what the pipeline extracts
    Probe {
        /// Feed to probe
        #[arg(short, long, value_enum, default_value = "standard")]
        feed: FeedKind,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Serve {
            port: None,
            host: None,
        }
    }
}

/// Fetch one envelope, print its events and the resulting read-surface view
pub async fn probe_feed(config: &AppConfig, kind: FeedKind) -> Result<()> {
    let source = HttpFeedSource::new(&config.upstream, kind)?;
    println!(
        "Probing {} feed (gid={}) at {}\n",
        kind,
        source.gid(),
        config.upstream.base_url
    );

    print!("  Fetching... ");
    stdout().flush()?;

    let records = match source.fetch().await.and_then(|e| e.into_records()) {
        Ok(records) => {
            println!("\x1b[32mOK\x1b[0m ({} records)", records.len());
            records
        }
        Err(e) => {
            println!("\x1b[31mFAILED\x1b[0m");
            println!("    Error: {}", e);
            return Ok(());
        }
    };

    let events = extract_events(kind, &records);
    println!("\n  Events:");
    if events.is_empty() {
        println!("    (none)");
    }
    for event in &events {
        println!("    {:?}", event);
    }

    // Replay the cycle against a scratch tracker
    let tracker = FeedTracker::with_capacity(kind, config.history.max_len);
    let accepted = apply_events(&tracker, &events).await;
    let snapshot = tracker.snapshot().await;
    let prediction = predict(&snapshot.outcomes());
    let view = LatestResponse::new(snapshot.latest.as_ref(), &prediction);

    println!("\n  Accepted rounds: {}", accepted);
    println!("  Latest view:");
    println!("{}", serde_json::to_string_pretty(&view)?);
    println!();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_command_is_serve() {
        let cli = Cli::parse_from(["taixiu-tracker"]);
        assert_eq!(cli.command.unwrap_or_default(), Commands::default());
        assert_eq!(cli.config, "config");
    }

    #[test]
    fn test_parse_probe() {
        let cli = Cli::parse_from(["taixiu-tracker", "probe", "--feed", "md5"]);
        assert_eq!(cli.command, Some(Commands::Probe { feed: FeedKind::Md5 }));
    }

    #[test]
    fn test_parse_serve_port() {
        let cli = Cli::parse_from(["taixiu-tracker", "serve", "--port", "9000"]);
        assert_eq!(
            cli.command,
            Some(Commands::Serve {
                port: Some(9000),
                host: None
            })
        );
    }
}
