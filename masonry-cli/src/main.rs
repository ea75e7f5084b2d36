//! masonry - lay out images into columns from the command line.
//!
//! Resolves every image, places it, and prints the sized columns as JSON.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use masonry_kernel::{Brick, Masonry, MasonryConfig, MasonryEvent, Strategy};
use masonry_resolver::SchemeRouter;
use tokio::sync::broadcast;
use tokio::sync::broadcast::error::TryRecvError;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "masonry", about = "Place images into masonry columns")]
struct Args {
    /// Image paths or URIs, in display order
    #[arg(required = true)]
    paths: Vec<String>,

    /// Number of columns
    #[arg(long)]
    columns: Option<usize>,

    /// Gutter as a percentage of the width
    #[arg(long)]
    spacing: Option<f32>,

    /// Place each image in the shortest column instead of round-robin
    #[arg(long)]
    balance: bool,

    /// Keep columns ordered by input position
    #[arg(long)]
    sorted: bool,

    /// Width of the container
    #[arg(long, default_value_t = 1000.0)]
    width: f32,

    /// Config file (defaults to <config dir>/masonry/config.json)
    #[arg(long)]
    config: Option<PathBuf>,
}

impl Args {
    /// File config, then command line overrides.
    fn resolve_config(&self) -> Result<MasonryConfig> {
        let mut config = match &self.config {
            Some(path) => load(path)?,
            None => match default_config_path() {
                Some(path) if path.is_file() => load(&path)?,
                _ => MasonryConfig::default(),
            },
        };

        if let Some(columns) = self.columns {
            config.columns = columns;
        }
        if let Some(spacing) = self.spacing {
            config.spacing = spacing;
        }
        if self.balance {
            config.priority = Strategy::Balance;
        }
        if self.sorted {
            config.sorted = true;
        }
        Ok(config)
    }
}

fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("masonry").join("config.json"))
}

fn load(path: &Path) -> Result<MasonryConfig> {
    tracing::debug!("loading config from {}", path.display());
    MasonryConfig::load(path).with_context(|| format!("Failed to load config {}", path.display()))
}

/// Log every queued event. Returns how many were warnings.
fn log_events(rx: &mut broadcast::Receiver<MasonryEvent>) -> usize {
    let mut warnings = 0;
    loop {
        match rx.try_recv() {
            Ok(MasonryEvent::Warning(warning)) => {
                tracing::warn!("{}", warning);
                warnings += 1;
            }
            Ok(MasonryEvent::EndReached { resolved }) => {
                tracing::info!("placed {} images", resolved)
            }
            Ok(other) => tracing::debug!("{:?}", other),
            Err(TryRecvError::Lagged(skipped)) => {
                tracing::warn!("event log fell behind, {} events dropped", skipped)
            }
            Err(TryRecvError::Empty | TryRecvError::Closed) => return warnings,
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = args.resolve_config()?;

    let mut masonry = Masonry::builder(Arc::new(SchemeRouter::with_builtins()))
        .config(config)
        .size(args.width, 0.0)
        .build()
        .context("Invalid configuration")?;
    let mut events = masonry.subscribe();

    let bricks = args.paths.iter().map(Brick::new).collect();
    masonry.set_bricks(bricks)?;
    log_events(&mut events);
    while masonry.step().await? {
        log_events(&mut events);
    }

    let views = masonry.column_views()?;
    println!("{}", serde_json::to_string_pretty(&views)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use masonry_kernel::Warning;

    fn missing(uri: &str) -> MasonryEvent {
        MasonryEvent::Warning(Warning::ResolutionFailed {
            uri: uri.to_string(),
            index: 0,
            reason: "not found".to_string(),
        })
    }

    #[test]
    fn test_log_events_counts_warnings() {
        let (tx, mut rx) = broadcast::channel(16);
        tx.send(MasonryEvent::EndReached { resolved: 1 }).unwrap();
        tx.send(missing("a.png")).unwrap();
        assert_eq!(log_events(&mut rx), 1);
        assert_eq!(log_events(&mut rx), 0);
    }

    #[test]
    fn test_log_events_survives_a_lagged_receiver() {
        let (tx, mut rx) = broadcast::channel(4);
        for index in 0..10 {
            tx.send(MasonryEvent::BrickPlaced {
                uri: format!("img-{index}"),
                column: 0,
                index,
            })
            .unwrap();
        }
        tx.send(missing("gone.png")).unwrap();

        assert_eq!(log_events(&mut rx), 1);
    }

    #[test]
    fn test_flags_override_config_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(&path, r#"{"columns": 4, "spacing": 2.0}"#).unwrap();

        let args = Args::parse_from([
            "masonry",
            "a.png",
            "--columns",
            "3",
            "--balance",
            "--config",
            path.to_str().unwrap(),
        ]);
        let config = args.resolve_config().unwrap();
        assert_eq!(config.columns, 3);
        assert_eq!(config.spacing, 2.0);
        assert_eq!(config.priority, Strategy::Balance);
        assert!(!config.sorted);
    }

    #[test]
    fn test_missing_config_file_is_an_error() {
        let args = Args::parse_from(["masonry", "a.png", "--config", "/nonexistent/masonry.json"]);
        assert!(args.resolve_config().is_err());
    }
}
