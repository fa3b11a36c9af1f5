//! Binary entrypoint for the Snapbar landing site server.
//!
//! Delegates all logic to the library crate; no local modules here.

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;
use tokio_util::sync::CancellationToken;
use tracing::{Level, info};
use tracing_subscriber::{EnvFilter, fmt};

use screenshot_site::config::Configuration;
use screenshot_site::events::ControllerEvent;
use screenshot_site::lister::DirectorySource;
use screenshot_site::measure::FileProbe;
use screenshot_site::state::SlideshowState;
use screenshot_site::tasks::controller::{self, ControllerOptions};
use screenshot_site::web;

/// Simple CLI
#[derive(Debug, Parser)]
#[command(name = "screenshot-site", about = "Landing site and screenshot gallery server")]
struct Cli {
    /// Path to YAML config file
    #[arg(short, long, value_name = "FILE", default_value = "config.yaml")]
    config: PathBuf,

    /// Override the configured bind address
    #[arg(long, value_name = "ADDR")]
    bind: Option<SocketAddr>,

    /// Increase log verbosity (repeatable)
    #[arg(short = 'v', long = "verbose", action = ArgAction::Count)]
    verbose: u8,
}

fn init_tracing(verbosity: u8) -> Result<()> {
    // map -v to log level
    let level = match verbosity {
        0 => Level::INFO,
        1 => Level::DEBUG,
        _ => Level::TRACE,
    };
    let filter = EnvFilter::from_default_env()
        .add_directive(format!("screenshot_site={}", level).parse().unwrap());
    fmt().with_env_filter(filter).with_target(true).init();
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose)?;

    let mut cfg = if cli.config.exists() {
        Configuration::from_yaml_file(&cli.config)
            .with_context(|| format!("loading config from {}", cli.config.display()))?
            .validated()
            .context("validating configuration")?
    } else {
        info!(config = %cli.config.display(), "config file missing; using defaults");
        Configuration::default()
    };
    if let Some(addr) = cli.bind {
        cfg.bind_address = addr;
    }
    info!(?cfg, "configuration loaded");

    // Channels (small/bounded)
    let (events_tx, events_rx) = mpsc::channel::<ControllerEvent>(32); // Web -> Controller
    let (state_tx, state_rx) = watch::channel(SlideshowState::new(cfg.max_slide_width)); // Controller -> Web

    let cancel = CancellationToken::new();

    // Ctrl-C cancels everything
    {
        let cancel = cancel.clone();
        tokio::spawn(async move {
            if let Err(err) = tokio::signal::ctrl_c().await {
                tracing::warn!("ctrl-c handler failed: {err}");
                return;
            }
            info!("ctrl-c received; initiating shutdown");
            cancel.cancel();
        });
    }

    let mut tasks = JoinSet::new();

    // Slideshow controller
    tasks.spawn({
        let opts = ControllerOptions::from(&cfg);
        let source = DirectorySource::new(&cfg.screenshots_dir, cfg.route_prefix.clone());
        let probe = FileProbe::new(&cfg.screenshots_dir, cfg.route_prefix.clone());
        let cancel = cancel.clone();
        async move {
            controller::run(opts, source, probe, events_rx, state_tx, cancel)
                .await
                .context("slideshow controller failed")
        }
    });

    // Site server
    let web_handle = web::spawn(&cfg, events_tx.clone(), state_rx, cancel.clone());

    // First task to exit takes the rest down with it.
    if let Some(res) = tasks.join_next().await {
        cancel.cancel();
        res.context("task join failed")??;
    }
    while let Some(res) = tasks.join_next().await {
        res.context("task join failed")??;
    }
    let _ = web_handle.await;

    info!("shutdown complete");
    Ok(())
}
