//! dockdash - a live terminal dashboard for the containers on a Docker host
//!
//! Container lifecycle events, periodic usage samples, key presses and a
//! summary tick all feed one reconciler loop that owns the view state and
//! repaints the terminal.

mod config;
mod core;
mod error;
mod integrations;
mod ui;

use anyhow::{Context, Result};
use clap::Parser;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::Level;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::config::Config;
use crate::core::app::App;
use crate::core::cursor::CursorBounds;
use crate::core::events::{signal_channels, EventHandler, Shutdown};
use crate::integrations::docker::{ContainerSource, DockerClient, Endpoint};
use crate::ui::renderer::TerminalSurface;
use crate::ui::theme::Theme;

#[derive(Parser)]
#[command(name = "dockdash")]
#[command(version)]
#[command(about = "Live terminal dashboard for running Docker containers", long_about = None)]
struct Cli {
    /// Docker endpoint (unix:///path, tcp://host:port, http(s)://host:port)
    #[arg(short = 'H', long, env = "DOCKER_HOST", value_name = "URL")]
    docker_endpoint: Option<String>,

    /// Write logs to this file
    #[arg(long, value_name = "FILE")]
    log_file: Option<PathBuf>,

    /// Configuration file path
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Color theme (tokyo-night, dracula, nord)
    #[arg(long)]
    theme: Option<String>,

    /// Enable verbose logging
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Write the default configuration file and exit
    #[arg(long)]
    write_config: bool,
}

fn setup_logging(
    verbosity: u8,
    log_file: Option<&Path>,
) -> Result<Option<tracing_appender::non_blocking::WorkerGuard>> {
    // The terminal belongs to the dashboard; without a file, logs go nowhere
    let Some(path) = log_file else {
        return Ok(None);
    };

    let level = match verbosity {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let filter = EnvFilter::from_default_env().add_directive(level.into());

    let dir = path
        .parent()
        .filter(|p| !p.as_os_str().is_empty())
        .unwrap_or_else(|| Path::new("."));
    let file_name = path
        .file_name()
        .with_context(|| format!("log file {} has no file name", path.display()))?;
    std::fs::create_dir_all(dir)?;

    let file_appender = tracing_appender::rolling::never(dir, file_name);
    let (non_blocking, guard) = tracing_appender::non_blocking(file_appender);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(non_blocking).with_ansi(false))
        .init();

    Ok(Some(guard))
}

fn write_default_config(path: Option<PathBuf>) -> Result<()> {
    let path = path
        .or_else(Config::default_path)
        .context("no configuration directory on this platform")?;
    Config::default().save(&path)?;
    println!("Wrote {}", path.display());
    Ok(())
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    if cli.write_config {
        return write_default_config(cli.config);
    }

    // Keep the guard alive for the duration of the program
    let _logging_guard = setup_logging(cli.verbose, cli.log_file.as_deref())?;

    let mut config = Config::resolve(cli.config.as_deref())?;
    if let Some(endpoint) = cli.docker_endpoint {
        config.docker.endpoint = Some(endpoint);
    }
    if let Some(theme) = cli.theme {
        config.display.theme = theme;
    }

    let endpoint = Endpoint::parse(config.docker.endpoint.as_deref())?;
    let client = DockerClient::connect(&endpoint).await?;

    let (senders, receivers) = signal_channels(config.general.queue_capacity);
    let (shutdown, listener) = Shutdown::new();

    let mut tasks = EventHandler::spawn_sources(&senders, config.display.summary_interval());

    let source = Arc::new(ContainerSource::new(
        client,
        config.docker.stats_interval(),
        config.docker.reconnect_delay(),
    ));
    tasks.push(source.spawn_watcher(senders.lifecycle.clone()));
    tasks.push(source.spawn_sampler(senders.stats.clone()));

    // Producers hold the only senders now, so a dead producer closes its queue
    drop(senders);

    let interrupt = shutdown.clone();
    tasks.push(tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("interrupt received");
            interrupt.trigger();
        }
    }));

    let theme = Theme::from_name(&config.display.theme);
    tracing::info!(theme = %theme.name, %endpoint, "starting dashboard");
    let surface =
        TerminalSurface::init(theme, endpoint.to_string()).context("initializing terminal")?;

    let bounds = CursorBounds {
        max_rows: config.display.max_rows,
    };
    let mut app = App::new(surface, receivers, listener, bounds);
    let result = app.run().await;

    let mut surface = app.into_surface();
    let restored = surface.restore();

    for task in tasks {
        task.abort();
    }
    drop(shutdown);

    result?;
    restored
}
