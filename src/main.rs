use std::path::PathBuf;

use clap::Parser;
use gn_core::config::{Config, Overrides};

#[derive(Parser)]
#[command(
    name = "graphite-news",
    version,
    about = "Graphite News — which new metrics are available"
)]
struct Cli {
    /// Config file (default: ~/.config/graphite-news/config.toml).
    #[arg(long)]
    config: Option<PathBuf>,

    /// Carbon creates.log to tail. Glob patterns allowed; repeat for more.
    #[arg(short = 'l', long = "log-file")]
    log_files: Vec<String>,

    /// Address to serve the dashboard on.
    #[arg(long)]
    listen: Option<String>,

    /// Dashboard auto-refresh interval in milliseconds.
    #[arg(long)]
    refresh_ms: Option<u64>,

    /// Graphite web URL the dashboard renders graphs from.
    #[arg(long)]
    graphite_url: Option<String>,

    /// Number of recently created series to keep.
    #[arg(long)]
    max_state: Option<usize>,

    /// Allow deleting series (and their whisper files) from the dashboard.
    #[arg(long)]
    allow_delete: bool,

    /// Log at debug level unless RUST_LOG says otherwise.
    #[arg(long)]
    debug: bool,
}

impl Cli {
    fn overrides(&self) -> Overrides {
        Overrides {
            log_files: self.log_files.clone(),
            max_state: self.max_state,
            listen: self.listen.clone(),
            json_pull_interval_ms: self.refresh_ms,
            graphite_url: self.graphite_url.clone(),
            allow_delete: self.allow_delete,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let default_level = if cli.debug { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_env("RUST_LOG")
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default_level)),
        )
        .init();

    let mut config = Config::load(cli.config.as_deref())?;
    config.apply(cli.overrides())?;

    if let Err(err) = graphite_news::run(config).await {
        tracing::error!("{err:#}");
        return Err(err);
    }
    Ok(())
}
