#![forbid(unsafe_code)]

use std::{
    net::{IpAddr, SocketAddr},
    path::PathBuf,
};

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;
use videovault::{
    api::{self, AppState},
    config::{AppConfig, DEFAULT_CONFIG_PATH, load_app_config},
    search::SearchService,
};

const DEFAULT_LOG_FILTER: &str = "videovault=info,backend=info,tower_http=debug";

#[derive(Parser, Debug)]
#[command(author, version, about = "Serve the VideoVault search API.")]
struct Cli {
    #[arg(long = "config", value_name = "PATH", default_value = DEFAULT_CONFIG_PATH, help = "Path to the env config file")]
    config: PathBuf,
    #[arg(
        long = "host",
        value_name = "ADDR",
        help = "Override the listen address (default 127.0.0.1)"
    )]
    host: Option<String>,
    #[arg(
        short = 'p',
        long = "port",
        value_name = "PORT",
        help = "Override the listen port (default 8080)"
    )]
    port: Option<u16>,
}

impl Cli {
    fn apply(self, mut config: AppConfig) -> AppConfig {
        if let Some(host) = self.host {
            config.host = host;
        }
        if let Some(port) = self.port {
            config.port = port;
        }
        config
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_LOG_FILTER)),
        )
        .init();

    let cli = Cli::parse();
    let config = load_app_config(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;
    let config = cli.apply(config);

    let host: IpAddr = config
        .host
        .parse()
        .with_context(|| format!("parsing listen host {}", config.host))?;
    let addr = SocketAddr::new(host, config.port);

    if config.upstream_ready() {
        info!(base_url = %config.api_base_url, "YouTube search enabled");
    } else {
        info!("YouTube search disabled or no API key, serving demo results");
    }

    let state = AppState::new(SearchService::from_config(config));
    let app = api::router(state)?;

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding to {}", addr))?;
    info!("API server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("running API server")?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = signal::ctrl_c().await {
        error!("Failed to install Ctrl+C handler: {}", err);
    }
}
