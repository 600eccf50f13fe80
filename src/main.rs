//! # Main Entry Point
//!
//! Loads configuration, sets up logging, and either serves the HTTP form
//! (`relay serve`, the default) or runs a single script offline (`relay run`).
//!
//! - Domain: Configuration, Markers and Types
//! - Infrastructure: Git review, Tools, HTTP
//! - Application: Scanner, Engine, Session, Logging

mod application;
mod domain;
mod infrastructure;
mod strings;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tokio::io::AsyncReadExt;

use crate::application::session::Session;
use crate::domain::config::AppConfig;
use crate::strings::logs;

#[derive(Debug, Parser)]
#[command(name = "relay", version, about = "Runs an agent's command script on this machine")]
struct Cli {
    /// Path to the YAML configuration file
    #[arg(long, default_value = "data/config.yaml")]
    config: PathBuf,

    /// Address to listen on (overrides server.host)
    #[arg(long, global = true)]
    host: Option<String>,

    /// Port to listen on (overrides server.port)
    #[arg(long, global = true)]
    port: Option<u16>,

    #[command(subcommand)]
    command: Option<CliCommand>,
}

#[derive(Debug, Subcommand)]
enum CliCommand {
    /// Serve the input form and script endpoint
    Serve,
    /// Run one script from FILE (or stdin) and print the transcript
    Run { file: Option<PathBuf> },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // 1. Load Configuration
    let mut config = AppConfig::load(&cli.config)?;
    if let Some(host) = cli.host {
        config.server.host = host;
    }
    if let Some(port) = cli.port {
        config.server.port = port;
    }

    // 2. Logging Setup
    let _guard = application::logging::init(&config.logging)?;
    tracing::info!("{}", logs::STARTING);
    tracing::info!("{}", logs::config_loaded(&cli.config.display().to_string()));

    // 3. Interpreter
    let session = Arc::new(Session::from_config(&config));

    match cli.command.unwrap_or(CliCommand::Serve) {
        CliCommand::Serve => serve(&config, session).await,
        CliCommand::Run { file } => run_script(file, &session).await,
    }
}

async fn serve(config: &AppConfig, session: Arc<Session>) -> Result<()> {
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = match tokio::net::TcpListener::bind(&addr).await {
        Ok(listener) => listener,
        Err(e) => {
            tracing::error!("{}", logs::bind_failed(&addr, &e.to_string()));
            return Err(e).with_context(|| format!("Failed to bind to {addr}"));
        }
    };

    tracing::info!("{}", logs::listening(&addr));
    axum::serve(listener, infrastructure::http::router(session))
        .await
        .context("Server error")
}

async fn run_script(file: Option<PathBuf>, session: &Session) -> Result<()> {
    let input = match file {
        Some(path) => tokio::fs::read_to_string(&path)
            .await
            .with_context(|| format!("Failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            tokio::io::stdin()
                .read_to_string(&mut buffer)
                .await
                .context("Failed to read script from stdin")?;
            buffer
        }
    };

    println!("{}", session.handle(&input).await);
    Ok(())
}
