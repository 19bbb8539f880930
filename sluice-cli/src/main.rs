use clap::Parser;
use sluice_core::AgentId;
use sluice_http::runtime::{AppState, RuntimeConfig, shutdown_hook};
use sluice_memory::InMemorySessionStore;
use sluice_observability::{ObservabilityConfig, init_observability};
use std::sync::Arc;
use tracing::info;

mod agents;
use agents::EchoCountAgentFactory;

#[derive(Parser, Debug)]
#[command(name = "sluice", version, about = "Demo server for the sluice lifecycle core")]
struct Cli {
    /// Address to bind the HTTP server to.
    #[arg(long, default_value = "0.0.0.0:8080")]
    bind: String,

    /// Number of reasoning/acting steps the demo agent performs per run.
    #[arg(long, default_value_t = 3)]
    steps: u64,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_observability(ObservabilityConfig::default())?;

    let cli = Cli::parse();
    let config = RuntimeConfig::from_env()?;

    let state = AppState::new(
        Arc::new(InMemorySessionStore::new()),
        Arc::new(EchoCountAgentFactory::new(cli.steps)),
        AgentId::parse("echo-count")?,
        config,
    );

    let controller = state.controller;
    let drain_deadline = state.config.drain_deadline;
    let listener = tokio::net::TcpListener::bind(&cli.bind).await?;

    info!(bind = %cli.bind, "sluice demo server listening");

    axum::serve(listener, state.router())
        .with_graceful_shutdown(shutdown_hook(controller, drain_deadline))
        .await?;

    Ok(())
}
