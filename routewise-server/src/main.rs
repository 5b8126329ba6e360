mod config;
mod error;
mod routes;
mod state;

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};
use routewise_core::{Waypoint, create_road_graph, plan_route};
use tokio::net::TcpListener;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

use crate::config::ServerConfig;
use crate::routes::FindPathResponse;

const DEFAULT_LOG_FILTER: &str = "routewise=info,routewise_core=info,tower_http=info";

#[derive(Debug, Parser)]
#[command(name = "routewise", version, about = "Multi-stop route planner")]
struct Cli {
    /// TOML configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Road graph document, overrides `graph_path` from the config
    #[arg(long, global = true)]
    graph: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP API
    Serve {
        #[arg(long)]
        bind: Option<SocketAddr>,

        /// Load the graph on the first request instead of at startup
        #[arg(long)]
        lazy: bool,
    },
    /// Plan one route and print it as JSON
    Plan {
        /// Points as LAT,LON, the first one is the start
        #[arg(required = true, num_args = 2.., allow_hyphen_values = true, value_parser = parse_point)]
        points: Vec<[f64; 2]>,
    },
}

fn parse_point(value: &str) -> Result<[f64; 2], String> {
    let (lat, lon) = value
        .split_once(',')
        .ok_or_else(|| format!("expected LAT,LON, got '{value}'"))?;
    let parse = |part: &str| {
        part.trim()
            .parse::<f64>()
            .map_err(|e| format!("invalid coordinate '{part}': {e}"))
    };
    Ok([parse(lat)?, parse(lon)?])
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| DEFAULT_LOG_FILTER.into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();
    let mut config = ServerConfig::load(cli.config.as_deref())?;
    if let Some(graph) = cli.graph {
        config.graph_path = graph;
    }

    match cli.command {
        Command::Serve { bind, lazy } => {
            if let Some(bind) = bind {
                config.bind = bind;
            }
            if lazy {
                config.preload = false;
            }
            serve(config).await
        }
        Command::Plan { points } => plan(&config, points).await,
    }
}

async fn serve(config: ServerConfig) -> anyhow::Result<()> {
    tracing::info!(
        bind = %config.bind,
        graph = %config.graph_path.display(),
        preload = config.preload,
        max_destinations = config.max_destinations,
        exhaustive_limit = config.exhaustive_limit,
        parallel = config.parallel,
        "Configuration loaded"
    );

    let state = Arc::new(config.state());
    if config.preload {
        state
            .graph()
            .await
            .context("Failed to preload the road graph")?;
    }
    if !state.is_loaded() {
        tracing::info!("Road graph will be loaded on the first request");
    }

    let app = routes::router(
        state,
        config.request_timeout(),
        config.max_concurrent_requests,
    );

    let listener = TcpListener::bind(config.bind)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind))?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("HTTP server stopped");
    Ok(())
}

async fn plan(config: &ServerConfig, points: Vec<[f64; 2]>) -> anyhow::Result<()> {
    let source = config.graph_source();
    let options = config.planner_options();

    let route = tokio::task::spawn_blocking(move || {
        let graph = create_road_graph(&source)?;
        let waypoints: Vec<Waypoint> = points.into_iter().map(Waypoint::from).collect();
        plan_route(&graph, &waypoints, &options)
    })
    .await??;

    let response = FindPathResponse::from(route);
    println!("{}", serde_json::to_string_pretty(&response)?);
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to listen for shutdown signal: {e}");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
