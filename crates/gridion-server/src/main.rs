// Copyright (c) 2025 SOLARE S.R.O.
//
// This file is part of GridION.
//
// Licensed under the Creative Commons Attribution-NonCommercial-NoDerivatives 4.0 International
// (CC BY-NC-ND 4.0). You may use and share this file for non-commercial purposes only and you may not
// create derivatives. See <https://creativecommons.org/licenses/by-nc-nd/4.0/>.
//
// This software is provided "AS IS", without warranty of any kind.
//
// For commercial licensing, please contact: info@solare.cz

mod api;
mod config;
mod state;
mod story;

use anyhow::{Context, Result};
use axum::Router;
use axum::routing::{get, post};
use tower_http::cors::CorsLayer;
use tracing::info;
use tracing_subscriber::FmtSubscriber;

use crate::config::GridionConfig;
use crate::state::AppState;

const VERSION: &str = env!("CARGO_PKG_VERSION");
const DEFAULT_CONFIG_PATH: &str = "gridion.toml";

#[tokio::main]
async fn main() -> Result<()> {
    // Handle command line arguments
    let args: Vec<String> = std::env::args().collect();
    let mut config_path = DEFAULT_CONFIG_PATH.to_owned();
    if args.len() > 1 {
        match args[1].as_str() {
            "--help" | "-h" => {
                println!("GridION - GB Interconnector Dashboard");
                println!("Version: {VERSION}");
                println!();
                println!("Usage: gridion-server [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -h, --help           Print this help message");
                println!("  -v, --version        Print version");
                println!("  -c, --config <PATH>  Config file (default: gridion.toml)");
                return Ok(());
            }
            "--version" | "-v" => {
                println!("{VERSION}");
                return Ok(());
            }
            "--config" | "-c" => {
                config_path = args
                    .get(2)
                    .cloned()
                    .context("--config requires a path argument")?;
            }
            other => {
                anyhow::bail!("unknown argument: {other} (try --help)");
            }
        }
    }

    // Initialize tracing with env filter support; respects RUST_LOG
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)
        .context("setting default subscriber failed")?;

    let config = GridionConfig::load_or_default(&config_path)?;
    info!("🔌 Starting GridION v{VERSION}");
    info!(
        "   NESO API: {} (refresh every {}s)",
        config.neso.base_url, config.neso.refresh_interval_secs
    );
    info!(
        "   Listening on {}:{}",
        config.server.bind_address, config.server.port
    );

    let bind = format!("{}:{}", config.server.bind_address, config.server.port);
    let state = AppState::new(config)?;

    // Warm the store before accepting traffic, then keep it fresh
    state.refresh().await;
    tokio::spawn(state.clone().run_refresh_loop());

    let app = Router::new()
        .route("/", get(api::dashboard_page))
        .route("/story", get(api::story_page))
        .route("/api/status", get(api::status))
        .route("/api/demand", get(api::demand))
        .route("/api/extra-load", get(api::extra_load))
        .route("/api/flows/countries", get(api::country_flows))
        .route("/api/flows/countries/detail", get(api::country_flow_detail))
        .route("/api/flows/cables", get(api::cable_flows))
        .route("/api/embedded-gen", get(api::embedded_generation))
        .route("/api/balance", get(api::grid_balance))
        .route("/api/constraints", get(api::constraints))
        .route("/api/map/features", get(api::map_feature_collection))
        .route("/api/datasets/negative-prices", get(api::negative_prices))
        .route("/api/datasets/wind-comparison", get(api::wind_comparison))
        .route("/api/datasets/constraint-spend", get(api::constraint_spend))
        .route("/api/story/steps", get(api::story_steps))
        .route("/api/story/player", get(api::story_position))
        .route("/api/story/player/start", post(api::story_start))
        .route("/api/story/player/stop", post(api::story_stop))
        .route("/api/story/player/seek", post(api::story_seek))
        .layer(CorsLayer::permissive())
        .with_state(state);

    let listener = tokio::net::TcpListener::bind(&bind)
        .await
        .with_context(|| format!("Failed to bind {bind}"))?;
    axum::serve(listener, app)
        .await
        .context("server terminated")?;
    Ok(())
}
