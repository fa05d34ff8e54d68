// main.rs — server entry point: CLI parsing, logging, socket setup.
// Converted from: screen-worms-server.c main()

use clap::Parser;
use tokio::net::UdpSocket;
use tracing_subscriber::EnvFilter;

use worms_server::config::ServerConfig;
use worms_server::net;
use worms_server::state::{GameParams, ServerGameState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ServerConfig::parse();
    config.validate()?;

    let game_params = GameParams {
        turning_speed: config.turning_speed,
        rounds_per_sec: config.rounds_per_sec,
        board_dimension_x: config.board_width,
        board_dimension_y: config.board_height,
    };

    let seed = config.effective_seed();
    let state = ServerGameState::new(seed, game_params);

    let socket = UdpSocket::bind(("::", config.port)).await?;
    tracing::info!(port = config.port, seed, "screen-worms server listening");

    net::run(socket, state).await
}
