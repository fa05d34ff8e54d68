// main.rs — client entry point: CLI parsing, logging, socket setup.
// Converted from: screen-worms-client.c main()

use std::time::{SystemTime, UNIX_EPOCH};

use anyhow::Context;
use clap::Parser;
use tokio::net::{lookup_host, TcpStream, UdpSocket};
use tracing_subscriber::EnvFilter;

use worms_client::config::ClientConfig;
use worms_client::net;

fn derive_session_id() -> u64 {
    let now = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default();
    1_000_000 * now.as_secs() + (now.subsec_micros() as u64)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ClientConfig::parse();
    config.validate()?;

    let server_target = format!("{}:{}", config.server_address, config.server_port);
    let server_addr = lookup_host(&server_target)
        .await
        .with_context(|| format!("resolving game server address {server_target}"))?
        .next()
        .with_context(|| format!("no address found for {server_target}"))?;

    let gui_target = format!("{}:{}", config.gui_address, config.gui_port);
    let gui_addr = lookup_host(&gui_target)
        .await
        .with_context(|| format!("resolving GUI server address {gui_target}"))?
        .next()
        .with_context(|| format!("no address found for {gui_target}"))?;

    let bind_addr = if server_addr.is_ipv6() { "[::]:0" } else { "0.0.0.0:0" };
    let server_socket = UdpSocket::bind(bind_addr).await?;
    server_socket.connect(server_addr).await?;

    let gui_socket = TcpStream::connect(gui_addr).await?;
    gui_socket.set_nodelay(true)?;

    let session_id = derive_session_id();
    tracing::info!(%server_addr, %gui_addr, session_id, "screen-worms client starting");

    net::run(server_socket, gui_socket, session_id, config.player_name).await
}
