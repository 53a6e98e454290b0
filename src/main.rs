#![cfg_attr(not(test), deny(clippy::panic))]
use std::net::SocketAddr;
use std::sync::Arc;

use clap::Parser;
use trivia_server::{config, logging, server, websocket, GameServer};

/// Real-time multiplayer trivia game server.
#[derive(Parser, Debug)]
#[command(name = "trivia-server")]
#[command(about = "Real-time multiplayer trivia game server")]
#[command(version)]
struct Cli {
    /// Print the loaded configuration as JSON and exit, without starting
    /// the server. Useful for checking what env vars were picked up.
    #[arg(long)]
    print_config: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    logging::init();

    let cfg = config::load();

    if cli.print_config {
        println!(
            "port={} client_url={} janitor_interval_secs={} pin_retry_budget={}",
            cfg.port, cfg.client_url, cfg.janitor_interval_secs, cfg.pin_retry_budget
        );
        return Ok(());
    }

    let cfg = Arc::new(cfg);
    let addr = SocketAddr::from(([0, 0, 0, 0], cfg.port));
    tracing::info!(%addr, "starting trivia server");

    let game_server = GameServer::new(cfg);

    let janitor_server = Arc::clone(&game_server);
    tokio::spawn(server::janitor::run(janitor_server));

    let router = websocket::create_router(game_server);
    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(
        listener,
        router.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown_signal())
    .await?;

    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
