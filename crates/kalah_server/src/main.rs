//! Kalah - unified CLI
//!
//! Runs the REST game server or replays a game offline.

#![warn(missing_docs)]

mod cli;

use anyhow::{Context, Result};
use clap::Parser;
use cli::{Cli, Command};
use kalah_core::{Rules, TieBreak, create_game};
use kalah_server::{
    AppState, GameRepository, GameStore, InMemoryStore, KalahService, ServerConfig, router,
};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, instrument};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("info,kalah_server=debug,kalah_core=debug")),
        )
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Serve {
            config,
            host,
            port,
            in_memory,
        } => run_server(config, host, port, in_memory).await,
        Command::Play {
            stones,
            tie_break,
            positions,
        } => run_play(stones, tie_break, &positions),
    }
}

/// Run the REST game server
#[instrument(skip_all)]
async fn run_server(
    config_path: Option<PathBuf>,
    host: Option<String>,
    port: Option<u16>,
    in_memory: bool,
) -> Result<()> {
    let config = ServerConfig::load(config_path.as_deref())?.with_listen(host, port);

    let store: Arc<dyn GameStore> = if in_memory {
        info!("Using in-memory game store");
        Arc::new(InMemoryStore::new())
    } else {
        let repository = GameRepository::new(config.db_path().clone())?;
        repository.run_migrations()?;
        Arc::new(repository)
    };

    let service = KalahService::new(store, config.rules(), *config.initial_stones());
    let app = router(AppState::new(service, config.base_url().clone()));

    let listener = tokio::net::TcpListener::bind((config.host().as_str(), *config.port()))
        .await
        .with_context(|| format!("Failed to bind {}:{}", config.host(), config.port()))?;
    info!(host = %config.host(), port = config.port(), "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown requested");
    }
}

/// Replay moves offline, printing the board after each one
#[instrument(skip(positions), fields(moves = positions.len()))]
fn run_play(stones: u32, tie_break: TieBreak, positions: &[i32]) -> Result<()> {
    let rules = Rules::new(tie_break);
    let mut game = create_game("local".to_string(), stones)?;
    println!("{}", game.board().display());

    for (turn, position) in positions.iter().enumerate() {
        let mover = game.current_player();
        game = rules
            .apply_move(game, *position)
            .with_context(|| format!("Move {} (pit {}) rejected", turn + 1, position))?;
        println!("\n{} plays pit {}", mover, position);
        println!("{}", game.board().display());
    }

    match game.outcome() {
        Some(outcome) => println!("\n{}", outcome),
        None => println!("\nNext to move: {}", game.current_player()),
    }
    Ok(())
}
