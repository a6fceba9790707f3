// crates/server/src/main.rs
//! Gainz stats server binary.
//!
//! `serve` (default) runs the HTTP API until Ctrl-C / SIGTERM. `issue-token`
//! and `seed-demo` are local helpers for trying the API out.

use anyhow::{Context, Result};
use chrono::{TimeDelta, Utc};
use clap::Parser;
use gainz_db::Database;
use gainz_observability::init_tracing;
use gainz_server::config::{Cli, Command};
use gainz_server::seed::seed_demo;
use gainz_server::{create_app, init_metrics, AppState, TokenVerifier};
use tokio::net::TcpListener;
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let _log_guard = init_tracing(&cli.log_config())?;

    let verifier = TokenVerifier::new(cli.jwt_secret.as_bytes());

    match cli.command() {
        Command::Serve => serve(&cli, verifier).await,
        Command::IssueToken { user_id, ttl_hours } => {
            let token = verifier
                .issue(&user_id, TimeDelta::hours(ttl_hours))
                .context("failed to sign token")?;
            println!("{token}");
            Ok(())
        }
        Command::SeedDemo {
            user_id,
            email,
            display_name,
            days,
        } => {
            let db = open_database(&cli).await?;
            let email = email.unwrap_or_else(|| format!("{user_id}@demo.gainz.local"));
            let summary = seed_demo(&db, &user_id, &email, &display_name, days, Utc::now().date_naive())
                .await
                .with_context(|| format!("failed to seed demo user {user_id}"))?;
            eprintln!(
                "Seeded {user_id}: {} scored days, {} habits, {} entries",
                summary.days, summary.habits, summary.entries
            );
            Ok(())
        }
    }
}

async fn open_database(cli: &Cli) -> Result<Database> {
    let db = match &cli.db_path {
        Some(path) => Database::new(path).await,
        None => Database::open_default().await,
    };
    db.context("failed to open database")
}

async fn serve(cli: &Cli, verifier: TokenVerifier) -> Result<()> {
    let db = open_database(cli).await?;
    init_metrics();

    let state = AppState::new(db, verifier);
    let app = create_app(state);

    let addr = cli.socket_addr();
    let listener = TcpListener::bind(addr)
        .await
        .with_context(|| format!("failed to bind {addr}"))?;
    info!(%addr, "Listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    info!("Server stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::warn!(error = %e, "Failed to listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut sig) => {
                sig.recv().await;
            }
            Err(e) => {
                tracing::warn!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received");
}
