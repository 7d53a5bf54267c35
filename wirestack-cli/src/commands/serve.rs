//! HTTP server command
//!
//! Runs the procedure server under `/trpc` until Ctrl+C or SIGTERM.

use std::net::SocketAddr;

use anyhow::{Context, Result};
use clap::Parser;
use wirestack_db::Database;
use wirestack_server::run_server;

use crate::config::WirestackConfig;

#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to [default: 127.0.0.1:4000]
    #[arg(long, short = 'b', env = "WIRESTACK_BIND")]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Database URL (overrides config file)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Seconds to wait for a database connection [default: 10]
    #[arg(long, value_name = "SECS")]
    pub acquire_timeout: Option<u64>,
}

pub async fn run_serve(args: ServeArgs, config: &WirestackConfig) -> Result<()> {
    let db_config = config.db_config(args.database_url, args.acquire_timeout)?;
    let server_config = config.server_config(args.bind, args.cors_permissive);

    tracing::info!(
        bind = %server_config.bind_addr,
        environment = %db_config.environment,
        "Starting wirestack server"
    );

    let db = Database::connect(&db_config).context("Failed to create database pool")?;

    run_server(db.clone(), server_config)
        .await
        .context("Server error")?;

    db.close().await;
    Ok(())
}
