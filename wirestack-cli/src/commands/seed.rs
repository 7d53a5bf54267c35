//! Seed the users table with the default users

use anyhow::{Context, Result};
use clap::Parser;
use wirestack_db::{seed, Database};

use crate::config::WirestackConfig;
use crate::ui;

#[derive(Parser, Debug)]
pub struct SeedArgs {
    /// Database URL (overrides config file)
    #[arg(long, env = "DATABASE_URL", hide_env_values = true)]
    pub database_url: Option<String>,

    /// Seconds to wait for a database connection [default: 10]
    #[arg(long, value_name = "SECS")]
    pub acquire_timeout: Option<u64>,
}

/// Upsert every default user. The pool is released whether or not this
/// succeeds; any failure is returned so the process exits non-zero.
pub async fn run_seed(args: SeedArgs, config: &WirestackConfig) -> Result<()> {
    let db_config = config.db_config(args.database_url, args.acquire_timeout)?;
    let db = Database::connect(&db_config).context("Failed to create database pool")?;
    let users = seed::default_users();

    let seeded = ui::with_spinner_async(
        format!("Seeding {} user(s)", users.len()),
        "Seeded users",
        seed::run(&db, &users),
    )
    .await
    .context("Seeding failed")?;

    for user in &seeded {
        println!("{} <{}>", user.name, user.email);
    }
    Ok(())
}
