//! Query `hello.world` through the typed client and render the result

use anyhow::{Context, Result};
use clap::Parser;
use wirestack_client::Client;
use wirestack_core::contract::hello::World;

use crate::config::WirestackConfig;
use crate::ui;

#[derive(Parser, Debug)]
pub struct HelloArgs {
    /// Procedure endpoint [default: http://localhost:4000/trpc]
    #[arg(long, env = "WIRESTACK_URL")]
    pub url: Option<String>,
}

pub async fn run_hello(args: HelloArgs, config: &WirestackConfig) -> Result<()> {
    let client_config = config.client_config(args.url);
    tracing::debug!(url = %client_config.url, "querying hello.world");

    let client = Client::new(&client_config).context("Failed to build client")?;

    println!("Hello World");
    println!("Connected to backend via RPC!");

    let pb = ui::spinner("Loading...");
    if pb.is_none() {
        println!("Loading...");
    }

    match client.query::<World>(&()).await {
        Ok(message) => {
            ui::clear(pb);
            println!("{}", message);
            Ok(())
        }
        Err(e) => {
            ui::finish_error(pb, format!("hello.world failed: {}", e));
            Err(e).with_context(|| format!("Failed to query {}", client_config.url))
        }
    }
}
