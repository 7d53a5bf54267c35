//! wirestack CLI
//!
//! - `serve`: run the procedure server (`/trpc`)
//! - `seed`: upsert the default users, exit non-zero on failure
//! - `hello`: query `hello.world` through the typed client
//! - `config`: show config file path / effective configuration
//! - `completions`: shell completion scripts

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};

mod commands;
mod config;
mod tracing_setup;
mod ui;

use config::WirestackConfig;

#[derive(Parser, Debug)]
#[command(
    name = "wirestack",
    author,
    version,
    about = "Typed procedures over HTTP backed by a shared Postgres pool"
)]
struct Cli {
    /// Enable debug logging (unless RUST_LOG is set)
    #[arg(long, global = true)]
    debug: bool,

    /// Suppress progress spinners (for script consumption)
    #[arg(long, short = 'q', global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP procedure server
    Serve(commands::serve::ServeArgs),
    /// Upsert the default users into the database
    Seed(commands::seed::SeedArgs),
    /// Call hello.world on a running server
    Hello(commands::hello::HelloArgs),
    /// Inspect wirestack configuration (path, show)
    Config(config::ConfigArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
    Elvish,
}

#[tokio::main]
async fn main() -> Result<()> {
    // .env values must be in place before clap reads `env = ...` args
    config::load_dotenv();
    let cli = Cli::parse();

    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();
    ui::init_quiet_mode(cli.quiet);

    let file_config = WirestackConfig::load();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args, &file_config).await?,
        Commands::Seed(args) => commands::run_seed(args, &file_config).await?,
        Commands::Hello(args) => commands::run_hello(args, &file_config).await?,
        Commands::Config(args) => config::run_config(args)?,
        Commands::Completions(args) => run_completions(args),
    }
    Ok(())
}

fn run_completions(args: CompletionsArgs) {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}
