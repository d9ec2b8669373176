use clap::{Parser, Subcommand};
use serde_json::json;

use axon_core::config::DEFAULT_ENDPOINT;

mod commands;

use commands::{init, setup, status};

#[derive(Parser)]
#[command(
    name = "axon",
    version,
    about = "Axon CLI — register agents and manage the collective-brain plugin"
)]
struct Cli {
    /// Brain service base URL
    #[arg(long, env = "AXON_ENDPOINT", default_value = DEFAULT_ENDPOINT)]
    endpoint: String,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Register this agent with the brain service and store the issued API key
    Setup {
        /// Agent name shown to the collective
        #[arg(long)]
        name: String,
        /// Short description of what this agent works on
        #[arg(long, default_value = "")]
        description: String,
        /// Wallet address for attribution (defaults to the zero address)
        #[arg(long)]
        wallet: Option<String>,
    },
    /// Show the stored configuration (API key masked)
    Status,
    /// Add brain usage guidelines to the project's AGENTS.md
    Init {
        /// Guidelines file to update
        #[arg(long, default_value = "AGENTS.md")]
        path: String,
        /// Rewrite the section if it already exists
        #[arg(long)]
        force: bool,
    },
}

fn exit_error(message: &str, docs_hint: Option<&str>) -> ! {
    let mut err = json!({
        "error": "cli_error",
        "message": message
    });
    if let Some(hint) = docs_hint {
        err["docs_hint"] = json!(hint);
    }
    eprintln!("{}", serde_json::to_string_pretty(&err).unwrap());
    std::process::exit(1);
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Setup {
            name,
            description,
            wallet,
        } => setup::run(&cli.endpoint, &name, &description, wallet.as_deref()).await,
        Commands::Status => status::run(),
        Commands::Init { path, force } => init::run(&path, force),
    };

    if let Err(e) = result {
        exit_error(&e.to_string(), None);
    }
}
