use clap::{Parser, Subcommand};
use colored::*;
use std::path::PathBuf;
use std::process;
use tracing::debug;

mod cli;

use cli::access::AccessCommands;
use cli::account::AccountCommands;
use cli::plants::PlantCommands;
use sprout_cli::{logging, CliResult};
use sprout_client::SproutClient;
use sprout_config::ClientConfig;

#[derive(Parser)]
#[command(name = "sprout")]
#[command(about = "Sprout CLI - look after your plants and share them with guests")]
#[command(version)]
struct Cli {
    /// Log debug output to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    #[command(flatten)]
    Account(AccountCommands),
    /// Manage your plants
    #[command(subcommand)]
    Plants(PlantCommands),
    /// List known plant diseases
    Diseases,
    /// Manage guest access to your plants
    #[command(subcommand)]
    Access(AccessCommands),
    /// Sign in with a guest access code or link
    Guest {
        /// Access code, or a /guest-access/<code> link
        code: String,
        /// Replace an existing session without asking
        #[arg(long)]
        yes: bool,
    },
    /// Show the share link and QR code for an access code
    Share {
        code: String,
        /// Write the QR code as SVG to this file instead of printing it
        #[arg(long)]
        svg: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    logging::init(cli.verbose);

    if let Err(e) = handle_command(cli.command).await {
        eprintln!("{} {}", "Error:".red().bold(), e);
        process::exit(1);
    }
}

async fn handle_command(command: Commands) -> CliResult<()> {
    let config = ClientConfig::from_env()?;
    debug!(
        api_url = %config.api_url,
        session_file = %config.session_file.display(),
        "Loaded configuration"
    );
    let client = SproutClient::from_config(config)?;

    match command {
        Commands::Account(account) => account.execute(&client).await,
        Commands::Plants(plants) => plants.execute(&client).await,
        Commands::Diseases => cli::plants::list_diseases(&client).await,
        Commands::Access(access) => access.execute(&client).await,
        Commands::Guest { code, yes } => cli::guest::authorize(&client, &code, yes).await,
        Commands::Share { code, svg } => cli::access::share(&client, &code, svg.as_deref()),
    }
}
