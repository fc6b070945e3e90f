// ABOUTME: CLI pages for issuing, listing and revoking guest access
// ABOUTME: Also renders the share link and its QR code for an access code

use chrono::Utc;
use clap::Subcommand;
use colored::*;
use inquire::{DateSelect, Text};
use sprout_client::share::{qr_svg, qr_terminal, share_payload};
use sprout_client::SproutClient;
use sprout_cli::pages::{protected_data, require_user};
use sprout_cli::render::{grants_table, parse_access_code, parse_end_date};
use sprout_cli::{CliError, CliResult};
use std::path::Path;

#[derive(Debug, Subcommand)]
pub enum AccessCommands {
    /// List guest access you have issued
    List,
    /// Issue guest access until a given day
    Create {
        /// Name shown for the guest
        #[arg(long)]
        guest: Option<String>,
        /// Last valid day, YYYY-MM-DD (prompted when omitted)
        #[arg(long)]
        until: Option<String>,
    },
    /// Revoke guest access by id
    Revoke { id: i64 },
}

impl AccessCommands {
    pub async fn execute(&self, client: &SproutClient) -> CliResult<()> {
        match self {
            AccessCommands::List => list(client).await,
            AccessCommands::Create { guest, until } => {
                create(client, guest.as_deref(), until.as_deref()).await
            }
            AccessCommands::Revoke { id } => {
                require_user(client).await?;
                client.api.revoke_access_grant(*id).await?;
                println!("{} Access {} revoked", "✓".green().bold(), id);
                Ok(())
            }
        }
    }
}

async fn list(client: &SproutClient) -> CliResult<()> {
    let (_, grants) = protected_data(client, || client.api.access_grants()).await?;
    if grants.is_empty() {
        println!("No guest access issued.");
    } else {
        println!("{}", grants_table(&grants, &client.config.public_url));
    }
    Ok(())
}

async fn create(client: &SproutClient, guest: Option<&str>, until: Option<&str>) -> CliResult<()> {
    require_user(client).await?;

    let guest = match guest {
        Some(guest) => guest.to_string(),
        None => Text::new("Guest name:").prompt()?,
    };
    if guest.trim().is_empty() {
        return Err(CliError::InvalidInput("guest name is required".to_string()));
    }

    let today = Utc::now().date_naive();
    let end_date = match until {
        Some(until) => parse_end_date(until, today)?,
        None => {
            let day = DateSelect::new("Valid until:")
                .with_min_date(today)
                .prompt()?;
            parse_end_date(&day.format("%Y-%m-%d").to_string(), today)?
        }
    };

    client.api.create_access_grant(guest.trim(), end_date).await?;
    println!("{} Access created for {}", "✓".green().bold(), guest.trim().bold());

    // The create endpoint does not echo the grant back
    let grants = client.api.access_grants().await?;
    println!("{}", grants_table(&grants, &client.config.public_url));
    Ok(())
}

/// Print the share link for an access code, as QR in the terminal or as SVG
pub fn share(client: &SproutClient, code: &str, svg: Option<&Path>) -> CliResult<()> {
    let code = parse_access_code(code)
        .ok_or_else(|| CliError::InvalidInput("access code is required".to_string()))?;
    let payload = share_payload(&client.config.public_url, &code)?;

    match svg {
        Some(path) => {
            std::fs::write(path, qr_svg(&payload.url)?)
                .map_err(|e| CliError::InvalidInput(format!("{}: {}", path.display(), e)))?;
            println!("{} QR code written to {}", "✓".green().bold(), path.display());
        }
        None => println!("{}", qr_terminal(&payload.url)?),
    }

    println!("{}", payload.title.bold());
    println!("{}: {}", payload.text, payload.url.as_str().cyan());
    Ok(())
}
