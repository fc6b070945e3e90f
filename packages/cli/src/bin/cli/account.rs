//! Account pages: login, registration, logout and profile

use clap::Subcommand;
use colored::*;
use inquire::{Password, Text};
use sprout_client::api::{looks_like_email, UpdateUserRequest};
use sprout_client::SproutClient;
use sprout_cli::pages::{protected, require_user};
use sprout_cli::render::grants_table;
use sprout_cli::{CliError, CliResult};
use std::path::{Path, PathBuf};

const MIN_PASSWORD_LEN: usize = 8;

#[derive(Debug, Subcommand)]
pub enum AccountCommands {
    /// Log in and remember the session
    Login {
        /// Account e-mail (prompted when omitted)
        #[arg(long)]
        email: Option<String>,
    },
    /// Create a new account
    Register {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        email: Option<String>,
    },
    /// Forget the stored session
    Logout,
    /// Show the logged-in profile and issued guest access
    Me,
    /// Upload a new profile photo
    Photo {
        /// Image file (.jpg, .jpeg, .png or .webp, max 10MB)
        path: PathBuf,
    },
}

impl AccountCommands {
    pub async fn execute(&self, client: &SproutClient) -> CliResult<()> {
        match self {
            AccountCommands::Login { email } => login(client, email.as_deref()).await,
            AccountCommands::Register { name, email } => {
                register(client, name.as_deref(), email.as_deref()).await
            }
            AccountCommands::Logout => logout(client),
            AccountCommands::Me => me(client).await,
            AccountCommands::Photo { path } => photo(client, path).await,
        }
    }
}

fn prompt_email(email: Option<&str>) -> CliResult<String> {
    let email = match email {
        Some(email) => email.to_string(),
        None => Text::new("E-mail:").prompt()?,
    };
    if !looks_like_email(&email) {
        return Err(CliError::InvalidInput(format!("'{}' is not an e-mail address", email)));
    }
    Ok(email)
}

async fn login(client: &SproutClient, email: Option<&str>) -> CliResult<()> {
    let email = prompt_email(email)?;
    let password = Password::new("Password:").without_confirmation().prompt()?;

    client.api.login(&email, &password).await?;

    match client.auth.current_user().await {
        Some(user) => println!("{} Logged in as {}", "✓".green().bold(), user.name.bold()),
        None => println!("{} Logged in", "✓".green().bold()),
    }
    Ok(())
}

async fn register(client: &SproutClient, name: Option<&str>, email: Option<&str>) -> CliResult<()> {
    let name = match name {
        Some(name) => name.to_string(),
        None => Text::new("Name:").prompt()?,
    };
    if name.trim().is_empty() {
        return Err(CliError::InvalidInput("name is required".to_string()));
    }
    let email = prompt_email(email)?;
    let password = Password::new("Password:").prompt()?;
    if password.chars().count() < MIN_PASSWORD_LEN {
        return Err(CliError::InvalidInput(format!(
            "password must be at least {} characters",
            MIN_PASSWORD_LEN
        )));
    }

    client.api.register(name.trim(), &email, &password).await?;
    println!("{} Account created. Run {} to continue.", "✓".green().bold(), "sprout login".yellow());
    Ok(())
}

fn logout(client: &SproutClient) -> CliResult<()> {
    client.api.logout()?;
    println!("{} Logged out", "✓".green().bold());
    Ok(())
}

async fn me(client: &SproutClient) -> CliResult<()> {
    let (user, grants) = protected(client, || client.api.access_grants()).await?;

    println!("{}", user.name.bold().green());
    println!("  E-mail: {}", user.email);
    println!("  Photo:  {}", user.photo.as_deref().unwrap_or("-"));
    if user.is_guest {
        println!("  {}", "Signed in with guest access".yellow());
        return Ok(());
    }

    println!();
    match grants {
        Ok(grants) if grants.is_empty() => println!("No guest access issued."),
        Ok(grants) => println!("{}", grants_table(&grants, &client.config.public_url)),
        Err(e) => eprintln!("{} Could not load guest access: {}", "✗".red().bold(), e),
    }
    Ok(())
}

async fn photo(client: &SproutClient, path: &Path) -> CliResult<()> {
    require_user(client).await?;

    let uploaded = client.api.upload_user_photo(path).await?;
    client
        .api
        .update_profile(&UpdateUserRequest {
            photo: Some(uploaded.filename.clone()),
            ..Default::default()
        })
        .await?;
    println!("{} Profile photo set to {}", "✓".green().bold(), uploaded.filename);
    Ok(())
}
