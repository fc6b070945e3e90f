// ABOUTME: CLI page that signs in with a guest access code
// ABOUTME: Asks before replacing an existing session and reports where to go next

use colored::*;
use inquire::Confirm;
use sprout_client::{GuestFailure, GuestState, SproutClient};
use sprout_cli::render::parse_access_code;
use sprout_cli::CliResult;

pub async fn authorize(client: &SproutClient, input: &str, yes: bool) -> CliResult<()> {
    let code = parse_access_code(input);
    let mut flow = client.guest_authorization();
    flow.run(code.as_deref()).await?;

    loop {
        let state = flow.state().clone();
        match state {
            GuestState::AwaitingCode => {
                println!("{} No access code given", "✗".red().bold());
                return Ok(());
            }
            GuestState::ConfirmingOverride { .. } => {
                let prompt = state.confirmation_prompt().unwrap_or_default();
                let accepted = yes
                    || Confirm::new(&prompt)
                        .with_default(false)
                        .prompt()?;
                if accepted {
                    flow.confirm_override()?;
                    flow.settle().await?;
                } else {
                    flow.decline_override()?;
                }
            }
            GuestState::Authorized { .. } => {
                println!("{} Signed in as guest", "✓".green().bold());
                if let Some(route) = state.redirect() {
                    println!("  Continue with {} ({})", "sprout plants list".yellow(), route);
                }
                return Ok(());
            }
            GuestState::Failed { failure, .. } => {
                match failure {
                    GuestFailure::OverrideDeclined => {
                        println!("Kept the current session");
                        return Ok(());
                    }
                    GuestFailure::Exchange(err) | GuestFailure::Session(err) => {
                        return Err(err.into());
                    }
                }
            }
            GuestState::Exchanging { .. } => {
                flow.settle().await?;
            }
        }
    }
}
