//! Gating helpers shared by the protected commands

use std::future::Future;

use sprout_client::{AuthUser, ClientResult, GateOutcome, SproutClient};

use crate::error::{CliError, CliResult};

/// Pass the page gate, then hand back the user and the page's own data
pub async fn protected<T, F, Fut>(client: &SproutClient, load: F) -> CliResult<(AuthUser, ClientResult<T>)>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = ClientResult<T>>,
{
    match client.gate.enter(load).await {
        GateOutcome::Render { user, data } => Ok((user, data)),
        GateOutcome::Redirect(route) => Err(CliError::NotLoggedIn(route)),
    }
}

/// Gate a command that only needs to know who is logged in
pub async fn require_user(client: &SproutClient) -> CliResult<AuthUser> {
    let (user, _) = protected(client, || async { Ok(()) }).await?;
    Ok(user)
}

/// Gate a command whose output is meaningless without its data
pub async fn protected_data<T, F, Fut>(client: &SproutClient, load: F) -> CliResult<(AuthUser, T)>
where
    F: FnOnce() -> Fut,
    Fut: Future<Output = ClientResult<T>>,
{
    let (user, data) = protected(client, load).await?;
    Ok((user, data?))
}
