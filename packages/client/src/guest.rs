//! Guest authorization: exchanging a shared access code for a guest session
//!
//! The flow is an explicit state machine:
//!
//! ```text
//! AwaitingCode --code, no session--------------> Exchanging
//! AwaitingCode --code, live session------------> ConfirmingOverride
//! AwaitingCode --code, stale session (cleared)-> Exchanging
//! ConfirmingOverride --confirm (token cleared)-> Exchanging
//! ConfirmingOverride --decline----------------> Failed(OverrideDeclined)
//! Exchanging --server ok (token stored)-------> Authorized
//! Exchanging --server error-------------------> Failed(Exchange)
//! Failed --retry------------------------------> (re-enters with the same code)
//! ```
//!
//! A logged-in session is never replaced without `confirm_override`.

use tracing::{info, warn};

use crate::api::AuthUser;
use crate::auth::AuthContext;
use crate::error::{ClientError, ClientResult};
use crate::routes::Route;
use crate::session::Session;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuestFailure {
    /// The authorize endpoint rejected the code or could not be reached
    Exchange(ClientError),
    /// The existing session could not be checked or the token not stored
    Session(ClientError),
    /// The user chose to keep their current session
    OverrideDeclined,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuestState {
    AwaitingCode,
    Exchanging {
        code: String,
    },
    ConfirmingOverride {
        code: String,
        current_user: AuthUser,
    },
    Authorized {
        guest_token: String,
    },
    Failed {
        code: String,
        failure: GuestFailure,
    },
}

impl GuestState {
    pub fn name(&self) -> &'static str {
        match self {
            GuestState::AwaitingCode => "awaiting code",
            GuestState::Exchanging { .. } => "exchanging",
            GuestState::ConfirmingOverride { .. } => "confirming override",
            GuestState::Authorized { .. } => "authorized",
            GuestState::Failed { .. } => "failed",
        }
    }

    /// Where the view should navigate once this state is reached
    pub fn redirect(&self) -> Option<Route> {
        match self {
            GuestState::Authorized { .. } => Some(Route::MyPlants),
            _ => None,
        }
    }

    /// Text of the override confirmation, only while confirming
    pub fn confirmation_prompt(&self) -> Option<String> {
        match self {
            GuestState::ConfirmingOverride { current_user, .. } => Some(format!(
                "You are logged in as {}; continuing will log you out and log you in as a guest.",
                current_user.name
            )),
            _ => None,
        }
    }

    pub fn needs_user_input(&self) -> bool {
        matches!(self, GuestState::ConfirmingOverride { .. })
    }

    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            GuestState::Authorized { .. } | GuestState::Failed { .. }
        )
    }
}

/// Driver for one guest authorization attempt
pub struct GuestAuthorization {
    auth: AuthContext,
    state: GuestState,
}

impl GuestAuthorization {
    pub fn new(auth: AuthContext) -> Self {
        Self {
            auth,
            state: GuestState::AwaitingCode,
        }
    }

    pub fn state(&self) -> &GuestState {
        &self.state
    }

    fn session(&self) -> &Session {
        self.auth.session()
    }

    fn transition(&mut self, next: GuestState) -> &GuestState {
        info!("Guest authorization: {} -> {}", self.state.name(), next.name());
        self.state = next;
        &self.state
    }

    fn invalid(&self, action: &'static str) -> ClientError {
        ClientError::InvalidTransition {
            action,
            state: self.state.name(),
        }
    }

    /// Feed the access code taken from the URL.
    ///
    /// `None` or a blank code (router not ready) keeps the flow waiting.
    pub async fn receive_code(&mut self, code: Option<&str>) -> ClientResult<&GuestState> {
        if self.state != GuestState::AwaitingCode {
            return Err(self.invalid("receive a code"));
        }
        match code.map(str::trim).filter(|c| !c.is_empty()) {
            Some(code) => Ok(self.enter(code.to_string()).await),
            None => Ok(&self.state),
        }
    }

    /// Decide between exchanging straight away and asking first
    async fn enter(&mut self, code: String) -> &GuestState {
        if !self.session().is_present() {
            return self.transition(GuestState::Exchanging { code });
        }

        match self.auth.try_current_user().await {
            Ok(Some(current_user)) => self.transition(GuestState::ConfirmingOverride {
                code,
                current_user,
            }),
            // Unreachable server: the session may well be valid, leave it alone
            Err(e) if e.is_network_error() => self.transition(GuestState::Failed {
                code,
                failure: GuestFailure::Session(e),
            }),
            // Already known not to resolve
            Ok(None) => self.discard_stale_session(code, "it resolves to no user"),
            Err(e) => self.discard_stale_session(code, &e.to_string()),
        }
    }

    fn discard_stale_session(&mut self, code: String, reason: &str) -> &GuestState {
        warn!("Existing session is no longer valid ({}), discarding it", reason);
        match self.session().clear() {
            Ok(()) => self.transition(GuestState::Exchanging { code }),
            Err(e) => self.transition(GuestState::Failed {
                code,
                failure: GuestFailure::Session(e),
            }),
        }
    }

    /// Call the authorize endpoint and store the guest token
    pub async fn exchange(&mut self) -> ClientResult<&GuestState> {
        let code = match &self.state {
            GuestState::Exchanging { code } => code.clone(),
            _ => return Err(self.invalid("exchange")),
        };

        // Someone logged in since the flow started
        if self.session().is_present() {
            self.enter(code.clone()).await;
            if !matches!(self.state, GuestState::Exchanging { .. }) {
                return Ok(&self.state);
            }
            if self.session().is_present() {
                let failure = GuestFailure::Session(ClientError::storage(
                    "existing session token could not be replaced",
                ));
                return Ok(self.transition(GuestState::Failed { code, failure }));
            }
        }

        let next = match self.auth.client().authorize_guest(&code).await {
            Ok(guest_token) => match self.session().set_token(guest_token.clone()) {
                Ok(()) => GuestState::Authorized { guest_token },
                Err(e) => GuestState::Failed {
                    code,
                    failure: GuestFailure::Session(e),
                },
            },
            Err(e) => {
                warn!("Guest code exchange failed: {}", e);
                GuestState::Failed {
                    code,
                    failure: GuestFailure::Exchange(e),
                }
            }
        };
        Ok(self.transition(next))
    }

    /// The user agreed to drop their session for a guest one
    pub fn confirm_override(&mut self) -> ClientResult<&GuestState> {
        let code = match &self.state {
            GuestState::ConfirmingOverride { code, .. } => code.clone(),
            _ => return Err(self.invalid("confirm override")),
        };
        self.session().clear()?;
        Ok(self.transition(GuestState::Exchanging { code }))
    }

    /// The user kept their session; the token is untouched
    pub fn decline_override(&mut self) -> ClientResult<&GuestState> {
        let code = match &self.state {
            GuestState::ConfirmingOverride { code, .. } => code.clone(),
            _ => return Err(self.invalid("decline override")),
        };
        Ok(self.transition(GuestState::Failed {
            code,
            failure: GuestFailure::OverrideDeclined,
        }))
    }

    /// Start over with the code of a failed attempt
    pub async fn retry(&mut self) -> ClientResult<&GuestState> {
        let code = match &self.state {
            GuestState::Failed { code, .. } => code.clone(),
            _ => return Err(self.invalid("retry")),
        };
        Ok(self.enter(code).await)
    }

    /// Run every step that needs no user input.
    ///
    /// Stops in `ConfirmingOverride`, in a terminal state, or in
    /// `AwaitingCode` when no code was given.
    pub async fn run(&mut self, code: Option<&str>) -> ClientResult<&GuestState> {
        if self.state == GuestState::AwaitingCode {
            self.receive_code(code).await?;
        }
        self.settle().await
    }

    /// Continue after `confirm_override` or `retry`
    pub async fn settle(&mut self) -> ClientResult<&GuestState> {
        while matches!(self.state, GuestState::Exchanging { .. }) {
            self.exchange().await?;
        }
        Ok(&self.state)
    }
}
