//! Page gate: token presence, then identity, before protected content

use std::future::Future;
use std::sync::Arc;
use tokio::sync::watch;
use tracing::debug;

use crate::api::AuthUser;
use crate::auth::AuthContext;
use crate::error::ClientResult;
use crate::routes::Route;

/// Progress of a gated page, for views that render a loading indicator
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GateState {
    Idle,
    Loading,
    Redirecting(Route),
    Ready,
}

/// Result of passing through the gate
#[derive(Debug)]
pub enum GateOutcome<T> {
    /// The visitor must go elsewhere; nothing of the page is shown
    Redirect(Route),
    /// Identity confirmed. `data` is the page's own load, which the page
    /// gates separately.
    Render { user: AuthUser, data: ClientResult<T> },
}

impl<T> GateOutcome<T> {
    pub fn redirect_target(&self) -> Option<&Route> {
        match self {
            GateOutcome::Redirect(route) => Some(route),
            GateOutcome::Render { .. } => None,
        }
    }

    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            GateOutcome::Render { user, .. } => Some(user),
            GateOutcome::Redirect(_) => None,
        }
    }
}

#[derive(Clone)]
pub struct PageGate {
    auth: AuthContext,
    state: Arc<watch::Sender<GateState>>,
}

impl PageGate {
    pub fn new(auth: AuthContext) -> Self {
        let (state, _rx) = watch::channel(GateState::Idle);
        Self {
            auth,
            state: Arc::new(state),
        }
    }

    pub fn auth(&self) -> &AuthContext {
        &self.auth
    }

    pub fn subscribe(&self) -> watch::Receiver<GateState> {
        self.state.subscribe()
    }

    /// Guard a page whose content comes from `load`.
    ///
    /// Without a token the visitor is sent to login and `load` is never
    /// called. Otherwise identity and page data are fetched concurrently;
    /// an identity that does not resolve also sends the visitor to login.
    pub async fn enter<T, F, Fut>(&self, load: F) -> GateOutcome<T>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = ClientResult<T>>,
    {
        if !self.auth.session().is_present() {
            debug!("No session token, redirecting to {}", Route::Login);
            return self.redirect(Route::Login);
        }

        self.state.send_replace(GateState::Loading);
        let (user, data) = tokio::join!(self.auth.current_user(), load());

        match user {
            Some(user) => {
                self.state.send_replace(GateState::Ready);
                GateOutcome::Render { user, data }
            }
            None => {
                debug!("Session token did not resolve, redirecting to {}", Route::Login);
                self.redirect(Route::Login)
            }
        }
    }

    /// Guard a page that has nothing to load besides the identity
    pub async fn require_user(&self) -> GateOutcome<()> {
        self.enter(|| async { Ok(()) }).await
    }

    fn redirect<T>(&self, route: Route) -> GateOutcome<T> {
        self.state.send_replace(GateState::Redirecting(route.clone()));
        GateOutcome::Redirect(route)
    }
}
