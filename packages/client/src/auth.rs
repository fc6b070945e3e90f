//! Process-wide authentication context

use std::sync::Arc;
use tokio::sync::{watch, Mutex};
use tracing::{debug, warn};

use crate::api::AuthUser;
use crate::client::ApiClient;
use crate::error::ClientResult;
use crate::session::Session;

/// What the context currently knows about the caller's identity
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthState {
    /// Nothing resolved yet
    Unresolved,
    /// A `GET /me` call is in flight
    Resolving,
    /// No token, or the token did not resolve to a user
    Anonymous,
    Authenticated(AuthUser),
}

impl AuthState {
    pub fn user(&self) -> Option<&AuthUser> {
        match self {
            AuthState::Authenticated(user) => Some(user),
            _ => None,
        }
    }
}

/// Resolution cached against the token it was made for
struct Resolved {
    token: String,
    user: Option<AuthUser>,
}

/// Shared "who am I" resolver.
///
/// One instance is created per process and handed to every page, so the
/// identity is fetched once per token instead of once per page. A token
/// change (login, logout, guest switch) invalidates the cached answer.
#[derive(Clone)]
pub struct AuthContext {
    client: ApiClient,
    cache: Arc<Mutex<Option<Resolved>>>,
    state: Arc<watch::Sender<AuthState>>,
}

impl AuthContext {
    pub fn new(client: ApiClient) -> Self {
        let (state, _rx) = watch::channel(AuthState::Unresolved);
        Self {
            client,
            cache: Arc::new(Mutex::new(None)),
            state: Arc::new(state),
        }
    }

    pub fn client(&self) -> &ApiClient {
        &self.client
    }

    pub fn session(&self) -> &Session {
        self.client.session()
    }

    pub fn state(&self) -> AuthState {
        self.state.borrow().clone()
    }

    pub fn subscribe(&self) -> watch::Receiver<AuthState> {
        self.state.subscribe()
    }

    /// Resolve the current user, failing closed.
    ///
    /// No token means `None` without touching the network. Any failure,
    /// including a response that does not match the user shape, is logged
    /// and reported as `None`.
    pub async fn current_user(&self) -> Option<AuthUser> {
        match self.try_current_user().await {
            Ok(user) => user,
            Err(e) => {
                warn!("Could not resolve current user: {}", e);
                None
            }
        }
    }

    /// Like [`current_user`](Self::current_user) but keeps the error for
    /// callers that want to show it
    pub async fn try_current_user(&self) -> ClientResult<Option<AuthUser>> {
        let mut cache = self.cache.lock().await;

        loop {
            let Some(token) = self.session().token() else {
                *cache = None;
                self.state.send_replace(AuthState::Anonymous);
                return Ok(None);
            };

            if let Some(resolved) = cache.as_ref().filter(|r| r.token == token) {
                return Ok(resolved.user.clone());
            }

            self.state.send_replace(AuthState::Resolving);
            let result = self.client.me().await;

            // A response for a token that is no longer current is dropped
            if self.session().token().as_deref() != Some(token.as_str()) {
                debug!("Session token changed during resolution, resolving again");
                continue;
            }

            return match result {
                Ok(user) => {
                    *cache = Some(Resolved {
                        token,
                        user: Some(user.clone()),
                    });
                    self.state
                        .send_replace(AuthState::Authenticated(user.clone()));
                    Ok(Some(user))
                }
                Err(e) => {
                    // Transient network failures are retried on the next call
                    *cache = if e.is_network_error() {
                        None
                    } else {
                        Some(Resolved { token, user: None })
                    };
                    self.state.send_replace(AuthState::Anonymous);
                    Err(e)
                }
            };
        }
    }

    /// Drop the cached identity
    pub async fn invalidate(&self) {
        *self.cache.lock().await = None;
        self.state.send_replace(AuthState::Unresolved);
    }

    /// Force a new `GET /me`
    pub async fn refresh(&self) -> Option<AuthUser> {
        self.invalidate().await;
        self.current_user().await
    }
}
