//! Sprout client
//!
//! Session handling, authentication and REST access for the Sprout
//! plant-care service. The remote API owns all data; this crate keeps the
//! bearer token, resolves who is logged in, gates protected pages and runs
//! the guest-access exchange.

pub mod api;
pub mod auth;
pub mod client;
pub mod error;
pub mod gate;
pub mod guest;
pub mod plants;
pub mod routes;
pub mod session;
pub mod share;
pub mod token_store;

// Re-export commonly used types
pub use api::{AccessGrant, AuthUser, MyPlant, PlantInfo, UserInfo};
pub use auth::{AuthContext, AuthState};
pub use client::ApiClient;
pub use error::{ClientError, ClientResult};
pub use gate::{GateOutcome, GateState, PageGate};
pub use guest::{GuestAuthorization, GuestFailure, GuestState};
pub use routes::Route;
pub use session::Session;
pub use token_store::{FileTokenStore, MemoryTokenStore, TokenStore};

use sprout_config::ClientConfig;
use std::sync::Arc;

/// Everything a front-end needs, wired once per process
#[derive(Clone)]
pub struct SproutClient {
    pub config: ClientConfig,
    pub session: Session,
    pub api: ApiClient,
    pub auth: AuthContext,
    pub gate: PageGate,
}

impl SproutClient {
    /// Build the client stack with the file-backed token store from `config`
    pub fn from_config(config: ClientConfig) -> ClientResult<Self> {
        let store = FileTokenStore::new(config.session_file.clone());
        let session = Session::new(Arc::new(store))?;
        Self::with_session(config, session)
    }

    pub fn with_session(config: ClientConfig, session: Session) -> ClientResult<Self> {
        let api = ApiClient::from_config(&config, session.clone())?;
        let auth = AuthContext::new(api.clone());
        let gate = PageGate::new(auth.clone());
        Ok(Self {
            config,
            session,
            api,
            auth,
            gate,
        })
    }

    /// Fresh guest-authorization flow sharing this client's session
    pub fn guest_authorization(&self) -> GuestAuthorization {
        GuestAuthorization::new(self.auth.clone())
    }
}
