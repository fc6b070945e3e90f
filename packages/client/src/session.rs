//! Session token service shared by every component that needs the token

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard};
use tokio::sync::watch;
use tracing::info;

use crate::error::{ClientError, ClientResult};
use crate::token_store::{MemoryTokenStore, TokenStore};

/// Single owner of the session token.
///
/// Clones share the same store and the same change channel, so anything
/// holding a `Session` (API client, auth context, flows) sees one value.
/// Writes go to the store and the channel under one lock, so both always
/// end up holding the last writer's token.
#[derive(Clone)]
pub struct Session {
    store: Arc<dyn TokenStore>,
    tx: Arc<watch::Sender<Option<String>>>,
    write_lock: Arc<Mutex<()>>,
}

impl Session {
    /// Build a session over `store`, loading whatever token it holds now
    pub fn new(store: Arc<dyn TokenStore>) -> ClientResult<Self> {
        let initial = store.get()?;
        let (tx, _rx) = watch::channel(initial);
        Ok(Self {
            store,
            tx: Arc::new(tx),
            write_lock: Arc::new(Mutex::new(())),
        })
    }

    pub fn in_memory() -> Self {
        let (tx, _rx) = watch::channel(None);
        Self {
            store: Arc::new(MemoryTokenStore::new()),
            tx: Arc::new(tx),
            write_lock: Arc::new(Mutex::new(())),
        }
    }

    fn lock_writes(&self) -> ClientResult<MutexGuard<'_, ()>> {
        self.write_lock
            .lock()
            .map_err(|_| ClientError::storage("session write lock poisoned"))
    }

    /// Current token, if any
    pub fn token(&self) -> Option<String> {
        self.tx.borrow().clone()
    }

    pub fn is_present(&self) -> bool {
        self.tx.borrow().is_some()
    }

    pub fn set_token(&self, token: impl Into<String>) -> ClientResult<()> {
        let token = token.into();
        let _guard = self.lock_writes()?;
        self.store.set(&token)?;
        self.tx.send_replace(Some(token));
        info!("Session token updated");
        Ok(())
    }

    pub fn clear(&self) -> ClientResult<()> {
        let _guard = self.lock_writes()?;
        self.store.delete()?;
        self.tx.send_replace(None);
        info!("Session token cleared");
        Ok(())
    }

    /// Re-read the backing store and publish if another writer changed it.
    ///
    /// Returns `true` when the token changed.
    pub fn refresh(&self) -> ClientResult<bool> {
        let _guard = self.lock_writes()?;
        let stored = self.store.get()?;
        let changed = self.tx.send_if_modified(|current| {
            if *current == stored {
                false
            } else {
                *current = stored;
                true
            }
        });
        if changed {
            info!("Session token changed outside this process");
        }
        Ok(changed)
    }

    /// Observe token changes
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.tx.subscribe()
    }
}

impl fmt::Debug for Session {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Session")
            .field("token_present", &self.is_present())
            .finish()
    }
}
