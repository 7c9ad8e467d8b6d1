//! Session cache: process-local "signed in" hint backed by a remote credential check.

use crate::services::AccountService;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tracing::debug;

/// Authentication state for the current process.
///
/// A cached `true` short-circuits the remote check; `false` always asks the account
/// service. Never persisted.
pub struct Session {
    authenticated: AtomicBool,
    account: Arc<dyn AccountService>,
}

impl Session {
    pub fn new(account: Arc<dyn AccountService>) -> Self {
        Self {
            authenticated: AtomicBool::new(false),
            account,
        }
    }

    /// Cached flag, without any remote call.
    pub fn cached(&self) -> bool {
        self.authenticated.load(Ordering::SeqCst)
    }

    /// Whether the user is signed in, verifying with the server when the cache is unset.
    ///
    /// Failures leave the cache unset so the next call retries.
    pub async fn is_authenticated(&self) -> bool {
        if self.cached() {
            debug!("Session is already authenticated");
            return true;
        }

        debug!("Verifying authentication with server...");
        match self.account.check_credentials().await {
            Ok(()) => {
                debug!("Server verification successful, updating session flag");
                self.mark_authenticated();
                true
            }
            Err(e) => {
                debug!(error = %e, "Server verification failed");
                false
            }
        }
    }

    /// Record a confirmed sign-in.
    pub fn mark_authenticated(&self) {
        self.authenticated.store(true, Ordering::SeqCst);
    }

    pub fn clear(&self) {
        self.authenticated.store(false, Ordering::SeqCst);
    }
}
