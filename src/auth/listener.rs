//! Auth status listener: subscribes to auth events and exposes a bounded wait.
//!
//! The listener must be started before the login is initiated so a fast confirmation
//! cannot be missed. A background task drains the event stream and resolves a single
//! one-shot slot with the first positive event (or the reason the stream ended); the
//! waiter races that slot against a timer.

use crate::error::AuthError;
use crate::services::AccountService;
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tracing::debug;

pub struct AuthStatusListener {
    account: Arc<dyn AccountService>,
    outcome: Option<oneshot::Receiver<Result<(), AuthError>>>,
    task: Option<JoinHandle<()>>,
}

impl AuthStatusListener {
    pub fn new(account: Arc<dyn AccountService>) -> Self {
        Self {
            account,
            outcome: None,
            task: None,
        }
    }

    /// Subscribe to the event stream and start the receiving task.
    pub async fn start(&mut self) -> Result<(), AuthError> {
        if self.task.is_some() {
            return Ok(());
        }

        let mut events = self
            .account
            .subscribe_auth_status()
            .await
            .map_err(|e| AuthError::Subscribe(e.to_string()))?;

        let (tx, rx) = oneshot::channel();
        let task = tokio::spawn(async move {
            let result = loop {
                match events.next().await {
                    Some(Ok(event)) if event.authenticated => {
                        debug!("Auth status update: authenticated");
                        break Ok(());
                    }
                    Some(Ok(event)) => {
                        debug!(reason = ?event.reason, "Auth status update: not authenticated");
                    }
                    Some(Err(e)) => break Err(AuthError::SubscriptionClosed(Some(e.to_string()))),
                    None => break Err(AuthError::SubscriptionClosed(None)),
                }
            };
            // The waiter may already have given up.
            let _ = tx.send(result);
        });

        self.outcome = Some(rx);
        self.task = Some(task);
        Ok(())
    }

    /// Wait until an authenticated event arrives, the subscription ends, or `timeout`
    /// elapses. Only one wait per listener.
    pub async fn wait_for_authentication(&mut self, timeout: Duration) -> Result<(), AuthError> {
        let outcome = self.outcome.take().ok_or_else(|| {
            AuthError::SubscriptionClosed(Some("listener is not waiting".to_string()))
        })?;

        match tokio::time::timeout(timeout, outcome).await {
            Ok(Ok(result)) => result,
            Ok(Err(_)) => Err(AuthError::SubscriptionClosed(None)),
            Err(_) => Err(AuthError::Timeout(timeout)),
        }
    }

    /// Release the subscription. Safe to call repeatedly or before `start`.
    pub fn stop(&mut self) {
        if let Some(task) = self.task.take() {
            debug!("Stopping auth status listener");
            task.abort();
        }
        self.outcome = None;
    }

    pub fn is_running(&self) -> bool {
        self.task.is_some()
    }
}

impl Drop for AuthStatusListener {
    fn drop(&mut self) {
        self.stop();
    }
}
