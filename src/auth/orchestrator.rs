//! Login/logout state machine.
//!
//! `Unauthenticated -> AwaitingBrowserCallback -> Authenticated`, and back to
//! `Unauthenticated` on sign-out or a failed wait. The session flag is set only after
//! the listener confirms the login.

use super::listener::AuthStatusListener;
use crate::app::AppContext;
use crate::error::{AuthError, CliError};
use crate::provider::managed::{configure_default_model, DefaultModelChoice};
use std::time::Duration;
use tracing::{debug, info, warn};

/// How long to wait for the browser flow to finish.
pub const LOGIN_TIMEOUT: Duration = Duration::from_secs(5 * 60);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AuthState {
    Unauthenticated,
    AwaitingBrowserCallback,
    Authenticated,
}

/// Result of a sign-in request
#[derive(Debug, Clone, PartialEq)]
pub enum SignInOutcome {
    /// Login confirmed; carries the default model outcome (`None` if configuring it
    /// failed, which does not fail the sign-in).
    SignedIn(Option<DefaultModelChoice>),
    /// Was already signed in; the user was offered a sign-out.
    AlreadySignedIn { signed_out: bool },
}

pub struct AuthOrchestrator<'a> {
    ctx: &'a AppContext,
    state: AuthState,
}

impl<'a> AuthOrchestrator<'a> {
    pub fn new(ctx: &'a AppContext) -> Self {
        let state = if ctx.session.cached() {
            AuthState::Authenticated
        } else {
            AuthState::Unauthenticated
        };
        Self { ctx, state }
    }

    pub fn state(&self) -> AuthState {
        self.state
    }

    /// Sign in, or offer to sign out when already authenticated. After a fresh login
    /// the default managed model is configured on a best-effort basis.
    pub async fn handle_auth(&mut self) -> Result<SignInOutcome, CliError> {
        debug!("Authenticating with Clino...");

        if self.ctx.session.is_authenticated().await {
            self.state = AuthState::Authenticated;
            let signed_out = self.sign_out_dialog().await?;
            return Ok(SignInOutcome::AlreadySignedIn { signed_out });
        }

        self.login().await?;
        self.ctx.say("");
        self.ctx.say("✓ You are signed in!");

        let default_model = match configure_default_model(self.ctx).await {
            Ok(choice) => Some(choice),
            Err(e) => {
                warn!(error = %e, "Could not configure default Clino model");
                self.ctx
                    .say(format!("Warning: Could not configure default Clino model: {}", e));
                self.ctx.say(
                    "You can configure a model later with 'clino auth' and selecting 'Change Clino model'",
                );
                None
            }
        };
        Ok(SignInOutcome::SignedIn(default_model))
    }

    /// Run the browser hand-off and wait for confirmation.
    pub async fn sign_in(&mut self) -> Result<(), CliError> {
        if self.ctx.session.is_authenticated().await {
            self.state = AuthState::Authenticated;
            return Ok(());
        }
        self.login().await
    }

    async fn login(&mut self) -> Result<(), CliError> {
        self.state = AuthState::AwaitingBrowserCallback;
        let mut listener = AuthStatusListener::new(self.ctx.account.clone());
        let result = self.await_browser_login(&mut listener).await;
        listener.stop();

        match result {
            Ok(()) => {
                self.ctx.session.mark_authenticated();
                self.state = AuthState::Authenticated;
                info!("Login successful");
                Ok(())
            }
            Err(e) => {
                self.state = AuthState::Unauthenticated;
                Err(e)
            }
        }
    }

    async fn await_browser_login(
        &self,
        listener: &mut AuthStatusListener,
    ) -> Result<(), CliError> {
        debug!("Subscribing to auth status updates...");
        listener.start().await.map_err(|e| {
            debug!(error = %e, "Failed to start auth listener");
            e
        })?;

        debug!("Initiating login...");
        let callback_url = self
            .ctx
            .account
            .initiate_login()
            .await
            .map_err(|e| AuthError::Transport(format!("failed to initiate login: {}", e)))?;

        self.ctx.say("\n  Opening browser for authentication...");
        if !callback_url.is_empty() {
            self.ctx.say(format!(
                "  If the browser doesn't open automatically, visit this URL:\n  {}\n",
                callback_url
            ));
        }
        self.ctx
            .say("  Waiting for you to complete authentication in your browser...");
        self.ctx.say(format!(
            "   (This may take a few moments. Timeout: {} minutes)",
            LOGIN_TIMEOUT.as_secs() / 60
        ));

        debug!("Waiting for authentication to complete...");
        if let Err(e) = listener.wait_for_authentication(LOGIN_TIMEOUT).await {
            debug!(error = %e, "Authentication failed or timed out");
            self.ctx.say("\n  Authentication failed or timed out.");
            self.ctx.say("  Please try again with 'clino auth'");
            return Err(e.into());
        }
        Ok(())
    }

    /// Log out remotely, then clear the session flag.
    pub async fn sign_out(&mut self) -> Result<(), CliError> {
        self.ctx
            .account
            .logout()
            .await
            .map_err(|e| AuthError::Transport(format!("failed to sign out: {}", e)))?;
        self.ctx.session.clear();
        self.state = AuthState::Unauthenticated;
        info!("Signed out");
        self.ctx.say("You have been signed out of Clino.");
        Ok(())
    }

    /// Ask before signing out. Returns whether a sign-out happened.
    pub async fn sign_out_dialog(&mut self) -> Result<bool, CliError> {
        let confirmed = match self.ctx.prompter.confirm(
            "You are already signed in to Clino.",
            "Would you like to sign out?",
        ) {
            Ok(confirmed) => confirmed,
            Err(e) => {
                debug!(error = %e, "Sign-out prompt dismissed");
                false
            }
        };
        if !confirmed {
            return Ok(false);
        }

        if let Err(e) = self.sign_out().await {
            self.ctx.say(format!("Failed to sign out: {}", e));
            return Err(e);
        }
        Ok(true)
    }
}
