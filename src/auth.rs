//! Authentication with the managed account service
//!
//! Browser hand-off login with a bounded wait for confirmation, sign-out, and the
//! account-scoped commands (organization selection) that require a signed-in session.

pub mod listener;
pub mod orchestrator;
pub mod organization;

pub use listener::AuthStatusListener;
pub use orchestrator::{AuthOrchestrator, AuthState, SignInOutcome, LOGIN_TIMEOUT};
pub use organization::{select_organization, OrganizationSelection};

use crate::app::AppContext;
use crate::error::CliError;

/// Fail with `message` unless the session is authenticated.
pub async fn require_authentication(ctx: &AppContext, message: &str) -> Result<(), CliError> {
    if ctx.session.is_authenticated().await {
        Ok(())
    } else {
        Err(CliError::NotAuthenticated(message.to_string()))
    }
}
