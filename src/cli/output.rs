//! CLI output: error mapping from domain errors to stable CLI surface.

use crate::error::{AuthError, CliError};

/// Map domain/service errors to the one-line message printed to stderr.
pub fn map_error(e: &CliError) -> String {
    match e {
        CliError::Auth(AuthError::Timeout(_)) => {
            "Authentication timed out. Run 'clino auth' to try again.".to_string()
        }
        CliError::Auth(err) => format!("Authentication failed: {}", err),
        other => format!("Error: {}", other),
    }
}
