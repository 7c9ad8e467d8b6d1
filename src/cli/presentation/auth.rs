//! Auth command presentation

use crate::auth::{OrganizationSelection, SignInOutcome};

pub fn format_sign_in_outcome(outcome: &SignInOutcome) -> String {
    match outcome {
        SignInOutcome::SignedIn(Some(choice)) => {
            format!("Clino model: {}", choice.model_id())
        }
        SignInOutcome::SignedIn(None) => String::new(),
        SignInOutcome::AlreadySignedIn { signed_out: true } => String::new(),
        SignInOutcome::AlreadySignedIn { signed_out: false } => {
            "Still signed in to Clino.".to_string()
        }
    }
}

pub fn format_model_changed(model_id: Option<&str>) -> String {
    match model_id {
        Some(id) => format!("✓ Clino model set to {} for plan and act modes", id),
        None => "Model selection cancelled.".to_string(),
    }
}

/// The selection flow prints its own confirmation; only the non-printing outcomes
/// produce text.
pub fn format_organization_selection(selection: &OrganizationSelection) -> String {
    match selection {
        OrganizationSelection::Cancelled => "Organization selection cancelled.".to_string(),
        _ => String::new(),
    }
}
