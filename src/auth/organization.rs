//! Choose which account (personal or an organization) the session acts as.

use super::require_authentication;
use crate::app::AppContext;
use crate::error::CliError;
use crate::services::Organization;
use tracing::debug;

const PERSONAL: &str = "Personal";
const CANCEL: &str = "(Cancel)";

/// What the organization menu did
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OrganizationSelection {
    /// The account has no organizations; nothing was shown.
    NoOrganizations,
    Personal,
    Organization { id: String, name: String },
    Cancelled,
}

fn menu_options(organizations: &[Organization]) -> Vec<String> {
    let mut options = Vec::with_capacity(organizations.len() + 2);
    options.push(PERSONAL.to_string());
    options.extend(organizations.iter().map(|org| {
        if org.active {
            format!("{} (active)", org.name)
        } else {
            org.name.clone()
        }
    }));
    options.push(CANCEL.to_string());
    options
}

pub async fn select_organization(ctx: &AppContext) -> Result<OrganizationSelection, CliError> {
    require_authentication(
        ctx,
        "you must be authenticated with Clino to select an organization. Run 'clino auth' to sign in",
    )
    .await?;

    let organizations = ctx
        .account
        .list_organizations()
        .await
        .map_err(|e| CliError::Account(format!("failed to fetch organizations: {}", e)))?;
    debug!(count = organizations.len(), "Fetched organizations");

    if organizations.is_empty() {
        ctx.say("You don't have any organizations yet.");
        ctx.say("Configure your organization settings.");
        return Ok(OrganizationSelection::NoOrganizations);
    }

    let options = menu_options(&organizations);
    let choice = ctx
        .prompter
        .select("Select which account to use", &options)?;

    let selection = match choice {
        Some(0) => OrganizationSelection::Personal,
        Some(index) if index <= organizations.len() => {
            let org = &organizations[index - 1];
            OrganizationSelection::Organization {
                id: org.id.clone(),
                name: org.name.clone(),
            }
        }
        _ => return Ok(OrganizationSelection::Cancelled),
    };

    let organization_id = match &selection {
        OrganizationSelection::Organization { id, .. } => Some(id.as_str()),
        _ => None,
    };
    ctx.account
        .set_organization(organization_id)
        .await
        .map_err(|e| CliError::Account(format!("failed to set organization: {}", e)))?;

    match &selection {
        OrganizationSelection::Organization { name, .. } => {
            ctx.say(format!("✓ Switched to organization: {}", name))
        }
        _ => ctx.say("✓ Switched to personal account"),
    }
    Ok(selection)
}
