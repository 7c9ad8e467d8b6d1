//! Managed provider models: default selection after sign-in and the model picker.
//!
//! The managed provider uses OpenRouter-compatible model ids and always has a live
//! catalog.

use super::{ModelInfo, Provider};
use crate::app::AppContext;
use crate::auth::require_authentication;
use crate::error::CliError;
use crate::merge::{apply_provider_update, ProviderUpdate};
use crate::services::{CatalogQuery, ModelCatalog};
use tracing::{debug, warn};

/// Default model for the managed provider.
pub const DEFAULT_MANAGED_MODEL_ID: &str = "anthropic/claude-sonnet-4.5";

/// Which model to configure by default, and why
#[derive(Debug, Clone, PartialEq)]
pub enum DefaultModelChoice {
    /// The documented default is in the catalog.
    Default(ModelInfo),
    /// Default missing; lexicographically first catalog entry instead.
    FirstAvailable(String, ModelInfo),
    /// Catalog unavailable; default id without metadata.
    Unverified,
}

impl DefaultModelChoice {
    pub fn model_id(&self) -> &str {
        match self {
            DefaultModelChoice::Default(_) | DefaultModelChoice::Unverified => {
                DEFAULT_MANAGED_MODEL_ID
            }
            DefaultModelChoice::FirstAvailable(id, _) => id,
        }
    }

    pub fn model_info(&self) -> Option<&ModelInfo> {
        match self {
            DefaultModelChoice::Default(info) | DefaultModelChoice::FirstAvailable(_, info) => {
                Some(info)
            }
            DefaultModelChoice::Unverified => None,
        }
    }
}

/// Pick the default model from a fetched catalog. `None` when the catalog is empty.
pub fn choose_default_model(models: &ModelCatalog) -> Option<DefaultModelChoice> {
    if let Some(info) = models.get(DEFAULT_MANAGED_MODEL_ID) {
        return Some(DefaultModelChoice::Default(info.clone()));
    }
    models
        .iter()
        .next()
        .map(|(id, info)| DefaultModelChoice::FirstAvailable(id.clone(), info.clone()))
}

pub async fn fetch_managed_catalog(ctx: &AppContext) -> Result<ModelCatalog, CliError> {
    debug!("Fetching Clino models (using OpenRouter-compatible API)");
    ctx.catalog
        .fetch_catalog(&CatalogQuery::managed())
        .await
        .map_err(|e| CliError::Catalog(format!("failed to fetch Clino models: {}", e)))
}

/// Configure the default managed model for both modes, then mark onboarding done.
///
/// Catalog problems degrade to a fallback choice with a warning. Only an empty
/// catalog or a failed config write is an error.
pub async fn configure_default_model(ctx: &AppContext) -> Result<DefaultModelChoice, CliError> {
    debug!("Configuring default Clino model...");

    let choice = match fetch_managed_catalog(ctx).await {
        Ok(models) => match choose_default_model(&models) {
            Some(choice) => choice,
            None => return Err(CliError::Catalog("no usable Clino models found".to_string())),
        },
        Err(e) => {
            warn!(error = %e, "Could not fetch Clino models, using default model");
            ctx.say(format!("Warning: Could not fetch Clino models: {}", e));
            ctx.say(format!("Using default model: {}", DEFAULT_MANAGED_MODEL_ID));
            DefaultModelChoice::Unverified
        }
    };

    if let DefaultModelChoice::FirstAvailable(id, _) = &choice {
        warn!(model_id = %id, "Default model not found in catalog");
        ctx.say(format!(
            "Warning: Default model not found: model {} not found",
            DEFAULT_MANAGED_MODEL_ID
        ));
        ctx.say(format!("Using available model: {}", id));
    }

    apply_managed_model(ctx, choice.model_id(), choice.model_info().cloned()).await?;
    mark_onboarding_completed(ctx).await;
    Ok(choice)
}

/// Interactive picker over the managed catalog; applies the choice to both modes.
///
/// Returns `None` if the user cancelled.
pub async fn change_managed_model(ctx: &AppContext) -> Result<Option<String>, CliError> {
    require_authentication(
        ctx,
        "you must be authenticated with Clino to change models. Run 'clino auth' to sign in",
    )
    .await?;

    let models = fetch_managed_catalog(ctx).await?;
    if models.is_empty() {
        return Err(CliError::Catalog("no usable Clino models found".to_string()));
    }

    let ids: Vec<String> = models.keys().cloned().collect();
    let Some(model_id) = ctx
        .prompter
        .select("Select a Clino model", &ids)?
        .and_then(|index| ids.get(index).cloned())
    else {
        return Ok(None);
    };
    let model_info = models.get(&model_id).cloned();

    apply_managed_model(ctx, &model_id, model_info).await?;
    Ok(Some(model_id))
}

async fn apply_managed_model(
    ctx: &AppContext,
    model_id: &str,
    model_info: Option<ModelInfo>,
) -> Result<(), CliError> {
    let update = ProviderUpdate::new().model(model_id, model_info);
    apply_provider_update(ctx.config.as_ref(), Provider::Clino, &update, true).await?;
    Ok(())
}

/// Set the one-time onboarding flag. Failure is logged and otherwise ignored.
pub async fn mark_onboarding_completed(ctx: &AppContext) {
    match ctx.config.set_onboarding_completed(true).await {
        Ok(()) => debug!("Marked welcome view as completed"),
        Err(e) => warn!(error = %e, "Failed to mark welcome view as completed"),
    }
}
