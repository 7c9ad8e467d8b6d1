//! Interactive bring-your-own provider setup.

use super::managed::mark_onboarding_completed;
use super::{
    resolve_model, Credential, CredentialShape, Provider, ProviderConfig, ProviderRegistry,
    ResolutionStrategy,
};
use crate::app::AppContext;
use crate::error::CliError;
use crate::merge::apply_provider_update;
use crate::prompt::{api_key_not_empty, not_blank, InputRequest};
use tracing::{debug, warn};

const MANUAL_ENTRY: &str = "Enter model ID manually";
const CANCEL: &str = "(Cancel)";

/// Provider menu. `None` if cancelled.
pub fn select_byo_provider(ctx: &AppContext) -> Result<Option<Provider>, CliError> {
    let providers = ProviderRegistry::list_byo_providers();
    let mut options: Vec<String> = providers.iter().map(|(name, _)| name.to_string()).collect();
    options.push(CANCEL.to_string());

    match ctx.prompter.select("Select an API provider", &options)? {
        Some(index) if index < providers.len() => Ok(Some(providers[index].1)),
        _ => Ok(None),
    }
}

/// Ask for the credential fields `provider` needs.
pub fn prompt_for_credentials(
    ctx: &AppContext,
    provider: Provider,
) -> Result<Option<Credential>, CliError> {
    let shape = ProviderRegistry::credential_shape(provider);
    let request = match shape {
        CredentialShape::RequiresNeither => {
            InputRequest::new("Base URL (optional, press Enter for default)")
        }
        CredentialShape::RequiresKey | CredentialShape::RequiresBaseUrl => {
            InputRequest::new("API Key").secret().validate(api_key_not_empty)
        }
    };
    let Some(first) = ctx.prompter.input(&request)? else {
        return Ok(None);
    };

    let credential = match shape {
        CredentialShape::RequiresNeither => Credential::new("", &first),
        CredentialShape::RequiresKey => Credential::new(&first, ""),
        CredentialShape::RequiresBaseUrl => {
            let base_url_request =
                InputRequest::new("Base URL (optional, for OpenAI-compatible providers)")
                    .placeholder("e.g., https://api.example.com/v1")
                    .description("Press Enter to skip if using standard OpenAI API");
            let Some(base_url) = ctx.prompter.input(&base_url_request)? else {
                return Ok(None);
            };
            Credential::new(&first, &base_url)
        }
    };
    Ok(Some(credential))
}

/// Offer the provider's catalog (when it has one), else manual entry.
pub async fn choose_model_id(
    ctx: &AppContext,
    provider: Provider,
    credential: &Credential,
) -> Result<Option<String>, CliError> {
    let strategy = ProviderRegistry::resolution_strategy(provider);
    choose_model_id_with(ctx, provider, strategy, credential).await
}

/// [`choose_model_id`] with an explicit strategy; `TrustUserInput` skips the catalog.
pub async fn choose_model_id_with(
    ctx: &AppContext,
    provider: Provider,
    strategy: ResolutionStrategy,
    credential: &Credential,
) -> Result<Option<String>, CliError> {
    if strategy.offers_model_list() {
        match ctx.catalog.fetch_catalog(&credential.catalog_query(provider)).await {
            Ok(models) if !models.is_empty() => {
                let ids: Vec<String> = models.keys().cloned().collect();
                let mut options = ids.clone();
                options.push(MANUAL_ENTRY.to_string());
                let title = format!("Select a {} model", provider.display_name());
                match ctx.prompter.select(&title, &options)? {
                    Some(index) if index < ids.len() => return Ok(Some(ids[index].clone())),
                    Some(_) => {}
                    None => return Ok(None),
                }
            }
            Ok(_) => debug!(%provider, "Provider returned no models, using manual entry"),
            Err(e) => {
                warn!(%provider, error = %e, "Could not fetch models, using manual entry");
                ctx.say(format!(
                    "Warning: Could not fetch {} models: {}",
                    provider.display_name(),
                    e
                ));
            }
        }
    }

    let request = InputRequest::new("Model ID")
        .placeholder(ProviderRegistry::placeholder(provider))
        .validate(not_blank);
    ctx.prompter.input(&request)
}

/// Full BYO flow: provider, credentials, model, apply to both modes.
///
/// Returns the applied configuration, or `None` if the user cancelled.
pub async fn configure_byo_provider(ctx: &AppContext) -> Result<Option<ProviderConfig>, CliError> {
    let Some(provider) = select_byo_provider(ctx)? else {
        return Ok(None);
    };
    let Some(credential) = prompt_for_credentials(ctx, provider)? else {
        return Ok(None);
    };
    let Some(raw_model_id) = choose_model_id(ctx, provider, &credential).await? else {
        return Ok(None);
    };

    let resolved = resolve_model(ctx.catalog.as_ref(), provider, &raw_model_id, &credential).await?;
    if let Some(warning) = &resolved.warning {
        ctx.say(format!("Warning: {}", warning));
    }

    let stored = credential.for_provider(provider);
    let config = ProviderConfig {
        provider,
        model_id: resolved.model_id,
        model_info: resolved.model_info,
        api_key: stored.api_key,
        base_url: stored.base_url,
    };
    apply_provider_update(ctx.config.as_ref(), provider, &config.to_update(), true).await?;
    mark_onboarding_completed(ctx).await;
    Ok(Some(config))
}
