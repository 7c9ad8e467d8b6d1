//! Non-interactive provider setup from command-line flags.

use super::managed::mark_onboarding_completed;
use super::{resolve_model, Credential, Provider, ProviderConfig};
use crate::app::AppContext;
use crate::error::{CliError, ValidationError};
use crate::merge::apply_provider_update;
use tracing::{debug, info};

/// Providers accepted by quick setup, in the order they are listed to the user.
pub const QUICK_SETUP_PROVIDERS: [Provider; 8] = [
    Provider::OpenAiNative,
    Provider::OpenAi,
    Provider::Anthropic,
    Provider::Gemini,
    Provider::OpenRouter,
    Provider::Xai,
    Provider::Cerebras,
    Provider::Ollama,
];

/// Raw flag values
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct QuickSetupRequest {
    pub provider: String,
    pub api_key: String,
    pub model_id: String,
    pub base_url: String,
}

/// What quick setup stored
#[derive(Debug, Clone, PartialEq)]
pub struct QuickSetupSummary {
    pub config: ProviderConfig,
}

impl QuickSetupSummary {
    pub fn is_local(&self) -> bool {
        self.config.provider == Provider::Ollama
    }
}

/// Validate flags before anything is sent. Returns the parsed provider.
pub fn validate_quick_setup_inputs(request: &QuickSetupRequest) -> Result<Provider, ValidationError> {
    if request.provider.is_empty() {
        return Err(ValidationError::MissingProvider);
    }

    let local = request.provider.trim().eq_ignore_ascii_case(Provider::Ollama.id());
    if request.api_key.trim().is_empty() && !local {
        return Err(ValidationError::MissingApiKey(request.provider.clone()));
    }

    if request.model_id.trim().is_empty() {
        return Err(ValidationError::MissingModelId);
    }

    let provider = validate_quick_setup_provider(&request.provider)?;

    if provider != Provider::OpenAi && !request.base_url.is_empty() {
        return Err(ValidationError::BaseUrlNotSupported);
    }

    Ok(provider)
}

fn validate_quick_setup_provider(provider_id: &str) -> Result<Provider, ValidationError> {
    let provider = match provider_id.parse::<Provider>() {
        Ok(Provider::Bedrock) => return Err(ValidationError::BedrockQuickSetup),
        Ok(provider) => provider,
        Err(_) => {
            let supported: Vec<&str> = QUICK_SETUP_PROVIDERS.iter().map(|p| p.id()).collect();
            return Err(ValidationError::UnsupportedProvider(
                provider_id.to_string(),
                supported.join(", "),
            ));
        }
    };

    if !QUICK_SETUP_PROVIDERS.contains(&provider) {
        return Err(ValidationError::QuickSetupUnsupported(provider_id.to_string()));
    }
    Ok(provider)
}

/// Validate, resolve the model, and store the provider for both modes.
pub async fn quick_setup(
    ctx: &AppContext,
    request: &QuickSetupRequest,
) -> Result<QuickSetupSummary, CliError> {
    let provider = validate_quick_setup_inputs(request)?;
    debug!(%provider, "Quick setup inputs validated");

    let credential = Credential::new(&request.api_key, &request.base_url);
    let resolved = resolve_model(ctx.catalog.as_ref(), provider, &request.model_id, &credential)
        .await
        .map_err(|e| CliError::Catalog(format!("model validation failed: {}", e)))?;
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

    info!(%provider, model_id = %config.model_id, "Quick setup completed");
    Ok(QuickSetupSummary { config })
}
