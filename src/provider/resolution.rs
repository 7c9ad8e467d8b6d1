//! Model resolution: turn a user-supplied model id into a usable id plus optional
//! metadata, according to the provider's strategy.

use super::{ModelInfo, Provider, ProviderRegistry, ResolutionStrategy, DEFAULT_LOCAL_ENDPOINT};
use crate::error::ValidationError;
use crate::services::{CatalogQuery, ModelCatalogService};
use tracing::{debug, warn};

/// Credential fields as entered by the user
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Credential {
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl Credential {
    pub fn new(api_key: &str, base_url: &str) -> Self {
        Self {
            api_key: non_empty(api_key),
            base_url: non_empty(base_url),
        }
    }

    /// Credential in the form it is stored for `provider`.
    ///
    /// Ollama only has an endpoint: an api key entry is read as the base URL, and an
    /// empty entry becomes the local default.
    pub fn for_provider(&self, provider: Provider) -> Credential {
        if provider == Provider::Ollama {
            let endpoint = resolve_local_endpoint(
                self.api_key.as_deref().unwrap_or(""),
                self.base_url.as_deref().unwrap_or(""),
            );
            return Credential {
                api_key: None,
                base_url: Some(endpoint),
            };
        }
        self.clone()
    }

    pub fn catalog_query(&self, provider: Provider) -> CatalogQuery {
        let stored = self.for_provider(provider);
        CatalogQuery {
            provider,
            api_key: stored.api_key,
            base_url: stored.base_url,
        }
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

/// Endpoint for the local inference server: explicit base URL, else the api key
/// field, else the well-known default.
pub fn resolve_local_endpoint(api_key: &str, base_url: &str) -> String {
    if !base_url.trim().is_empty() {
        base_url.trim().to_string()
    } else if !api_key.trim().is_empty() {
        api_key.trim().to_string()
    } else {
        DEFAULT_LOCAL_ENDPOINT.to_string()
    }
}

/// Outcome of [`resolve_model`]
#[derive(Debug, Clone, PartialEq)]
pub struct ResolvedModel {
    pub model_id: String,
    pub model_info: Option<ModelInfo>,
    /// Set when a catalog lookup was attempted and failed.
    pub warning: Option<String>,
}

/// Resolve `raw_model_id` for `provider`.
///
/// Dynamic providers try their live catalog and fall back to the raw id (with a
/// warning) when it cannot be fetched. Other strategies trust the id as given.
pub async fn resolve_model(
    catalog: &dyn ModelCatalogService,
    provider: Provider,
    raw_model_id: &str,
    credential: &Credential,
) -> Result<ResolvedModel, ValidationError> {
    let strategy = ProviderRegistry::resolution_strategy(provider);
    resolve_model_with(catalog, provider, strategy, raw_model_id, credential).await
}

/// [`resolve_model`] with an explicit strategy instead of the registry's.
pub async fn resolve_model_with(
    catalog: &dyn ModelCatalogService,
    provider: Provider,
    strategy: ResolutionStrategy,
    raw_model_id: &str,
    credential: &Credential,
) -> Result<ResolvedModel, ValidationError> {
    let model_id = raw_model_id.trim();
    if model_id.is_empty() {
        return Err(ValidationError::EmptyModelId);
    }

    match strategy {
        ResolutionStrategy::Dynamic => {
            let query = credential.catalog_query(provider);
            match catalog.fetch_catalog(&query).await {
                Ok(models) => {
                    let model_info = models.get(model_id).cloned();
                    if model_info.is_none() {
                        debug!(
                            %provider,
                            model_id,
                            "Model not in catalog (will be validated on first use)"
                        );
                    }
                    Ok(ResolvedModel {
                        model_id: model_id.to_string(),
                        model_info,
                        warning: None,
                    })
                }
                Err(e) => {
                    let warning = format!(
                        "Could not fetch {} models: {}. Using '{}' as entered.",
                        ProviderRegistry::display_name(provider),
                        e,
                        model_id
                    );
                    warn!(%provider, model_id, error = %e, "Catalog fetch failed, trusting model id");
                    Ok(ResolvedModel {
                        model_id: model_id.to_string(),
                        model_info: None,
                        warning: Some(warning),
                    })
                }
            }
        }
        ResolutionStrategy::StaticList | ResolutionStrategy::TrustUserInput => {
            debug!(
                %provider,
                model_id,
                "{} model ID accepted (will be validated on first use)",
                ProviderRegistry::display_name(provider)
            );
            Ok(ResolvedModel {
                model_id: model_id.to_string(),
                model_info: None,
                warning: None,
            })
        }
    }
}
