//! Backend collaborators
//!
//! The account, config, and model catalog services live in the core process. The CLI
//! talks to them only through these traits; [`http::HttpBackend`] is the production
//! implementation.

use crate::error::ServiceError;
use crate::merge::{Mode, ProviderUpdate};
use crate::provider::{ModelInfo, Provider};
use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::pin::Pin;

pub mod http;

pub use http::HttpBackend;

/// Authentication status notification pushed by the account service
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthEvent {
    pub authenticated: bool,
    pub reason: Option<String>,
}

impl AuthEvent {
    pub fn authenticated() -> Self {
        Self {
            authenticated: true,
            reason: None,
        }
    }

    pub fn unauthenticated(reason: Option<String>) -> Self {
        Self {
            authenticated: false,
            reason,
        }
    }
}

/// Stream of auth status events; ends when the subscription closes
pub type AuthEventStream = Pin<Box<dyn Stream<Item = Result<AuthEvent, ServiceError>> + Send>>;

/// An organization the signed-in user belongs to
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Organization {
    #[serde(rename = "organization_id")]
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub active: bool,
}

/// Model catalog keyed by model id. Iteration order is lexicographic.
pub type ModelCatalog = BTreeMap<String, ModelInfo>;

/// Which catalog to fetch, with the credential needed to reach it
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogQuery {
    pub provider: Provider,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl CatalogQuery {
    pub fn managed() -> Self {
        Self::for_provider(Provider::Clino)
    }

    pub fn for_provider(provider: Provider) -> Self {
        Self {
            provider,
            api_key: None,
            base_url: None,
        }
    }
}

#[async_trait]
pub trait AccountService: Send + Sync {
    /// Start the browser hand-off; returns the callback URL to show the user.
    async fn initiate_login(&self) -> Result<String, ServiceError>;

    async fn logout(&self) -> Result<(), ServiceError>;

    /// Cheap authenticated call used to verify the current credentials.
    async fn check_credentials(&self) -> Result<(), ServiceError>;

    async fn subscribe_auth_status(&self) -> Result<AuthEventStream, ServiceError>;

    async fn list_organizations(&self) -> Result<Vec<Organization>, ServiceError>;

    /// `None` selects the personal account.
    async fn set_organization(&self, organization_id: Option<&str>) -> Result<(), ServiceError>;
}

#[async_trait]
pub trait ConfigService: Send + Sync {
    /// Merge `update` into `mode`'s settings for `provider` and select it for that mode.
    async fn apply_provider_update(
        &self,
        mode: Mode,
        provider: Provider,
        update: &ProviderUpdate,
    ) -> Result<(), ServiceError>;

    async fn current_mode(&self) -> Result<Mode, ServiceError>;

    async fn set_onboarding_completed(&self, completed: bool) -> Result<(), ServiceError>;
}

#[async_trait]
pub trait ModelCatalogService: Send + Sync {
    async fn fetch_catalog(&self, query: &CatalogQuery) -> Result<ModelCatalog, ServiceError>;
}
