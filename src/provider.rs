//! Model Provider Catalog
//!
//! The fixed set of providers the assistant can be pointed at: the managed first-party
//! provider plus the bring-your-own (BYO) providers that take a user credential. Each
//! provider carries a descriptor record (display name, model-resolution strategy,
//! credential shape, placeholder model id) looked up from a static table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub mod byo;
pub mod managed;
pub mod quick_setup;
pub mod registry;
pub mod resolution;

pub use registry::{ProviderDescriptor, ProviderRegistry};
pub use resolution::{
    resolve_local_endpoint, resolve_model, resolve_model_with, Credential, ResolvedModel,
};

/// Well-known endpoint of a local Ollama server.
pub const DEFAULT_LOCAL_ENDPOINT: &str = "http://localhost:11434";

/// Supported API providers.
///
/// Declaration order matches the descriptor table in [`registry`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Provider {
    Clino,
    Anthropic,
    #[serde(rename = "openai")]
    OpenAi,
    #[serde(rename = "openai-native")]
    OpenAiNative,
    #[serde(rename = "openrouter")]
    OpenRouter,
    Xai,
    Bedrock,
    Gemini,
    Ollama,
    Cerebras,
    Oca,
}

impl Provider {
    pub const ALL: [Provider; 11] = [
        Provider::Clino,
        Provider::Anthropic,
        Provider::OpenAi,
        Provider::OpenAiNative,
        Provider::OpenRouter,
        Provider::Xai,
        Provider::Bedrock,
        Provider::Gemini,
        Provider::Ollama,
        Provider::Cerebras,
        Provider::Oca,
    ];

    /// Descriptor record for this provider.
    pub fn descriptor(self) -> &'static ProviderDescriptor {
        registry::descriptor(self)
    }

    /// Stable slug used on the command line and on the wire.
    pub fn id(self) -> &'static str {
        self.descriptor().id
    }

    pub fn display_name(self) -> &'static str {
        self.descriptor().display_name
    }

    pub fn is_managed(self) -> bool {
        self.descriptor().managed
    }
}

impl fmt::Display for Provider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Provider {
    type Err = String;

    /// Parse a provider slug, ignoring case and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        Provider::ALL
            .iter()
            .copied()
            .find(|p| p.id() == normalized)
            .ok_or_else(|| s.to_string())
    }
}

/// How a usable model id is obtained for a provider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ResolutionStrategy {
    /// A live catalog can be fetched from the provider.
    Dynamic,
    /// The backend ships a predefined model list.
    StaticList,
    /// Accept the user's id; validated on first real use.
    TrustUserInput,
}

impl ResolutionStrategy {
    pub fn label(self) -> &'static str {
        match self {
            ResolutionStrategy::Dynamic => "dynamic",
            ResolutionStrategy::StaticList => "static",
            ResolutionStrategy::TrustUserInput => "trust",
        }
    }

    /// Whether a model list can be offered before manual entry.
    pub fn offers_model_list(self) -> bool {
        !matches!(self, ResolutionStrategy::TrustUserInput)
    }
}

/// Which credential fields a provider needs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CredentialShape {
    RequiresKey,
    /// API key plus an optional custom base URL.
    RequiresBaseUrl,
    /// Local server; only an optional base URL.
    RequiresNeither,
}

impl CredentialShape {
    pub fn label(self) -> &'static str {
        match self {
            CredentialShape::RequiresKey => "api key",
            CredentialShape::RequiresBaseUrl => "api key + base url",
            CredentialShape::RequiresNeither => "base url (optional)",
        }
    }

    pub fn requires_api_key(self) -> bool {
        !matches!(self, CredentialShape::RequiresNeither)
    }
}

/// Rich model metadata as returned by an OpenRouter-compatible catalog.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModelInfo {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context_window: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub input_price: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_price: Option<f64>,
    #[serde(default)]
    pub supports_images: bool,
    #[serde(default)]
    pub supports_prompt_cache: bool,
}

/// A resolved provider configuration, ready to be merged into a mode slot.
///
/// `model_id` is non-empty. A missing `model_info` means the backend validates the
/// model lazily on first use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProviderConfig {
    pub provider: Provider,
    pub model_id: String,
    pub model_info: Option<ModelInfo>,
    pub api_key: Option<String>,
    pub base_url: Option<String>,
}

impl ProviderConfig {
    /// Partial update carrying every field this configuration sets.
    pub fn to_update(&self) -> crate::merge::ProviderUpdate {
        crate::merge::ProviderUpdate {
            model_id: Some(self.model_id.clone()),
            model_info: self.model_info.clone(),
            api_key: self.api_key.clone(),
            base_url: self.base_url.clone(),
        }
    }
}
