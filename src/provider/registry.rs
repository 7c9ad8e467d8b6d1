//! Provider registry: static descriptor table and lookups.

use super::CredentialShape::{RequiresBaseUrl, RequiresKey, RequiresNeither};
use super::ResolutionStrategy::{Dynamic, StaticList};
use super::{CredentialShape, Provider, ResolutionStrategy};

/// Display and behavior metadata for one provider
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProviderDescriptor {
    pub provider: Provider,
    pub id: &'static str,
    pub display_name: &'static str,
    pub strategy: ResolutionStrategy,
    pub credentials: CredentialShape,
    pub placeholder: &'static str,
    pub managed: bool,
}

const fn byo(
    provider: Provider,
    id: &'static str,
    display_name: &'static str,
    strategy: ResolutionStrategy,
    credentials: CredentialShape,
    placeholder: &'static str,
) -> ProviderDescriptor {
    ProviderDescriptor {
        provider,
        id,
        display_name,
        strategy,
        credentials,
        placeholder,
        managed: false,
    }
}

/// Indexed by `Provider as usize`; order must match the enum declaration.
#[rustfmt::skip]
static DESCRIPTORS: [ProviderDescriptor; 11] = [
    ProviderDescriptor {
        provider: Provider::Clino,
        id: "clino",
        display_name: "Clino",
        strategy: Dynamic,
        credentials: RequiresNeither,
        placeholder: "e.g., anthropic/claude-sonnet-4.5",
        managed: true,
    },
    byo(Provider::Anthropic, "anthropic", "Anthropic", StaticList, RequiresKey, "e.g., claude-sonnet-4-5-20250929"),
    byo(Provider::OpenAi, "openai", "OpenAI Compatible", Dynamic, RequiresBaseUrl, "e.g., openai/gpt-oss-120b"),
    byo(Provider::OpenAiNative, "openai-native", "OpenAI (Official)", StaticList, RequiresKey, "e.g., gpt-5-2025-08-07"),
    byo(Provider::OpenRouter, "openrouter", "OpenRouter", Dynamic, RequiresKey, "e.g., google/gemini-2.0-flash-exp:free"),
    byo(Provider::Xai, "xai", "X AI (Grok)", StaticList, RequiresKey, "e.g., grok-code-fast-1"),
    byo(Provider::Bedrock, "bedrock", "AWS Bedrock", StaticList, RequiresKey, "e.g., anthropic.claude-sonnet-4-5-20250929-v1:0"),
    byo(Provider::Gemini, "gemini", "Google Gemini", StaticList, RequiresKey, "e.g., gemini-2.5-pro"),
    byo(Provider::Ollama, "ollama", "Ollama", Dynamic, RequiresNeither, "e.g., qwen3-coder:30b"),
    byo(Provider::Cerebras, "cerebras", "Cerebras", StaticList, RequiresKey, "e.g., gpt-oss-120b"),
    byo(Provider::Oca, "oca", "Oracle Code Assist", Dynamic, RequiresKey, "e.g., oca/llama4"),
];

pub(super) fn descriptor(provider: Provider) -> &'static ProviderDescriptor {
    &DESCRIPTORS[provider as usize]
}

/// Stateless lookups over the descriptor table.
pub struct ProviderRegistry;

impl ProviderRegistry {
    /// Every descriptor in table order, managed provider first.
    pub fn all() -> &'static [ProviderDescriptor] {
        &DESCRIPTORS
    }

    /// Ordered (display name, provider) pairs for the bring-your-own providers.
    pub fn list_byo_providers() -> Vec<(&'static str, Provider)> {
        DESCRIPTORS
            .iter()
            .filter(|d| !d.managed)
            .map(|d| (d.display_name, d.provider))
            .collect()
    }

    pub fn resolution_strategy(provider: Provider) -> ResolutionStrategy {
        descriptor(provider).strategy
    }

    pub fn credential_shape(provider: Provider) -> CredentialShape {
        descriptor(provider).credentials
    }

    pub fn placeholder(provider: Provider) -> &'static str {
        descriptor(provider).placeholder
    }

    pub fn display_name(provider: Provider) -> &'static str {
        descriptor(provider).display_name
    }
}
