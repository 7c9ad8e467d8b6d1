//! Configuration Merge Pipeline
//!
//! Applies a partial provider update to the dual-mode (Plan/Act) configuration held by
//! the config service. Only the fields an update sets are written; everything else in
//! the persisted record is left alone.

use crate::error::ConfigError;
use crate::provider::{ModelInfo, Provider};
use crate::services::ConfigService;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use tracing::{debug, warn};

/// Operating mode of the assistant
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    Plan,
    Act,
}

impl Mode {
    pub const BOTH: [Mode; 2] = [Mode::Plan, Mode::Act];
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mode::Plan => f.write_str("plan"),
            Mode::Act => f.write_str("act"),
        }
    }
}

/// Partial update: `None` means "leave unchanged"
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderUpdate {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_info: Option<ModelInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl ProviderUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn model(mut self, model_id: impl Into<String>, model_info: Option<ModelInfo>) -> Self {
        self.model_id = Some(model_id.into());
        self.model_info = model_info;
        self
    }

    pub fn api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// True when the update only selects the provider.
    pub fn is_empty(&self) -> bool {
        self.model_id.is_none()
            && self.model_info.is_none()
            && self.api_key.is_none()
            && self.base_url.is_none()
    }
}

/// Persisted settings for one provider within a mode
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ProviderSettings {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model_info: Option<ModelInfo>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
}

impl ProviderSettings {
    /// Field-level merge: set fields overwrite, unset fields are kept.
    pub fn merge(&mut self, update: &ProviderUpdate) {
        if let Some(model_id) = &update.model_id {
            self.model_id = Some(model_id.clone());
        }
        if let Some(model_info) = &update.model_info {
            self.model_info = Some(model_info.clone());
        }
        if let Some(api_key) = &update.api_key {
            self.api_key = Some(api_key.clone());
        }
        if let Some(base_url) = &update.base_url {
            self.base_url = Some(base_url.clone());
        }
    }
}

/// One mode's slot: the selected provider and per-provider settings
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ModeSlot {
    pub provider: Option<Provider>,
    #[serde(default)]
    pub providers: BTreeMap<Provider, ProviderSettings>,
}

impl ModeSlot {
    pub fn settings(&self, provider: Provider) -> Option<&ProviderSettings> {
        self.providers.get(&provider)
    }
}

/// Plan-mode and Act-mode configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DualModeConfig {
    pub plan: ModeSlot,
    pub act: ModeSlot,
}

impl DualModeConfig {
    pub fn slot(&self, mode: Mode) -> &ModeSlot {
        match mode {
            Mode::Plan => &self.plan,
            Mode::Act => &self.act,
        }
    }

    pub fn slot_mut(&mut self, mode: Mode) -> &mut ModeSlot {
        match mode {
            Mode::Plan => &mut self.plan,
            Mode::Act => &mut self.act,
        }
    }

    /// Select `provider` for `mode` and merge `update` into its settings there.
    /// The other mode is not touched.
    pub fn apply(&mut self, mode: Mode, provider: Provider, update: &ProviderUpdate) {
        let slot = self.slot_mut(mode);
        slot.provider = Some(provider);
        slot.providers.entry(provider).or_default().merge(update);
    }
}

/// Modes an update landed in
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApplyReport {
    pub applied: Vec<Mode>,
}

/// Apply `update` for `provider`, either to both modes or to the current mode.
///
/// Both-modes applies are independent: a failure in one mode does not undo the other,
/// and the error names which mode succeeded.
pub async fn apply_provider_update(
    config: &dyn ConfigService,
    provider: Provider,
    update: &ProviderUpdate,
    apply_to_both_modes: bool,
) -> Result<ApplyReport, ConfigError> {
    if !apply_to_both_modes {
        let mode = config.current_mode().await.map_err(|e| ConfigError::Apply {
            mode: Mode::Act,
            message: format!("could not read current mode: {}", e),
        })?;
        debug!(%provider, %mode, "Applying provider update to current mode");
        config
            .apply_provider_update(mode, provider, update)
            .await
            .map_err(|e| ConfigError::Apply {
                mode,
                message: e.to_string(),
            })?;
        return Ok(ApplyReport {
            applied: vec![mode],
        });
    }

    let mut applied = Vec::new();
    let mut failures = Vec::new();
    for mode in Mode::BOTH {
        debug!(%provider, %mode, "Applying provider update");
        match config.apply_provider_update(mode, provider, update).await {
            Ok(()) => applied.push(mode),
            Err(e) => {
                warn!(%provider, %mode, error = %e, "Provider update failed for mode");
                failures.push((mode, e.to_string()));
            }
        }
    }

    let Some((failed, message)) = failures.into_iter().next() else {
        return Ok(ApplyReport { applied });
    };
    match applied.first() {
        Some(&succeeded) => Err(ConfigError::Partial {
            succeeded,
            failed,
            message,
        }),
        None => Err(ConfigError::Apply {
            mode: failed,
            message,
        }),
    }
}
