//! Quick setup, interactive BYO setup, and the dual-mode merge pipeline.

use crate::integration::test_utils::{
    FakeAccount, Harness, RecordingConfig, Reply, ScriptedCatalog, ScriptedPrompter,
};
use clino::error::{CliError, ConfigError, ValidationError};
use clino::merge::{apply_provider_update, DualModeConfig, Mode, ProviderUpdate};
use clino::provider::byo::{choose_model_id_with, configure_byo_provider};
use clino::provider::quick_setup::{quick_setup, QuickSetupRequest};
use clino::provider::{
    resolve_model_with, Credential, Provider, ProviderRegistry, ResolutionStrategy,
    DEFAULT_LOCAL_ENDPOINT,
};
use std::sync::atomic::Ordering;

fn harness(config: RecordingConfig, catalog: ScriptedCatalog, replies: Vec<Reply>) -> Harness {
    Harness::new(
        FakeAccount::new(),
        config,
        catalog,
        ScriptedPrompter::new(replies),
    )
}

fn request(provider: &str, api_key: &str, model_id: &str, base_url: &str) -> QuickSetupRequest {
    QuickSetupRequest {
        provider: provider.to_string(),
        api_key: api_key.to_string(),
        model_id: model_id.to_string(),
        base_url: base_url.to_string(),
    }
}

fn byo_index(provider: Provider) -> usize {
    ProviderRegistry::list_byo_providers()
        .iter()
        .position(|(_, p)| *p == provider)
        .unwrap()
}

#[tokio::test]
async fn test_quick_setup_static_provider_applies_to_both_modes() {
    let h = harness(RecordingConfig::new(), ScriptedCatalog::new(), vec![]);

    let summary = quick_setup(
        &h.ctx,
        &request("anthropic", "sk-ant-1", " claude-sonnet-4-5-20250929 ", ""),
    )
    .await
    .unwrap();
    assert_eq!(summary.config.model_id, "claude-sonnet-4-5-20250929");
    assert!(!summary.is_local());
    // Static-list providers trust the id without a catalog round trip.
    assert_eq!(h.catalog.query_count(), 0);

    let state = h.config.snapshot();
    for mode in Mode::BOTH {
        let slot = state.slot(mode);
        assert_eq!(slot.provider, Some(Provider::Anthropic));
        let settings = slot.settings(Provider::Anthropic).unwrap();
        assert_eq!(settings.api_key.as_deref(), Some("sk-ant-1"));
        assert_eq!(
            settings.model_id.as_deref(),
            Some("claude-sonnet-4-5-20250929")
        );
        assert!(settings.base_url.is_none());
    }
    assert_eq!(*h.config.onboarding.lock(), Some(true));
}

#[tokio::test]
async fn test_quick_setup_local_provider_stores_endpoint_as_base_url() {
    let h = harness(
        RecordingConfig::new(),
        ScriptedCatalog::new().failing(Provider::Ollama, "connection refused"),
        vec![],
    );

    let summary = quick_setup(&h.ctx, &request("ollama", "", "qwen3-coder:30b", ""))
        .await
        .unwrap();
    assert!(summary.is_local());
    assert_eq!(summary.config.base_url.as_deref(), Some(DEFAULT_LOCAL_ENDPOINT));
    assert!(summary.config.api_key.is_none());
    assert!(summary.config.model_info.is_none());
    assert!(h.prompter.output().contains("Warning: Could not fetch Ollama models"));

    let state = h.config.snapshot();
    let settings = state.slot(Mode::Plan).settings(Provider::Ollama).unwrap();
    assert_eq!(settings.base_url.as_deref(), Some(DEFAULT_LOCAL_ENDPOINT));
    assert!(settings.api_key.is_none());
}

#[tokio::test]
async fn test_quick_setup_dynamic_provider_attaches_catalog_metadata() {
    let h = harness(
        RecordingConfig::new(),
        ScriptedCatalog::new().with_models(
            Provider::OpenRouter,
            &[("google/gemini-2.0-flash-exp:free", Some("Gemini Flash"))],
        ),
        vec![],
    );

    let summary = quick_setup(
        &h.ctx,
        &request("openrouter", "sk-or", "google/gemini-2.0-flash-exp:free", ""),
    )
    .await
    .unwrap();
    assert_eq!(
        summary.config.model_info.and_then(|i| i.name),
        Some("Gemini Flash".to_string())
    );
    let query = h.catalog.queries.lock()[0].clone();
    assert_eq!(query.provider, Provider::OpenRouter);
    assert_eq!(query.api_key.as_deref(), Some("sk-or"));
}

#[tokio::test]
async fn test_quick_setup_validation_happens_before_any_apply() {
    let h = harness(RecordingConfig::new(), ScriptedCatalog::new(), vec![]);

    let err = quick_setup(&h.ctx, &request("bedrock", "k", "m", ""))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CliError::Validation(ValidationError::BedrockQuickSetup)
    ));

    let err = quick_setup(&h.ctx, &request("anthropic", "k", "m", "https://proxy"))
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        CliError::Validation(ValidationError::BaseUrlNotSupported)
    ));

    assert_eq!(h.config.apply_calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.catalog.query_count(), 0);
    assert_eq!(*h.config.onboarding.lock(), None);
}

#[tokio::test]
async fn test_quick_setup_onboarding_failure_is_not_fatal() {
    let h = harness(
        RecordingConfig::new().failing_onboarding(),
        ScriptedCatalog::new(),
        vec![],
    );
    let summary = quick_setup(&h.ctx, &request("xai", "xai-key", "grok-code-fast-1", ""))
        .await
        .unwrap();
    assert_eq!(summary.config.provider, Provider::Xai);
    assert_eq!(*h.config.onboarding.lock(), None);
}

#[tokio::test]
async fn test_update_keeps_unrelated_fields() {
    let mut existing = DualModeConfig::default();
    for mode in Mode::BOTH {
        existing.apply(
            mode,
            Provider::OpenAi,
            &ProviderUpdate::new()
                .model("gpt-4o", None)
                .api_key("sk-openai")
                .base_url("https://proxy.example.com/v1"),
        );
    }
    let h = harness(
        RecordingConfig::new().with_state(existing),
        ScriptedCatalog::new(),
        vec![],
    );

    let update = ProviderUpdate::new().api_key("sk-rotated");
    apply_provider_update(h.config.as_ref(), Provider::OpenAi, &update, true)
        .await
        .unwrap();

    let state = h.config.snapshot();
    for mode in Mode::BOTH {
        let settings = state.slot(mode).settings(Provider::OpenAi).unwrap();
        assert_eq!(settings.api_key.as_deref(), Some("sk-rotated"));
        assert_eq!(settings.model_id.as_deref(), Some("gpt-4o"));
        assert_eq!(
            settings.base_url.as_deref(),
            Some("https://proxy.example.com/v1")
        );
    }
}

#[tokio::test]
async fn test_single_mode_apply_targets_current_mode() {
    let h = harness(
        RecordingConfig::new().in_mode(Mode::Plan),
        ScriptedCatalog::new(),
        vec![],
    );
    let update = ProviderUpdate::new().model("gemini-2.5-pro", None).api_key("g");
    let report = apply_provider_update(h.config.as_ref(), Provider::Gemini, &update, false)
        .await
        .unwrap();
    assert_eq!(report.applied, vec![Mode::Plan]);

    let state = h.config.snapshot();
    assert_eq!(state.slot(Mode::Plan).provider, Some(Provider::Gemini));
    assert_eq!(state.slot(Mode::Act).provider, None);
}

#[tokio::test]
async fn test_both_modes_partial_failure_is_reported() {
    let h = harness(
        RecordingConfig::new().failing_for(Mode::Act),
        ScriptedCatalog::new(),
        vec![],
    );

    let err = quick_setup(&h.ctx, &request("cerebras", "csk", "gpt-oss-120b", ""))
        .await
        .unwrap_err();
    match err {
        CliError::Config(ConfigError::Partial {
            succeeded, failed, ..
        }) => {
            assert_eq!(succeeded, Mode::Plan);
            assert_eq!(failed, Mode::Act);
        }
        other => panic!("unexpected error: {:?}", other),
    }

    // Plan keeps its update; nothing is rolled back.
    let state = h.config.snapshot();
    assert_eq!(state.slot(Mode::Plan).provider, Some(Provider::Cerebras));
    assert_eq!(state.slot(Mode::Act).provider, None);
    assert_eq!(h.config.apply_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn test_both_modes_total_failure_is_an_apply_error() {
    let h = harness(
        RecordingConfig::new()
            .failing_for(Mode::Plan)
            .failing_for(Mode::Act),
        ScriptedCatalog::new(),
        vec![],
    );
    let update = ProviderUpdate::new().model("m", None);
    let err = apply_provider_update(h.config.as_ref(), Provider::Gemini, &update, true)
        .await
        .unwrap_err();
    assert!(matches!(err, ConfigError::Apply { mode: Mode::Plan, .. }));
}

#[tokio::test]
async fn test_byo_setup_selects_model_from_catalog() {
    let catalog = ScriptedCatalog::new().with_models(
        Provider::Anthropic,
        &[
            ("claude-opus-4-1-20250805", None),
            ("claude-sonnet-4-5-20250929", Some("Claude Sonnet 4.5")),
        ],
    );
    let h = harness(
        RecordingConfig::new(),
        catalog,
        vec![
            Reply::Select(Some(byo_index(Provider::Anthropic))),
            Reply::Input(Some("sk-ant".to_string())),
            Reply::Select(Some(1)),
        ],
    );

    let config = configure_byo_provider(&h.ctx).await.unwrap().unwrap();
    assert_eq!(config.provider, Provider::Anthropic);
    assert_eq!(config.model_id, "claude-sonnet-4-5-20250929");
    assert_eq!(config.api_key.as_deref(), Some("sk-ant"));

    let options = h.prompter.options.lock().clone();
    assert_eq!(options[0].last().map(String::as_str), Some("(Cancel)"));
    assert_eq!(
        options[1],
        vec![
            "claude-opus-4-1-20250805",
            "claude-sonnet-4-5-20250929",
            "Enter model ID manually"
        ]
    );

    let state = h.config.snapshot();
    for mode in Mode::BOTH {
        assert_eq!(state.slot(mode).provider, Some(Provider::Anthropic));
    }
    assert_eq!(*h.config.onboarding.lock(), Some(true));
}

#[tokio::test]
async fn test_byo_setup_falls_back_to_manual_entry() {
    let h = harness(
        RecordingConfig::new(),
        ScriptedCatalog::new().failing(Provider::OpenRouter, "401 unauthorized"),
        vec![
            Reply::Select(Some(byo_index(Provider::OpenRouter))),
            Reply::Input(Some("sk-or".to_string())),
            Reply::Input(Some("  meta-llama/llama-4  ".to_string())),
        ],
    );

    let config = configure_byo_provider(&h.ctx).await.unwrap().unwrap();
    assert_eq!(config.model_id, "meta-llama/llama-4");
    assert!(config.model_info.is_none());
    assert!(h
        .prompter
        .output()
        .contains("Warning: Could not fetch OpenRouter models"));
    assert_eq!(h.prompter.titles.lock().last().map(String::as_str), Some("Model ID"));
}

#[tokio::test]
async fn test_byo_local_provider_prompts_for_base_url() {
    let h = harness(
        RecordingConfig::new(),
        ScriptedCatalog::new().with_models(Provider::Ollama, &[("llama3.1:8b", None)]),
        vec![
            Reply::Select(Some(byo_index(Provider::Ollama))),
            Reply::Input(Some(String::new())),
            Reply::Select(Some(0)),
        ],
    );

    let config = configure_byo_provider(&h.ctx).await.unwrap().unwrap();
    assert_eq!(config.model_id, "llama3.1:8b");
    assert_eq!(config.base_url.as_deref(), Some(DEFAULT_LOCAL_ENDPOINT));
    assert!(config.api_key.is_none());
}

#[tokio::test]
async fn test_byo_cancel_changes_nothing() {
    let providers = ProviderRegistry::list_byo_providers().len();
    let h = harness(
        RecordingConfig::new(),
        ScriptedCatalog::new(),
        vec![Reply::Select(Some(providers))],
    );
    assert!(configure_byo_provider(&h.ctx).await.unwrap().is_none());
    assert_eq!(h.config.apply_calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.prompter.remaining_replies(), 0);
}

#[tokio::test]
async fn test_trust_strategy_skips_catalog_for_resolution_and_picker() {
    let h = harness(
        RecordingConfig::new(),
        ScriptedCatalog::new()
            .with_models(Provider::OpenRouter, &[("openai/gpt-5", Some("GPT-5"))]),
        vec![Reply::Input(Some(" openai/gpt-5 ".to_string()))],
    );
    let credential = Credential::new("sk-or", "");

    let raw = choose_model_id_with(
        &h.ctx,
        Provider::OpenRouter,
        ResolutionStrategy::TrustUserInput,
        &credential,
    )
    .await
    .unwrap()
    .unwrap();
    assert_eq!(h.prompter.titles.lock().as_slice(), ["Model ID"]);
    assert!(h.prompter.options.lock().is_empty());

    let resolved = resolve_model_with(
        h.catalog.as_ref(),
        Provider::OpenRouter,
        ResolutionStrategy::TrustUserInput,
        &raw,
        &credential,
    )
    .await
    .unwrap();
    assert_eq!(resolved.model_id, "openai/gpt-5");
    assert!(resolved.model_info.is_none());
    assert!(resolved.warning.is_none());
    assert_eq!(h.catalog.query_count(), 0);
}
