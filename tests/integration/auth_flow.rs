//! Sign-in, sign-out, session caching, and the account-scoped commands.

use crate::integration::test_utils::{
    FakeAccount, Harness, RecordingConfig, Reply, ScriptedCatalog, ScriptedPrompter,
};
use clino::auth::{
    select_organization, AuthOrchestrator, AuthState, AuthStatusListener, OrganizationSelection,
    SignInOutcome,
};
use clino::error::{AuthError, CliError, ServiceError};
use clino::merge::Mode;
use clino::provider::managed::{change_managed_model, DefaultModelChoice, DEFAULT_MANAGED_MODEL_ID};
use clino::provider::Provider;
use clino::services::{AccountService, AuthEvent, Organization};
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::Duration;

fn clino_catalog() -> ScriptedCatalog {
    ScriptedCatalog::new().with_models(
        Provider::Clino,
        &[
            ("anthropic/claude-sonnet-4.5", Some("Claude Sonnet 4.5")),
            ("openai/gpt-5", Some("GPT-5")),
        ],
    )
}

async fn wait_for_subscription_release(account: &FakeAccount) -> bool {
    for _ in 0..50 {
        if !account.has_open_subscription() {
            return true;
        }
        tokio::task::yield_now().await;
    }
    !account.has_open_subscription()
}

#[tokio::test]
async fn test_session_caches_only_success() {
    let h = Harness::new(
        FakeAccount::signed_in(),
        RecordingConfig::new(),
        ScriptedCatalog::new(),
        ScriptedPrompter::default(),
    );
    assert!(h.ctx.session.is_authenticated().await);
    assert!(h.ctx.session.is_authenticated().await);
    assert_eq!(h.account.check_calls.load(Ordering::SeqCst), 1);

    let h = Harness::new(
        FakeAccount::new(),
        RecordingConfig::new(),
        ScriptedCatalog::new(),
        ScriptedPrompter::default(),
    );
    assert!(!h.ctx.session.is_authenticated().await);
    assert!(!h.ctx.session.is_authenticated().await);
    assert_eq!(h.account.check_calls.load(Ordering::SeqCst), 2);

    // A later success is picked up once the server agrees.
    h.account.set_credentials_valid(true);
    assert!(h.ctx.session.is_authenticated().await);
    assert!(h.ctx.session.cached());
}

#[tokio::test]
async fn test_sign_in_configures_default_model_for_both_modes() {
    let account = FakeAccount::new().on_login(vec![Ok(AuthEvent::authenticated())]);
    let h = Harness::new(
        account,
        RecordingConfig::new(),
        clino_catalog(),
        ScriptedPrompter::default(),
    );

    let mut auth = AuthOrchestrator::new(&h.ctx);
    assert_eq!(auth.state(), AuthState::Unauthenticated);
    let outcome = auth.handle_auth().await.unwrap();
    assert_eq!(auth.state(), AuthState::Authenticated);

    match &outcome {
        SignInOutcome::SignedIn(Some(DefaultModelChoice::Default(info))) => {
            assert_eq!(info.name.as_deref(), Some("Claude Sonnet 4.5"));
        }
        other => panic!("unexpected outcome: {:?}", other),
    }

    let state = h.config.snapshot();
    for mode in Mode::BOTH {
        let slot = state.slot(mode);
        assert_eq!(slot.provider, Some(Provider::Clino));
        let settings = slot.settings(Provider::Clino).unwrap();
        assert_eq!(settings.model_id.as_deref(), Some(DEFAULT_MANAGED_MODEL_ID));
        assert!(settings.model_info.is_some());
    }
    assert_eq!(*h.config.onboarding.lock(), Some(true));

    let output = h.prompter.output();
    assert!(output.contains("visit this URL"));
    assert!(output.contains("https://app.clino.test/auth?state=abc"));
    assert!(output.contains("Timeout: 5 minutes"));

    // Session is cached; no further credential checks.
    let checks = h.account.check_calls.load(Ordering::SeqCst);
    assert!(h.ctx.session.is_authenticated().await);
    assert_eq!(h.account.check_calls.load(Ordering::SeqCst), checks);
    assert!(wait_for_subscription_release(&h.account).await);
}

#[tokio::test]
async fn test_leading_unauthenticated_events_are_ignored() {
    let account = FakeAccount::new().on_login(vec![
        Ok(AuthEvent::unauthenticated(Some("pending".to_string()))),
        Ok(AuthEvent::authenticated()),
    ]);
    let h = Harness::new(
        account,
        RecordingConfig::new(),
        clino_catalog(),
        ScriptedPrompter::default(),
    );

    AuthOrchestrator::new(&h.ctx).sign_in().await.unwrap();
    assert!(h.ctx.session.cached());
}

#[tokio::test(start_paused = true)]
async fn test_sign_in_times_out_without_confirmation() {
    let h = Harness::new(
        FakeAccount::new(),
        RecordingConfig::new(),
        clino_catalog(),
        ScriptedPrompter::default(),
    );

    let mut auth = AuthOrchestrator::new(&h.ctx);
    let err = auth.sign_in().await.unwrap_err();
    assert!(matches!(err, CliError::Auth(AuthError::Timeout(d)) if d == Duration::from_secs(300)));
    assert_eq!(auth.state(), AuthState::Unauthenticated);
    assert!(!h.ctx.session.cached());
    assert!(h.prompter.output().contains("Authentication failed or timed out."));
    assert!(wait_for_subscription_release(&h.account).await);
    assert_eq!(h.config.apply_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_closed_subscription_fails_sign_in() {
    let account = FakeAccount::new().close_after_login();
    let h = Harness::new(
        account,
        RecordingConfig::new(),
        clino_catalog(),
        ScriptedPrompter::default(),
    );

    let err = AuthOrchestrator::new(&h.ctx).sign_in().await.unwrap_err();
    assert!(matches!(err, CliError::Auth(AuthError::SubscriptionClosed(None))));
    assert!(!h.ctx.session.cached());
}

#[tokio::test]
async fn test_stream_error_fails_sign_in() {
    let account = FakeAccount::new().on_login(vec![Err(ServiceError::Transport(
        "stream reset".to_string(),
    ))]);
    let h = Harness::new(
        account,
        RecordingConfig::new(),
        clino_catalog(),
        ScriptedPrompter::default(),
    );

    let err = AuthOrchestrator::new(&h.ctx).sign_in().await.unwrap_err();
    match err {
        CliError::Auth(AuthError::SubscriptionClosed(Some(reason))) => {
            assert!(reason.contains("stream reset"))
        }
        other => panic!("unexpected error: {:?}", other),
    }
}

#[tokio::test]
async fn test_subscribe_failure_never_initiates_login() {
    let h = Harness::new(
        FakeAccount::new().failing_subscribe(),
        RecordingConfig::new(),
        clino_catalog(),
        ScriptedPrompter::default(),
    );

    let err = AuthOrchestrator::new(&h.ctx).sign_in().await.unwrap_err();
    assert!(matches!(err, CliError::Auth(AuthError::Subscribe(_))));
    assert_eq!(h.account.login_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_listener_stop_is_idempotent() {
    let account = Arc::new(FakeAccount::new());
    let mut listener = AuthStatusListener::new(account.clone());
    listener.stop();
    listener.start().await.unwrap();
    assert!(listener.is_running());
    listener.stop();
    listener.stop();
    assert!(!listener.is_running());
    assert!(wait_for_subscription_release(&account).await);

    let err = listener
        .wait_for_authentication(Duration::from_secs(1))
        .await
        .unwrap_err();
    assert!(!err.is_timeout());
}

#[tokio::test(start_paused = true)]
async fn test_listener_timeout_never_fires_early() {
    let account = Arc::new(FakeAccount::new());
    let mut listener = AuthStatusListener::new(account.clone());
    listener.start().await.unwrap();

    let budget = Duration::from_secs(300);
    let started = tokio::time::Instant::now();
    let err = listener.wait_for_authentication(budget).await.unwrap_err();
    assert!(matches!(err, AuthError::Timeout(d) if d == budget));
    assert!(started.elapsed() >= budget);

    listener.stop();
    assert!(wait_for_subscription_release(&account).await);
}

#[tokio::test(start_paused = true)]
async fn test_listener_first_authenticated_event_wins() {
    let account = Arc::new(
        FakeAccount::new()
            .on_login(vec![
                Ok(AuthEvent::authenticated()),
                Ok(AuthEvent::unauthenticated(Some("expired".to_string()))),
                Err(ServiceError::Transport("stream reset".to_string())),
            ])
            .close_after_login(),
    );
    let mut listener = AuthStatusListener::new(account.clone());
    listener.start().await.unwrap();
    account.initiate_login().await.unwrap();

    let started = tokio::time::Instant::now();
    let result = listener.wait_for_authentication(Duration::from_secs(300)).await;
    assert!(result.is_ok(), "unexpected result: {:?}", result);
    assert!(started.elapsed() < Duration::from_secs(300));
    listener.stop();
}

#[tokio::test]
async fn test_default_model_falls_back_when_catalog_unavailable() {
    let account = FakeAccount::new().on_login(vec![Ok(AuthEvent::authenticated())]);
    let h = Harness::new(
        account,
        RecordingConfig::new(),
        ScriptedCatalog::new().failing(Provider::Clino, "connection reset"),
        ScriptedPrompter::default(),
    );

    let outcome = AuthOrchestrator::new(&h.ctx).handle_auth().await.unwrap();
    assert_eq!(outcome, SignInOutcome::SignedIn(Some(DefaultModelChoice::Unverified)));

    let state = h.config.snapshot();
    for mode in Mode::BOTH {
        let settings = state.slot(mode).settings(Provider::Clino).unwrap();
        assert_eq!(settings.model_id.as_deref(), Some(DEFAULT_MANAGED_MODEL_ID));
        assert!(settings.model_info.is_none());
    }
    assert!(h.prompter.output().contains("Warning: Could not fetch Clino models"));
    assert_eq!(*h.config.onboarding.lock(), Some(true));
}

#[tokio::test]
async fn test_default_model_uses_first_available_when_default_missing() {
    let account = FakeAccount::new().on_login(vec![Ok(AuthEvent::authenticated())]);
    let catalog = ScriptedCatalog::new().with_models(
        Provider::Clino,
        &[("x-ai/grok-4", Some("Grok 4")), ("google/gemini-2.5-pro", None)],
    );
    let h = Harness::new(
        account,
        RecordingConfig::new(),
        catalog,
        ScriptedPrompter::default(),
    );

    let outcome = AuthOrchestrator::new(&h.ctx).handle_auth().await.unwrap();
    match outcome {
        SignInOutcome::SignedIn(Some(DefaultModelChoice::FirstAvailable(id, _))) => {
            assert_eq!(id, "google/gemini-2.5-pro")
        }
        other => panic!("unexpected outcome: {:?}", other),
    }
    assert_eq!(*h.config.onboarding.lock(), Some(true));
}

#[tokio::test]
async fn test_default_model_failure_does_not_fail_sign_in() {
    let account = FakeAccount::new().on_login(vec![Ok(AuthEvent::authenticated())]);
    let h = Harness::new(
        account,
        RecordingConfig::new(),
        ScriptedCatalog::new().with_models(Provider::Clino, &[]),
        ScriptedPrompter::default(),
    );

    let outcome = AuthOrchestrator::new(&h.ctx).handle_auth().await.unwrap();
    assert_eq!(outcome, SignInOutcome::SignedIn(None));
    assert!(h.ctx.session.cached());
    let output = h.prompter.output();
    assert!(output.contains("Warning: Could not configure default Clino model"));
    assert!(output.contains("Change Clino model"));
}

#[tokio::test]
async fn test_already_signed_in_offers_sign_out() {
    // Declined
    let h = Harness::new(
        FakeAccount::signed_in(),
        RecordingConfig::new(),
        ScriptedCatalog::new(),
        ScriptedPrompter::new(vec![Reply::Confirm(false)]),
    );
    let outcome = AuthOrchestrator::new(&h.ctx).handle_auth().await.unwrap();
    assert_eq!(outcome, SignInOutcome::AlreadySignedIn { signed_out: false });
    assert_eq!(h.account.logout_calls.load(Ordering::SeqCst), 0);
    assert_eq!(h.account.login_calls.load(Ordering::SeqCst), 0);
    assert_eq!(
        h.prompter.titles.lock().as_slice(),
        ["You are already signed in to Clino."]
    );

    // Accepted
    let h = Harness::new(
        FakeAccount::signed_in(),
        RecordingConfig::new(),
        ScriptedCatalog::new(),
        ScriptedPrompter::new(vec![Reply::Confirm(true)]),
    );
    let mut auth = AuthOrchestrator::new(&h.ctx);
    let outcome = auth.handle_auth().await.unwrap();
    assert_eq!(outcome, SignInOutcome::AlreadySignedIn { signed_out: true });
    assert_eq!(auth.state(), AuthState::Unauthenticated);
    assert_eq!(h.account.logout_calls.load(Ordering::SeqCst), 1);
    assert!(!h.ctx.session.cached());

    // Prompt failure counts as declining
    let h = Harness::new(
        FakeAccount::signed_in(),
        RecordingConfig::new(),
        ScriptedCatalog::new(),
        ScriptedPrompter::new(vec![Reply::Fail]),
    );
    let outcome = AuthOrchestrator::new(&h.ctx).handle_auth().await.unwrap();
    assert_eq!(outcome, SignInOutcome::AlreadySignedIn { signed_out: false });
    assert_eq!(h.account.logout_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_change_model_requires_authentication() {
    let h = Harness::new(
        FakeAccount::new(),
        RecordingConfig::new(),
        clino_catalog(),
        ScriptedPrompter::default(),
    );
    match change_managed_model(&h.ctx).await {
        Err(CliError::NotAuthenticated(message)) => {
            assert!(message.contains("to change models"))
        }
        other => panic!("unexpected result: {:?}", other),
    }
    assert_eq!(h.catalog.query_count(), 0);
}

#[tokio::test]
async fn test_change_model_applies_choice_with_metadata() {
    let h = Harness::new(
        FakeAccount::signed_in(),
        RecordingConfig::new(),
        clino_catalog(),
        ScriptedPrompter::new(vec![Reply::Select(Some(1))]),
    );

    let chosen = change_managed_model(&h.ctx).await.unwrap();
    assert_eq!(chosen.as_deref(), Some("openai/gpt-5"));
    assert_eq!(
        h.prompter.options.lock()[0],
        vec!["anthropic/claude-sonnet-4.5", "openai/gpt-5"]
    );

    let state = h.config.snapshot();
    for mode in Mode::BOTH {
        let settings = state.slot(mode).settings(Provider::Clino).unwrap();
        assert_eq!(settings.model_id.as_deref(), Some("openai/gpt-5"));
        assert_eq!(
            settings.model_info.as_ref().and_then(|i| i.name.as_deref()),
            Some("GPT-5")
        );
    }
}

#[tokio::test]
async fn test_change_model_out_of_range_choice_is_cancel() {
    let h = Harness::new(
        FakeAccount::signed_in(),
        RecordingConfig::new(),
        clino_catalog(),
        ScriptedPrompter::new(vec![Reply::Select(Some(7))]),
    );

    assert_eq!(change_managed_model(&h.ctx).await.unwrap(), None);
    assert_eq!(h.config.apply_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn test_change_model_catalog_failure_is_an_error() {
    let h = Harness::new(
        FakeAccount::signed_in(),
        RecordingConfig::new(),
        ScriptedCatalog::new().failing(Provider::Clino, "offline"),
        ScriptedPrompter::default(),
    );
    assert!(matches!(
        change_managed_model(&h.ctx).await,
        Err(CliError::Catalog(_))
    ));
    assert_eq!(h.config.apply_calls.load(Ordering::SeqCst), 0);
}

fn organizations() -> Vec<Organization> {
    vec![
        Organization {
            id: "org-acme".to_string(),
            name: "Acme".to_string(),
            active: true,
        },
        Organization {
            id: "org-globex".to_string(),
            name: "Globex".to_string(),
            active: false,
        },
    ]
}

#[tokio::test]
async fn test_select_organization() {
    let h = Harness::new(
        FakeAccount::signed_in().with_organizations(organizations()),
        RecordingConfig::new(),
        ScriptedCatalog::new(),
        ScriptedPrompter::new(vec![Reply::Select(Some(2))]),
    );
    let selection = select_organization(&h.ctx).await.unwrap();
    assert_eq!(
        selection,
        OrganizationSelection::Organization {
            id: "org-globex".to_string(),
            name: "Globex".to_string()
        }
    );
    assert_eq!(
        *h.account.selected_organization.lock(),
        Some(Some("org-globex".to_string()))
    );
    assert!(h.prompter.output().contains("✓ Switched to organization: Globex"));
    assert_eq!(
        h.prompter.options.lock()[0],
        vec!["Personal", "Acme (active)", "Globex", "(Cancel)"]
    );
}

#[tokio::test]
async fn test_select_personal_account_and_cancel() {
    let h = Harness::new(
        FakeAccount::signed_in().with_organizations(organizations()),
        RecordingConfig::new(),
        ScriptedCatalog::new(),
        ScriptedPrompter::new(vec![Reply::Select(Some(0)), Reply::Select(Some(3))]),
    );
    assert_eq!(
        select_organization(&h.ctx).await.unwrap(),
        OrganizationSelection::Personal
    );
    assert_eq!(*h.account.selected_organization.lock(), Some(None));
    assert!(h.prompter.output().contains("✓ Switched to personal account"));

    *h.account.selected_organization.lock() = None;
    assert_eq!(
        select_organization(&h.ctx).await.unwrap(),
        OrganizationSelection::Cancelled
    );
    assert_eq!(*h.account.selected_organization.lock(), None);
}

#[tokio::test]
async fn test_select_organization_without_organizations_or_session() {
    let h = Harness::new(
        FakeAccount::signed_in(),
        RecordingConfig::new(),
        ScriptedCatalog::new(),
        ScriptedPrompter::default(),
    );
    assert_eq!(
        select_organization(&h.ctx).await.unwrap(),
        OrganizationSelection::NoOrganizations
    );
    assert!(h
        .prompter
        .output()
        .contains("You don't have any organizations yet."));

    let h = Harness::new(
        FakeAccount::new(),
        RecordingConfig::new(),
        ScriptedCatalog::new(),
        ScriptedPrompter::default(),
    );
    assert!(matches!(
        select_organization(&h.ctx).await,
        Err(CliError::NotAuthenticated(_))
    ));
}
