//! CLI route: single route table from parsed commands to the auth and provider flows.

use crate::app::AppContext;
use crate::auth::{select_organization, AuthOrchestrator};
use crate::cli::parse::{AuthCommands, Commands, ConfigCommands};
use crate::cli::presentation::{
    format_byo_result, format_model_changed, format_organization_selection,
    format_providers_json, format_providers_text, format_quick_setup_summary,
    format_settings, format_sign_in_outcome,
};
use crate::config::AppConfig;
use crate::error::{CliError, ConfigError, ServiceError};
use crate::prompt::TerminalPrompter;
use crate::provider::byo::configure_byo_provider;
use crate::provider::managed::change_managed_model;
use crate::provider::quick_setup::{quick_setup, QuickSetupRequest};
use crate::services::HttpBackend;
use std::sync::Arc;
use tokio::runtime::Runtime;
use tracing::{debug, info};

/// Entries of the `clino auth` menu
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuAction {
    SignIn,
    SignOut,
    ChangeModel,
    SelectOrganization,
    ConfigureProvider,
    Exit,
}

impl MenuAction {
    pub fn label(self) -> &'static str {
        match self {
            MenuAction::SignIn => "Sign in with Clino",
            MenuAction::SignOut => "Sign out of Clino",
            MenuAction::ChangeModel => "Change Clino model",
            MenuAction::SelectOrganization => "Select organization",
            MenuAction::ConfigureProvider => "Configure an API provider",
            MenuAction::Exit => "Exit",
        }
    }
}

/// Menu entries for the current session state.
pub fn menu_actions(authenticated: bool) -> Vec<MenuAction> {
    if authenticated {
        vec![
            MenuAction::SignOut,
            MenuAction::ChangeModel,
            MenuAction::SelectOrganization,
            MenuAction::ConfigureProvider,
            MenuAction::Exit,
        ]
    } else {
        vec![
            MenuAction::SignIn,
            MenuAction::ConfigureProvider,
            MenuAction::Exit,
        ]
    }
}

/// Runtime context for CLI execution: collaborators plus the async runtime they run on.
pub struct RunContext {
    app: AppContext,
    settings: AppConfig,
    runtime: Runtime,
}

impl RunContext {
    /// Create run context against the core process named in `config`.
    pub fn new(config: &AppConfig) -> Result<Self, CliError> {
        let backend = Arc::new(HttpBackend::new(&config.core)?);
        debug!(address = %config.core.address, "Using core process");
        let app = AppContext::with_backend(backend, Arc::new(TerminalPrompter::new()));
        Self::with_context(app, config.clone())
    }

    /// Create run context over prepared collaborators.
    pub fn with_context(app: AppContext, settings: AppConfig) -> Result<Self, CliError> {
        let runtime = Runtime::new().map_err(|e| {
            ServiceError::Transport(format!("Failed to create async runtime: {}", e))
        })?;
        Ok(Self {
            app,
            settings,
            runtime,
        })
    }

    pub fn app(&self) -> &AppContext {
        &self.app
    }

    /// Execute a command and return its output text.
    pub fn execute(&self, command: &Commands) -> Result<String, CliError> {
        self.runtime.block_on(self.execute_inner(command))
    }

    async fn execute_inner(&self, command: &Commands) -> Result<String, CliError> {
        match command {
            Commands::Auth { command: None } => self.run_auth_menu().await,
            Commands::Auth {
                command: Some(command),
            } => self.handle_auth_command(command).await,
            Commands::Config { command } => self.handle_config_command(command).await,
            Commands::Providers { format } => match format.as_str() {
                "json" => Ok(format_providers_json()),
                "text" => Ok(format_providers_text()),
                other => Err(ConfigError::Invalid(format!(
                    "Invalid format: {} (must be 'text' or 'json')",
                    other
                ))
                .into()),
            },
        }
    }

    async fn handle_auth_command(&self, command: &AuthCommands) -> Result<String, CliError> {
        match command {
            AuthCommands::Signin => {
                let outcome = AuthOrchestrator::new(&self.app).handle_auth().await?;
                Ok(format_sign_in_outcome(&outcome))
            }
            AuthCommands::Signout => {
                if !self.app.session.is_authenticated().await {
                    return Ok("You are not signed in to Clino.".to_string());
                }
                AuthOrchestrator::new(&self.app).sign_out().await?;
                Ok(String::new())
            }
            AuthCommands::Model => {
                let model_id = change_managed_model(&self.app).await?;
                Ok(format_model_changed(model_id.as_deref()))
            }
            AuthCommands::Org => {
                let selection = select_organization(&self.app).await?;
                Ok(format_organization_selection(&selection))
            }
            AuthCommands::Provider => {
                let config = configure_byo_provider(&self.app).await?;
                Ok(format_byo_result(config.as_ref()))
            }
        }
    }

    async fn handle_config_command(&self, command: &ConfigCommands) -> Result<String, CliError> {
        match command {
            ConfigCommands::Show => format_settings(&self.settings),
            ConfigCommands::Quick {
                provider,
                api_key,
                model_id,
                base_url,
            } => {
                let request = QuickSetupRequest {
                    provider: provider.clone(),
                    api_key: api_key.clone(),
                    model_id: model_id.clone(),
                    base_url: base_url.clone(),
                };
                let summary = quick_setup(&self.app, &request).await?;
                Ok(format_quick_setup_summary(&summary))
            }
        }
    }

    /// Menu loop for `clino auth`. Returns after Exit or a cancelled menu.
    async fn run_auth_menu(&self) -> Result<String, CliError> {
        loop {
            let authenticated = self.app.session.is_authenticated().await;
            let actions = menu_actions(authenticated);
            let labels: Vec<String> = actions.iter().map(|a| a.label().to_string()).collect();

            let choice = self
                .app
                .prompter
                .select("What would you like to do?", &labels)?;
            let action = match choice.and_then(|index| actions.get(index).copied()) {
                None | Some(MenuAction::Exit) => return Ok(String::new()),
                Some(action) => action,
            };
            info!(action = action.label(), "Auth menu action");

            let output = self.run_menu_action(action).await?;
            if !output.is_empty() {
                self.app.say(output);
            }
        }
    }

    async fn run_menu_action(&self, action: MenuAction) -> Result<String, CliError> {
        match action {
            MenuAction::SignIn => self.handle_auth_command(&AuthCommands::Signin).await,
            MenuAction::SignOut => {
                AuthOrchestrator::new(&self.app).sign_out_dialog().await?;
                Ok(String::new())
            }
            MenuAction::ChangeModel => self.handle_auth_command(&AuthCommands::Model).await,
            MenuAction::SelectOrganization => self.handle_auth_command(&AuthCommands::Org).await,
            MenuAction::ConfigureProvider => {
                self.handle_auth_command(&AuthCommands::Provider).await
            }
            MenuAction::Exit => Ok(String::new()),
        }
    }
}
