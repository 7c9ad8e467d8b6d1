//! CLI parse: clap types for Clino. No behavior; definitions only.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Clino CLI - sign in and configure model providers
#[derive(Parser)]
#[command(name = "clino")]
#[command(about = "Sign in to Clino and configure model providers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Configuration file path (layered over the global config file)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging (debug level)
    #[arg(long, short = 'v', global = true, default_value = "false")]
    pub verbose: bool,

    /// Disable logging entirely
    #[arg(long, short = 'q', global = true, default_value = "false", conflicts_with = "verbose")]
    pub quiet: bool,

    /// Log level (trace, debug, info, warn, error, off)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Log format (json, text)
    #[arg(long, global = true)]
    pub log_format: Option<String>,

    /// Log output (stdout, stderr, file, file+stderr)
    #[arg(long, global = true)]
    pub log_output: Option<String>,

    /// Log file path (if output includes "file")
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Authenticate with Clino and manage the account (opens a menu without a subcommand)
    Auth {
        #[command(subcommand)]
        command: Option<AuthCommands>,
    },
    /// Provider configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
    /// List supported API providers
    Providers {
        /// Output format (text or json)
        #[arg(long, default_value = "text")]
        format: String,
    },
}

#[derive(Subcommand)]
pub enum AuthCommands {
    /// Sign in with Clino (offers to sign out when already signed in)
    Signin,
    /// Sign out of Clino
    Signout,
    /// Change the Clino model for both modes
    Model,
    /// Select which organization to use
    Org,
    /// Configure an API provider with your own credentials
    Provider,
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show the effective CLI settings (all sources merged)
    Show,
    /// Configure a provider non-interactively
    #[command(name = "quick", alias = "quick-setup")]
    Quick {
        /// Provider id (openai-native, openai, anthropic, gemini, openrouter, xai, cerebras, ollama)
        #[arg(long, short = 'p', default_value = "")]
        provider: String,
        /// API key (not required for ollama)
        #[arg(long = "apikey", short = 'k', default_value = "")]
        api_key: String,
        /// Model id
        #[arg(long = "modelid", short = 'm', default_value = "")]
        model_id: String,
        /// Base URL (openai only; for OpenAI-compatible endpoints)
        #[arg(long = "baseurl", short = 'b', default_value = "")]
        base_url: String,
    },
}
