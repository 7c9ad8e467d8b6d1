//! Clino: sign-in and model provider configuration
//!
//! Authenticates the user with the managed Clino account service through a browser
//! hand-off and configures the model provider used by the plan and act modes, either
//! the managed provider or a bring-your-own one.

pub mod app;
pub mod auth;
pub mod cli;
pub mod config;
pub mod error;
pub mod logging;
pub mod merge;
pub mod prompt;
pub mod provider;
pub mod services;
pub mod session;
