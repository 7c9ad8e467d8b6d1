//! Clino CLI Binary
//!
//! Sign in to Clino and configure the model providers used by plan and act modes.

use clap::Parser;
use clino::cli::{map_error, Cli, RunContext};
use clino::config::{AppConfig, ConfigLoader};
use clino::logging::{init_logging, resolve_log_file_path, LoggingConfig};
use std::process;
use tracing::{error, info};

fn main() {
    let cli = Cli::parse();

    let settings = match ConfigLoader::load(cli.config.as_deref()) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("{}", map_error(&e.into()));
            process::exit(1);
        }
    };

    let logging_config = build_logging_config(&cli, &settings);
    if let Err(e) = init_logging(Some(&logging_config)) {
        eprintln!("Failed to initialize logging: {}", e);
        process::exit(1);
    }

    info!("Clino CLI starting");

    let context = match RunContext::new(&settings) {
        Ok(ctx) => ctx,
        Err(e) => {
            error!("Error initializing CLI: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    };

    match context.execute(&cli.command) {
        Ok(output) => {
            info!("Command completed successfully");
            if !output.is_empty() {
                println!("{}", output);
            }
        }
        Err(e) => {
            error!("Command failed: {}", e);
            eprintln!("{}", map_error(&e));
            process::exit(1);
        }
    }
}

/// Build logging configuration from CLI args on top of the loaded settings.
/// Precedence: CLI flags override config file override defaults.
fn build_logging_config(cli: &Cli, settings: &AppConfig) -> LoggingConfig {
    let mut config = settings.logging.clone();

    if cli.quiet {
        config.enabled = false;
    }
    if cli.verbose {
        config.level = "debug".to_string();
        // Keep verbose output visible in the terminal without losing file logs.
        // An explicit --log-output value still takes precedence below.
        if config.output == "file" {
            config.output = "file+stderr".to_string();
        }
    }
    if let Some(ref level) = cli.log_level {
        config.level = level.clone();
    }
    if let Some(ref format) = cli.log_format {
        config.format = format.clone();
    }
    if let Some(ref output) = cli.log_output {
        config.output = output.clone();
    }

    let output_uses_file = config.output == "file" || config.output == "file+stderr";
    if config.enabled && output_uses_file {
        config.file = resolve_log_file_path(cli.log_file.clone(), config.file.clone());
    } else if let Some(ref file) = cli.log_file {
        config.file = Some(file.clone());
    }

    config
}
