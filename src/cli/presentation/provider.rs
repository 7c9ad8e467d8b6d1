//! Provider command presentation: provider table, quick setup and BYO summaries.

use crate::provider::quick_setup::QuickSetupSummary;
use crate::provider::{ProviderConfig, ProviderRegistry};
use comfy_table::presets::UTF8_BORDERS_ONLY;
use comfy_table::Table;
use owo_colors::OwoColorize;
use serde_json::json;

pub fn format_providers_text() -> String {
    let mut table = Table::new();
    table.load_preset(UTF8_BORDERS_ONLY);
    table.set_header(vec!["Provider", "ID", "Models", "Credentials", "Example model"]);
    for descriptor in ProviderRegistry::all() {
        table.add_row(vec![
            descriptor.display_name,
            descriptor.id,
            descriptor.strategy.label(),
            descriptor.credentials.label(),
            descriptor.placeholder.trim_start_matches("e.g., "),
        ]);
    }
    format!("{}\n\nTotal: {} provider(s)", table, ProviderRegistry::all().len())
}

pub fn format_providers_json() -> String {
    let providers: Vec<_> = ProviderRegistry::all()
        .iter()
        .map(|d| {
            json!({
                "id": d.id,
                "display_name": d.display_name,
                "strategy": d.strategy.label(),
                "credentials": d.credentials.label(),
                "placeholder": d.placeholder,
                "managed": d.managed,
            })
        })
        .collect();
    let out = json!({ "providers": providers, "total": providers.len() });
    serde_json::to_string_pretty(&out).unwrap_or_else(|_| "{}".to_string())
}

fn format_provider_config(config: &ProviderConfig, local: bool) -> String {
    let mut output = format!(
        "\n{} Successfully configured {} provider\n",
        "✓".green(),
        config.provider.display_name()
    );
    output.push_str(&format!("  Model: {}\n", config.model_id));
    if local {
        if let Some(base_url) = &config.base_url {
            output.push_str(&format!("  Base URL: {}\n", base_url));
        }
    } else {
        if config.api_key.is_some() {
            output.push_str("  API Key: Configured\n");
        }
        if let Some(base_url) = &config.base_url {
            output.push_str(&format!("  Custom Base URL: {}\n", base_url));
        }
    }
    output
}

pub fn format_quick_setup_summary(summary: &QuickSetupSummary) -> String {
    let mut output = format_provider_config(&summary.config, summary.is_local());
    output.push_str("\nYou can now use Clino with this provider.");
    output
}

pub fn format_byo_result(config: Option<&ProviderConfig>) -> String {
    match config {
        Some(config) => {
            let local = config.provider == crate::provider::Provider::Ollama;
            format_provider_config(config, local)
        }
        None => "Provider configuration cancelled.".to_string(),
    }
}
