//! CLI presentation: text and json formatters per command family.

mod auth;
mod provider;
mod settings;

pub use auth::{
    format_model_changed, format_organization_selection, format_sign_in_outcome,
};
pub use provider::{
    format_byo_result, format_providers_json, format_providers_text, format_quick_setup_summary,
};
pub use settings::format_settings;
