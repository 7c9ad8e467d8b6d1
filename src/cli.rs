//! CLI domain: parse, route, output, and presentation only.
//! No domain orchestration; single route table dispatches to the flows.

mod output;
mod parse;
mod presentation;
mod route;

pub use output::map_error;
pub use parse::{AuthCommands, Cli, Commands, ConfigCommands};
pub use presentation::{
    format_byo_result, format_model_changed, format_organization_selection,
    format_providers_json, format_providers_text, format_quick_setup_summary,
    format_settings, format_sign_in_outcome,
};
pub use route::{menu_actions, MenuAction, RunContext};
