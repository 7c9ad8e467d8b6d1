//! Interactive prompts.
//!
//! Flows ask questions through the [`Prompter`] capability so they can run against a
//! terminal or a scripted test double.

use crate::error::CliError;

/// Validates a line of input; `Err` carries the message shown to the user.
pub type InputValidator = fn(&str) -> Result<(), String>;

/// A single text input request
#[derive(Debug, Clone, Copy)]
pub struct InputRequest<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub placeholder: Option<&'a str>,
    /// Hide typed characters.
    pub secret: bool,
    pub validator: Option<InputValidator>,
}

impl<'a> InputRequest<'a> {
    pub fn new(title: &'a str) -> Self {
        Self {
            title,
            description: None,
            placeholder: None,
            secret: false,
            validator: None,
        }
    }

    pub fn description(mut self, description: &'a str) -> Self {
        self.description = Some(description);
        self
    }

    pub fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    pub fn secret(mut self) -> Self {
        self.secret = true;
        self
    }

    pub fn validate(mut self, validator: InputValidator) -> Self {
        self.validator = Some(validator);
        self
    }
}

pub fn not_blank(value: &str) -> Result<(), String> {
    if value.trim().is_empty() {
        Err("Value cannot be empty".to_string())
    } else {
        Ok(())
    }
}

pub fn api_key_not_empty(value: &str) -> Result<(), String> {
    if value.is_empty() {
        Err("API key cannot be empty".to_string())
    } else {
        Ok(())
    }
}

/// UI collaborator. `Ok(None)` from `select`/`input` means the user cancelled.
pub trait Prompter: Send + Sync {
    fn confirm(&self, title: &str, description: &str) -> Result<bool, CliError>;

    /// Returns the index of the chosen option.
    fn select(&self, title: &str, options: &[String]) -> Result<Option<usize>, CliError>;

    fn input(&self, request: &InputRequest<'_>) -> Result<Option<String>, CliError>;

    /// Show a line of progress or status text.
    fn message(&self, text: &str);
}

/// Terminal prompter backed by `dialoguer`
#[derive(Debug, Default)]
pub struct TerminalPrompter;

impl TerminalPrompter {
    pub fn new() -> Self {
        Self
    }
}

fn prompt_error(e: dialoguer::Error) -> CliError {
    CliError::Prompt(e.to_string())
}

impl Prompter for TerminalPrompter {
    fn confirm(&self, title: &str, description: &str) -> Result<bool, CliError> {
        use dialoguer::Confirm;

        let confirmed = Confirm::new()
            .with_prompt(format!("{}\n{}", title, description))
            .default(false)
            .interact_opt()
            .map_err(prompt_error)?;
        Ok(confirmed.unwrap_or(false))
    }

    fn select(&self, title: &str, options: &[String]) -> Result<Option<usize>, CliError> {
        use dialoguer::Select;

        Select::new()
            .with_prompt(title)
            .items(options)
            .default(0)
            .interact_opt()
            .map_err(prompt_error)
    }

    fn input(&self, request: &InputRequest<'_>) -> Result<Option<String>, CliError> {
        use dialoguer::{Input, Password};

        if let Some(description) = request.description {
            println!("{}", description);
        }
        let title = match request.placeholder {
            Some(placeholder) => format!("{} ({})", request.title, placeholder),
            None => request.title.to_string(),
        };

        loop {
            let value = if request.secret {
                Password::new()
                    .with_prompt(title.as_str())
                    .allow_empty_password(true)
                    .interact()
                    .map_err(prompt_error)?
            } else {
                Input::<String>::new()
                    .with_prompt(title.as_str())
                    .allow_empty(true)
                    .interact_text()
                    .map_err(prompt_error)?
            };

            match request.validator.map(|validate| validate(&value)) {
                Some(Err(message)) => eprintln!("{}", message),
                _ => return Ok(Some(value)),
            }
        }
    }

    fn message(&self, text: &str) {
        println!("{}", text);
    }
}
