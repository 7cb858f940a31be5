//! Application context: unified state passed to every command handler.
//!
//! `AppContext` carries the output context, the rendering mode, the config
//! store and the interactive/non-interactive decision. It is also the
//! production `Prompter`.

use anyhow::Result;

use crate::application::ports::Prompter;
use crate::domain::droplet::validate_droplet_name;
use crate::domain::error::ProvisionError;
use crate::infra::config::YamlConfigStore;
use crate::output::{HumanRenderer, OutputContext};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Skip interactive prompts (also set by `CI` / `DROPSHIP_YES` env vars).
    pub yes: bool,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// User configuration file.
    pub config_store: YamlConfigStore,
    /// When `true`, never prompt: the confirmation gate answers yes and
    /// missing inputs are errors.
    ///
    /// Set when `--yes` / `-y` is passed, or when the `CI` or `DROPSHIP_YES`
    /// environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    #[must_use]
    pub fn new(flags: &AppFlags) -> Self {
        let ci_env = std::env::var("CI").is_ok() || std::env::var("DROPSHIP_YES").is_ok();
        let non_interactive = flags.behaviour.yes || ci_env;

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        // JSON mode keeps stdout for the result document alone.
        let quiet = flags.output.quiet || flags.output.json;

        Self {
            output: OutputContext::new(flags.output.no_color, quiet),
            mode,
            config_store: YamlConfigStore,
            non_interactive,
        }
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    #[must_use]
    pub fn renderer(&self) -> HumanRenderer<'_> {
        HumanRenderer::new(&self.output)
    }

    /// Ask for the droplet name, re-prompting until it passes validation.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::MissingInput`] in non-interactive mode, or an
    /// error if the terminal prompt fails.
    pub fn prompt_name(&self) -> Result<String> {
        if self.non_interactive {
            return Err(ProvisionError::MissingInput("droplet name").into());
        }
        let name: String = dialoguer::Input::new()
            .with_prompt("Droplet name")
            .validate_with(|input: &String| -> Result<(), String> {
                validate_droplet_name(input.trim()).map_err(|e| e.to_string())
            })
            .interact_text()?;
        Ok(name.trim().to_string())
    }

    /// Ask for the API token without echoing it.
    ///
    /// # Errors
    ///
    /// Returns [`ProvisionError::MissingInput`] in non-interactive mode, or an
    /// error if the terminal prompt fails.
    pub fn prompt_token(&self) -> Result<String> {
        if self.non_interactive {
            return Err(ProvisionError::MissingInput("API token").into());
        }
        let token = dialoguer::Password::new()
            .with_prompt("DigitalOcean API token")
            .interact()?;
        Ok(token.trim().to_string())
    }
}

impl Prompter for AppContext {
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            tracing::info!(prompt, "confirmation skipped (non-interactive)");
            return Ok(true);
        }
        let confirmed = dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()?;
        Ok(confirmed)
    }
}
