//! `dropship config`: show and set configuration values.

use anyhow::Result;
use clap::Subcommand;

use crate::app::AppContext;
use crate::application::ports::ConfigStore;
use crate::domain::config::apply_config_value;
use crate::output::json;

/// Config subcommands.
#[derive(Subcommand)]
pub enum ConfigCommand {
    /// Show current configuration
    Show,
    /// Set configuration value
    Set {
        /// Configuration key (e.g. droplet.region)
        key: String,
        /// Configuration value
        value: String,
    },
}

/// Run the config command.
///
/// # Errors
///
/// Returns an error if the config file cannot be read or written, or the
/// key or value is invalid.
pub fn run(app: &AppContext, cmd: ConfigCommand) -> Result<()> {
    match cmd {
        ConfigCommand::Show => show_config(app, &app.config_store),
        ConfigCommand::Set { key, value } => set_config(app, &app.config_store, &key, &value),
    }
}

fn show_config(app: &AppContext, store: &impl ConfigStore) -> Result<()> {
    let config = store.load()?;
    if app.is_json() {
        println!("{}", json::format_value(&config)?);
        return Ok(());
    }
    let path = store.path()?;
    app.renderer()
        .render_config(&path.display().to_string(), &config);
    Ok(())
}

fn set_config(app: &AppContext, store: &impl ConfigStore, key: &str, value: &str) -> Result<()> {
    let mut config = store.load()?;
    apply_config_value(&mut config, key, value)?;
    store.save(&config)?;
    tracing::debug!(key, "config updated");
    app.output.success(&format!("Set {key} = {value}"));
    Ok(())
}
