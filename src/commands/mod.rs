//! Command implementations

pub mod config;
pub mod destroy;
pub mod template;
pub mod up;
pub mod version;

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::app::AppContext;
use crate::domain::config::DropshipConfig;
use crate::domain::droplet::validate_droplet_name;
use crate::infra::digitalocean::DigitalOceanClient;
use crate::infra::paths::{default_workdir, expand_tilde};

/// Flag value, else an interactive prompt. Flag values are validated here so
/// a bad `--name` fails before any prompt.
fn resolve_name(app: &AppContext, flag: Option<String>) -> Result<String> {
    match flag {
        Some(name) => {
            let name = name.trim().to_string();
            validate_droplet_name(&name)?;
            Ok(name)
        }
        None => app.prompt_name(),
    }
}

/// `--token` (which clap already fills from `DIGITALOCEAN_TOKEN`), else a
/// hidden prompt.
fn resolve_token(app: &AppContext, flag: Option<String>) -> Result<String> {
    match flag.map(|t| t.trim().to_string()) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => app.prompt_token(),
    }
}

/// Flag, then config, then `~/.dropship/terraform`. Always absolute:
/// Terraform resolves path arguments after `-chdir`.
fn resolve_workdir(config: &DropshipConfig, flag: Option<PathBuf>) -> Result<PathBuf> {
    let dir = match (flag, &config.terraform.workdir) {
        (Some(dir), _) => dir,
        (None, Some(dir)) => expand_tilde(dir)?,
        (None, None) => default_workdir()?,
    };
    std::path::absolute(&dir)
        .with_context(|| format!("resolving work directory {}", dir.display()))
}

/// `DROPSHIP_API_URL` overrides the configured base URL.
fn api_client(config: &DropshipConfig, token: &str) -> DigitalOceanClient {
    let base_url = std::env::var("DROPSHIP_API_URL")
        .ok()
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| config.api.base_url.clone());
    tracing::debug!(%base_url, "provider api");
    DigitalOceanClient::new(
        &base_url,
        token,
        Duration::from_secs(config.api.timeout_secs),
    )
}
