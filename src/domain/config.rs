//! Domain types and validators for dropship configuration.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::droplet::DropletSettings;
use crate::domain::error::ConfigError;

// ── Constants ────────────────────────────────────────────────────────────────

pub const VALID_CONFIG_KEYS: &[&str] = &[
    "droplet.region",
    "droplet.size",
    "droplet.image",
    "ssh.key_path",
    "ssh.key_name",
    "terraform.binary",
    "terraform.workdir",
    "api.base_url",
    "api.timeout_secs",
];

pub const DEFAULT_API_URL: &str = "https://api.digitalocean.com";
pub const DEFAULT_API_TIMEOUT_SECS: u64 = 30;
pub const MAX_API_TIMEOUT_SECS: u64 = 600;

#[allow(clippy::expect_used)] // Patterns are compile-time constants
static REGION_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z]{3}[0-9]$").expect("valid regex"));
#[allow(clippy::expect_used)]
static SLUG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9][a-z0-9.-]*$").expect("valid regex"));

// ── Config schema ────────────────────────────────────────────────────────────

/// Top-level configuration stored in `~/.dropship/config.yaml`.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct DropshipConfig {
    /// Droplet region/size/image.
    pub droplet: DropletSettings,
    /// Local key pair settings.
    pub ssh: SshConfig,
    /// Terraform binary and work directory.
    pub terraform: TerraformConfig,
    /// Provider API settings.
    pub api: ApiConfig,
}

/// SSH key pair configuration.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq, Eq)]
#[serde(default)]
pub struct SshConfig {
    /// Private key path. `None` means `~/.ssh/dropship_ed25519`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_path: Option<String>,
    /// Name the key is registered under. `None` means `dropship-<date>`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_name: Option<String>,
}

/// Terraform configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct TerraformConfig {
    /// Binary name or path.
    pub binary: String,
    /// Work directory. `None` means `<dropship home>/terraform`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub workdir: Option<String>,
}

impl Default for TerraformConfig {
    fn default() -> Self {
        Self {
            binary: "terraform".to_string(),
            workdir: None,
        }
    }
}

/// Provider API configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ApiConfig {
    pub base_url: String,
    pub timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_API_URL.to_string(),
            timeout_secs: DEFAULT_API_TIMEOUT_SECS,
        }
    }
}

// ── Validators ───────────────────────────────────────────────────────────────

/// Validates a configuration key against the whitelist.
///
/// # Errors
///
/// Returns an error if the key is not in the allowed list.
pub fn validate_config_key(key: &str) -> Result<()> {
    if !VALID_CONFIG_KEYS.contains(&key) {
        return Err(ConfigError::UnknownKey {
            key: key.to_string(),
            valid: VALID_CONFIG_KEYS.join(", "),
        }
        .into());
    }
    Ok(())
}

/// Validates a configuration value for the given key.
///
/// # Errors
///
/// Returns an error if the value is not valid for the key.
pub fn validate_config_value(key: &str, value: &str) -> Result<()> {
    let expected = match key {
        "droplet.region" if !REGION_RE.is_match(value) => Some("a region slug such as nyc3"),
        "droplet.size" | "droplet.image" if !SLUG_RE.is_match(value) => {
            Some("a lowercase slug such as s-1vcpu-1gb")
        }
        "ssh.key_path" | "terraform.binary" | "terraform.workdir" if value.trim().is_empty() => {
            Some("a non-empty path")
        }
        "ssh.key_name" if value.trim().is_empty() || value.chars().count() > 255 => {
            Some("a non-empty name of at most 255 characters")
        }
        "api.base_url" if !(value.starts_with("http://") || value.starts_with("https://")) => {
            Some("an http:// or https:// URL")
        }
        "api.timeout_secs"
            if !value
                .parse::<u64>()
                .is_ok_and(|n| (1..=MAX_API_TIMEOUT_SECS).contains(&n)) =>
        {
            Some("an integer between 1 and 600")
        }
        _ => None,
    };
    if let Some(expected) = expected {
        return Err(ConfigError::InvalidValue {
            key: key.to_string(),
            value: value.to_string(),
            expected: expected.to_string(),
        }
        .into());
    }
    Ok(())
}

/// Validates and applies `key = value` to `config`.
///
/// # Errors
///
/// Returns an error if the key is unknown or the value is invalid.
pub fn apply_config_value(config: &mut DropshipConfig, key: &str, value: &str) -> Result<()> {
    validate_config_key(key)?;
    validate_config_value(key, value)?;
    let value = value.to_string();
    match key {
        "droplet.region" => config.droplet.region = value,
        "droplet.size" => config.droplet.size = value,
        "droplet.image" => config.droplet.image = value,
        "ssh.key_path" => config.ssh.key_path = Some(value),
        "ssh.key_name" => config.ssh.key_name = Some(value),
        "terraform.binary" => config.terraform.binary = value,
        "terraform.workdir" => config.terraform.workdir = Some(value),
        "api.base_url" => config.api.base_url = value.trim_end_matches('/').to_string(),
        "api.timeout_secs" => config.api.timeout_secs = value.parse()?,
        _ => unreachable!("key validated above"),
    }
    Ok(())
}

// ── Unit tests ───────────────────────────────────────────────────────────────
