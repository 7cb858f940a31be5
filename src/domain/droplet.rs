//! Droplet naming and sizing.
//!
//! Pure functions only: no I/O, no async, no filesystem access.

use std::sync::LazyLock;

use anyhow::Result;
use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::domain::error::ProvisionError;

/// Longest hostname the provider accepts for a droplet.
pub const MAX_NAME_LEN: usize = 253;

static NAME_RE: LazyLock<Regex> = LazyLock::new(|| {
    #[allow(clippy::expect_used)] // Pattern is a compile-time constant
    Regex::new(r"^[A-Za-z0-9](?:[A-Za-z0-9.-]*[A-Za-z0-9])?$").expect("valid regex")
});

/// Validates a droplet name.
///
/// The name doubles as a hostname and as the stem of the per-droplet state
/// and plan files, so anything outside `[A-Za-z0-9.-]` is rejected.
///
/// # Errors
///
/// Returns [`ProvisionError::InvalidName`] when the name is empty, too long,
/// or contains characters outside the allowed set.
pub fn validate_droplet_name(name: &str) -> Result<()> {
    if name.is_empty() || name.len() > MAX_NAME_LEN || !NAME_RE.is_match(name) {
        return Err(ProvisionError::InvalidName(name.to_string()).into());
    }
    Ok(())
}

/// Region, size and image slugs passed to the Terraform template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DropletSettings {
    /// Datacenter region slug, e.g. `nyc3`.
    pub region: String,
    /// Size slug, e.g. `s-1vcpu-1gb`.
    pub size: String,
    /// Image slug, e.g. `ubuntu-24-04-x64`.
    pub image: String,
}

impl Default for DropletSettings {
    fn default() -> Self {
        Self {
            region: "nyc3".to_string(),
            size: "s-1vcpu-1gb".to_string(),
            image: "ubuntu-24-04-x64".to_string(),
        }
    }
}
