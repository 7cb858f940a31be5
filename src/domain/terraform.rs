//! Terraform steps, work directory layout, and output parsing.

use std::fmt;
use std::path::{Path, PathBuf};

use anyhow::Result;
use serde::Deserialize;

use crate::domain::error::ProvisionError;

/// Name of the output declared by the embedded template.
pub const IP_OUTPUT: &str = "droplet_ip";

/// A single Terraform CLI invocation, used for error classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TerraformStep {
    Version,
    Init,
    Plan,
    Apply,
    Output,
    Destroy,
}

impl fmt::Display for TerraformStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Version => "version",
            Self::Init => "init",
            Self::Plan => "plan",
            Self::Apply => "apply",
            Self::Output => "output",
            Self::Destroy => "destroy",
        };
        f.write_str(s)
    }
}

/// File layout of the Terraform work directory.
///
/// ```text
/// <root>/main.tf
/// <root>/terraform.tfvars
/// <root>/state/<name>.tfstate
/// <root>/plans/<name>.tfplan
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workdir {
    root: PathBuf,
}

impl Workdir {
    #[must_use]
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    #[must_use]
    pub fn main_tf(&self) -> PathBuf {
        self.root.join("main.tf")
    }

    #[must_use]
    pub fn tfvars(&self) -> PathBuf {
        self.root.join("terraform.tfvars")
    }

    #[must_use]
    pub fn state_dir(&self) -> PathBuf {
        self.root.join("state")
    }

    #[must_use]
    pub fn plan_dir(&self) -> PathBuf {
        self.root.join("plans")
    }

    /// Per-droplet state file. `name` must already be validated.
    #[must_use]
    pub fn state_file(&self, name: &str) -> PathBuf {
        self.state_dir().join(format!("{name}.tfstate"))
    }

    /// Backup Terraform writes next to the state file on every change.
    #[must_use]
    pub fn state_backup(&self, name: &str) -> PathBuf {
        self.state_dir().join(format!("{name}.tfstate.backup"))
    }

    /// Per-droplet saved plan. `name` must already be validated.
    #[must_use]
    pub fn plan_file(&self, name: &str) -> PathBuf {
        self.plan_dir().join(format!("{name}.tfplan"))
    }
}

#[derive(Deserialize)]
struct OutputValue {
    value: serde_json::Value,
}

/// Extracts the droplet's public IPv4 address from `terraform output -json`.
///
/// # Errors
///
/// Returns [`ProvisionError::TerraformOutput`] when the JSON is malformed,
/// the `droplet_ip` output is missing, or its value is empty.
pub fn parse_droplet_ip(json: &str) -> Result<String> {
    let outputs: std::collections::HashMap<String, OutputValue> = serde_json::from_str(json)
        .map_err(|e| ProvisionError::TerraformOutput(format!("invalid JSON: {e}")))?;
    let ip = outputs
        .get(IP_OUTPUT)
        .and_then(|o| o.value.as_str())
        .map(str::trim)
        .unwrap_or_default();
    if ip.is_empty() {
        return Err(
            ProvisionError::TerraformOutput(format!("'{IP_OUTPUT}' is missing or empty")).into(),
        );
    }
    Ok(ip.to_string())
}
