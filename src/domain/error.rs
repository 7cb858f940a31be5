//! Typed domain error enums.
//!
//! All error types implement `thiserror::Error` and convert to `anyhow::Error`
//! via the `?` operator. `main` downcasts back to `ProvisionError` to pick
//! the process exit code.

use thiserror::Error;

use crate::domain::terraform::TerraformStep;

// ── Provisioning errors ───────────────────────────────────────────────────────

/// Failures that abort an `up` or `destroy` run.
#[derive(Debug, Error)]
pub enum ProvisionError {
    #[error("{operation} failed{}: {message}", http_suffix(.status))]
    Api {
        operation: &'static str,
        status: Option<u16>,
        message: String,
    },

    #[error("terraform {step} failed{}", exit_suffix(.code))]
    Terraform {
        step: TerraformStep,
        code: Option<i32>,
    },

    #[error("terraform is not available ({0}). Install it: https://developer.hashicorp.com/terraform/install")]
    TerraformMissing(String),

    #[error("terraform output is unusable: {0}")]
    TerraformOutput(String),

    #[error("Cancelled. Nothing was changed.")]
    Declined,

    #[error("A droplet named '{0}' already exists. Choose another name or destroy it first.")]
    DropletExists(String),

    #[error(
        "Invalid droplet name '{0}': use letters, digits, '-' and '.', start with a letter or digit (max 253 chars)"
    )]
    InvalidName(String),

    #[error("No Terraform state recorded for droplet '{0}'.")]
    UnknownDroplet(String),

    #[error("SSH key pair problem: {0}")]
    KeyPair(String),

    #[error("Missing {0}. Pass it as a flag or run interactively.")]
    MissingInput(&'static str),
}

fn http_suffix(status: &Option<u16>) -> String {
    status.map(|s| format!(" (HTTP {s})")).unwrap_or_default()
}

fn exit_suffix(code: &Option<i32>) -> String {
    code.map_or_else(
        || " (terminated by signal)".to_string(),
        |c| format!(" with exit code {c}"),
    )
}

impl ProvisionError {
    /// Process exit code for this error class.
    #[must_use]
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::Api { .. } => 3,
            Self::Terraform { .. } | Self::TerraformMissing(_) | Self::TerraformOutput(_) => 4,
            Self::Declined => 5,
            Self::DropletExists(_)
            | Self::InvalidName(_)
            | Self::UnknownDroplet(_)
            | Self::KeyPair(_)
            | Self::MissingInput(_) => 6,
        }
    }
}

// ── Config errors ─────────────────────────────────────────────────────────────

/// Errors related to configuration key/value validation.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Unknown setting: {key}\n\nValid settings: {valid}")]
    UnknownKey { key: String, valid: String },

    #[error("Invalid value for {key}: {value}\n\nExpected: {expected}")]
    InvalidValue {
        key: String,
        value: String,
        expected: String,
    },
}
