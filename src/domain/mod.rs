//! Domain layer: pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod config;
pub mod droplet;
pub mod error;
pub mod ssh;
pub mod terraform;
pub mod tfvars;

pub use config::{DropshipConfig, apply_config_value, validate_config_key, validate_config_value};
pub use droplet::{DropletSettings, validate_droplet_name};
pub use error::{ConfigError, ProvisionError};
pub use ssh::{PublicKey, default_key_name};
pub use terraform::{TerraformStep, Workdir, parse_droplet_ip};
pub use tfvars::TfVars;
