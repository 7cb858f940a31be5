//! Port trait definitions for the Application layer.
//!
//! Ports are the interfaces (contracts) that infrastructure must fulfill.
//! This file imports only from `crate::domain`, never from `crate::infra`,
//! `crate::commands`, or `crate::output`.

use std::path::{Path, PathBuf};
use std::process::{ExitStatus, Output};
use std::time::Duration;

use anyhow::Result;

use crate::domain::config::DropshipConfig;

// ── Value Types ───────────────────────────────────────────────────────────────

/// An SSH key registered with the provider account.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteKey {
    pub id: u64,
    pub name: String,
    pub fingerprint: String,
    pub public_key: String,
}

/// Arguments for a `terraform plan` run.
pub struct PlanRequest<'a> {
    pub var_file: &'a Path,
    pub state_file: &'a Path,
    pub plan_out: &'a Path,
}

/// Arguments for a `terraform destroy` run.
pub struct DestroyRequest<'a> {
    pub var_file: &'a Path,
    pub state_file: &'a Path,
}

// ── Command Runner Port ───────────────────────────────────────────────────────

/// Abstracts process execution so infrastructure can be swapped or mocked.
#[allow(async_fn_in_trait)]
pub trait CommandRunner {
    /// Run a program and capture its output.
    ///
    /// Implementations should delegate to `run_with_timeout` using the
    /// instance's configured default timeout.
    async fn run(&self, program: &str, args: &[&str]) -> Result<Output>;
    /// Run a program with a custom timeout override.
    ///
    /// # Errors
    ///
    /// Returns an error if the process cannot be spawned or exceeds `timeout`.
    /// On timeout, the child process must be killed (not left orphaned).
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[&str],
        timeout: Duration,
    ) -> Result<Output>;
    /// Run a program and return only its exit status.
    ///
    /// Used for long-running tools whose progress the user should see: the
    /// child's output is streamed to the terminal's stderr.
    async fn run_status(&self, program: &str, args: &[&str]) -> Result<ExitStatus>;
}

// ── Provider API Port ─────────────────────────────────────────────────────────

/// The provider endpoints this tool talks to. Synchronous: every call blocks
/// until the HTTP exchange completes.
pub trait CloudApi {
    /// List every SSH key on the account, following pagination.
    fn list_keys(&self) -> Result<Vec<RemoteKey>>;
    /// Register a public key under `name`.
    fn create_key(&self, name: &str, public_key: &str) -> Result<RemoteKey>;
    /// `true` if a droplet with exactly this name exists.
    fn droplet_exists(&self, name: &str) -> Result<bool>;
}

// ── Infrastructure Tool Port ──────────────────────────────────────────────────

/// Terraform CLI operations against one work directory.
#[allow(async_fn_in_trait)]
pub trait InfraTool {
    /// `terraform version`, captured and used as a presence check.
    async fn version(&self) -> Result<Output>;
    /// `terraform init`.
    async fn init(&self) -> Result<ExitStatus>;
    /// `terraform plan` writing a saved plan.
    async fn plan(&self, request: &PlanRequest<'_>) -> Result<ExitStatus>;
    /// `terraform apply` of a saved plan.
    async fn apply(&self, state_file: &Path, plan_file: &Path) -> Result<ExitStatus>;
    /// `terraform output -json`, captured.
    async fn output(&self, state_file: &Path) -> Result<Output>;
    /// `terraform destroy -auto-approve`.
    async fn destroy(&self, request: &DestroyRequest<'_>) -> Result<ExitStatus>;
}

// ── Progress Reporting Port ───────────────────────────────────────────────────

/// Abstracts progress reporting so services can emit events without
/// depending on the Presentation layer. Sync trait.
pub trait ProgressReporter {
    /// Emit an in-progress step message.
    fn step(&self, message: &str);
    /// Emit a success message.
    fn success(&self, message: &str);
    /// Emit a warning message.
    fn warn(&self, message: &str);
}

// ── Confirmation Port ─────────────────────────────────────────────────────────

/// The human confirmation gate in front of mutating steps.
pub trait Prompter {
    /// Ask a yes/no question.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    fn confirm(&self, prompt: &str, default: bool) -> Result<bool>;
}

// ── Config Port ───────────────────────────────────────────────────────────────

/// Abstracts loading and saving the user configuration file.
pub trait ConfigStore {
    /// Load the config. A missing file yields the defaults.
    fn load(&self) -> Result<DropshipConfig>;
    /// Persist the config.
    fn save(&self, config: &DropshipConfig) -> Result<()>;
    /// Location of the config file.
    fn path(&self) -> Result<PathBuf>;
}

// ── Filesystem Ports ──────────────────────────────────────────────────────────

/// Abstracts local filesystem access.
pub trait LocalFs {
    fn exists(&self, path: &Path) -> bool;
    fn create_dir_all(&self, path: &Path) -> Result<()>;
    fn remove_file(&self, path: &Path) -> Result<()>;
    /// Replace `path` atomically with `content`, applying `mode` before the
    /// file becomes visible.
    fn write(&self, path: &Path, content: &str, mode: u32) -> Result<()>;
    fn read_to_string(&self, path: &Path) -> Result<String>;
    fn set_permissions(&self, path: &Path, mode: u32) -> Result<()>;
}

/// Abstracts extraction of the embedded Terraform template.
pub trait AssetExtractor {
    /// Write every template file into `dir`, overwriting existing copies.
    /// Returns the written paths.
    fn extract_to(&self, dir: &Path) -> Result<Vec<PathBuf>>;
}
