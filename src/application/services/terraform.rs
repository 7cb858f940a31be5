//! Shared Terraform steps used by the `up` and `destroy` flows.

use std::process::ExitStatus;

use anyhow::{Context, Result};

use crate::application::ports::{AssetExtractor, InfraTool, LocalFs, ProgressReporter};
use crate::domain::error::ProvisionError;
use crate::domain::terraform::{TerraformStep, Workdir};
use crate::domain::tfvars::TfVars;

/// Variables file holds the API token.
pub const TFVARS_MODE: u32 = 0o600;

/// Map a non-zero exit status to [`ProvisionError::Terraform`].
///
/// # Errors
///
/// Returns an error when `status` is not a success.
pub fn check(step: TerraformStep, status: ExitStatus) -> Result<()> {
    if status.success() {
        return Ok(());
    }
    Err(ProvisionError::Terraform {
        step,
        code: status.code(),
    }
    .into())
}

/// Confirm the Terraform binary runs. Returns the first line of
/// `terraform version`.
///
/// # Errors
///
/// Returns [`ProvisionError::TerraformMissing`] if the binary cannot be
/// spawned, or [`ProvisionError::Terraform`] if it exits non-zero.
pub async fn ensure_available(
    tf: &impl InfraTool,
    reporter: &impl ProgressReporter,
) -> Result<String> {
    reporter.step("checking terraform...");
    let output = tf
        .version()
        .await
        .map_err(|e| ProvisionError::TerraformMissing(format!("{e:#}")))?;
    check(TerraformStep::Version, output.status)?;
    let version = String::from_utf8_lossy(&output.stdout)
        .lines()
        .next()
        .unwrap_or_default()
        .trim()
        .to_string();
    tracing::debug!(%version, "terraform available");
    Ok(version)
}

/// Extract the template and (re)write the variables file.
///
/// The variables file is replaced on every call so it always reflects the
/// latest inputs.
///
/// # Errors
///
/// Returns an error if any directory or file cannot be written.
pub fn prepare_workdir(
    fs: &impl LocalFs,
    assets: &impl AssetExtractor,
    workdir: &Workdir,
    vars: &TfVars<'_>,
) -> Result<()> {
    for dir in [workdir.root().to_path_buf(), workdir.state_dir(), workdir.plan_dir()] {
        if !fs.exists(&dir) {
            fs.create_dir_all(&dir)?;
            fs.set_permissions(&dir, 0o700)?;
        }
    }
    let written = assets
        .extract_to(workdir.root())
        .context("writing Terraform template")?;
    tracing::debug!(files = written.len(), dir = %workdir.root().display(), "template extracted");
    let main_tf = workdir.main_tf();
    if !written.contains(&main_tf) {
        anyhow::bail!("template bundle did not produce {}", main_tf.display());
    }
    fs.write(&workdir.tfvars(), &vars.render(), TFVARS_MODE)
        .context("writing terraform.tfvars")?;
    Ok(())
}

/// Remove the state, state backup and saved plan recorded for `name`.
///
/// # Errors
///
/// Returns an error if an existing file cannot be removed.
pub fn clear_run_files(fs: &impl LocalFs, workdir: &Workdir, name: &str) -> Result<()> {
    for path in [
        workdir.state_file(name),
        workdir.state_backup(name),
        workdir.plan_file(name),
    ] {
        if fs.exists(&path) {
            fs.remove_file(&path)?;
            tracing::debug!(path = %path.display(), "removed");
        }
    }
    Ok(())
}
