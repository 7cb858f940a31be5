//! Application service: the `up` use-case.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.
//! All I/O is routed through injected port traits.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::Serialize;

use crate::application::ports::{
    AssetExtractor, CloudApi, CommandRunner, InfraTool, LocalFs, PlanRequest, ProgressReporter,
    Prompter,
};
use crate::application::services::ssh_key::{ensure_local_key, ensure_registered};
use crate::application::services::terraform::{
    check, clear_run_files, ensure_available, prepare_workdir,
};
use crate::domain::droplet::{DropletSettings, validate_droplet_name};
use crate::domain::error::ProvisionError;
use crate::domain::terraform::{TerraformStep, Workdir, parse_droplet_ip};
use crate::domain::tfvars::TfVars;

/// Inputs for a single `up` run.
pub struct ProvisionOptions<'a, R: ProgressReporter> {
    pub reporter: &'a R,
    pub name: &'a str,
    pub token: &'a str,
    pub settings: &'a DropletSettings,
    pub key_path: &'a Path,
    pub key_name: &'a str,
    pub workdir: &'a Workdir,
}

/// What an `up` run produced.
#[derive(Debug, Clone, Serialize)]
pub struct ProvisionOutcome {
    pub name: String,
    pub ip: String,
    pub key_path: PathBuf,
    pub fingerprint: String,
    pub key_generated: bool,
    pub key_uploaded: bool,
    pub ssh_command: String,
}

/// Provision one droplet and its firewall.
///
/// Order matters: the name-collision check runs before anything is written,
/// and `apply` only runs after the prompter confirms the saved plan.
///
/// # Errors
///
/// Returns a [`ProvisionError`] for every expected failure class and a
/// contextual `anyhow` error for local I/O failures.
pub async fn provision(
    runner: &impl CommandRunner,
    api: &impl CloudApi,
    tf: &impl InfraTool,
    fs: &impl LocalFs,
    assets: &impl AssetExtractor,
    prompter: &impl Prompter,
    opts: ProvisionOptions<'_, impl ProgressReporter>,
) -> Result<ProvisionOutcome> {
    let ProvisionOptions {
        reporter,
        name,
        token,
        settings,
        key_path,
        key_name,
        workdir,
    } = opts;

    validate_droplet_name(name)?;
    if token.trim().is_empty() {
        return Err(ProvisionError::MissingInput("API token").into());
    }

    ensure_available(tf, reporter).await?;

    let key = ensure_local_key(runner, fs, key_path, reporter).await?;
    if let Ok(fp) = key.public_key.sha256_fingerprint() {
        tracing::info!(key = %key.public_path.display(), fingerprint = %fp, "using local key");
    }

    reporter.step(&format!("checking that '{name}' is not taken..."));
    if api.droplet_exists(name)? {
        return Err(ProvisionError::DropletExists(name.to_string()).into());
    }

    let registration = ensure_registered(api, &key.public_key, key_name, reporter)?;

    reporter.step("writing Terraform configuration...");
    let fingerprints = [registration.fingerprint.clone()];
    prepare_workdir(
        fs,
        assets,
        workdir,
        &TfVars {
            do_token: token,
            droplet_name: name,
            ssh_fingerprints: &fingerprints,
            settings,
        },
    )?;
    clear_run_files(fs, workdir, name).context("resetting per-droplet state")?;

    let state_file = workdir.state_file(name);
    let plan_file = workdir.plan_file(name);

    reporter.step("terraform init");
    check(TerraformStep::Init, tf.init().await?)?;

    reporter.step("terraform plan");
    check(
        TerraformStep::Plan,
        tf.plan(&PlanRequest {
            var_file: &workdir.tfvars(),
            state_file: &state_file,
            plan_out: &plan_file,
        })
        .await?,
    )?;

    let prompt = format!(
        "Create droplet '{name}' ({}, {}) and its firewall?",
        settings.size, settings.region
    );
    if !prompter.confirm(&prompt, false)? {
        return Err(ProvisionError::Declined.into());
    }

    reporter.step("terraform apply");
    check(TerraformStep::Apply, tf.apply(&state_file, &plan_file).await?)?;

    let output = tf.output(&state_file).await?;
    check(TerraformStep::Output, output.status)?;
    let ip = parse_droplet_ip(&String::from_utf8_lossy(&output.stdout))?;
    reporter.success(&format!("droplet '{name}' is up at {ip}"));

    let ssh_command = format!("ssh -i {} root@{ip}", key.private_path.display());
    Ok(ProvisionOutcome {
        name: name.to_string(),
        ip,
        key_path: key.private_path,
        fingerprint: registration.fingerprint,
        key_generated: key.generated,
        key_uploaded: registration.uploaded,
        ssh_command,
    })
}
