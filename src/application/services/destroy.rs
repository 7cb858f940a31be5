//! Application service: tear down a droplet created by `up`.

use anyhow::Result;
use serde::Serialize;

use crate::application::ports::{
    AssetExtractor, DestroyRequest, InfraTool, LocalFs, ProgressReporter, Prompter,
};
use crate::application::services::terraform::{
    check, clear_run_files, ensure_available, prepare_workdir,
};
use crate::domain::droplet::{DropletSettings, validate_droplet_name};
use crate::domain::error::ProvisionError;
use crate::domain::terraform::{TerraformStep, Workdir};
use crate::domain::tfvars::TfVars;

pub struct DestroyOptions<'a, R: ProgressReporter> {
    pub reporter: &'a R,
    pub name: &'a str,
    pub token: &'a str,
    pub settings: &'a DropletSettings,
    pub workdir: &'a Workdir,
}

#[derive(Debug, Clone, Serialize)]
pub struct DestroyOutcome {
    pub name: String,
}

/// Destroy the droplet and firewall recorded in the state file for `name`.
///
/// # Errors
///
/// Returns [`ProvisionError::UnknownDroplet`] when no state exists for the
/// name, [`ProvisionError::Declined`] when the prompter says no, and
/// [`ProvisionError::Terraform`] when a Terraform step fails.
pub async fn destroy(
    tf: &impl InfraTool,
    fs: &impl LocalFs,
    assets: &impl AssetExtractor,
    prompter: &impl Prompter,
    opts: DestroyOptions<'_, impl ProgressReporter>,
) -> Result<DestroyOutcome> {
    let DestroyOptions {
        reporter,
        name,
        token,
        settings,
        workdir,
    } = opts;

    validate_droplet_name(name)?;
    if token.trim().is_empty() {
        return Err(ProvisionError::MissingInput("API token").into());
    }
    let state_file = workdir.state_file(name);
    if !fs.exists(&state_file) {
        return Err(ProvisionError::UnknownDroplet(name.to_string()).into());
    }

    ensure_available(tf, reporter).await?;

    reporter.step("writing Terraform configuration...");
    prepare_workdir(
        fs,
        assets,
        workdir,
        &TfVars {
            do_token: token,
            droplet_name: name,
            ssh_fingerprints: &[],
            settings,
        },
    )?;

    reporter.step("terraform init");
    check(TerraformStep::Init, tf.init().await?)?;

    if !prompter.confirm(
        &format!("Permanently destroy droplet '{name}' and its firewall?"),
        false,
    )? {
        return Err(ProvisionError::Declined.into());
    }

    reporter.step("terraform destroy");
    check(
        TerraformStep::Destroy,
        tf.destroy(&DestroyRequest {
            var_file: &workdir.tfvars(),
            state_file: &state_file,
        })
        .await?,
    )?;

    clear_run_files(fs, workdir, name)?;
    reporter.success(&format!("droplet '{name}' destroyed"));
    Ok(DestroyOutcome {
        name: name.to_string(),
    })
}
