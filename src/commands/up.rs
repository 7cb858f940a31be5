//! `dropship up`: provision a droplet and its firewall.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ConfigStore as _;
use crate::application::services::provision::{ProvisionOptions, provision};
use crate::domain::ssh::default_key_name;
use crate::domain::terraform::Workdir;
use crate::infra::assets::EmbeddedTemplate;
use crate::infra::command_runner::TokioCommandRunner;
use crate::infra::fs::LocalFs;
use crate::infra::paths::{default_key_path, expand_tilde};
use crate::infra::terraform::TerraformCli;
use crate::output::TerminalReporter;
use crate::output::json;

/// Arguments for the up command.
#[derive(Args)]
pub struct UpArgs {
    /// Droplet name (prompted when omitted)
    #[arg(long)]
    pub name: Option<String>,

    /// DigitalOcean API token (prompted when omitted)
    #[arg(long, env = "DIGITALOCEAN_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Private key to use or create [default: ~/.ssh/dropship_ed25519]
    #[arg(long)]
    pub key: Option<PathBuf>,

    /// Name to register a new key under [default: dropship-<date>]
    #[arg(long)]
    pub key_name: Option<String>,

    /// Terraform work directory [default: ~/.dropship/terraform]
    #[arg(long)]
    pub workdir: Option<PathBuf>,
}

/// Run the up command.
///
/// # Errors
///
/// Returns an error if an input is missing or invalid, or if any
/// provisioning step fails.
pub async fn run(app: &AppContext, args: UpArgs) -> Result<()> {
    let config = app.config_store.load()?;

    let name = super::resolve_name(app, args.name)?;
    let token = super::resolve_token(app, args.token)?;

    let key_path = match (args.key, &config.ssh.key_path) {
        (Some(path), _) => path,
        (None, Some(path)) => expand_tilde(path)?,
        (None, None) => default_key_path()?,
    };
    let key_name = args
        .key_name
        .or_else(|| config.ssh.key_name.clone())
        .unwrap_or_else(|| default_key_name(chrono::Local::now().date_naive()));
    let workdir = Workdir::new(super::resolve_workdir(&config, args.workdir)?);

    tracing::debug!(
        %name,
        key = %key_path.display(),
        workdir = %workdir.root().display(),
        "up"
    );

    let runner = TokioCommandRunner::default();
    let api = super::api_client(&config, &token);
    let tf = TerraformCli::default_runner(&config.terraform.binary, workdir.root());
    let reporter = TerminalReporter::new(&app.output);

    let outcome = provision(
        &runner,
        &api,
        &tf,
        &LocalFs,
        &EmbeddedTemplate,
        app,
        ProvisionOptions {
            reporter: &reporter,
            name: &name,
            token: &token,
            settings: &config.droplet,
            key_path: &key_path,
            key_name: &key_name,
            workdir: &workdir,
        },
    )
    .await?;

    if app.is_json() {
        println!("{}", json::format_value(&outcome)?);
    } else {
        app.renderer().render_provision(&outcome);
    }
    Ok(())
}
