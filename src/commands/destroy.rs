//! `dropship destroy`: remove a droplet created by `up`.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;

use crate::app::AppContext;
use crate::application::ports::ConfigStore as _;
use crate::application::services::destroy::{DestroyOptions, destroy};
use crate::domain::terraform::Workdir;
use crate::infra::assets::EmbeddedTemplate;
use crate::infra::fs::LocalFs;
use crate::infra::terraform::TerraformCli;
use crate::output::TerminalReporter;
use crate::output::json;

/// Arguments for the destroy command.
#[derive(Args)]
pub struct DestroyArgs {
    /// Droplet name (prompted when omitted)
    #[arg(long)]
    pub name: Option<String>,

    /// DigitalOcean API token (prompted when omitted)
    #[arg(long, env = "DIGITALOCEAN_TOKEN", hide_env_values = true)]
    pub token: Option<String>,

    /// Terraform work directory [default: ~/.dropship/terraform]
    #[arg(long)]
    pub workdir: Option<PathBuf>,
}

/// Run the destroy command.
///
/// # Errors
///
/// Returns an error if no state is recorded for the droplet, the operator
/// declines, or a Terraform step fails.
pub async fn run(app: &AppContext, args: DestroyArgs) -> Result<()> {
    let config = app.config_store.load()?;

    let name = super::resolve_name(app, args.name)?;
    let token = super::resolve_token(app, args.token)?;
    let workdir = Workdir::new(super::resolve_workdir(&config, args.workdir)?);

    let tf = TerraformCli::default_runner(&config.terraform.binary, workdir.root());
    let reporter = TerminalReporter::new(&app.output);

    let outcome = destroy(
        &tf,
        &LocalFs,
        &EmbeddedTemplate,
        app,
        DestroyOptions {
            reporter: &reporter,
            name: &name,
            token: &token,
            settings: &config.droplet,
            workdir: &workdir,
        },
    )
    .await?;

    if app.is_json() {
        println!("{}", json::format_value(&outcome)?);
    } else {
        app.renderer().render_destroy(&outcome);
    }
    Ok(())
}
