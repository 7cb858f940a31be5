//! Infrastructure implementation of the `InfraTool` port.
//!
//! `TerraformCli<R>` routes every Terraform call through a `CommandRunner`
//! and pins it to the work directory with `-chdir`.

use std::path::Path;
use std::process::{ExitStatus, Output};

use anyhow::{Context, Result};

use crate::application::ports::{CommandRunner, DestroyRequest, InfraTool, PlanRequest};
use crate::infra::command_runner::TokioCommandRunner;

/// Infrastructure adapter that routes all Terraform CLI calls through a
/// `CommandRunner`.
///
/// Generic over `R: CommandRunner` so that tests can inject a mock runner
/// without spawning real processes.
pub struct TerraformCli<R: CommandRunner> {
    runner: R,
    binary: String,
    chdir: String,
}

impl<R: CommandRunner> TerraformCli<R> {
    pub fn new(runner: R, binary: impl Into<String>, workdir: &Path) -> Self {
        Self {
            runner,
            binary: binary.into(),
            chdir: format!("-chdir={}", workdir.display()),
        }
    }

    async fn streamed(&self, args: &[&str]) -> Result<ExitStatus> {
        let mut full = Vec::with_capacity(args.len() + 1);
        full.push(self.chdir.as_str());
        full.extend_from_slice(args);
        self.runner.run_status(&self.binary, &full).await
    }

    async fn captured(&self, args: &[&str]) -> Result<Output> {
        let mut full = Vec::with_capacity(args.len() + 1);
        full.push(self.chdir.as_str());
        full.extend_from_slice(args);
        self.runner.run(&self.binary, &full).await
    }
}

impl TerraformCli<TokioCommandRunner> {
    /// Convenience constructor for production use.
    #[must_use]
    pub fn default_runner(binary: &str, workdir: &Path) -> Self {
        Self::new(TokioCommandRunner::default(), binary, workdir)
    }
}

fn flag(name: &str, path: &Path) -> String {
    format!("-{name}={}", path.display())
}

impl<R: CommandRunner> InfraTool for TerraformCli<R> {
    async fn version(&self) -> Result<Output> {
        self.runner
            .run(&self.binary, &["version"])
            .await
            .context("terraform version")
    }

    async fn init(&self) -> Result<ExitStatus> {
        self.streamed(&["init", "-input=false"])
            .await
            .context("terraform init")
    }

    async fn plan(&self, request: &PlanRequest<'_>) -> Result<ExitStatus> {
        let var_file = flag("var-file", request.var_file);
        let state = flag("state", request.state_file);
        let out = flag("out", request.plan_out);
        self.streamed(&["plan", "-input=false", &var_file, &state, &out])
            .await
            .context("terraform plan")
    }

    async fn apply(&self, state_file: &Path, plan_file: &Path) -> Result<ExitStatus> {
        let state = flag("state", state_file);
        let plan = plan_file.display().to_string();
        self.streamed(&["apply", "-input=false", &state, &plan])
            .await
            .context("terraform apply")
    }

    async fn output(&self, state_file: &Path) -> Result<Output> {
        let state = flag("state", state_file);
        self.captured(&["output", &state, "-json"])
            .await
            .context("terraform output")
    }

    async fn destroy(&self, request: &DestroyRequest<'_>) -> Result<ExitStatus> {
        let var_file = flag("var-file", request.var_file);
        let state = flag("state", request.state_file);
        self.streamed(&["destroy", "-input=false", "-auto-approve", &var_file, &state])
            .await
            .context("terraform destroy")
    }
}
