//! Unit tests for `TerraformCli` argument construction.
//!
//! Every call must be pinned to the work directory with `-chdir`, run
//! without interactive input, and point at the per-droplet state file.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::Path;

use dropship_cli::application::ports::{DestroyRequest, InfraTool, PlanRequest};
use dropship_cli::infra::terraform::TerraformCli;

use crate::mocks::MockCommandRunner;

const WORKDIR: &str = "/home/op/.dropship/terraform";

fn cli(runner: &MockCommandRunner) -> TerraformCli<MockCommandRunner> {
    TerraformCli::new(runner.clone(), "terraform", Path::new(WORKDIR))
}

fn last_call(runner: &MockCommandRunner) -> (String, Vec<String>) {
    runner.recorded_calls().pop().expect("one call recorded")
}

#[tokio::test]
async fn test_version_is_not_pinned_to_workdir() {
    let runner = MockCommandRunner::new_ok();
    cli(&runner).version().await.expect("version");
    assert_eq!(last_call(&runner), ("terraform".to_string(), vec!["version".to_string()]));
}

#[tokio::test]
async fn test_init_uses_chdir_and_no_input() {
    let runner = MockCommandRunner::new_ok();
    cli(&runner).init().await.expect("init");
    let (program, args) = last_call(&runner);
    assert_eq!(program, "terraform");
    assert_eq!(args, [format!("-chdir={WORKDIR}").as_str(), "init", "-input=false"]);
}

#[tokio::test]
async fn test_plan_passes_var_file_state_and_out() {
    let runner = MockCommandRunner::new_ok();
    cli(&runner)
        .plan(&PlanRequest {
            var_file: Path::new("/w/terraform.tfvars"),
            state_file: Path::new("/w/state/web.tfstate"),
            plan_out: Path::new("/w/plans/web.tfplan"),
        })
        .await
        .expect("plan");
    let (_, args) = last_call(&runner);
    assert_eq!(
        &args[1..],
        [
            "plan",
            "-input=false",
            "-var-file=/w/terraform.tfvars",
            "-state=/w/state/web.tfstate",
            "-out=/w/plans/web.tfplan",
        ]
    );
}

#[tokio::test]
async fn test_apply_uses_saved_plan_as_last_argument() {
    let runner = MockCommandRunner::new_ok();
    cli(&runner)
        .apply(Path::new("/w/state/web.tfstate"), Path::new("/w/plans/web.tfplan"))
        .await
        .expect("apply");
    let (_, args) = last_call(&runner);
    assert_eq!(
        &args[1..],
        [
            "apply",
            "-input=false",
            "-state=/w/state/web.tfstate",
            "/w/plans/web.tfplan",
        ]
    );
    assert!(
        !args.iter().any(|a| a == "-auto-approve"),
        "apply of a saved plan never needs auto-approve"
    );
}

#[tokio::test]
async fn test_output_requests_json() {
    let runner = MockCommandRunner::new_ok();
    cli(&runner)
        .output(Path::new("/w/state/web.tfstate"))
        .await
        .expect("output");
    let (_, args) = last_call(&runner);
    assert_eq!(&args[1..], ["output", "-state=/w/state/web.tfstate", "-json"]);
}

#[tokio::test]
async fn test_destroy_auto_approves_after_own_gate() {
    let runner = MockCommandRunner::new_ok();
    cli(&runner)
        .destroy(&DestroyRequest {
            var_file: Path::new("/w/terraform.tfvars"),
            state_file: Path::new("/w/state/web.tfstate"),
        })
        .await
        .expect("destroy");
    let (_, args) = last_call(&runner);
    assert_eq!(
        &args[1..],
        [
            "destroy",
            "-input=false",
            "-auto-approve",
            "-var-file=/w/terraform.tfvars",
            "-state=/w/state/web.tfstate",
        ]
    );
}

#[tokio::test]
async fn test_spawn_error_carries_step_context() {
    let runner = MockCommandRunner::forbidden();
    let err = cli(&runner).init().await.expect_err("spawn fails");
    assert!(format!("{err:#}").starts_with("terraform init"));
}
