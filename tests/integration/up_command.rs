//! Integration tests for `dropship up` and `dropship destroy`.
//!
//! The provider API is a `mockito` server reached through
//! `DROPSHIP_API_URL`; Terraform is a shell script configured as
//! `terraform.binary` that logs its arguments.

#![allow(clippy::expect_used, clippy::unwrap_used)]

use std::path::{Path, PathBuf};

use assert_cmd::Command;
use predicates::prelude::*;
use tempfile::TempDir;

const PUB: &str =
    "ssh-ed25519 AAAAC3NzaC1lZDI1NTE5AAAAIF9UrQfa6B9nR7Ql2GEVcXWW1uBA++U/82GjmoWNY76p dropship";

fn dropship() -> Command {
    let mut cmd = Command::new(assert_cmd::cargo::cargo_bin!("dropship"));
    cmd.env("NO_COLOR", "1")
        .env_remove("DIGITALOCEAN_TOKEN")
        .env_remove("DROPSHIP_YES")
        .env_remove("CI");
    cmd
}

/// Temp home with a config file, a key pair and a work directory path.
struct Sandbox {
    dir: TempDir,
}

impl Sandbox {
    fn new() -> Self {
        let dir = TempDir::new().expect("temp dir");
        std::fs::create_dir_all(dir.path().join(".ssh")).expect("mkdir .ssh");
        std::fs::write(dir.path().join(".ssh/id"), "private").expect("private key");
        std::fs::write(dir.path().join(".ssh/id.pub"), format!("{PUB}\n")).expect("public key");
        Self { dir }
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.dir.path().join(rel)
    }

    fn config(&self) -> String {
        self.path("config.yaml").to_string_lossy().into_owned()
    }

    fn key(&self) -> String {
        self.path(".ssh/id").to_string_lossy().into_owned()
    }

    fn workdir(&self) -> String {
        self.path("tf").to_string_lossy().into_owned()
    }

    fn log(&self) -> String {
        std::fs::read_to_string(self.path("terraform.log")).unwrap_or_default()
    }

    /// Install a fake `terraform` that logs every call and point the config at it.
    /// Like the real CLI it switches to `-chdir` before reading `-var-file`.
    #[cfg(unix)]
    fn with_fake_terraform(self) -> Self {
        use std::os::unix::fs::PermissionsExt;

        let script = self.path("terraform");
        let log = self.path("terraform.log");
        let body = format!(
            r#"#!/bin/sh
echo "$@" >> '{log}'
for arg in "$@"; do
  case "$arg" in
    -chdir=*) cd "${{arg#-chdir=}}" || exit 1 ;;
    -var-file=*)
      [ -f "${{arg#-var-file=}}" ] || {{
        echo "Given variables file ${{arg#-var-file=}} does not exist." >&2
        exit 1
      }} ;;
  esac
done
case "$*" in
  version*) echo "Terraform v1.9.8" ;;
  *" output "*) echo '{{"droplet_ip":{{"sensitive":false,"type":"string","value":"203.0.113.10"}}}}' ;;
esac
exit 0
"#,
            log = log.display()
        );
        std::fs::write(&script, body).expect("write script");
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755))
            .expect("chmod");
        std::fs::write(
            self.config(),
            format!("terraform:\n  binary: '{}'\n", script.display()),
        )
        .expect("write config");
        self
    }
}

fn up(sb: &Sandbox, api: &str) -> Command {
    let mut cmd = dropship();
    cmd.env("DROPSHIP_CONFIG", sb.config())
        .env("DROPSHIP_API_URL", api)
        .args(["up", "--name", "web-01", "--token", "dop_v1_test"])
        .args(["--key", &sb.key(), "--workdir", &sb.workdir()]);
    cmd
}

// ── Input resolution ─────────────────────────────────────────────────────────

#[test]
fn test_up_non_interactive_without_token_is_missing_input() {
    let sb = Sandbox::new();
    dropship()
        .env("DROPSHIP_CONFIG", sb.config())
        .args(["up", "--name", "web-01", "--yes"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("Missing API token"));
}

#[test]
fn test_up_non_interactive_without_name_is_missing_input() {
    let sb = Sandbox::new();
    dropship()
        .env("DROPSHIP_CONFIG", sb.config())
        .env("DROPSHIP_YES", "1")
        .args(["up", "--token", "dop_v1_test"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("Missing droplet name"));
}

#[test]
fn test_up_invalid_name_flag_is_rejected() {
    let sb = Sandbox::new();
    dropship()
        .env("DROPSHIP_CONFIG", sb.config())
        .args(["up", "--name", "bad name!", "--token", "t", "--yes"])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("✗ Invalid droplet name"));
}

#[test]
fn test_up_json_error_document_on_stdout() {
    let sb = Sandbox::new();
    let out = dropship()
        .env("DROPSHIP_CONFIG", sb.config())
        .args(["--json", "up", "--name", "web-01", "--yes"])
        .assert()
        .code(6)
        .get_output()
        .stdout
        .clone();
    let v: serde_json::Value = serde_json::from_slice(&out).expect("valid JSON");
    assert_eq!(v["error"], true);
    assert_eq!(v["code"], 6);
}

#[test]
fn test_up_missing_terraform_binary_exits_four() {
    let sb = Sandbox::new();
    std::fs::write(
        sb.config(),
        "terraform:\n  binary: /nonexistent/terraform-bin\n",
    )
    .expect("write config");
    dropship()
        .env("DROPSHIP_CONFIG", sb.config())
        .env("DROPSHIP_API_URL", "http://127.0.0.1:9")
        .args(["up", "--name", "web-01", "--token", "t", "--yes"])
        .args(["--key", &sb.key(), "--workdir", &sb.workdir()])
        .assert()
        .code(4)
        .stderr(predicate::str::contains("terraform is not available"));
}

// ── End to end with fake Terraform ───────────────────────────────────────────

#[cfg(unix)]
#[test]
fn test_up_end_to_end_registers_key_and_prints_ssh_command() {
    let sb = Sandbox::new().with_fake_terraform();
    let mut server = mockito::Server::new();
    let droplets = server
        .mock("GET", "/v2/droplets")
        .match_query(mockito::Matcher::UrlEncoded("name".into(), "web-01".into()))
        .match_header("authorization", "Bearer dop_v1_test")
        .with_body(r#"{"droplets":[]}"#)
        .create();
    let list = server
        .mock("GET", "/v2/account/keys")
        .match_query(mockito::Matcher::Any)
        .with_body(r#"{"ssh_keys":[],"links":{}}"#)
        .create();
    let create = server
        .mock("POST", "/v2/account/keys")
        .with_status(201)
        .with_body(format!(
            r#"{{"ssh_key":{{"id":1,"name":"k","fingerprint":"3b:16:bf","public_key":"{PUB}"}}}}"#
        ))
        .expect(1)
        .create();

    let out = up(&sb, &server.url())
        .args(["--yes", "--json"])
        .assert()
        .success()
        .get_output()
        .stdout
        .clone();

    droplets.assert();
    list.assert();
    create.assert();

    let v: serde_json::Value = serde_json::from_slice(&out).expect("stdout is JSON only");
    assert_eq!(v["ip"], "203.0.113.10");
    assert_eq!(v["fingerprint"], "3b:16:bf");
    assert_eq!(v["key_uploaded"], true);
    assert_eq!(
        v["ssh_command"],
        format!("ssh -i {} root@203.0.113.10", sb.key())
    );

    let log = sb.log();
    let steps: Vec<&str> = log
        .lines()
        .map(|l| {
            l.split_whitespace()
                .find(|w| !w.starts_with("-chdir="))
                .unwrap_or("")
        })
        .collect();
    assert_eq!(steps, ["version", "init", "plan", "apply", "output"]);

    let tfvars = std::fs::read_to_string(Path::new(&sb.workdir()).join("terraform.tfvars"))
        .expect("tfvars written");
    assert!(tfvars.contains(r#"ssh_fingerprints = ["3b:16:bf"]"#));
}

#[cfg(unix)]
#[test]
fn test_up_relative_workdir_resolves_against_current_dir() {
    let sb = Sandbox::new().with_fake_terraform();
    let mut server = mockito::Server::new();
    let _droplets = server
        .mock("GET", "/v2/droplets")
        .match_query(mockito::Matcher::Any)
        .with_body(r#"{"droplets":[]}"#)
        .create();
    let _keys = server
        .mock("GET", "/v2/account/keys")
        .match_query(mockito::Matcher::Any)
        .with_body(format!(
            r#"{{"ssh_keys":[{{"id":1,"name":"k","fingerprint":"3b:16:bf","public_key":"{PUB}"}}],"links":{{}}}}"#
        ))
        .create();

    dropship()
        .current_dir(sb.dir.path())
        .env("DROPSHIP_CONFIG", sb.config())
        .env("DROPSHIP_API_URL", server.url())
        .args(["up", "--name", "web-01", "--token", "dop_v1_test", "--yes"])
        .args(["--key", &sb.key(), "--workdir", "tf"])
        .assert()
        .success()
        .stdout(predicate::str::contains("203.0.113.10"));

    assert!(sb.path("tf/terraform.tfvars").exists());
    assert!(!sb.path("tf/tf").exists());
    let root = sb.dir.path().canonicalize().expect("canonical temp dir");
    let chdir = format!("-chdir={}", root.join("tf").display());
    let log = sb.log();
    let plan = log
        .lines()
        .find(|l| l.contains(" plan "))
        .expect("plan ran");
    assert!(plan.starts_with(&chdir), "absolute -chdir expected: {plan}");
}

#[cfg(unix)]
#[test]
fn test_up_taken_name_exits_six_before_terraform_init() {
    let sb = Sandbox::new().with_fake_terraform();
    let mut server = mockito::Server::new();
    let _droplets = server
        .mock("GET", "/v2/droplets")
        .match_query(mockito::Matcher::Any)
        .with_body(r#"{"droplets":[{"id":9,"name":"web-01"}]}"#)
        .create();
    let keys = server
        .mock("GET", "/v2/account/keys")
        .match_query(mockito::Matcher::Any)
        .expect(0)
        .create();

    up(&sb, &server.url())
        .arg("--yes")
        .assert()
        .code(6)
        .stderr(predicate::str::contains("already exists"));

    keys.assert();
    assert_eq!(sb.log().lines().count(), 1, "only `terraform version` ran");
    assert!(!Path::new(&sb.workdir()).exists());
}

#[cfg(unix)]
#[test]
fn test_up_unauthorized_exits_three() {
    let sb = Sandbox::new().with_fake_terraform();
    let mut server = mockito::Server::new();
    let _droplets = server
        .mock("GET", "/v2/droplets")
        .match_query(mockito::Matcher::Any)
        .with_status(401)
        .with_body(r#"{"id":"unauthorized","message":"Unable to authenticate you"}"#)
        .create();

    up(&sb, &server.url())
        .arg("--yes")
        .assert()
        .code(3)
        .stderr(predicate::str::contains("Unable to authenticate you"))
        .stderr(predicate::str::contains("dop_v1_test").not());
}

#[cfg(unix)]
#[test]
fn test_destroy_after_up_removes_state() {
    let sb = Sandbox::new().with_fake_terraform();
    let state = Path::new(&sb.workdir()).join("state").join("web-01.tfstate");
    std::fs::create_dir_all(state.parent().unwrap()).expect("mkdir state");
    std::fs::write(&state, "{}").expect("seed state");

    dropship()
        .env("DROPSHIP_CONFIG", sb.config())
        .args(["destroy", "--name", "web-01", "--token", "t", "--yes"])
        .args(["--workdir", &sb.workdir()])
        .assert()
        .success()
        .stdout(predicate::str::contains("were removed"));

    assert!(!state.exists());
    assert!(sb.log().contains("destroy -input=false -auto-approve"));
}

#[test]
fn test_destroy_unknown_droplet_exits_six() {
    let sb = Sandbox::new();
    dropship()
        .env("DROPSHIP_CONFIG", sb.config())
        .args(["destroy", "--name", "ghost", "--token", "t", "--yes"])
        .args(["--workdir", &sb.workdir()])
        .assert()
        .code(6)
        .stderr(predicate::str::contains("No Terraform state recorded"));
}
