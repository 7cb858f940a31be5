//! Application service: local key pair and provider key registration.
//!
//! Imports only from `crate::domain` and `crate::application::ports`.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

use crate::application::ports::{CloudApi, CommandRunner, LocalFs, ProgressReporter};
use crate::domain::error::ProvisionError;
use crate::domain::ssh::PublicKey;

/// Comment embedded in generated keys.
pub const KEY_COMMENT: &str = "dropship";

/// The local key pair in use for this run.
#[derive(Debug, Clone)]
pub struct LocalKey {
    pub private_path: PathBuf,
    pub public_path: PathBuf,
    pub public_key: PublicKey,
    /// `true` when this run created the pair.
    pub generated: bool,
}

/// Result of making sure the provider knows the key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Registration {
    pub fingerprint: String,
    /// `true` when this run uploaded the key.
    pub uploaded: bool,
}

/// `<private>.pub`, the path `ssh-keygen` writes the public half to.
#[must_use]
pub fn public_key_path(private_path: &Path) -> PathBuf {
    let mut s = OsString::from(private_path.as_os_str());
    s.push(".pub");
    PathBuf::from(s)
}

/// Make sure a key pair exists at `private_path`, creating it once.
///
/// | private | public | action                                   |
/// |---------|--------|------------------------------------------|
/// | yes     | yes    | use as-is                                |
/// | no      | no     | `ssh-keygen -t ed25519`                  |
/// | yes     | no     | derive public half with `ssh-keygen -y`  |
/// | no      | yes    | error: cannot log in without it          |
///
/// # Errors
///
/// Returns [`ProvisionError::KeyPair`] if the pair is inconsistent,
/// `ssh-keygen` fails, or the public key cannot be parsed.
pub async fn ensure_local_key(
    runner: &impl CommandRunner,
    fs: &impl LocalFs,
    private_path: &Path,
    reporter: &impl ProgressReporter,
) -> Result<LocalKey> {
    let public_path = public_key_path(private_path);
    let private_arg = private_path.to_string_lossy().into_owned();

    let generated = match (fs.exists(private_path), fs.exists(&public_path)) {
        (true, true) => false,
        (true, false) => {
            reporter.warn(&format!(
                "{} is missing, restoring it from the private key",
                public_path.display()
            ));
            let output = runner
                .run("ssh-keygen", &["-y", "-f", &private_arg])
                .await
                .context("running ssh-keygen")?;
            if !output.status.success() {
                return Err(ProvisionError::KeyPair(format!(
                    "ssh-keygen -y failed: {}",
                    String::from_utf8_lossy(&output.stderr).trim()
                ))
                .into());
            }
            let line = String::from_utf8_lossy(&output.stdout).trim().to_string();
            fs.write(&public_path, &format!("{line}\n"), 0o644)?;
            false
        }
        (false, true) => {
            return Err(ProvisionError::KeyPair(format!(
                "{} exists but the private key {} is missing",
                public_path.display(),
                private_path.display()
            ))
            .into());
        }
        (false, false) => {
            if let Some(parent) = private_path.parent()
                && !parent.as_os_str().is_empty()
                && !fs.exists(parent)
            {
                fs.create_dir_all(parent)?;
                fs.set_permissions(parent, 0o700)?;
            }
            reporter.step("generating SSH key pair...");
            let output = runner
                .run(
                    "ssh-keygen",
                    &["-q", "-t", "ed25519", "-N", "", "-C", KEY_COMMENT, "-f", &private_arg],
                )
                .await
                .context("running ssh-keygen")?;
            if !output.status.success() || !fs.exists(&public_path) {
                return Err(ProvisionError::KeyPair(format!(
                    "ssh-keygen could not create {}: {}",
                    private_path.display(),
                    String::from_utf8_lossy(&output.stderr).trim()
                ))
                .into());
            }
            reporter.success(&format!("created key pair {}", private_path.display()));
            true
        }
    };

    let content = fs.read_to_string(&public_path)?;
    let public_key = PublicKey::parse(content.trim())
        .map_err(|e| ProvisionError::KeyPair(format!("{}: {e}", public_path.display())))?;

    Ok(LocalKey {
        private_path: private_path.to_path_buf(),
        public_path,
        public_key,
        generated,
    })
}

/// Register `key` with the provider unless identical material is already there.
///
/// # Errors
///
/// Returns [`ProvisionError::Api`] when a provider call fails or the
/// provider returns an empty fingerprint.
pub fn ensure_registered(
    api: &impl CloudApi,
    key: &PublicKey,
    key_name: &str,
    reporter: &impl ProgressReporter,
) -> Result<Registration> {
    reporter.step("checking registered SSH keys...");
    let remote_keys = api.list_keys()?;
    tracing::debug!(count = remote_keys.len(), "account keys listed");

    let existing = remote_keys.iter().find(|remote| {
        PublicKey::parse(&remote.public_key).is_ok_and(|parsed| parsed.same_material(key))
    });

    if let Some(remote) = existing {
        let fingerprint = non_empty_fingerprint("list keys", &remote.fingerprint)?;
        reporter.success(&format!("SSH key already registered as '{}'", remote.name));
        return Ok(Registration {
            fingerprint,
            uploaded: false,
        });
    }

    reporter.step(&format!("registering SSH key as '{key_name}'..."));
    let created = api.create_key(key_name, &key.to_openssh())?;
    let fingerprint = non_empty_fingerprint("create key", &created.fingerprint)?;
    reporter.success(&format!("SSH key registered ({fingerprint})"));
    Ok(Registration {
        fingerprint,
        uploaded: true,
    })
}

fn non_empty_fingerprint(operation: &'static str, fingerprint: &str) -> Result<String> {
    let fingerprint = fingerprint.trim();
    if fingerprint.is_empty() {
        return Err(ProvisionError::Api {
            operation,
            status: None,
            message: "response has no key fingerprint".to_string(),
        }
        .into());
    }
    Ok(fingerprint.to_string())
}
