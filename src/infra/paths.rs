//! Well-known locations on the operator's machine.

use std::path::PathBuf;

use anyhow::Result;

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| anyhow::anyhow!("cannot determine home directory"))
}

/// `DROPSHIP_HOME`, or `~/.dropship`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn dropship_home() -> Result<PathBuf> {
    if let Ok(val) = std::env::var("DROPSHIP_HOME")
        && !val.is_empty()
    {
        return Ok(PathBuf::from(val));
    }
    Ok(home_dir()?.join(".dropship"))
}

/// Terraform work directory used when neither flag nor config sets one.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_workdir() -> Result<PathBuf> {
    Ok(dropship_home()?.join("terraform"))
}

/// `~/.ssh/dropship_ed25519`.
///
/// # Errors
///
/// Returns an error if the home directory cannot be determined.
pub fn default_key_path() -> Result<PathBuf> {
    Ok(home_dir()?.join(".ssh").join("dropship_ed25519"))
}

/// Expand a leading `~/` against the home directory.
///
/// # Errors
///
/// Returns an error if `path` starts with `~` and the home directory cannot
/// be determined.
pub fn expand_tilde(path: &str) -> Result<PathBuf> {
    if path == "~" {
        return home_dir();
    }
    match path.strip_prefix("~/") {
        Some(rest) => Ok(home_dir()?.join(rest)),
        None => Ok(PathBuf::from(path)),
    }
}
