//! OpenSSH public key parsing and comparison.

use anyhow::{Context, Result};
use base64::Engine as _;
use base64::engine::general_purpose::{STANDARD, STANDARD_NO_PAD};
use sha2::{Digest, Sha256};

const ALGORITHMS: &[&str] = &[
    "ssh-ed25519",
    "ssh-rsa",
    "ecdsa-sha2-nistp256",
    "ecdsa-sha2-nistp384",
    "ecdsa-sha2-nistp521",
    "sk-ssh-ed25519@openssh.com",
    "sk-ecdsa-sha2-nistp256@openssh.com",
];

/// A single-line OpenSSH public key: `<algorithm> <base64-blob> [comment]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublicKey {
    pub algorithm: String,
    pub blob: String,
    pub comment: Option<String>,
}

impl PublicKey {
    /// Parses an OpenSSH public key line.
    ///
    /// # Errors
    ///
    /// Returns an error if the algorithm is unknown, the blob is missing, or
    /// the blob is not valid base64.
    pub fn parse(line: &str) -> Result<Self> {
        let mut parts = line.split_whitespace();
        let algorithm = parts
            .next()
            .ok_or_else(|| anyhow::anyhow!("public key is empty"))?;
        anyhow::ensure!(
            ALGORITHMS.contains(&algorithm),
            "unsupported public key type: {algorithm}"
        );
        let blob = parts
            .next()
            .ok_or_else(|| anyhow::anyhow!("public key has no key material"))?;
        STANDARD
            .decode(blob)
            .context("public key material is not valid base64")?;
        let comment = parts.collect::<Vec<_>>().join(" ");
        Ok(Self {
            algorithm: algorithm.to_string(),
            blob: blob.to_string(),
            comment: (!comment.is_empty()).then_some(comment),
        })
    }

    /// `true` when both keys carry the same algorithm and key material.
    /// Comments are ignored.
    #[must_use]
    pub fn same_material(&self, other: &PublicKey) -> bool {
        self.algorithm == other.algorithm && self.blob == other.blob
    }

    /// `SHA256:<base64>` fingerprint, as printed by `ssh-keygen -l`.
    ///
    /// # Errors
    ///
    /// Returns an error if the blob cannot be decoded.
    pub fn sha256_fingerprint(&self) -> Result<String> {
        let raw = STANDARD
            .decode(&self.blob)
            .context("public key material is not valid base64")?;
        let digest = Sha256::digest(&raw);
        Ok(format!("SHA256:{}", STANDARD_NO_PAD.encode(digest)))
    }

    /// Renders the key back to a single OpenSSH line.
    #[must_use]
    pub fn to_openssh(&self) -> String {
        match &self.comment {
            Some(c) => format!("{} {} {c}", self.algorithm, self.blob),
            None => format!("{} {}", self.algorithm, self.blob),
        }
    }
}

/// Name a freshly uploaded key is registered under: `dropship-<YYYYMMDD>`.
#[must_use]
pub fn default_key_name(date: chrono::NaiveDate) -> String {
    format!("dropship-{}", date.format("%Y%m%d"))
}
