//! Embedded Terraform template, compiled into the binary from `assets/`.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use include_dir::{Dir, include_dir};

use crate::application::ports::AssetExtractor;

static TEMPLATE: Dir<'_> = include_dir!("$CARGO_MANIFEST_DIR/assets");

/// File name of the root module inside the work directory.
pub const MAIN_TF: &str = "main.tf";

/// Return the raw text of an embedded template file.
///
/// # Errors
///
/// Returns an error if no file with the given `name` is embedded or it is
/// not UTF-8.
pub fn template_file(name: &str) -> Result<&'static str> {
    TEMPLATE
        .get_file(name)
        .and_then(|f| f.contents_utf8())
        .ok_or_else(|| anyhow::anyhow!("embedded template file not found: {name}"))
}

/// Writes the embedded template into a work directory.
pub struct EmbeddedTemplate;

impl AssetExtractor for EmbeddedTemplate {
    fn extract_to(&self, dir: &Path) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for file in TEMPLATE.files() {
            let dest = dir.join(file.path());
            std::fs::write(&dest, file.contents())
                .with_context(|| format!("writing {}", dest.display()))?;
            written.push(dest);
        }
        Ok(written)
    }
}
