//! Template command

use anyhow::Result;

use crate::infra::assets::{MAIN_TF, template_file};

/// Print the embedded Terraform root module.
///
/// # Errors
///
/// Returns an error if the template is missing from the binary.
pub fn run() -> Result<()> {
    print!("{}", template_file(MAIN_TF)?);
    Ok(())
}
