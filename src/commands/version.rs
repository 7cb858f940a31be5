//! Version command

use anyhow::Result;

use crate::app::AppContext;
use crate::output::json::{self, VersionInfo};

/// Run the version command.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
pub fn run(app: &AppContext) -> Result<()> {
    let info = VersionInfo::current();
    if app.is_json() {
        println!("{}", json::format_value(&info)?);
    } else if app.output.quiet {
        println!("{}", info.version);
    } else {
        app.renderer().render_version(&info);
    }
    Ok(())
}
