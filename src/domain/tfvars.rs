//! Rendering of `terraform.tfvars`.

use std::fmt::Write as _;

use crate::domain::droplet::DropletSettings;

/// Values written into the variables file before every Terraform call.
#[derive(Debug, Clone)]
pub struct TfVars<'a> {
    pub do_token: &'a str,
    pub droplet_name: &'a str,
    pub ssh_fingerprints: &'a [String],
    pub settings: &'a DropletSettings,
}

impl TfVars<'_> {
    /// Renders the variables as HCL.
    #[must_use]
    pub fn render(&self) -> String {
        let mut out = String::from("# Generated by dropship. Overwritten on every run.\n");
        let _ = writeln!(out, "do_token         = {}", quote(self.do_token));
        let _ = writeln!(out, "droplet_name     = {}", quote(self.droplet_name));
        let _ = writeln!(out, "region           = {}", quote(&self.settings.region));
        let _ = writeln!(out, "size             = {}", quote(&self.settings.size));
        let _ = writeln!(out, "image            = {}", quote(&self.settings.image));
        let fingerprints = self
            .ssh_fingerprints
            .iter()
            .map(|f| quote(f))
            .collect::<Vec<_>>()
            .join(", ");
        let _ = writeln!(out, "ssh_fingerprints = [{fingerprints}]");
        out
    }
}

/// Quotes `s` as an HCL string literal, escaping template sequences.
#[must_use]
pub fn quote(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('"');
    let mut chars = s.chars().peekable();
    while let Some(c) = chars.next() {
        match c {
            '\\' => out.push_str("\\\\"),
            '"' => out.push_str("\\\""),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            '$' | '%' if chars.peek() == Some(&'{') => {
                out.push(c);
                out.push(c);
            }
            _ => out.push(c),
        }
    }
    out.push('"');
    out
}
