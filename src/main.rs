//! Dropship CLI - one droplet, one firewall, one command

#![cfg_attr(test, allow(clippy::expect_used))]

use clap::Parser;
use tracing_subscriber::EnvFilter;

use dropship_cli::cli::Cli;
use dropship_cli::domain::error::ProvisionError;
use dropship_cli::output::{OutputContext, json};

fn init_tracing(verbose: u8) {
    let default = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let json = cli.json;
    let no_color = cli.no_color;

    if let Err(e) = cli.run().await {
        let code = e
            .downcast_ref::<ProvisionError>()
            .map_or(1, ProvisionError::exit_code);
        tracing::debug!(code, "command failed: {e:?}");
        if json && let Ok(doc) = json::format_error(&format!("{e:#}"), code) {
            println!("{doc}");
        }
        OutputContext::new(no_color, false).error(&format!("{e:#}"));
        std::process::exit(code);
    }
}
