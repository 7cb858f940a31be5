//! Human-readable terminal renderer.

use owo_colors::OwoColorize as _;

use crate::application::services::destroy::DestroyOutcome;
use crate::application::services::provision::ProvisionOutcome;
use crate::domain::config::DropshipConfig;
use crate::output::OutputContext;
use crate::output::json::VersionInfo;

/// Renders command outcomes as human-readable terminal output.
pub struct HumanRenderer<'a> {
    ctx: &'a OutputContext,
}

impl<'a> HumanRenderer<'a> {
    /// Create a new `HumanRenderer` wrapping the given output context.
    #[must_use]
    pub fn new(ctx: &'a OutputContext) -> Self {
        Self { ctx }
    }

    /// Print the SSH connection instructions after `up`.
    ///
    /// With `--quiet` only the bare `ssh` command line is printed so it can be
    /// captured by a script.
    pub fn render_provision(&self, outcome: &ProvisionOutcome) {
        if self.ctx.quiet {
            println!("{}", outcome.ssh_command);
            return;
        }
        println!();
        self.ctx.header(&format!("Droplet '{}' is ready", outcome.name));
        self.ctx.kv("Address:    ", &outcome.ip);
        self.ctx
            .kv("Private key:", &outcome.key_path.display().to_string());
        self.ctx.kv("Fingerprint:", &outcome.fingerprint);
        if outcome.key_generated {
            self.ctx.info("A new key pair was generated for this machine.");
        }
        if !outcome.key_uploaded {
            self.ctx
                .info("The key was already registered with your account.");
        }
        println!();
        self.ctx.info("Connect with:");
        println!(
            "      {}",
            outcome.ssh_command.style(self.ctx.styles.command)
        );
        self.ctx
            .info("The first login may take a minute while cloud-init finishes.");
    }

    /// Confirm a completed `destroy`.
    pub fn render_destroy(&self, outcome: &DestroyOutcome) {
        self.ctx.success(&format!(
            "Droplet '{}' and its firewall were removed.",
            outcome.name
        ));
    }

    /// Render the CLI version information.
    pub fn render_version(&self, info: &VersionInfo) {
        if self.ctx.quiet {
            return;
        }
        self.ctx.info(&format!("{} v{}", info.name, info.version));
    }

    /// Render the effective configuration and where it lives.
    pub fn render_config(&self, path: &str, config: &DropshipConfig) {
        self.ctx.header(&format!("Configuration ({path})"));
        self.ctx.kv("droplet.region:   ", &config.droplet.region);
        self.ctx.kv("droplet.size:     ", &config.droplet.size);
        self.ctx.kv("droplet.image:    ", &config.droplet.image);
        self.ctx.kv(
            "ssh.key_path:     ",
            config
                .ssh
                .key_path
                .as_deref()
                .unwrap_or("~/.ssh/dropship_ed25519"),
        );
        self.ctx.kv(
            "ssh.key_name:     ",
            config.ssh.key_name.as_deref().unwrap_or("dropship-<date>"),
        );
        self.ctx.kv("terraform.binary: ", &config.terraform.binary);
        self.ctx.kv(
            "terraform.workdir:",
            config
                .terraform
                .workdir
                .as_deref()
                .unwrap_or("~/.dropship/terraform"),
        );
        self.ctx.kv("api.base_url:     ", &config.api.base_url);
        self.ctx
            .kv("api.timeout_secs: ", &config.api.timeout_secs.to_string());
    }
}
