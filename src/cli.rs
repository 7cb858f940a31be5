//! CLI argument parsing with clap derive

use anyhow::Result;
use clap::builder::FalseyValueParser;
use clap::{ArgAction, Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, OutputFlags};
use crate::commands;

/// Provision a DigitalOcean droplet and firewall through Terraform
#[derive(Parser)]
#[command(
    name = "dropship",
    version,
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Output in JSON format
    #[arg(long, global = true)]
    pub json: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Disable colored output
    #[arg(
        long,
        global = true,
        env = "NO_COLOR",
        value_parser = FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Never prompt: approve the plan and fail on missing inputs
    #[arg(short, long, global = true)]
    pub yes: bool,

    /// Increase diagnostic logging (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Create a droplet and firewall, then print SSH instructions
    Up(commands::up::UpArgs),

    /// Destroy a droplet created by `up`
    Destroy(commands::destroy::DestroyArgs),

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Print the embedded Terraform template
    Template,

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the command fails.
    pub async fn run(self) -> Result<()> {
        let Cli {
            json,
            quiet,
            no_color,
            yes,
            verbose: _,
            command,
        } = self;
        let app = AppContext::new(&AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            behaviour: BehaviourFlags { yes },
        });

        match command {
            Command::Up(args) => commands::up::run(&app, args).await,
            Command::Destroy(args) => commands::destroy::run(&app, args).await,
            Command::Config(cmd) => commands::config::run(&app, cmd),
            Command::Template => commands::template::run(),
            Command::Version => commands::version::run(&app),
        }
    }
}
