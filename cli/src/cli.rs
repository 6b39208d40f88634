//! CLI argument parsing with clap derive

use std::process::ExitCode;

use anyhow::Result;
use clap::{ArgAction, Parser, Subcommand};

use crate::app::{AppContext, AppFlags, BehaviourFlags, ComposeOverrides, OutputFlags};
use crate::commands;
use crate::domain::operation::Operation;

/// Profile-aware lifecycle control for a docker compose stack
#[derive(Parser, Debug)]
#[command(
    name = "svc",
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
        value_parser = clap::builder::FalseyValueParser::new()
    )]
    pub no_color: bool,

    /// Increase diagnostic logging on stderr (-v, -vv, -vvv)
    #[arg(short, long, global = true, action = ArgAction::Count)]
    pub verbose: u8,

    /// Print orchestrator commands instead of running them
    #[arg(long, global = true)]
    pub dry_run: bool,

    /// Compose file (repeatable; overrides the config file)
    #[arg(
        short = 'f',
        long = "file",
        global = true,
        env = "SVC_COMPOSE_FILE",
        value_name = "FILE"
    )]
    pub files: Vec<String>,

    /// Compose project name
    #[arg(short = 'p', long, global = true, env = "SVC_PROJECT", value_name = "NAME")]
    pub project_name: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Create and start services in the background
    Up(commands::up::UpArgs),

    /// Stop running containers without removing them
    Stop(commands::control::ControlArgs),

    /// Start existing containers
    Start(commands::control::ControlArgs),

    /// Restart containers
    Restart(commands::control::ControlArgs),

    /// Freeze the processes of running containers
    Pause(commands::control::ControlArgs),

    /// Resume paused containers
    Unpause(commands::control::ControlArgs),

    /// Remove the stack's containers and networks
    Down(commands::down::DownArgs),

    /// Show or follow service logs
    Logs(commands::logs::LogsArgs),

    /// Build service images
    Build(commands::build::BuildArgs),

    /// Run a command inside a service container
    Exec(commands::exec::ExecArgs),

    /// Show a resource usage snapshot
    Stats,

    /// List containers and their state
    Ps,

    /// List the known services
    Services,

    /// Diagnose the stack
    Doctor,

    /// Manage configuration
    #[command(subcommand)]
    Config(commands::config::ConfigCommand),

    /// Show version
    Version,
}

impl Cli {
    /// Execute the CLI command.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid or the command fails
    /// before the orchestrator reports an exit code.
    pub async fn run(self) -> Result<ExitCode> {
        let Cli {
            json,
            quiet,
            no_color,
            verbose: _,
            dry_run,
            files,
            project_name,
            command,
        } = self;

        let app = AppContext::new(AppFlags {
            output: OutputFlags {
                no_color,
                quiet,
                json,
            },
            behaviour: BehaviourFlags { dry_run },
            compose: ComposeOverrides {
                files,
                project_name,
            },
        })?;

        match command {
            Command::Up(args) => commands::up::run(&app, args).await,
            Command::Stop(args) => commands::control::run(&app, Operation::Stop, args).await,
            Command::Start(args) => commands::control::run(&app, Operation::Start, args).await,
            Command::Restart(args) => {
                commands::control::run(&app, Operation::Restart, args).await
            }
            Command::Pause(args) => commands::control::run(&app, Operation::Pause, args).await,
            Command::Unpause(args) => {
                commands::control::run(&app, Operation::Unpause, args).await
            }
            Command::Down(args) => commands::down::run(&app, args).await,
            Command::Logs(args) => commands::logs::run(&app, &args).await,
            Command::Build(args) => commands::build::run(&app, args).await,
            Command::Exec(args) => commands::exec::run(&app, args).await,
            Command::Stats => commands::stats::run(&app).await,
            Command::Ps => commands::ps::run(&app).await,
            Command::Services => commands::services::run(&app),
            Command::Doctor => commands::doctor::run(&app).await,
            Command::Config(cmd) => commands::config::run(&app, &cmd),
            Command::Version => commands::version::run(&app),
        }
    }
}
