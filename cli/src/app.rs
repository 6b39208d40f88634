//! Application context — unified state passed to every command handler.
//!
//! `AppContext` is built once in `Cli::run()` from the global flags and the
//! loaded configuration. Adding a cross-cutting concern means one field
//! change here and no command signature changes.

use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

use crate::application::ports::ConfigStore;
use crate::application::services::config_service;
use crate::domain::compose::ComposeProject;
use crate::domain::config::SvcConfig;
use crate::domain::service::ServiceRegistry;
use crate::infra::command_runner::{AppRunner, DryRunRunner, TokioCommandRunner};
use crate::infra::config::YamlConfigStore;
use crate::output::{HumanRenderer, JsonRenderer, OutputContext, Renderer};

/// Output rendering mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputMode {
    /// Human-readable terminal output (default).
    Human,
    /// Machine-readable JSON output.
    Json,
}

/// Output rendering flags.
pub struct OutputFlags {
    /// Disable ANSI color output.
    pub no_color: bool,
    /// Suppress non-error output.
    pub quiet: bool,
    /// Enable JSON output mode.
    pub json: bool,
}

/// Behaviour flags.
pub struct BehaviourFlags {
    /// Print orchestrator invocations instead of running them.
    pub dry_run: bool,
}

/// Compose settings given on the command line; these win over the config file.
#[derive(Default)]
pub struct ComposeOverrides {
    /// `-f/--file`, repeatable.
    pub files: Vec<String>,
    /// `-p/--project-name`.
    pub project_name: Option<String>,
}

/// Flags passed from the top-level CLI to `AppContext::new`.
pub struct AppFlags {
    /// Output rendering options.
    pub output: OutputFlags,
    /// Behaviour options.
    pub behaviour: BehaviourFlags,
    /// Compose overrides.
    pub compose: ComposeOverrides,
}

/// Unified application context passed to every command handler.
pub struct AppContext {
    /// Terminal output context (colors, quiet mode).
    pub output: OutputContext,
    /// Output rendering mode (human vs JSON).
    pub mode: OutputMode,
    /// Live or dry-run process runner.
    pub runner: AppRunner,
    /// Loaded and validated configuration.
    pub config: SvcConfig,
    /// Where the configuration was (or would be) read from.
    pub config_path: PathBuf,
    /// Compose project with command-line overrides applied.
    pub project: ComposeProject,
    /// Service registry from the configuration.
    pub registry: ServiceRegistry,
    /// When `true`, skip interactive prompts.
    ///
    /// Set when the `CI` or `SVC_YES` environment variables are present.
    pub non_interactive: bool,
}

impl AppContext {
    /// Construct an `AppContext` from top-level CLI flags.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be located, parsed, or
    /// validated.
    pub fn new(flags: AppFlags) -> Result<Self> {
        Self::with_store(flags, &YamlConfigStore::default())
    }

    /// Construct an `AppContext` reading configuration from `store`.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration cannot be located, parsed, or
    /// validated.
    pub fn with_store(flags: AppFlags, store: &impl ConfigStore) -> Result<Self> {
        let non_interactive = std::env::var("CI").is_ok() || std::env::var("SVC_YES").is_ok();

        let mode = if flags.output.json {
            OutputMode::Json
        } else {
            OutputMode::Human
        };

        let config = config_service::load_config(store)?;
        let config_path = store.path()?;

        let mut project = config.project();
        if !flags.compose.files.is_empty() {
            project.files = flags.compose.files;
        }
        if flags.compose.project_name.is_some() {
            project.project_name = flags.compose.project_name;
        }

        let runner = if flags.behaviour.dry_run {
            AppRunner::DryRun(DryRunRunner)
        } else {
            AppRunner::Live(TokioCommandRunner::new(Duration::from_secs(
                config.compose.timeout_secs,
            )))
        };
        tracing::debug!(
            config = %config_path.display(),
            files = ?project.files,
            dry_run = flags.behaviour.dry_run,
            "context ready"
        );

        Ok(Self {
            output: OutputContext::new(flags.output.no_color, flags.output.quiet),
            mode,
            runner,
            registry: config.registry(),
            config,
            config_path,
            project,
            non_interactive,
        })
    }

    /// Returns `true` when JSON output mode is active.
    #[must_use]
    pub fn is_json(&self) -> bool {
        self.mode == OutputMode::Json
    }

    /// Returns `true` when invocations are printed instead of run.
    #[must_use]
    pub fn is_dry_run(&self) -> bool {
        matches!(self.runner, AppRunner::DryRun(_))
    }

    /// Returns the appropriate `Renderer` variant for the current output mode.
    #[must_use]
    pub fn renderer(&self) -> Renderer<'_> {
        match self.mode {
            OutputMode::Human => Renderer::Human(HumanRenderer::new(&self.output)),
            OutputMode::Json => Renderer::Json(JsonRenderer),
        }
    }

    /// Ask the user for confirmation.
    ///
    /// When `non_interactive` is `true` (`CI` or `SVC_YES` env), returns
    /// `default` immediately without prompting.
    ///
    /// # Errors
    ///
    /// Returns an error if the terminal prompt fails (e.g. no TTY available).
    pub fn confirm(&self, prompt: &str, default: bool) -> Result<bool> {
        if self.non_interactive {
            return Ok(default);
        }
        dialoguer::Confirm::new()
            .with_prompt(prompt)
            .default(default)
            .interact()
            .context("confirmation needs a terminal; pass --yes to skip it")
    }
}
