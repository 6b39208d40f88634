//! Command implementations

pub mod build;
pub mod config;
pub mod control;
pub mod doctor;
pub mod down;
pub mod exec;
pub mod logs;
pub mod ps;
pub mod services;
pub mod stats;
pub mod up;
pub mod version;

use std::process::ExitCode;

use clap::Args;

/// Profiles to activate, shared by the lifecycle commands.
#[derive(Args, Debug, Default)]
pub struct ProfileArgs {
    /// Activate a compose profile (repeatable)
    #[arg(long = "profile", value_name = "PROFILE")]
    pub profiles: Vec<String>,
}

/// Map an orchestrator exit code onto the process exit code.
///
/// Codes outside `0..=255` (or negative, from signals) become 1.
#[must_use]
pub fn exit_code(code: i32) -> ExitCode {
    ExitCode::from(u8::try_from(code).unwrap_or(1))
}
