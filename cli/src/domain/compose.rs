//! Compose invocation builder.
//!
//! Turns a resolved [`Selection`] and per-operation options into the exact
//! argv handed to the orchestrator. Nothing here spawns a process.

use std::fmt;

use crate::domain::logs::LogQuery;
use crate::domain::operation::Operation;
use crate::domain::service::Selection;

/// How to reach the compose project.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeProject {
    /// `docker` (plugin form) or a standalone `docker-compose` binary.
    pub program: String,
    /// Compose files, passed with `-f` in order.
    pub files: Vec<String>,
    /// Project name override (`-p`).
    pub project_name: Option<String>,
}

impl Default for ComposeProject {
    fn default() -> Self {
        Self {
            program: "docker".to_string(),
            files: vec!["docker-compose.yml".to_string()],
            project_name: None,
        }
    }
}

/// Flags that only some lifecycle operations accept.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct LifecycleFlags {
    /// `up --build`
    pub build: bool,
    /// `up --force-recreate`
    pub force_recreate: bool,
    /// `down --volumes`
    pub volumes: bool,
    /// `build --no-cache`
    pub no_cache: bool,
    /// `build --pull`
    pub pull: bool,
}

/// A fully resolved external command.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ComposeInvocation {
    pub program: String,
    pub args: Vec<String>,
}

impl ComposeInvocation {
    /// Arguments as borrowed strings, the shape `CommandRunner` takes.
    #[must_use]
    pub fn argv(&self) -> Vec<&str> {
        self.args.iter().map(String::as_str).collect()
    }

    /// Whether `token` appears as a whole argument.
    #[must_use]
    pub fn has_arg(&self, token: &str) -> bool {
        self.args.iter().any(|a| a == token)
    }
}

impl fmt::Display for ComposeInvocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&quote(&self.program))?;
        for arg in &self.args {
            write!(f, " {}", quote(arg))?;
        }
        Ok(())
    }
}

fn quote(arg: &str) -> String {
    let plain = !arg.is_empty()
        && arg
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || "-_./=:,@%+".contains(c));
    if plain {
        arg.to_string()
    } else {
        format!("'{}'", arg.replace('\'', r"'\''"))
    }
}

impl ComposeProject {
    /// Whether the program is the legacy standalone `docker-compose` binary.
    #[must_use]
    pub fn is_standalone(&self) -> bool {
        std::path::Path::new(&self.program)
            .file_stem()
            .is_some_and(|s| s == "docker-compose")
    }

    /// Engine binary for commands compose does not wrap (`docker stats`).
    #[must_use]
    pub fn engine_program(&self) -> String {
        if self.is_standalone() {
            "docker".to_string()
        } else {
            self.program.clone()
        }
    }

    fn base(&self, profiles: &[String]) -> Vec<String> {
        let mut args = Vec::new();
        if !self.is_standalone() {
            args.push("compose".to_string());
        }
        for file in &self.files {
            args.push("-f".to_string());
            args.push(file.clone());
        }
        if let Some(name) = &self.project_name {
            args.push("-p".to_string());
            args.push(name.clone());
        }
        for profile in profiles {
            args.push("--profile".to_string());
            args.push(profile.clone());
        }
        args
    }

    fn invocation(&self, args: Vec<String>) -> ComposeInvocation {
        ComposeInvocation {
            program: self.program.clone(),
            args,
        }
    }

    /// Build a lifecycle invocation (`up`, `stop`, `start`, `restart`,
    /// `down`, `pause`, `unpause`, `build`).
    #[must_use]
    pub fn lifecycle(
        &self,
        op: Operation,
        selection: &Selection,
        flags: LifecycleFlags,
    ) -> ComposeInvocation {
        let mut args = self.base(&selection.profiles);
        args.push(op.verb().to_string());
        match op {
            Operation::Up => {
                args.push("-d".to_string());
                if flags.build {
                    args.push("--build".to_string());
                }
                if flags.force_recreate {
                    args.push("--force-recreate".to_string());
                }
            }
            Operation::Down if flags.volumes => args.push("--volumes".to_string()),
            Operation::Build => {
                if flags.no_cache {
                    args.push("--no-cache".to_string());
                }
                if flags.pull {
                    args.push("--pull".to_string());
                }
            }
            _ => {}
        }
        if op != Operation::Down {
            args.extend(selection.services.iter().cloned());
        }
        self.invocation(args)
    }

    /// `compose logs` for a validated query.
    #[must_use]
    pub fn logs(&self, selection: &Selection, query: &LogQuery) -> ComposeInvocation {
        let mut args = self.base(&selection.profiles);
        args.push("logs".to_string());
        args.push("--no-color".to_string());
        if let Some(n) = query.tail {
            args.push("--tail".to_string());
            args.push(n.to_string());
        }
        if let Some(since) = &query.since {
            args.push("--since".to_string());
            args.push(since.to_arg());
        }
        if query.timestamps {
            args.push("--timestamps".to_string());
        }
        if query.follow {
            args.push("--follow".to_string());
        }
        args.extend(selection.services.iter().cloned());
        self.invocation(args)
    }

    /// `compose exec` into one service.
    #[must_use]
    pub fn exec(
        &self,
        selection: &Selection,
        no_tty: bool,
        command: &[String],
    ) -> ComposeInvocation {
        let mut args = self.base(&selection.profiles);
        args.push("exec".to_string());
        if no_tty {
            args.push("-T".to_string());
        }
        args.extend(selection.services.iter().cloned());
        args.extend(command.iter().cloned());
        self.invocation(args)
    }

    /// `compose ps` as JSON, every container including stopped ones.
    #[must_use]
    pub fn ps(&self, profiles: &[String]) -> ComposeInvocation {
        let mut args = self.base(profiles);
        args.extend(["ps", "--all", "--format", "json"].map(String::from));
        self.invocation(args)
    }

    /// `compose ps -q`: IDs of running containers.
    #[must_use]
    pub fn ps_ids(&self, profiles: &[String]) -> ComposeInvocation {
        let mut args = self.base(profiles);
        args.extend(["ps", "-q"].map(String::from));
        self.invocation(args)
    }

    /// `docker stats` for the given container IDs.
    #[must_use]
    pub fn stats(&self, ids: &[String]) -> ComposeInvocation {
        let mut args: Vec<String> = ["stats", "--no-stream", "--format", "{{json .}}"]
            .map(String::from)
            .to_vec();
        args.extend(ids.iter().cloned());
        ComposeInvocation {
            program: self.engine_program(),
            args,
        }
    }

    /// `compose version --short`.
    #[must_use]
    pub fn version(&self) -> ComposeInvocation {
        let mut args = Vec::new();
        if !self.is_standalone() {
            args.push("compose".to_string());
        }
        args.extend(["version", "--short"].map(String::from));
        self.invocation(args)
    }
}
