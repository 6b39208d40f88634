//! Domain layer — pure business logic, types, and validation.
//!
//! This module has zero imports from `crate::infra`, `crate::commands`,
//! `crate::application`, `tokio`, `std::fs`, `std::process`, or `std::net`.
//! All functions are synchronous and take data in, returning data out.

pub mod compose;
pub mod config;
pub mod error;
pub mod health;
pub mod logs;
pub mod operation;
pub mod service;

pub use compose::{ComposeInvocation, ComposeProject, LifecycleFlags};
pub use config::{SvcConfig, validate_config};
pub use error::{ConfigError, LogError, ServiceError};
pub use health::{CheckCategory, CheckResult, DiagnosticReport, collect_issues};
pub use logs::{LogFilter, LogQuery, Since, TailBuffer, select_lines};
pub use operation::{ContainerState, ContainerStatus, Operation, ResourceUsage};
pub use service::{SCHEDULE_PROFILE, Selection, ServiceDescriptor, ServiceRegistry};
