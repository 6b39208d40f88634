//! Service registry and profile gating.
//!
//! Pure functions only: the registry maps logical names to compose services
//! and decides which services and profiles an operation may touch.

use serde::{Deserialize, Serialize};

use crate::domain::error::ServiceError;
use crate::domain::operation::Operation;

/// Profile that gates the scheduled analyzer job.
pub const SCHEDULE_PROFILE: &str = "schedule";

/// A logical service and how it maps onto the compose file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServiceDescriptor {
    /// Name used on the command line.
    pub name: String,
    /// Service key in the compose file.
    pub compose_service: String,
    /// Activation profile, if the service is excluded from default startup.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub profile: Option<String>,
    /// Whether a bare `svc up` starts this service.
    #[serde(default = "default_enabled")]
    pub default_enabled: bool,
    /// Host port the service publishes, checked by `svc doctor`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u16>,
}

fn default_enabled() -> bool {
    true
}

impl ServiceDescriptor {
    fn new(name: &str, port: Option<u16>) -> Self {
        Self {
            name: name.to_string(),
            compose_service: name.to_string(),
            profile: None,
            default_enabled: true,
            port,
        }
    }

    /// Whether this service is targeted when no names are given.
    #[must_use]
    pub fn is_active(&self, profiles: &[String]) -> bool {
        match &self.profile {
            Some(p) => profiles.iter().any(|active| active == p),
            None => self.default_enabled,
        }
    }
}

/// The built-in registry for the stock analysis stack.
#[must_use]
pub fn default_services() -> Vec<ServiceDescriptor> {
    vec![
        ServiceDescriptor::new("server", Some(8000)),
        ServiceDescriptor {
            profile: Some(SCHEDULE_PROFILE.to_string()),
            default_enabled: false,
            ..ServiceDescriptor::new("analyzer", None)
        },
        ServiceDescriptor::new("rsshub", Some(1200)),
        ServiceDescriptor::new("browserless", Some(3000)),
    ]
}

/// Services and profiles resolved for one operation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Selection {
    /// Compose service names, in request order. Empty means "all active".
    pub services: Vec<String>,
    /// Profiles to pass to the orchestrator, deduplicated in order.
    pub profiles: Vec<String>,
}

/// Lookup table of known services.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceRegistry {
    services: Vec<ServiceDescriptor>,
}

impl Default for ServiceRegistry {
    fn default() -> Self {
        Self::new(default_services())
    }
}

impl ServiceRegistry {
    #[must_use]
    pub fn new(services: Vec<ServiceDescriptor>) -> Self {
        Self { services }
    }

    #[must_use]
    pub fn services(&self) -> &[ServiceDescriptor] {
        &self.services
    }

    /// Find a service by logical name, falling back to its compose name.
    #[must_use]
    pub fn lookup(&self, name: &str) -> Option<&ServiceDescriptor> {
        self.services
            .iter()
            .find(|s| s.name == name)
            .or_else(|| self.services.iter().find(|s| s.compose_service == name))
    }

    /// Every profile referenced by the registry, in declaration order.
    #[must_use]
    pub fn all_profiles(&self) -> Vec<String> {
        let mut out = Vec::new();
        for p in self.services.iter().filter_map(|s| s.profile.as_ref()) {
            push_unique(&mut out, p);
        }
        out
    }

    fn known_names(&self) -> String {
        self.services
            .iter()
            .map(|s| s.name.as_str())
            .collect::<Vec<_>>()
            .join(", ")
    }

    /// Resolve requested names for `op` under the requested profiles.
    ///
    /// Activating operations refuse a profiled service whose profile is not
    /// requested. Other operations activate that profile implicitly so the
    /// orchestrator can see the container.
    ///
    /// # Errors
    ///
    /// Returns [`ServiceError::UnknownService`] for a name not in the
    /// registry and [`ServiceError::ProfileInactive`] when profile gating
    /// refuses a service.
    pub fn resolve(
        &self,
        names: &[String],
        op: Operation,
        profiles: &[String],
    ) -> Result<Selection, ServiceError> {
        let mut selection = Selection::default();
        for p in profiles {
            push_unique(&mut selection.profiles, p);
        }

        for name in names {
            let svc = self
                .lookup(name)
                .ok_or_else(|| ServiceError::UnknownService {
                    name: name.clone(),
                    known: self.known_names(),
                })?;
            if let Some(profile) = &svc.profile
                && !profiles.contains(profile)
            {
                if op.is_activating() {
                    return Err(ServiceError::ProfileInactive {
                        service: svc.name.clone(),
                        profile: profile.clone(),
                    });
                }
                push_unique(&mut selection.profiles, profile);
            }
            push_unique(&mut selection.services, &svc.compose_service);
        }
        Ok(selection)
    }

    /// The services an operation will affect once the orchestrator applies
    /// `selection`: the named ones, or every active service if none were named.
    #[must_use]
    pub fn targets(&self, selection: &Selection) -> Vec<&ServiceDescriptor> {
        if selection.services.is_empty() {
            self.services
                .iter()
                .filter(|s| s.is_active(&selection.profiles))
                .collect()
        } else {
            selection
                .services
                .iter()
                .filter_map(|name| self.services.iter().find(|s| &s.compose_service == name))
                .collect()
        }
    }
}

fn push_unique(list: &mut Vec<String>, value: &str) {
    if !list.iter().any(|v| v == value) {
        list.push(value.to_string());
    }
}
