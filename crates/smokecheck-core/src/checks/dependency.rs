//! Dependency availability check

use serde_json::{Map, Value};
use std::sync::Arc;

use crate::check::{Check, CheckFuture, CheckKind, Observation};
use crate::connectors::resolver::CapabilityResolver;

/// Resolves every listed capability; the first one that fails to resolve
/// turns the check into an error naming it.
pub struct DependencyCheck {
    capabilities: Vec<String>,
    resolver: Arc<dyn CapabilityResolver>,
}

impl DependencyCheck {
    pub fn new(capabilities: Vec<String>, resolver: Arc<dyn CapabilityResolver>) -> Self {
        Self {
            capabilities,
            resolver,
        }
    }
}

impl Check for DependencyCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Dependency
    }

    fn observe(&self) -> CheckFuture<'_> {
        Box::pin(async move {
            if self.capabilities.is_empty() {
                return Ok(Observation::pass("no capabilities required"));
            }

            let mut resolved = Map::new();
            for name in &self.capabilities {
                let path = self.resolver.resolve(name)?;
                tracing::debug!(capability = %name, path = %path.display(), "resolved");
                resolved.insert(name.clone(), Value::String(path.display().to_string()));
            }

            Ok(Observation::pass(format!(
                "resolved {} capabilities: {}",
                self.capabilities.len(),
                self.capabilities.join(", ")
            ))
            .with_diagnostic("resolved", Value::Object(resolved)))
        })
    }
}
