//! Capability resolution
//!
//! A capability is an external executable the deployment relies on (`node`,
//! `npm`, ...). Resolving it means locating it on `PATH`.

use std::path::PathBuf;

use crate::error::ConnectorError;

/// Locates named capabilities
#[cfg_attr(test, mockall::automock)]
pub trait CapabilityResolver: Send + Sync {
    fn resolve(&self, name: &str) -> Result<PathBuf, ConnectorError>;
}

/// Resolves executables through `PATH` (and `PATHEXT` on Windows)
#[derive(Debug, Clone, Default)]
pub struct PathResolver;

impl CapabilityResolver for PathResolver {
    fn resolve(&self, name: &str) -> Result<PathBuf, ConnectorError> {
        which::which(name).map_err(|e| ConnectorError::Unresolved {
            name: name.to_string(),
            reason: e.to_string(),
        })
    }
}
