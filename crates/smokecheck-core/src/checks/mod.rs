//! Built-in checks and the default registry
//!
//! The default registry covers a taskboard deployment end to end: the client
//! build output, the API server, password hashing, tooling on `PATH` and the
//! task collection in the document store.

mod datastore;
mod dependency;
mod filesystem;
mod password;
mod reachability;
mod unconfigured;

pub use datastore::DataStoreCheck;
pub use dependency::DependencyCheck;
pub use filesystem::FilesystemCheck;
pub use password::PasswordHashCheck;
pub use reachability::ReachabilityCheck;
pub use unconfigured::UnconfiguredCheck;

use std::sync::Arc;
use std::time::Duration;

use crate::check::{CheckKind, CheckRegistry, CheckSpec};
use crate::connectors::hashing::Argon2Hasher;
use crate::connectors::resolver::PathResolver;
use crate::connectors::store::open_store;
use crate::error::Result;
use crate::settings::HarnessSettings;

pub const BUILD_OUTPUT: &str = "build-output";
pub const SERVER: &str = "server";
pub const PASSWORD_HASH: &str = "password-hash";
pub const DEPENDENCIES: &str = "dependencies";
pub const TASK_STORE: &str = "task-store";

/// Build the standard registry from settings.
///
/// Checks whose settings are missing are still registered, as
/// `UnconfiguredCheck`s, so the report always names them.
pub fn default_registry(settings: &HarnessSettings, timeout: Duration) -> Result<CheckRegistry> {
    let mut registry = CheckRegistry::new();

    registry.register(CheckSpec::new(
        BUILD_OUTPUT,
        FilesystemCheck::new(&settings.build.dir).with_required(settings.build.required.clone()),
    ))?;

    registry.register(match &settings.server {
        Ok(server) => CheckSpec::new(SERVER, ReachabilityCheck::new(server.url(), timeout)),
        Err(e) => CheckSpec::new(SERVER, UnconfiguredCheck::new(CheckKind::Reachability, e.to_string())),
    })?;

    registry.register(match &settings.hash {
        Ok(hash) => CheckSpec::new(
            PASSWORD_HASH,
            PasswordHashCheck::new(hash.secret.clone(), Arc::new(Argon2Hasher::new())),
        ),
        Err(e) => CheckSpec::new(
            PASSWORD_HASH,
            UnconfiguredCheck::new(CheckKind::PasswordHash, e.to_string()),
        ),
    })?;

    registry.register(CheckSpec::new(
        DEPENDENCIES,
        DependencyCheck::new(settings.deps.required.clone(), Arc::new(PathResolver)),
    ))?;

    let store_check = match &settings.store {
        Ok(store) => match open_store(&store.url, timeout) {
            Ok(backend) => CheckSpec::new(
                TASK_STORE,
                DataStoreCheck::new(Arc::from(backend), store.collection.clone()),
            ),
            Err(e) => CheckSpec::new(TASK_STORE, UnconfiguredCheck::new(CheckKind::DataStore, e.to_string())),
        },
        Err(e) => CheckSpec::new(TASK_STORE, UnconfiguredCheck::new(CheckKind::DataStore, e.to_string())),
    };
    registry.register(store_check)?;

    Ok(registry)
}
