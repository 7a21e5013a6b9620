//! Settings for the built-in checks
//!
//! Every value comes from the environment. A missing or malformed required
//! value never aborts start-up; it is carried as a `SettingError` and the
//! affected check reports it as an error when the run executes.

pub mod env;

pub use env::{EnvNaming, EnvReader, EnvSource, ProcessEnv, ENV_PREFIX};

use secrecy::SecretString;
use std::fmt;
use std::path::PathBuf;

/// Why a setting is unusable
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingError {
    Missing { name: String },
    Invalid { name: String, reason: String },
}

impl fmt::Display for SettingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingError::Missing { name } => {
                write!(f, "missing required environment variable {}", name)
            }
            SettingError::Invalid { name, reason } => {
                write!(f, "invalid value for {}: {}", name, reason)
            }
        }
    }
}

impl std::error::Error for SettingError {}

/// A setting that may be absent
pub type Setting<T> = Result<T, SettingError>;

/// Client build output
#[derive(Debug, Clone)]
pub struct BuildSettings {
    pub dir: PathBuf,
    pub required: Vec<String>,
}

/// API server target
#[derive(Debug, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub path: String,
}

impl ServerSettings {
    pub fn url(&self) -> String {
        let path = if self.path.starts_with('/') {
            self.path.clone()
        } else {
            format!("/{}", self.path)
        };
        format!("http://{}:{}{}", self.host, self.port, path)
    }
}

/// Credential used by the password-hash round trip
#[derive(Debug, Clone)]
pub struct HashSettings {
    pub secret: SecretString,
}

/// External executables the deployment needs
#[derive(Debug, Clone)]
pub struct DependencySettings {
    pub required: Vec<String>,
}

/// Document store target
#[derive(Debug, Clone)]
pub struct StoreSettings {
    pub url: String,
    pub collection: String,
}

/// Everything the default registry needs
#[derive(Debug, Clone)]
pub struct HarnessSettings {
    pub build: BuildSettings,
    pub server: Setting<ServerSettings>,
    pub hash: Setting<HashSettings>,
    pub deps: DependencySettings,
    pub store: Setting<StoreSettings>,
}

impl HarnessSettings {
    /// Read settings from the process environment
    pub fn from_process_env() -> Self {
        Self::from_env(&ProcessEnv)
    }

    /// Read settings from any environment source
    pub fn from_env(source: &dyn EnvSource) -> Self {
        let env = EnvReader::new(source);

        let build = BuildSettings {
            dir: PathBuf::from(env.or_default("build", "dir", "client/build")),
            required: env.list("build", "required", &["index.html", "static"]),
        };

        let server = env.required("server", "port").and_then(|raw| {
            let port = raw.trim().parse::<u16>().map_err(|e| SettingError::Invalid {
                name: env.name("server", "port"),
                reason: format!("'{}' is not a port number ({})", raw, e),
            })?;
            Ok(ServerSettings {
                host: env.or_default("server", "host", "localhost"),
                port,
                path: env.or_default("server", "path", "/"),
            })
        });

        let hash = env.required("hash", "secret").map(|secret| HashSettings {
            secret: SecretString::new(secret),
        });

        let deps = DependencySettings {
            required: env.list("deps", "required", &["node", "npm"]),
        };

        let store = env.required("store", "url").map(|url| StoreSettings {
            url,
            collection: env.or_default("store", "collection", "tasks"),
        });

        tracing::debug!(
            build_dir = %build.dir.display(),
            server_configured = server.is_ok(),
            hash_configured = hash.is_ok(),
            store_configured = store.is_ok(),
            "loaded harness settings"
        );

        Self {
            build,
            server,
            hash,
            deps,
            store,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> HashMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_defaults_and_missing_required() {
        let settings = HarnessSettings::from_env(&env(&[]));

        assert_eq!(settings.build.dir, PathBuf::from("client/build"));
        assert_eq!(settings.build.required, vec!["index.html", "static"]);
        assert_eq!(settings.deps.required, vec!["node", "npm"]);

        assert_eq!(
            settings.server.unwrap_err(),
            SettingError::Missing {
                name: "SMOKECHECK__SERVER__PORT".to_string()
            }
        );
        assert!(settings.hash.is_err());
        assert!(settings.store.is_err());
    }

    #[test]
    fn test_full_configuration() {
        let settings = HarnessSettings::from_env(&env(&[
            ("SMOKECHECK__BUILD__DIR", "web/dist"),
            ("SMOKECHECK__SERVER__HOST", "api.internal"),
            ("SMOKECHECK__SERVER__PORT", "5000"),
            ("SMOKECHECK__SERVER__PATH", "api/health"),
            ("SMOKECHECK__HASH__SECRET", "hunter2"),
            ("SMOKECHECK__STORE__URL", "sled:///var/lib/taskboard"),
            ("SMOKECHECK__STORE__COLLECTION", "todos"),
        ]));

        let server = settings.server.unwrap();
        assert_eq!(server.url(), "http://api.internal:5000/api/health");
        assert_eq!(settings.hash.unwrap().secret.expose_secret(), "hunter2");

        let store = settings.store.unwrap();
        assert_eq!(store.url, "sled:///var/lib/taskboard");
        assert_eq!(store.collection, "todos");
        assert_eq!(settings.build.dir, PathBuf::from("web/dist"));
    }

    #[test]
    fn test_invalid_port() {
        let settings = HarnessSettings::from_env(&env(&[("SMOKECHECK__SERVER__PORT", "http")]));
        let err = settings.server.unwrap_err();
        assert!(matches!(err, SettingError::Invalid { .. }));
        assert!(err.to_string().starts_with("invalid value for SMOKECHECK__SERVER__PORT"));
    }

    #[test]
    fn test_secret_is_redacted_in_debug() {
        let settings = HarnessSettings::from_env(&env(&[("SMOKECHECK__HASH__SECRET", "hunter2")]));
        let debug = format!("{:?}", settings);
        assert!(!debug.contains("hunter2"));
    }
}
