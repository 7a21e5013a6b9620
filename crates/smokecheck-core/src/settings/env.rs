//! Environment variable naming and lookup
//!
//! Settings are addressed by namespace/key pairs and mapped onto environment
//! variable names. By default:
//! - prefix, namespace and key are joined with `__` (double underscore)
//! - all names are uppercased, `-` becomes `_`
//! - Example: namespace="server", key="port" → `SMOKECHECK__SERVER__PORT`
//!
//! Empty or whitespace-only values are treated as unset.

use std::collections::HashMap;

use super::SettingError;

/// Prefix applied to every harness variable
pub const ENV_PREFIX: &str = "SMOKECHECK";

/// Configuration for environment variable naming
#[derive(Debug, Clone)]
pub struct EnvNaming {
    /// Separator between prefix, namespace and key (default: "__")
    pub separator: String,
    /// Prefix for all environment variables
    pub prefix: Option<String>,
}

impl Default for EnvNaming {
    fn default() -> Self {
        Self {
            separator: "__".to_string(),
            prefix: Some(ENV_PREFIX.to_string()),
        }
    }
}

impl EnvNaming {
    /// Build the environment variable name from namespace and key
    pub fn build_name(&self, namespace: &str, key: &str) -> String {
        let name = match self.prefix {
            Some(ref prefix) => format!(
                "{}{}{}{}{}",
                prefix, self.separator, namespace, self.separator, key
            ),
            None => format!("{}{}{}", namespace, self.separator, key),
        };
        name.replace('-', "_").to_uppercase()
    }
}

/// Where variable values come from
pub trait EnvSource {
    fn var(&self, name: &str) -> Option<String>;
}

/// The process environment
#[derive(Debug, Clone, Copy, Default)]
pub struct ProcessEnv;

impl EnvSource for ProcessEnv {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok().filter(|v| !v.trim().is_empty())
    }
}

impl EnvSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).filter(|v| !v.trim().is_empty()).cloned()
    }
}

/// Typed lookups over an `EnvSource`
pub struct EnvReader<'a> {
    source: &'a dyn EnvSource,
    naming: EnvNaming,
}

impl<'a> EnvReader<'a> {
    pub fn new(source: &'a dyn EnvSource) -> Self {
        Self {
            source,
            naming: EnvNaming::default(),
        }
    }

    pub fn with_naming(mut self, naming: EnvNaming) -> Self {
        self.naming = naming;
        self
    }

    pub fn name(&self, namespace: &str, key: &str) -> String {
        self.naming.build_name(namespace, key)
    }

    pub fn optional(&self, namespace: &str, key: &str) -> Option<String> {
        self.source.var(&self.name(namespace, key))
    }

    pub fn or_default(&self, namespace: &str, key: &str, default: &str) -> String {
        self.optional(namespace, key)
            .unwrap_or_else(|| default.to_string())
    }

    pub fn required(&self, namespace: &str, key: &str) -> Result<String, SettingError> {
        self.optional(namespace, key)
            .ok_or_else(|| SettingError::Missing {
                name: self.name(namespace, key),
            })
    }

    /// Comma-separated list; an explicitly empty variable counts as unset.
    pub fn list(&self, namespace: &str, key: &str, default: &[&str]) -> Vec<String> {
        match self.optional(namespace, key) {
            Some(raw) => raw
                .split(',')
                .map(str::trim)
                .filter(|s| !s.is_empty())
                .map(str::to_string)
                .collect(),
            None => default.iter().map(|s| s.to_string()).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_name() {
        let naming = EnvNaming::default();
        assert_eq!(naming.build_name("server", "port"), "SMOKECHECK__SERVER__PORT");
        assert_eq!(naming.build_name("run", "timeout-ms"), "SMOKECHECK__RUN__TIMEOUT_MS");

        let bare = EnvNaming {
            prefix: None,
            ..Default::default()
        };
        assert_eq!(bare.build_name("store", "url"), "STORE__URL");
    }

    #[test]
    fn test_empty_values_are_unset() {
        let env: HashMap<String, String> =
            [("SMOKECHECK__STORE__URL".to_string(), "  ".to_string())].into();
        let reader = EnvReader::new(&env);
        assert!(reader.optional("store", "url").is_none());

        let err = reader.required("store", "url").unwrap_err();
        assert_eq!(
            err.to_string(),
            "missing required environment variable SMOKECHECK__STORE__URL"
        );
    }

    #[test]
    fn test_list_parsing() {
        let env: HashMap<String, String> = [(
            "SMOKECHECK__DEPS__REQUIRED".to_string(),
            " node, npm ,,git".to_string(),
        )]
        .into();
        let reader = EnvReader::new(&env);
        assert_eq!(reader.list("deps", "required", &[]), vec!["node", "npm", "git"]);
        assert_eq!(reader.list("build", "required", &["index.html"]), vec!["index.html"]);
    }
}
