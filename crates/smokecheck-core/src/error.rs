//! Error types for the verification harness
//!
//! `ConnectorError` is an operational fault raised while a check observes the
//! target system. It always ends up as a `CheckStatus::Error` result.
//!
//! `HarnessError` is a structural fault in the harness setup. It aborts the
//! run before any check executes.

use thiserror::Error;

/// Faults raised by connectors while a check is observing the target.
#[derive(Error, Debug)]
pub enum ConnectorError {
    /// Filesystem or socket I/O failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Nothing is listening on the target address
    #[error("connection refused: {0}")]
    ConnectionRefused(String),

    /// HTTP transport error other than refusal
    #[error("HTTP error: {0}")]
    Http(String),

    /// Document store failed to open, read or close
    #[error("store error: {0}")]
    Store(String),

    /// Connection string names a backend this harness cannot speak
    #[error("unsupported store scheme '{0}'")]
    UnsupportedStore(String),

    /// Password hashing primitive failed
    #[error("hash error: {0}")]
    Hash(String),

    /// Named capability could not be resolved
    #[error("capability '{name}' could not be resolved: {reason}")]
    Unresolved { name: String, reason: String },

    /// A setting the check depends on is missing or malformed
    #[error("{0}")]
    Unconfigured(String),

    /// Connector-level timeout
    #[error("timed out")]
    Timeout,

    /// Anything else
    #[error("{0}")]
    Other(String),
}

impl ConnectorError {
    /// Create a store error
    pub fn store(msg: impl Into<String>) -> Self {
        ConnectorError::Store(msg.into())
    }

    /// Create a hash error
    pub fn hash(msg: impl Into<String>) -> Self {
        ConnectorError::Hash(msg.into())
    }

    /// Classify a reqwest failure, surfacing refusals and timeouts explicitly.
    pub fn from_reqwest(err: reqwest::Error, target: &str) -> Self {
        if err.is_timeout() {
            return ConnectorError::Timeout;
        }

        let mut source: Option<&(dyn std::error::Error + 'static)> = Some(&err);
        while let Some(e) = source {
            if let Some(io) = e.downcast_ref::<std::io::Error>() {
                if io.kind() == std::io::ErrorKind::ConnectionRefused {
                    return ConnectorError::ConnectionRefused(target.to_string());
                }
            }
            source = e.source();
        }

        ConnectorError::Http(error_chain(&err))
    }
}

impl From<sled::Error> for ConnectorError {
    fn from(err: sled::Error) -> Self {
        ConnectorError::Store(err.to_string())
    }
}

/// Structural faults in the harness's own setup.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// Nothing to run after registration and filtering
    #[error("no checks registered")]
    NoChecks,

    /// Two specs share a name
    #[error("duplicate check name '{0}'")]
    DuplicateCheck(String),

    /// A filter referenced a check that is not registered
    #[error("unknown check '{0}'")]
    UnknownCheck(String),

    /// A harness-level setting could not be parsed
    #[error("invalid value for {name}: {reason}")]
    InvalidSetting { name: String, reason: String },
}

impl HarnessError {
    /// Create an invalid setting error
    pub fn invalid_setting(name: impl Into<String>, reason: impl Into<String>) -> Self {
        HarnessError::InvalidSetting {
            name: name.into(),
            reason: reason.into(),
        }
    }
}

/// Result type alias for harness setup operations
pub type Result<T> = std::result::Result<T, HarnessError>;

/// Render an error with its full `source()` chain, `outer: inner: root`.
pub fn error_chain(err: &(dyn std::error::Error + 'static)) -> String {
    let mut parts = vec![err.to_string()];
    let mut source = err.source();
    while let Some(e) = source {
        let text = e.to_string();
        if !parts.iter().any(|p| p.contains(&text)) {
            parts.push(text);
        }
        source = e.source();
    }
    parts.join(": ")
}
