//! Stand-in for a check that cannot be built from the current settings

use crate::check::{Check, CheckFuture, CheckKind};
use crate::error::ConnectorError;

/// Always reports an error carrying the configuration problem, under the
/// kind of the check it replaces.
#[derive(Debug, Clone)]
pub struct UnconfiguredCheck {
    kind: CheckKind,
    reason: String,
}

impl UnconfiguredCheck {
    pub fn new(kind: CheckKind, reason: impl Into<String>) -> Self {
        Self {
            kind,
            reason: reason.into(),
        }
    }
}

impl Check for UnconfiguredCheck {
    fn kind(&self) -> CheckKind {
        self.kind
    }

    fn observe(&self) -> CheckFuture<'_> {
        let reason = self.reason.clone();
        Box::pin(async move { Err(ConnectorError::Unconfigured(reason)) })
    }
}
