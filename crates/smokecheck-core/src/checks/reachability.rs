//! HTTP reachability check

use std::time::Duration;

use crate::check::{Check, CheckFuture, CheckKind, Observation};
use crate::connectors::http::HttpProbe;

/// Passes when the target answers with any HTTP status before the timeout.
#[derive(Debug, Clone)]
pub struct ReachabilityCheck {
    url: String,
    timeout: Duration,
}

impl ReachabilityCheck {
    pub fn new(url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            url: url.into(),
            timeout,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Check for ReachabilityCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::Reachability
    }

    fn observe(&self) -> CheckFuture<'_> {
        Box::pin(async move {
            let probe = HttpProbe::new(self.timeout)?;
            let response = probe.get(&self.url).await?;

            Ok(Observation::pass(format!(
                "HTTP {} from {} ({} bytes)",
                response.status_code, self.url, response.body_bytes
            ))
            .with_diagnostic("url", self.url.clone())
            .with_diagnostic("status_code", response.status_code)
            .with_diagnostic("body_bytes", response.body_bytes))
        })
    }
}
