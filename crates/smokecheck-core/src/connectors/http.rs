//! HTTP connector
//!
//! One GET per probe with an explicit timeout. Any response counts; the
//! caller decides what a status code means.

use std::time::Duration;

use crate::error::ConnectorError;

/// Outcome of a completed HTTP round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProbeResponse {
    pub status_code: u16,
    pub body_bytes: usize,
}

/// HTTP GET probe
#[derive(Debug, Clone)]
pub struct HttpProbe {
    client: reqwest::Client,
}

impl HttpProbe {
    /// Build a client that ignores system proxies and gives up after `timeout`.
    pub fn new(timeout: Duration) -> Result<Self, ConnectorError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .no_proxy()
            .build()
            .map_err(|e| ConnectorError::Http(format!("failed to create HTTP client: {}", e)))?;
        Ok(Self { client })
    }

    /// GET `url` and read the whole body.
    pub async fn get(&self, url: &str) -> Result<ProbeResponse, ConnectorError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ConnectorError::from_reqwest(e, url))?;

        let status_code = response.status().as_u16();
        let body = response
            .bytes()
            .await
            .map_err(|e| ConnectorError::from_reqwest(e, url))?;

        Ok(ProbeResponse {
            status_code,
            body_bytes: body.len(),
        })
    }

    /// GET `url` and decode a JSON body, rejecting non-success statuses.
    pub async fn get_json(&self, url: &str) -> Result<serde_json::Value, ConnectorError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ConnectorError::from_reqwest(e, url))?;

        let status = response.status();
        if !status.is_success() {
            return Err(ConnectorError::Http(format!("{} responded with {}", url, status)));
        }

        response
            .json()
            .await
            .map_err(|e| ConnectorError::Http(format!("invalid JSON from {}: {}", url, e)))
    }
}
