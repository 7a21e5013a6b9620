//! Document store connectors
//!
//! A `DocumentStore` hands out sessions; a `StoreSession` reads whole
//! collections as JSON documents. Backends are chosen by the scheme of the
//! connection string:
//!
//! - `sled:<path>` / `sled://<path>`: embedded sled database, one tree per
//!   collection, JSON-encoded values
//! - `http://` / `https://`: REST endpoint, `GET {base}/{collection}` returns
//!   a JSON array

use async_trait::async_trait;
use serde_json::Value;
use std::path::PathBuf;
use std::time::Duration;

use crate::connectors::http::HttpProbe;
use crate::error::ConnectorError;

/// Source of store sessions
#[async_trait]
pub trait DocumentStore: Send + Sync {
    /// Backend label for diagnostics
    fn backend(&self) -> &'static str;

    /// Open a new session
    async fn connect(&self) -> Result<Box<dyn StoreSession>, ConnectorError>;
}

/// An open connection to a store
#[async_trait]
pub trait StoreSession: Send {
    /// Read every document in `collection`
    async fn read_all(&mut self, collection: &str) -> Result<Vec<Value>, ConnectorError>;

    /// Release the connection. Dropping a session also releases it.
    async fn close(&mut self) -> Result<(), ConnectorError>;
}

/// Open a session, read `collection`, and close the session whatever the
/// read returned.
pub async fn read_collection(
    store: &dyn DocumentStore,
    collection: &str,
) -> Result<Vec<Value>, ConnectorError> {
    let mut session = store.connect().await?;
    let read = session.read_all(collection).await;

    if let Err(e) = session.close().await {
        tracing::warn!(backend = store.backend(), error = %e, "failed to close store session");
    }

    read
}

/// Pick a backend from a connection string.
pub fn open_store(url: &str, timeout: Duration) -> Result<Box<dyn DocumentStore>, ConnectorError> {
    if let Some(path) = url.strip_prefix("sled://").or_else(|| url.strip_prefix("sled:")) {
        if path.is_empty() {
            return Err(ConnectorError::store("sled connection string has no path"));
        }
        return Ok(Box::new(SledDocumentStore::new(path)));
    }

    if url.starts_with("http://") || url.starts_with("https://") {
        return Ok(Box::new(HttpDocumentStore::new(url, timeout)));
    }

    let scheme = url.split(':').next().unwrap_or(url);
    Err(ConnectorError::UnsupportedStore(scheme.to_string()))
}

/// Embedded sled database
#[derive(Debug, Clone)]
pub struct SledDocumentStore {
    path: PathBuf,
}

impl SledDocumentStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }
}

#[async_trait]
impl DocumentStore for SledDocumentStore {
    fn backend(&self) -> &'static str {
        "sled"
    }

    async fn connect(&self) -> Result<Box<dyn StoreSession>, ConnectorError> {
        // sled creates databases on open; a verification read must not.
        if !tokio::fs::try_exists(&self.path).await? {
            return Err(ConnectorError::store(format!(
                "no sled database at {}",
                self.path.display()
            )));
        }

        let path = self.path.clone();
        let db = tokio::task::spawn_blocking(move || {
            sled::Config::new().path(path).flush_every_ms(None).open()
        })
        .await
        .map_err(|e| ConnectorError::Other(e.to_string()))??;

        Ok(Box::new(SledSession { db: Some(db) }))
    }
}

struct SledSession {
    db: Option<sled::Db>,
}

#[async_trait]
impl StoreSession for SledSession {
    async fn read_all(&mut self, collection: &str) -> Result<Vec<Value>, ConnectorError> {
        let db = self
            .db
            .clone()
            .ok_or_else(|| ConnectorError::store("session already closed"))?;
        let collection = collection.to_string();

        tokio::task::spawn_blocking(move || read_tree(&db, &collection))
            .await
            .map_err(|e| ConnectorError::Other(e.to_string()))?
    }

    async fn close(&mut self) -> Result<(), ConnectorError> {
        self.db.take();
        Ok(())
    }
}

fn read_tree(db: &sled::Db, collection: &str) -> Result<Vec<Value>, ConnectorError> {
    // Opening a tree creates it, so only read collections that exist.
    let exists = db
        .tree_names()
        .iter()
        .any(|name| &name[..] == collection.as_bytes());
    if !exists {
        return Ok(Vec::new());
    }

    let tree = db.open_tree(collection)?;
    tree.iter()
        .map(|item| {
            let (key, value) = item?;
            serde_json::from_slice(&value).map_err(|e| {
                ConnectorError::store(format!(
                    "document '{}' in '{}' is not valid JSON: {}",
                    String::from_utf8_lossy(&key),
                    collection,
                    e
                ))
            })
        })
        .collect()
}

/// REST document endpoint
#[derive(Debug, Clone)]
pub struct HttpDocumentStore {
    base_url: String,
    timeout: Duration,
}

impl HttpDocumentStore {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            timeout,
        }
    }
}

#[async_trait]
impl DocumentStore for HttpDocumentStore {
    fn backend(&self) -> &'static str {
        "http"
    }

    async fn connect(&self) -> Result<Box<dyn StoreSession>, ConnectorError> {
        Ok(Box::new(HttpSession {
            probe: HttpProbe::new(self.timeout)?,
            base_url: self.base_url.trim_end_matches('/').to_string(),
        }))
    }
}

struct HttpSession {
    probe: HttpProbe,
    base_url: String,
}

#[async_trait]
impl StoreSession for HttpSession {
    async fn read_all(&mut self, collection: &str) -> Result<Vec<Value>, ConnectorError> {
        let url = format!("{}/{}", self.base_url, collection);
        match self.probe.get_json(&url).await? {
            Value::Array(documents) => Ok(documents),
            _ => Err(ConnectorError::store(format!(
                "expected a JSON array from {}",
                url
            ))),
        }
    }

    async fn close(&mut self) -> Result<(), ConnectorError> {
        Ok(())
    }
}
