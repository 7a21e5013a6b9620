//! Document store read check

use std::sync::Arc;

use crate::check::{Check, CheckFuture, CheckKind, Observation};
use crate::connectors::store::{read_collection, DocumentStore};

/// Opens a session, reads a whole collection and releases the session.
/// Passes on any successful read, including an empty one.
pub struct DataStoreCheck {
    store: Arc<dyn DocumentStore>,
    collection: String,
}

impl DataStoreCheck {
    pub fn new(store: Arc<dyn DocumentStore>, collection: impl Into<String>) -> Self {
        Self {
            store,
            collection: collection.into(),
        }
    }
}

impl Check for DataStoreCheck {
    fn kind(&self) -> CheckKind {
        CheckKind::DataStore
    }

    fn observe(&self) -> CheckFuture<'_> {
        Box::pin(async move {
            let documents = read_collection(self.store.as_ref(), &self.collection).await?;

            Ok(Observation::pass(format!(
                "read {} document(s) from '{}' ({})",
                documents.len(),
                self.collection,
                self.store.backend()
            ))
            .with_diagnostic("backend", self.store.backend())
            .with_diagnostic("collection", self.collection.clone())
            .with_diagnostic("document_count", documents.len()))
        })
    }
}
