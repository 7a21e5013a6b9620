//! Connectors
//!
//! Thin adapters each check uses to reach one external capability. Every call
//! acquires and releases its own resources; nothing is shared between checks.

pub mod filesystem;
pub mod hashing;
pub mod http;
pub mod resolver;
pub mod store;

pub use filesystem::{inspect_path, PathEntry};
pub use hashing::{Argon2Hasher, SecretHasher};
pub use http::{HttpProbe, ProbeResponse};
pub use resolver::{CapabilityResolver, PathResolver};
pub use store::{open_store, DocumentStore, HttpDocumentStore, SledDocumentStore, StoreSession};
