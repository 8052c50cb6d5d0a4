//! Port abstraction for administrative schema operations.
//!
//! Every method maps one store command. Adapters must report an object that
//! is already in place as [`StorageError::AlreadyExists`] so the provisioner
//! can treat it as success.

use async_trait::async_trait;

use crate::domain::{CollectionSpec, IndexSpec};

use super::StorageError;

/// Port for inspecting and creating collections and indexes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SchemaAdmin: Send + Sync {
    /// List the names of every collection in the target database.
    async fn list_collection_names(&self) -> Result<Vec<String>, StorageError>;

    /// Create a collection with its validator attached.
    async fn create_collection(&self, spec: &CollectionSpec) -> Result<(), StorageError>;

    /// Build a named index; the collection is created implicitly if absent.
    async fn create_index(&self, spec: &IndexSpec) -> Result<(), StorageError>;

    /// List the index names present on a collection, including `_id_`.
    async fn list_index_names(&self, collection: &str) -> Result<Vec<String>, StorageError>;

    /// Count the documents held by a collection.
    async fn count_documents(&self, collection: &str) -> Result<u64, StorageError>;
}
