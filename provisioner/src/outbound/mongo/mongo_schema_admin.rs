//! MongoDB-backed schema administration adapter.

use async_trait::async_trait;
use mongodb::Database;
use mongodb::bson::{Document, doc};

use super::documents::{index_model, validator_document};
use super::error_mapping::map_mongo_error;
use crate::domain::ports::{SchemaAdmin, StorageError};
use crate::domain::{CollectionSpec, IndexSpec};

/// Schema admin adapter over one database.
#[derive(Debug, Clone)]
pub struct MongoSchemaAdmin {
    database: Database,
}

impl MongoSchemaAdmin {
    pub fn new(database: Database) -> Self {
        Self { database }
    }
}

#[async_trait]
impl SchemaAdmin for MongoSchemaAdmin {
    async fn list_collection_names(&self) -> Result<Vec<String>, StorageError> {
        self.database
            .list_collection_names()
            .await
            .map_err(map_mongo_error)
    }

    async fn create_collection(&self, spec: &CollectionSpec) -> Result<(), StorageError> {
        self.database
            .create_collection(spec.name)
            .validator(validator_document(&spec.validator))
            .await
            .map_err(map_mongo_error)
    }

    async fn create_index(&self, spec: &IndexSpec) -> Result<(), StorageError> {
        self.database
            .collection::<Document>(spec.collection)
            .create_index(index_model(spec))
            .await
            .map(|_| ())
            .map_err(map_mongo_error)
    }

    async fn list_index_names(&self, collection: &str) -> Result<Vec<String>, StorageError> {
        self.database
            .collection::<Document>(collection)
            .list_index_names()
            .await
            .map_err(map_mongo_error)
    }

    async fn count_documents(&self, collection: &str) -> Result<u64, StorageError> {
        self.database
            .collection::<Document>(collection)
            .count_documents(doc! {})
            .await
            .map_err(map_mongo_error)
    }
}
