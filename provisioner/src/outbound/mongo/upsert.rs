//! Set-if-absent writes shared by the account and seed adapters.

use mongodb::Collection;
use mongodb::bson::{Bson, Document, doc};
use tracing::debug;

use super::documents::record_id;
use super::error_mapping::map_mongo_error;
use crate::domain::RecordId;
use crate::domain::ports::{StorageError, StorageErrorKind, UpsertOutcome, UpsertStatus};

/// Insert `document` unless a document matches `filter`.
///
/// The write is an upsert whose only operator is `$setOnInsert`, so an
/// existing document is never modified. When a concurrent writer wins the
/// race the unique index rejects the upsert; the winner is read back and
/// reported as already present.
pub(crate) async fn insert_if_absent(
    collection: &Collection<Document>,
    filter: Document,
    document: Document,
) -> Result<UpsertOutcome, StorageError> {
    let written = collection
        .update_one(filter.clone(), doc! { "$setOnInsert": document })
        .upsert(true)
        .await;

    match written {
        Ok(result) => match result.upserted_id {
            Some(id) => Ok(UpsertOutcome {
                id: upserted_record_id(&id)?,
                status: UpsertStatus::Inserted,
            }),
            None => existing(collection, filter)
                .await?
                .ok_or_else(|| StorageError::query("matched document disappeared")),
        },
        Err(err) => {
            let err = map_mongo_error(err);
            if err.kind() != StorageErrorKind::DuplicateKey {
                return Err(err);
            }
            debug!(
                collection = collection.name(),
                "upsert lost a race; reading back the winner"
            );
            existing(collection, filter).await?.ok_or(err)
        }
    }
}

async fn existing(
    collection: &Collection<Document>,
    filter: Document,
) -> Result<Option<UpsertOutcome>, StorageError> {
    let Some(found) = collection
        .find_one(filter)
        .projection(doc! { "_id": 1 })
        .await
        .map_err(map_mongo_error)?
    else {
        return Ok(None);
    };

    let id = found
        .get_object_id("_id")
        .map_err(|err| StorageError::query(err.to_string()))?;
    Ok(Some(UpsertOutcome {
        id: record_id(id)?,
        status: UpsertStatus::AlreadyPresent,
    }))
}

fn upserted_record_id(id: &Bson) -> Result<RecordId, StorageError> {
    let oid = id
        .as_object_id()
        .ok_or_else(|| StorageError::query(format!("upserted id {id} is not an ObjectId")))?;
    record_id(oid)
}
