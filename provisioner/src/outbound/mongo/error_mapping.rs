//! Shared MongoDB error classification for every adapter.

use mongodb::error::{CommandError, Error as MongoError, ErrorKind, WriteError, WriteFailure};
use tracing::debug;

use crate::domain::ports::StorageError;

/// Server error codes the adapters classify explicitly.
pub(crate) mod codes {
    pub const UNAUTHORIZED: i32 = 13;
    pub const AUTHENTICATION_FAILED: i32 = 18;
    pub const NAMESPACE_EXISTS: i32 = 48;
    pub const INDEX_ALREADY_EXISTS: i32 = 68;
    pub const INDEX_OPTIONS_CONFLICT: i32 = 85;
    pub const DOCUMENT_VALIDATION_FAILURE: i32 = 121;
    pub const DUPLICATE_KEY: i32 = 11000;
}

/// Map a driver error onto the domain storage taxonomy.
pub(crate) fn map_mongo_error(error: MongoError) -> StorageError {
    debug!(error = %error, "mongodb operation failed");

    let message = error.to_string();
    match error.kind.as_ref() {
        ErrorKind::Command(CommandError { code, .. })
        | ErrorKind::Write(WriteFailure::WriteError(WriteError { code, .. })) => {
            classify_code(*code, message)
        }
        ErrorKind::Authentication { .. } => StorageError::permission_denied(message),
        ErrorKind::Io(_)
        | ErrorKind::ServerSelection { .. }
        | ErrorKind::ConnectionPoolCleared { .. } => StorageError::connection(message),
        _ => StorageError::query(message),
    }
}

/// Classify a server error code.
pub(crate) fn classify_code(code: i32, message: String) -> StorageError {
    match code {
        codes::NAMESPACE_EXISTS | codes::INDEX_ALREADY_EXISTS | codes::INDEX_OPTIONS_CONFLICT => {
            StorageError::already_exists(message)
        }
        codes::DUPLICATE_KEY => StorageError::duplicate_key(message),
        codes::DOCUMENT_VALIDATION_FAILURE => StorageError::validation_rejected(message),
        codes::UNAUTHORIZED | codes::AUTHENTICATION_FAILED => {
            StorageError::permission_denied(message)
        }
        _ => StorageError::query(message),
    }
}
