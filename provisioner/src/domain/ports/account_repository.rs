//! Port abstraction for set-if-absent user writes.

use async_trait::async_trait;

use crate::domain::{NewUser, RecordId};

use super::StorageError;

/// Whether a set-if-absent write inserted a new document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertStatus {
    /// No document matched the natural key; one was inserted.
    Inserted,
    /// A document already held the natural key and was left untouched.
    AlreadyPresent,
}

impl UpsertStatus {
    /// Stable snake-case label used in logs and reports.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inserted => "inserted",
            Self::AlreadyPresent => "already_present",
        }
    }
}

/// Result of a set-if-absent write.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UpsertOutcome {
    /// Identifier of the inserted or pre-existing document.
    pub id: RecordId,
    /// Whether the write inserted.
    pub status: UpsertStatus,
}

/// Port for writing user accounts keyed by email.
///
/// Implementations must never modify an existing document. When a concurrent
/// writer wins the race and the unique index rejects the insert, adapters
/// resolve the conflict by reading back the winner and reporting
/// [`UpsertStatus::AlreadyPresent`].
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait AccountRepository: Send + Sync {
    /// Insert `user` unless a user with the same email exists.
    async fn insert_user_if_absent(&self, user: &NewUser) -> Result<UpsertOutcome, StorageError>;
}
