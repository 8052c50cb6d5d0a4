//! Classified storage failures shared by every persistence port.
//!
//! Adapters map driver errors onto these variants; the domain decides what to
//! do from the classification alone and never inspects raw error codes.

use super::define_port_error;

define_port_error! {
    /// Persistence errors raised by document store adapters.
    pub enum StorageError {
        /// The collection or index already exists.
        AlreadyExists { message: String } => "storage object already exists: {message}",
        /// A unique index rejected the write.
        DuplicateKey { message: String } => "duplicate key: {message}",
        /// A collection validator rejected the document.
        ValidationRejected { message: String } => "document failed validation: {message}",
        /// Credentials lack the privileges for the operation.
        PermissionDenied { message: String } => "permission denied: {message}",
        /// The store could not be reached.
        Connection { message: String } => "storage connection failed: {message}",
        /// The operation exceeded its time budget.
        TimedOut { message: String } => "storage call timed out: {message}",
        /// Any other failure while executing a command.
        Query { message: String } => "storage query failed: {message}",
    }
}

impl StorageError {
    /// Whether the failure must abort a provisioning run.
    ///
    /// Connection loss, missing privileges and timeouts will not improve by
    /// moving on to the next step.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self.kind(),
            StorageErrorKind::Connection
                | StorageErrorKind::PermissionDenied
                | StorageErrorKind::TimedOut
        )
    }

    /// Whether the failure reports an object that is already in place.
    pub fn is_already_exists(&self) -> bool {
        self.kind() == StorageErrorKind::AlreadyExists
    }

    /// The adapter-supplied detail message.
    pub fn message(&self) -> &str {
        match self {
            Self::AlreadyExists { message }
            | Self::DuplicateKey { message }
            | Self::ValidationRejected { message }
            | Self::PermissionDenied { message }
            | Self::Connection { message }
            | Self::TimedOut { message }
            | Self::Query { message } => message,
        }
    }
}
