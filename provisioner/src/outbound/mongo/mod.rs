//! MongoDB adapters for the provisioning ports.
//!
//! The adapters are thin translators:
//!
//! - **Explicit handles**: every adapter receives the [`Database`] it works
//!   on; there is no process-wide default connection.
//! - **Classified errors**: driver failures are mapped onto
//!   [`StorageError`](crate::domain::ports::StorageError) kinds in one place,
//!   so the domain never compares raw server codes.
//! - **Set-if-absent writes**: accounts and seed records are written with
//!   `$setOnInsert` upserts keyed by natural keys.
//!
//! [`Database`]: mongodb::Database

mod client;
mod documents;
mod error_mapping;
mod mongo_account_repository;
mod mongo_schema_admin;
mod upsert;

pub use client::{DEFAULT_APP_NAME, DEFAULT_DATABASE, MongoConfig, MongoHandle};
pub use mongo_account_repository::{MongoAccountRepository, MongoExampleDataSeedRepository};
pub use mongo_schema_admin::MongoSchemaAdmin;
