//! Domain ports and supporting types for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod account_repository;
mod credential_hasher;
mod example_data_seed_repository;
mod schema_admin;
mod storage_error;

#[cfg(test)]
pub use account_repository::MockAccountRepository;
pub use account_repository::{AccountRepository, UpsertOutcome, UpsertStatus};
#[cfg(test)]
pub use credential_hasher::MockCredentialHasher;
pub use credential_hasher::{CredentialHashError, CredentialHashErrorKind, CredentialHasher};
pub use example_data_seed_repository::ExampleDataSeedRepository;
#[cfg(test)]
pub use example_data_seed_repository::MockExampleDataSeedRepository;
#[cfg(test)]
pub use schema_admin::MockSchemaAdmin;
pub use schema_admin::SchemaAdmin;
pub use storage_error::{StorageError, StorageErrorKind};
