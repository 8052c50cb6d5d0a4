//! Outbound adapters implementing domain ports for external infrastructure.
//!
//! - **mongo**: document store adapters for schema administration, the
//!   bootstrap account and example data
//! - **argon2_hasher**: Argon2id password hashing
//!
//! Adapters convert between domain types and driver representations. They
//! contain no provisioning logic.

pub mod argon2_hasher;
pub mod mongo;

pub use argon2_hasher::Argon2CredentialHasher;
