//! Port abstraction for one-way password hashing.

use super::define_port_error;

define_port_error! {
    /// Errors raised by credential hashing adapters.
    pub enum CredentialHashError {
        /// The hashing primitive rejected its input or parameters.
        Hashing { message: String } => "credential hashing failed: {message}",
    }
}

/// Port turning a plaintext password into a self-describing hash string.
///
/// Hashing is CPU-bound and synchronous; callers hash each distinct
/// password once and reuse the result.
#[cfg_attr(test, mockall::automock)]
pub trait CredentialHasher: Send + Sync {
    /// Hash `password` with a fresh salt.
    fn hash_password(&self, password: &str) -> Result<String, CredentialHashError>;
}
