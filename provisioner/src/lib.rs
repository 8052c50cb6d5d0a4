//! LMS document store provisioning library.
//!
//! The crate is laid out as a small hexagon:
//!
//! - [`domain`] holds the schema catalogue, the provisioning routine, the
//!   example-data seeder and the ports they drive.
//! - [`outbound`] implements those ports against MongoDB and Argon2.
//! - [`inbound`] is the command-line surface of the `provision` binary.
//! - [`bootstrap`] loads settings and wires adapters into domain services.

pub mod bootstrap;
pub mod domain;
pub mod inbound;
pub mod outbound;

#[cfg(feature = "test-support")]
pub mod test_support;
