//! Domain primitives, services and ports.
//!
//! Purpose: describe the target state of the LMS document store and the
//! routines that converge a database onto it. Nothing in this module knows
//! about MongoDB; adapters translate through the traits in [`ports`].
//!
//! Public surface:
//! - [`SchemaCatalog`]: collections, validators and indexes to provision.
//! - [`SchemaProvisioner`]: the idempotent `ensure_schema` routine.
//! - [`ExampleDataSeeder`]: set-if-absent seeding of the development fixture.
//! - [`NewUser`], [`NewCourse`], [`NewEnrollment`]: records written by
//!   provisioning and seeding.

pub mod account;
pub mod course;
pub mod enrollment;
pub mod example_data;
pub mod ports;
pub mod provisioner;
pub mod record_id;
pub mod schema;

pub use self::account::{AccountValidationError, EmailAddress, NewUser, Role, Username};
pub use self::course::{CourseStatus, NewCourse};
pub use self::enrollment::{EnrollmentStatus, NewEnrollment};
pub use self::example_data::{
    ExampleDataSeedOutcome, ExampleDataSeeder, ExampleDataSeedingError, SeedCounts, SeedFailure,
    SeedFailureCause,
};
pub use self::provisioner::{
    AccountReport, CollectionOutcome, CollectionSummary, IndexOutcome, ProvisionerConfig,
    ProvisioningError, ProvisioningReport, ProvisioningStep, SchemaProvisioner, StepFailure,
    StepOutcome, Verification,
};
pub use self::record_id::{RecordId, RecordIdError};
pub use self::schema::{
    BsonType, CollectionSpec, FieldRule, IndexKey, IndexKind, IndexSpec, SchemaCatalog,
    ValidatorSpec,
};
