//! Port abstraction for applying example data.
//!
//! Seeding is keyed by natural keys rather than a run ledger: each record is
//! written with set-if-absent semantics, so replaying the fixture converges
//! without duplicating anything.

use async_trait::async_trait;

use crate::domain::{NewCourse, NewEnrollment, NewUser};

use super::{StorageError, UpsertOutcome};

/// Port for writing example users, courses and enrollments.
///
/// Implementations must:
/// - Key users by email.
/// - Key courses by title.
/// - Key enrollments by `(user_id, course_id)`.
/// - Leave existing documents unmodified.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExampleDataSeedRepository: Send + Sync {
    /// Insert `user` unless a user with the same email exists.
    async fn insert_user_if_absent(&self, user: &NewUser) -> Result<UpsertOutcome, StorageError>;

    /// Insert `course` unless a course with the same title exists.
    async fn insert_course_if_absent(
        &self,
        course: &NewCourse,
    ) -> Result<UpsertOutcome, StorageError>;

    /// Insert `enrollment` unless the student is already enrolled in the course.
    async fn insert_enrollment_if_absent(
        &self,
        enrollment: &NewEnrollment,
    ) -> Result<UpsertOutcome, StorageError>;
}
