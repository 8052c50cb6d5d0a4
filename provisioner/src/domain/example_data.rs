//! Example data seeding orchestration.
//!
//! Converts the development fixture into domain users, courses and
//! enrollments, resolves natural-key references into record identifiers as
//! documents are written, and delegates persistence to the seeding port.
//! Every write is set-if-absent, so seeding the same fixture twice leaves the
//! database unchanged.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Duration, Utc};
use example_data::{
    CourseSeed, CourseStatusSeed, EnrollmentSeed, EnrollmentStatusSeed, RoleSeed, SeedFixture,
    UserSeed,
};
use mockable::Clock;
use thiserror::Error;
use tracing::{info, warn};

use crate::domain::ports::{
    CredentialHashError, CredentialHasher, ExampleDataSeedRepository, StorageError,
    StorageErrorKind, UpsertOutcome, UpsertStatus,
};
use crate::domain::{
    AccountValidationError, CourseStatus, EmailAddress, EnrollmentStatus, NewCourse,
    NewEnrollment, NewUser, RecordId, Role, Username,
};

/// Inserted and untouched record counts for one entity type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedCounts {
    pub inserted: usize,
    pub already_present: usize,
}

impl SeedCounts {
    fn record(&mut self, status: UpsertStatus) {
        match status {
            UpsertStatus::Inserted => self.inserted += 1,
            UpsertStatus::AlreadyPresent => self.already_present += 1,
        }
    }

    /// Records written or found in place.
    pub fn total(&self) -> usize {
        self.inserted + self.already_present
    }
}

/// Why a fixture record was not written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeedFailureCause {
    /// The store refused the write.
    Rejected {
        kind: StorageErrorKind,
        message: String,
    },
    /// A user or course the record points at was not written.
    MissingReference { entity: &'static str, key: String },
}

impl fmt::Display for SeedFailureCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rejected { kind, message } => write!(f, "{kind}: {message}"),
            Self::MissingReference { entity, key } => {
                write!(f, "skipped: {entity} '{key}' was not written")
            }
        }
    }
}

/// A fixture record that seeding recorded as failed and moved past.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SeedFailure {
    pub entity: &'static str,
    /// Email, course title or `student/course` pair.
    pub key: String,
    pub cause: SeedFailureCause,
}

/// Result of applying the fixture.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExampleDataSeedOutcome {
    pub users: SeedCounts,
    pub courses: SeedCounts,
    pub enrollments: SeedCounts,
    pub failures: Vec<SeedFailure>,
}

impl ExampleDataSeedOutcome {
    /// Whether any record was rejected or skipped.
    pub fn has_failures(&self) -> bool {
        !self.failures.is_empty()
    }

    fn skip(&mut self, entity: &'static str, key: String, missing: (&'static str, &str)) {
        let (missing_entity, missing_key) = missing;
        warn!(
            entity,
            key = key.as_str(),
            missing = missing_key,
            "seed record skipped; its reference was not written"
        );
        self.failures.push(SeedFailure {
            entity,
            key,
            cause: SeedFailureCause::MissingReference {
                entity: missing_entity,
                key: missing_key.to_owned(),
            },
        });
    }
}

/// Errors that abort seeding.
#[derive(Debug, Error)]
pub enum ExampleDataSeedingError {
    /// A fixture user failed account validation.
    #[error("fixture user '{username}' is invalid: {source}")]
    InvalidUser {
        username: String,
        #[source]
        source: AccountValidationError,
    },
    /// A fixture user names a credential the fixture does not define.
    #[error("fixture user '{username}' references unknown credential '{credential}'")]
    MissingCredential {
        username: String,
        credential: String,
    },
    /// Hashing a fixture credential failed.
    #[error("hashing fixture credential failed: {0}")]
    Hashing(#[from] CredentialHashError),
    /// The store became unusable while writing a record.
    #[error("writing {entity} '{key}' failed: {source}")]
    Persistence {
        entity: &'static str,
        key: String,
        #[source]
        source: StorageError,
    },
}

/// Service that writes the development fixture through the seeding port.
#[derive(Clone)]
pub struct ExampleDataSeeder<R, H> {
    repository: Arc<R>,
    hasher: Arc<H>,
    clock: Arc<dyn Clock>,
    bootstrap_admin: Option<NewUser>,
}

impl<R, H> ExampleDataSeeder<R, H> {
    /// Create a seeder over the given adapters.
    pub fn new(repository: Arc<R>, hasher: Arc<H>, clock: Arc<dyn Clock>) -> Self {
        Self {
            repository,
            hasher,
            clock,
            bootstrap_admin: None,
        }
    }

    /// Write `admin` in place of every fixture administrator.
    ///
    /// The fixture's admin then resolves to the account provisioning already
    /// ensured, whatever email and username that account was configured
    /// with.
    #[must_use]
    pub fn with_bootstrap_admin(mut self, admin: NewUser) -> Self {
        self.bootstrap_admin = Some(admin);
        self
    }
}

impl<R, H> ExampleDataSeeder<R, H>
where
    R: ExampleDataSeedRepository,
    H: CredentialHasher,
{
    /// Write every fixture user, course and enrollment that is not yet
    /// present.
    ///
    /// Users are written first so course instructors resolve, then courses so
    /// enrollments resolve. Timestamps are derived from the clock and the
    /// fixture's day offsets. A record the store rejects is recorded in
    /// [`ExampleDataSeedOutcome::failures`] and seeding moves on; records
    /// that reference it are skipped and recorded too.
    ///
    /// # Errors
    ///
    /// Returns [`ExampleDataSeedingError`] when a fixture record fails
    /// validation, a credential cannot be hashed, or a write fails with a
    /// fatal storage error. Records written before the failure remain;
    /// re-running completes the seed.
    pub async fn seed_fixture(
        &self,
        fixture: &SeedFixture,
    ) -> Result<ExampleDataSeedOutcome, ExampleDataSeedingError> {
        let now = self.clock.utc();
        let hashes = self.hash_credentials(fixture)?;
        let mut outcome = ExampleDataSeedOutcome::default();

        let mut user_ids = HashMap::with_capacity(fixture.users().len());
        for seed in fixture.users() {
            let user = match (&self.bootstrap_admin, seed.role) {
                (Some(admin), RoleSeed::Admin) => admin.clone(),
                _ => convert_user(seed, &hashes, now)?,
            };
            let written = self.repository.insert_user_if_absent(&user).await;
            let key = user.email.as_str().to_owned();
            if let Some(id) = settle(&mut outcome, Entity::User, key, written)? {
                user_ids.insert(seed.username.as_str(), id);
            }
        }

        let mut course_ids = HashMap::with_capacity(fixture.courses().len());
        for seed in fixture.courses() {
            let Some(instructor_id) = user_ids.get(seed.instructor.as_str()).cloned() else {
                outcome.skip("course", seed.title.clone(), ("instructor", &seed.instructor));
                continue;
            };
            let enrollment_count = fixture.enrollment_count_for(&seed.title);
            let course = convert_course(seed, instructor_id, enrollment_count, now);
            let written = self.repository.insert_course_if_absent(&course).await;
            if let Some(id) = settle(&mut outcome, Entity::Course, seed.title.clone(), written)? {
                course_ids.insert(seed.title.as_str(), id);
            }
        }

        for seed in fixture.enrollments() {
            let key = format!("{}/{}", seed.student, seed.course);
            let Some(user_id) = user_ids.get(seed.student.as_str()).cloned() else {
                outcome.skip("enrollment", key, ("student", &seed.student));
                continue;
            };
            let Some(course_id) = course_ids.get(seed.course.as_str()).cloned() else {
                outcome.skip("enrollment", key, ("course", &seed.course));
                continue;
            };
            let enrollment = convert_enrollment(seed, user_id, course_id, now);
            let written = self.repository.insert_enrollment_if_absent(&enrollment).await;
            settle(&mut outcome, Entity::Enrollment, key, written)?;
        }

        info!(
            users_inserted = outcome.users.inserted,
            courses_inserted = outcome.courses.inserted,
            enrollments_inserted = outcome.enrollments.inserted,
            failures = outcome.failures.len(),
            "example data seeded"
        );
        Ok(outcome)
    }

    /// Hash each named credential once; users share the result.
    fn hash_credentials<'a>(
        &self,
        fixture: &'a SeedFixture,
    ) -> Result<HashMap<&'a str, String>, CredentialHashError> {
        fixture
            .credential_names()
            .map(|name| {
                let password = fixture.credential(name).unwrap_or_default();
                self.hasher
                    .hash_password(password)
                    .map(|hash| (name, hash))
            })
            .collect()
    }
}

#[derive(Debug, Clone, Copy)]
enum Entity {
    User,
    Course,
    Enrollment,
}

impl Entity {
    const fn as_str(self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Course => "course",
            Self::Enrollment => "enrollment",
        }
    }
}

/// Count a write, record a rejected one, or escalate a fatal one.
///
/// Returns the record identifier when the record is in place.
fn settle(
    outcome: &mut ExampleDataSeedOutcome,
    entity: Entity,
    key: String,
    written: Result<UpsertOutcome, StorageError>,
) -> Result<Option<RecordId>, ExampleDataSeedingError> {
    let err = match written {
        Ok(written) => {
            let counts = match entity {
                Entity::User => &mut outcome.users,
                Entity::Course => &mut outcome.courses,
                Entity::Enrollment => &mut outcome.enrollments,
            };
            counts.record(written.status);
            return Ok(Some(written.id));
        }
        Err(err) => err,
    };

    if err.is_fatal() {
        return Err(ExampleDataSeedingError::Persistence {
            entity: entity.as_str(),
            key,
            source: err,
        });
    }

    warn!(
        entity = entity.as_str(),
        key = key.as_str(),
        error = %err,
        "seed record rejected; continuing"
    );
    outcome.failures.push(SeedFailure {
        entity: entity.as_str(),
        key,
        cause: SeedFailureCause::Rejected {
            kind: err.kind(),
            message: err.to_string(),
        },
    });
    Ok(None)
}

fn convert_user(
    seed: &UserSeed,
    hashes: &HashMap<&str, String>,
    now: DateTime<Utc>,
) -> Result<NewUser, ExampleDataSeedingError> {
    let invalid = |source: AccountValidationError| ExampleDataSeedingError::InvalidUser {
        username: seed.username.clone(),
        source,
    };
    let hashed_password = hashes.get(seed.credential.as_str()).ok_or_else(|| {
        ExampleDataSeedingError::MissingCredential {
            username: seed.username.clone(),
            credential: seed.credential.clone(),
        }
    })?;

    Ok(NewUser {
        email: EmailAddress::new(seed.email.as_str()).map_err(invalid)?,
        username: Username::new(seed.username.as_str()).map_err(invalid)?,
        first_name: seed.first_name.clone(),
        last_name: seed.last_name.clone(),
        role: map_role(seed.role),
        hashed_password: hashed_password.clone(),
        is_active: true,
        created_at: now,
    })
}

fn convert_course(
    seed: &CourseSeed,
    instructor_id: RecordId,
    enrollment_count: usize,
    now: DateTime<Utc>,
) -> NewCourse {
    NewCourse {
        title: seed.title.clone(),
        description: seed.description.clone(),
        instructor_id,
        status: match seed.status {
            CourseStatusSeed::Draft => CourseStatus::Draft,
            CourseStatusSeed::Published => CourseStatus::Published,
        },
        price: seed.price,
        duration_hours: seed.duration_hours,
        max_students: seed.max_students,
        tags: seed.tags.clone(),
        enrollment_count: u32::try_from(enrollment_count).unwrap_or(u32::MAX),
        created_at: now,
    }
}

fn convert_enrollment(
    seed: &EnrollmentSeed,
    user_id: RecordId,
    course_id: RecordId,
    now: DateTime<Utc>,
) -> NewEnrollment {
    let days_ago = |days: u32| now - Duration::days(i64::from(days));
    NewEnrollment {
        user_id,
        course_id,
        enrolled_at: days_ago(seed.enrolled_days_ago),
        status: match seed.status {
            EnrollmentStatusSeed::Active => EnrollmentStatus::Active,
            EnrollmentStatusSeed::Completed => EnrollmentStatus::Completed,
            EnrollmentStatusSeed::Dropped => EnrollmentStatus::Dropped,
        },
        progress: seed.progress,
        completed_at: seed.completed_days_ago.map(days_ago),
        last_accessed: seed.last_accessed_days_ago.map(days_ago),
    }
}

fn map_role(role: RoleSeed) -> Role {
    match role {
        RoleSeed::Student => Role::Student,
        RoleSeed::Instructor => Role::Instructor,
        RoleSeed::Admin => Role::Admin,
    }
}
