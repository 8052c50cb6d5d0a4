//! Fixture seed record types.
//!
//! These types describe the records held by a seed fixture. They are
//! independent of the provisioner's domain types to avoid circular
//! dependencies; references between records use natural keys (usernames and
//! course titles) rather than database identifiers.

use serde::{Deserialize, Serialize};

/// Role assigned to a seeded user.
///
/// Mirrors the `role` enum accepted by the `users` collection validator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RoleSeed {
    /// Learner enrolled in courses.
    Student,
    /// Course owner.
    Instructor,
    /// Platform administrator.
    Admin,
}

/// Publication state of a seeded course.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CourseStatusSeed {
    /// Not yet visible to students.
    #[default]
    Draft,
    /// Open for enrollment.
    Published,
}

/// Progress state of a seeded enrollment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatusSeed {
    /// Student is working through the course.
    #[default]
    Active,
    /// Student finished the course.
    Completed,
    /// Student left the course.
    Dropped,
}

/// A user record in the fixture.
///
/// # Example
///
/// ```
/// use example_data::{RoleSeed, UserSeed};
///
/// let user = UserSeed {
///     email: "alice.brown@student.com".to_owned(),
///     username: "abrown".to_owned(),
///     first_name: "Alice".to_owned(),
///     last_name: "Brown".to_owned(),
///     role: RoleSeed::Student,
///     credential: "student".to_owned(),
/// };
///
/// assert_eq!(user.role, RoleSeed::Student);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct UserSeed {
    /// Unique email address; the user's natural key.
    pub email: String,
    /// Unique login name.
    pub username: String,
    /// Given name.
    pub first_name: String,
    /// Family name.
    pub last_name: String,
    /// Assigned role.
    pub role: RoleSeed,
    /// Name of the fixture credential whose password this user receives.
    pub credential: String,
}

/// A course record in the fixture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct CourseSeed {
    /// Unique course title; the course's natural key.
    pub title: String,
    /// Course summary.
    pub description: String,
    /// Username of the instructor who owns the course.
    pub instructor: String,
    /// Publication state.
    #[serde(default)]
    pub status: CourseStatusSeed,
    /// Price in the platform currency.
    pub price: f64,
    /// Expected course length in hours.
    pub duration_hours: u32,
    /// Enrollment cap.
    pub max_students: u32,
    /// Free-form topic tags.
    #[serde(default)]
    pub tags: Vec<String>,
}

/// An enrollment record in the fixture.
///
/// Timestamps are expressed relative to the moment of seeding so that the
/// fixture stays meaningful whenever it is applied.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct EnrollmentSeed {
    /// Username of the enrolled student.
    pub student: String,
    /// Title of the course.
    pub course: String,
    /// Progress state.
    #[serde(default)]
    pub status: EnrollmentStatusSeed,
    /// Completion percentage between 0 and 100.
    pub progress: f64,
    /// Days before seeding that the enrollment started.
    pub enrolled_days_ago: u32,
    /// Days before seeding that the course was completed, if it was.
    #[serde(default)]
    pub completed_days_ago: Option<u32>,
    /// Days before seeding that the student last opened the course.
    #[serde(default)]
    pub last_accessed_days_ago: Option<u32>,
}
