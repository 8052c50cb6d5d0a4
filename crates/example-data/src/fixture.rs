//! Seed fixture types and JSON parsing.
//!
//! A fixture holds named development credentials plus the user, course and
//! enrollment records to seed. Parsing validates every record and every
//! cross-reference so that a fixture which loads successfully can be applied
//! without tripping the storage engine's validators or unique indexes.

use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;

use camino::Utf8Path;
use cap_std::fs::Dir;
use serde::Deserialize;

use crate::error::FixtureError;
use crate::seed::{CourseSeed, EnrollmentSeed, RoleSeed, UserSeed};
use crate::validation::{
    DESCRIPTION_MAX, DESCRIPTION_MIN, TITLE_MAX, TITLE_MIN, USERNAME_MAX, USERNAME_MIN,
    is_valid_description, is_valid_email, is_valid_title, is_valid_username,
};

/// Current supported fixture version.
const SUPPORTED_VERSION: u32 = 1;

/// The development fixture shipped with the crate.
const BUNDLED_FIXTURE: &str = include_str!("../fixtures/lms-seed.json");

/// A validated seed fixture.
///
/// # Example
///
/// ```
/// use example_data::SeedFixture;
///
/// let fixture = SeedFixture::bundled().expect("bundled fixture is valid");
/// assert_eq!(fixture.users().len(), 12);
/// assert_eq!(fixture.courses().len(), 6);
/// assert_eq!(fixture.enrollments().len(), 18);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SeedFixture {
    version: u32,
    credentials: BTreeMap<String, String>,
    users: Vec<UserSeed>,
    courses: Vec<CourseSeed>,
    enrollments: Vec<EnrollmentSeed>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawSeedFixture {
    version: u32,
    #[serde(default)]
    credentials: BTreeMap<String, String>,
    users: Vec<UserSeed>,
    #[serde(default)]
    courses: Vec<CourseSeed>,
    #[serde(default)]
    enrollments: Vec<EnrollmentSeed>,
}

impl SeedFixture {
    /// Parses a seed fixture from a JSON string.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError`] if:
    /// - The JSON is malformed or has unknown record fields
    /// - The version is unsupported
    /// - A record violates a collection validator constraint
    /// - A natural key is duplicated
    /// - A reference does not resolve within the fixture
    pub fn from_json(json: &str) -> Result<Self, FixtureError> {
        let raw: RawSeedFixture =
            serde_json::from_str(json).map_err(|e| FixtureError::ParseError {
                message: e.to_string(),
            })?;

        Self::from_raw(raw)
    }

    /// Loads a seed fixture from a file within a capability-scoped directory.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError`] if the file cannot be read or parsed.
    pub fn from_file(dir: &Dir, file_name: &Utf8Path) -> Result<Self, FixtureError> {
        let contents = dir
            .read_to_string(file_name)
            .map_err(|e| FixtureError::IoError {
                path: PathBuf::from(file_name.as_std_path()),
                message: e.to_string(),
            })?;

        Self::from_json(&contents)
    }

    /// Returns the development fixture bundled with this crate.
    ///
    /// # Errors
    ///
    /// Returns [`FixtureError`] only if the bundled file was edited into an
    /// invalid state.
    pub fn bundled() -> Result<Self, FixtureError> {
        Self::from_json(BUNDLED_FIXTURE)
    }

    fn from_raw(raw: RawSeedFixture) -> Result<Self, FixtureError> {
        if raw.version != SUPPORTED_VERSION {
            return Err(FixtureError::UnsupportedVersion {
                expected: SUPPORTED_VERSION,
                actual: raw.version,
            });
        }

        if raw.users.is_empty() {
            return Err(FixtureError::EmptyUsers);
        }

        validate_users(&raw.users, &raw.credentials)?;
        validate_courses(&raw.courses, &raw.users)?;
        validate_enrollments(&raw.enrollments, &raw.users, &raw.courses)?;

        Ok(Self {
            version: raw.version,
            credentials: raw.credentials,
            users: raw.users,
            courses: raw.courses,
            enrollments: raw.enrollments,
        })
    }

    /// Returns the fixture version.
    #[must_use]
    pub const fn version(&self) -> u32 {
        self.version
    }

    /// Returns the development password registered under `name`.
    #[must_use]
    pub fn credential(&self, name: &str) -> Option<&str> {
        self.credentials.get(name).map(String::as_str)
    }

    /// Returns every credential name in sorted order.
    pub fn credential_names(&self) -> impl Iterator<Item = &str> {
        self.credentials.keys().map(String::as_str)
    }

    /// Returns all user records in fixture order.
    #[must_use]
    pub fn users(&self) -> &[UserSeed] {
        &self.users
    }

    /// Returns all course records in fixture order.
    #[must_use]
    pub fn courses(&self) -> &[CourseSeed] {
        &self.courses
    }

    /// Returns all enrollment records in fixture order.
    #[must_use]
    pub fn enrollments(&self) -> &[EnrollmentSeed] {
        &self.enrollments
    }

    /// Finds a user by username.
    #[must_use]
    pub fn find_user(&self, username: &str) -> Option<&UserSeed> {
        self.users.iter().find(|user| user.username == username)
    }

    /// Finds a course by title.
    #[must_use]
    pub fn find_course(&self, title: &str) -> Option<&CourseSeed> {
        self.courses.iter().find(|course| course.title == title)
    }

    /// Counts the enrollments that reference the course titled `title`.
    #[must_use]
    pub fn enrollment_count_for(&self, title: &str) -> usize {
        self.enrollments
            .iter()
            .filter(|enrollment| enrollment.course == title)
            .count()
    }

    /// Counts the users holding `role`.
    #[must_use]
    pub fn count_role(&self, role: RoleSeed) -> usize {
        self.users.iter().filter(|user| user.role == role).count()
    }
}

fn validate_users(
    users: &[UserSeed],
    credentials: &BTreeMap<String, String>,
) -> Result<(), FixtureError> {
    let mut emails = HashSet::new();
    let mut usernames = HashSet::new();

    for (index, user) in users.iter().enumerate() {
        if !is_valid_email(&user.email) {
            return Err(FixtureError::InvalidUser {
                index,
                reason: format!("email '{}' does not match the email pattern", user.email),
            });
        }
        if !is_valid_username(&user.username) {
            return Err(FixtureError::InvalidUser {
                index,
                reason: format!(
                    "username '{}' must be {USERNAME_MIN}-{USERNAME_MAX} characters",
                    user.username
                ),
            });
        }
        if !credentials.contains_key(&user.credential) {
            return Err(FixtureError::UnknownCredential {
                username: user.username.clone(),
                credential: user.credential.clone(),
            });
        }
        if !emails.insert(user.email.as_str()) {
            return Err(FixtureError::DuplicateEmail {
                email: user.email.clone(),
            });
        }
        if !usernames.insert(user.username.as_str()) {
            return Err(FixtureError::DuplicateUsername {
                username: user.username.clone(),
            });
        }
    }

    Ok(())
}

fn validate_courses(courses: &[CourseSeed], users: &[UserSeed]) -> Result<(), FixtureError> {
    let mut titles = HashSet::new();

    for (index, course) in courses.iter().enumerate() {
        if !is_valid_title(&course.title) {
            return Err(FixtureError::InvalidCourse {
                index,
                reason: format!("title must be {TITLE_MIN}-{TITLE_MAX} characters"),
            });
        }
        if !is_valid_description(&course.description) {
            return Err(FixtureError::InvalidCourse {
                index,
                reason: format!("description must be {DESCRIPTION_MIN}-{DESCRIPTION_MAX} characters"),
            });
        }
        if !course.price.is_finite() || course.price < 0.0 {
            return Err(FixtureError::InvalidCourse {
                index,
                reason: "price must be a non-negative number".to_owned(),
            });
        }

        let owner = users
            .iter()
            .find(|user| user.username == course.instructor)
            .ok_or_else(|| FixtureError::UnknownInstructor {
                course: course.title.clone(),
                instructor: course.instructor.clone(),
            })?;
        if owner.role != RoleSeed::Instructor {
            return Err(FixtureError::NotAnInstructor {
                course: course.title.clone(),
                username: owner.username.clone(),
            });
        }

        if !titles.insert(course.title.as_str()) {
            return Err(FixtureError::DuplicateCourseTitle {
                title: course.title.clone(),
            });
        }
    }

    Ok(())
}

fn validate_enrollments(
    enrollments: &[EnrollmentSeed],
    users: &[UserSeed],
    courses: &[CourseSeed],
) -> Result<(), FixtureError> {
    let mut pairs = HashSet::new();

    for (index, enrollment) in enrollments.iter().enumerate() {
        if !users.iter().any(|user| user.username == enrollment.student) {
            return Err(FixtureError::UnknownStudent {
                index,
                student: enrollment.student.clone(),
            });
        }
        if !courses.iter().any(|course| course.title == enrollment.course) {
            return Err(FixtureError::UnknownCourse {
                index,
                course: enrollment.course.clone(),
            });
        }
        if !(0.0..=100.0).contains(&enrollment.progress) {
            return Err(FixtureError::InvalidEnrollment {
                index,
                reason: format!("progress {} must be between 0 and 100", enrollment.progress),
            });
        }
        if enrollment
            .completed_days_ago
            .is_some_and(|completed| completed > enrollment.enrolled_days_ago)
        {
            return Err(FixtureError::InvalidEnrollment {
                index,
                reason: "completion cannot precede enrollment".to_owned(),
            });
        }
        if !pairs.insert((enrollment.student.as_str(), enrollment.course.as_str())) {
            return Err(FixtureError::DuplicateEnrollment {
                student: enrollment.student.clone(),
                course: enrollment.course.clone(),
            });
        }
    }

    Ok(())
}
