//! Error types for the example-data crate.
//!
//! This module defines the semantic error enum for fixture parsing and
//! validation, following the project's error handling conventions with
//! `thiserror`.

use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur when loading or validating a seed fixture.
///
/// These errors cover file I/O, JSON parsing, field validation against the
/// collection validators, duplicate natural keys and dangling references.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FixtureError {
    /// The fixture file could not be read.
    #[error("failed to read fixture file at '{path}': {message}")]
    IoError {
        /// Path to the fixture file.
        path: PathBuf,
        /// Description of the I/O error.
        message: String,
    },

    /// The fixture JSON is malformed or missing required fields.
    #[error("invalid fixture JSON: {message}")]
    ParseError {
        /// Description of the parse error.
        message: String,
    },

    /// The fixture version is not supported.
    #[error("unsupported fixture version: expected {expected}, found {actual}")]
    UnsupportedVersion {
        /// Expected version number.
        expected: u32,
        /// Actual version found in the fixture.
        actual: u32,
    },

    /// The fixture contains no users.
    #[error("fixture contains no users")]
    EmptyUsers,

    /// A user record violates the `users` collection validator.
    #[error("invalid user at index {index}: {reason}")]
    InvalidUser {
        /// Index of the user in the fixture.
        index: usize,
        /// Which constraint was violated.
        reason: String,
    },

    /// A course record violates the `courses` collection validator.
    #[error("invalid course at index {index}: {reason}")]
    InvalidCourse {
        /// Index of the course in the fixture.
        index: usize,
        /// Which constraint was violated.
        reason: String,
    },

    /// An enrollment record carries out-of-range values.
    #[error("invalid enrollment at index {index}: {reason}")]
    InvalidEnrollment {
        /// Index of the enrollment in the fixture.
        index: usize,
        /// Which constraint was violated.
        reason: String,
    },

    /// Two users share an email address.
    #[error("duplicate user email '{email}'")]
    DuplicateEmail {
        /// The repeated email.
        email: String,
    },

    /// Two users share a username.
    #[error("duplicate username '{username}'")]
    DuplicateUsername {
        /// The repeated username.
        username: String,
    },

    /// Two courses share a title.
    #[error("duplicate course title '{title}'")]
    DuplicateCourseTitle {
        /// The repeated title.
        title: String,
    },

    /// A student is enrolled in the same course twice.
    #[error("duplicate enrollment of '{student}' in '{course}'")]
    DuplicateEnrollment {
        /// Username of the student.
        student: String,
        /// Title of the course.
        course: String,
    },

    /// A user references a credential the fixture does not define.
    #[error("user '{username}' references unknown credential '{credential}'")]
    UnknownCredential {
        /// Username of the referencing user.
        username: String,
        /// The missing credential name.
        credential: String,
    },

    /// A course references an instructor the fixture does not define.
    #[error("course '{course}' references unknown instructor '{instructor}'")]
    UnknownInstructor {
        /// Title of the referencing course.
        course: String,
        /// The missing username.
        instructor: String,
    },

    /// A course's instructor does not hold the instructor role.
    #[error("course '{course}' is owned by '{username}' who is not an instructor")]
    NotAnInstructor {
        /// Title of the course.
        course: String,
        /// Username of the owner.
        username: String,
    },

    /// An enrollment references a student the fixture does not define.
    #[error("enrollment at index {index} references unknown student '{student}'")]
    UnknownStudent {
        /// Index of the enrollment in the fixture.
        index: usize,
        /// The missing username.
        student: String,
    },

    /// An enrollment references a course the fixture does not define.
    #[error("enrollment at index {index} references unknown course '{course}'")]
    UnknownCourse {
        /// Index of the enrollment in the fixture.
        index: usize,
        /// The missing course title.
        course: String,
    },
}
