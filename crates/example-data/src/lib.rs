//! Fixture-backed example data for development LMS databases.
//!
//! This crate loads the development seed fixture (users, courses and
//! enrollments) from JSON and validates it against the same constraints the
//! document store enforces through its collection validators. It is
//! independent of the provisioner's domain types so the fixture can be
//! checked without a database.
//!
//! # Overview
//!
//! The crate supports:
//!
//! - Loading seed fixtures from JSON strings or capability-scoped files
//! - Validating emails, usernames, course titles and descriptions
//! - Checking that every instructor, student, course and credential
//!   reference resolves within the fixture
//! - Rejecting duplicate natural keys before anything reaches the database
//!
//! # Example
//!
//! ```
//! use example_data::SeedFixture;
//!
//! let json = r#"{
//!     "version": 1,
//!     "credentials": {"tutor": "instructor123", "learner": "student123"},
//!     "users": [
//!         {"email": "ada@example.com", "username": "ada", "firstName": "Ada",
//!          "lastName": "Lovelace", "role": "instructor", "credential": "tutor"},
//!         {"email": "alan@example.com", "username": "alan", "firstName": "Alan",
//!          "lastName": "Turing", "role": "student", "credential": "learner"}
//!     ],
//!     "courses": [
//!         {"title": "Engines", "description": "Analytical engines.", "instructor": "ada",
//!          "status": "published", "price": 10.0, "durationHours": 4, "maxStudents": 5,
//!          "tags": ["history"]}
//!     ],
//!     "enrollments": [
//!         {"student": "alan", "course": "Engines", "status": "active", "progress": 50.0,
//!          "enrolledDaysAgo": 3, "lastAccessedDaysAgo": 1}
//!     ]
//! }"#;
//!
//! let fixture = SeedFixture::from_json(json).expect("valid fixture");
//! assert_eq!(fixture.users().len(), 2);
//! assert_eq!(fixture.enrollment_count_for("Engines"), 1);
//! ```

mod error;
mod fixture;
mod seed;
mod validation;

pub use error::FixtureError;
pub use fixture::SeedFixture;
pub use seed::{
    CourseSeed, CourseStatusSeed, EnrollmentSeed, EnrollmentStatusSeed, RoleSeed, UserSeed,
};
pub use validation::{
    DESCRIPTION_MAX, DESCRIPTION_MIN, EMAIL_PATTERN, TITLE_MAX, TITLE_MIN, USERNAME_MAX,
    USERNAME_MIN, is_valid_description, is_valid_email, is_valid_title, is_valid_username,
};
