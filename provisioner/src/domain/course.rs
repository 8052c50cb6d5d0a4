//! Course data model.

use chrono::{DateTime, Utc};

use super::RecordId;

/// Publication state of a course.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CourseStatus {
    #[default]
    Draft,
    Published,
}

impl CourseStatus {
    /// Stored representation of the status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Draft => "draft",
            Self::Published => "published",
        }
    }
}

/// A course document to write with set-if-absent semantics keyed by title.
///
/// `enrollment_count` is derived by the seeder from the enrollments it is
/// about to write, so a freshly seeded course and its enrollments agree.
#[derive(Debug, Clone, PartialEq)]
pub struct NewCourse {
    pub title: String,
    pub description: String,
    pub instructor_id: RecordId,
    pub status: CourseStatus,
    pub price: f64,
    pub duration_hours: u32,
    pub max_students: u32,
    pub tags: Vec<String>,
    pub enrollment_count: u32,
    pub created_at: DateTime<Utc>,
}
