//! Enrollment data model.

use chrono::{DateTime, Utc};

use super::RecordId;

/// Progress state of an enrollment.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum EnrollmentStatus {
    #[default]
    Active,
    Completed,
    Dropped,
}

impl EnrollmentStatus {
    /// Stored representation of the status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Active => "active",
            Self::Completed => "completed",
            Self::Dropped => "dropped",
        }
    }
}

/// An enrollment document keyed by `(user_id, course_id)`.
///
/// ## Invariants
/// - `progress` lies within `0..=100`.
/// - `completed_at`, when present, is not earlier than `enrolled_at`.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEnrollment {
    pub user_id: RecordId,
    pub course_id: RecordId,
    pub enrolled_at: DateTime<Utc>,
    pub status: EnrollmentStatus,
    pub progress: f64,
    pub completed_at: Option<DateTime<Utc>>,
    pub last_accessed: Option<DateTime<Utc>>,
}
