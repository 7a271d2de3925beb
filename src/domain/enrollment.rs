//! Enrollment: the durable record that a student owns access to a subject.

use crate::domain::{StudentId, SubjectId, TimeMs};
use serde::{Deserialize, Serialize};

/// At most one enrollment exists per (student, subject) pair; it is created
/// only by a successful purchase and never removed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub student_id: StudentId,
    pub subject_id: SubjectId,
    pub enrolled_at: TimeMs,
    /// Completion percentage, 0..=100. Owned by the progress tracker, not
    /// this engine; purchases always create it at 0.
    pub progress: i64,
}
