//! Purchasable subject and its running sales statistics.

use crate::domain::{SubjectId, TeacherId, TimeMs};
use serde::{Deserialize, Serialize};

/// Subject lifecycle status. Only Active subjects can be purchased.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum SubjectStatus {
    Active,
    Inactive,
    Draft,
}

impl SubjectStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            SubjectStatus::Active => "ACTIVE",
            SubjectStatus::Inactive => "INACTIVE",
            SubjectStatus::Draft => "DRAFT",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "ACTIVE" => Some(SubjectStatus::Active),
            "INACTIVE" => Some(SubjectStatus::Inactive),
            "DRAFT" => Some(SubjectStatus::Draft),
            _ => None,
        }
    }
}

/// Running sales counters, written only by the purchase engine.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectStats {
    pub total_sales: i64,
    pub revenue: i64,
    pub students_enrolled: i64,
    pub teachers_count: i64,
}

/// A teacher assigned to a subject, with the assignment order preserved.
///
/// Order matters: the split remainder goes to the first-listed teacher.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignedTeacher {
    pub teacher_id: TeacherId,
    pub position: i64,
    pub assigned_at: TimeMs,
}

/// A purchasable unit of content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Subject {
    pub id: SubjectId,
    pub name: String,
    pub description: String,
    /// Price in integer points.
    pub price: u64,
    pub status: SubjectStatus,
    pub assigned_teachers: Vec<AssignedTeacher>,
    pub stats: SubjectStats,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip() {
        for status in [
            SubjectStatus::Active,
            SubjectStatus::Inactive,
            SubjectStatus::Draft,
        ] {
            assert_eq!(SubjectStatus::parse(status.as_str()), Some(status));
        }
    }

    #[test]
    fn test_status_parse_unknown() {
        assert_eq!(SubjectStatus::parse("ARCHIVED"), None);
    }
}
