//! Domain primitives: actor/subject identifiers, TimeMs, Role.

use serde::{Deserialize, Serialize};

/// Time in milliseconds since Unix epoch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TimeMs(pub i64);

impl TimeMs {
    /// Create a TimeMs from milliseconds.
    pub fn new(ms: i64) -> Self {
        TimeMs(ms)
    }

    /// Current wall-clock time.
    pub fn now() -> Self {
        TimeMs(chrono::Utc::now().timestamp_millis())
    }

    /// Get the underlying milliseconds value.
    pub fn as_ms(&self) -> i64 {
        self.0
    }
}

/// Student identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct StudentId(pub String);

impl StudentId {
    pub fn new(id: String) -> Self {
        StudentId(id)
    }

    /// Generate a fresh random identifier.
    pub fn generate() -> Self {
        StudentId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for StudentId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Teacher identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct TeacherId(pub String);

impl TeacherId {
    pub fn new(id: String) -> Self {
        TeacherId(id)
    }

    pub fn generate() -> Self {
        TeacherId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for TeacherId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Subject identifier.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SubjectId(pub String);

impl SubjectId {
    pub fn new(id: String) -> Self {
        SubjectId(id)
    }

    pub fn generate() -> Self {
        SubjectId(uuid::Uuid::new_v4().to_string())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SubjectId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Actor role tag.
///
/// An identity is exactly one of these; the role is an explicit tag, never
/// inferred from which optional profile fields happen to be populated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Role {
    Student,
    Teacher,
    Admin,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Student => write!(f, "STUDENT"),
            Role::Teacher => write!(f, "TEACHER"),
            Role::Admin => write!(f, "ADMIN"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_serialization() {
        let json = serde_json::to_string(&Role::Student).unwrap();
        assert_eq!(json, "\"STUDENT\"");
        let json = serde_json::to_string(&Role::Teacher).unwrap();
        assert_eq!(json, "\"TEACHER\"");
    }

    #[test]
    fn test_id_display() {
        let id = StudentId::new("s-1".to_string());
        assert_eq!(id.to_string(), "s-1");
    }

    #[test]
    fn test_generated_ids_are_unique() {
        assert_ne!(SubjectId::generate(), SubjectId::generate());
    }

    #[test]
    fn test_timems_ordering() {
        assert!(TimeMs::new(1000) < TimeMs::new(2000));
    }
}
