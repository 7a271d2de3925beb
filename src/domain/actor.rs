//! Actor accounts and their point balances.

use crate::domain::{Role, StudentId, TeacherId, TimeMs};
use serde::{Deserialize, Serialize};

/// A student's account: a single spendable credit balance.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StudentAccount {
    pub id: StudentId,
    pub credit: u64,
    pub created_at: TimeMs,
}

/// A teacher's account.
///
/// `credit` is spendable like a student's; `total_earnings` accumulates
/// lifetime sale proceeds; `withdrawable` is the portion still eligible for
/// payout. Invariant: `withdrawable <= total_earnings`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TeacherAccount {
    pub id: TeacherId,
    pub credit: u64,
    pub total_earnings: u64,
    pub withdrawable: u64,
    pub created_at: TimeMs,
}

/// An actor, discriminated by its explicit role tag.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "role", rename_all = "camelCase")]
pub enum Actor {
    #[serde(rename = "STUDENT")]
    Student(StudentAccount),
    #[serde(rename = "TEACHER")]
    Teacher(TeacherAccount),
    #[serde(rename = "ADMIN")]
    Admin { id: String },
}

impl Actor {
    pub fn role(&self) -> Role {
        match self {
            Actor::Student(_) => Role::Student,
            Actor::Teacher(_) => Role::Teacher,
            Actor::Admin { .. } => Role::Admin,
        }
    }

    pub fn id(&self) -> &str {
        match self {
            Actor::Student(s) => s.id.as_str(),
            Actor::Teacher(t) => t.id.as_str(),
            Actor::Admin { id } => id.as_str(),
        }
    }
}
