//! Immutable audit records of value movements in the points economy.

use crate::domain::{StudentId, SubjectId, TeacherId, TimeMs};
use serde::{Deserialize, Serialize};

/// Kind of value movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionType {
    /// Points top-up paid in currency.
    Purchase,
    /// A student buying a subject with points.
    SubjectBuy,
    /// Points spent on AI features.
    AiUse,
    /// A teacher moving withdrawable funds toward payout.
    Withdrawal,
    Refund,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionType::Purchase => "PURCHASE",
            TransactionType::SubjectBuy => "SUBJECT_BUY",
            TransactionType::AiUse => "AI_USE",
            TransactionType::Withdrawal => "WITHDRAWAL",
            TransactionType::Refund => "REFUND",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PURCHASE" => Some(TransactionType::Purchase),
            "SUBJECT_BUY" => Some(TransactionType::SubjectBuy),
            "AI_USE" => Some(TransactionType::AiUse),
            "WITHDRAWAL" => Some(TransactionType::Withdrawal),
            "REFUND" => Some(TransactionType::Refund),
            _ => None,
        }
    }
}

/// Settlement status.
///
/// Purchases and top-ups settle synchronously and are created Completed.
/// Withdrawals are created Pending and transition exactly once to
/// Completed, Failed, or Cancelled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TransactionStatus {
    Pending,
    Completed,
    Failed,
    Cancelled,
}

impl TransactionStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransactionStatus::Pending => "PENDING",
            TransactionStatus::Completed => "COMPLETED",
            TransactionStatus::Failed => "FAILED",
            TransactionStatus::Cancelled => "CANCELLED",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "PENDING" => Some(TransactionStatus::Pending),
            "COMPLETED" => Some(TransactionStatus::Completed),
            "FAILED" => Some(TransactionStatus::Failed),
            "CANCELLED" => Some(TransactionStatus::Cancelled),
            _ => None,
        }
    }
}

/// A stored transaction. The id and `created_at` are assigned by the
/// recorder; rows are never mutated after creation except for the
/// withdrawal status transition.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Transaction {
    pub id: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub student_id: Option<StudentId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub teacher_id: Option<TeacherId>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub subject_id: Option<SubjectId>,
    pub amount: u64,
    #[serde(rename = "type")]
    pub txn_type: TransactionType,
    pub teacher_cut: u64,
    pub company_cut: u64,
    pub status: TransactionStatus,
    pub description: String,
    pub created_at: TimeMs,
}

/// A transaction awaiting identity assignment by the recorder.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransactionDraft {
    pub student_id: Option<StudentId>,
    pub teacher_id: Option<TeacherId>,
    pub subject_id: Option<SubjectId>,
    pub amount: u64,
    pub txn_type: TransactionType,
    pub teacher_cut: u64,
    pub company_cut: u64,
    pub status: TransactionStatus,
    pub description: String,
}
