//! Domain types for the points-economy ledger.
//!
//! This module provides:
//! - Identifier newtypes and the explicit actor role tag
//! - Actor accounts with their balance invariants
//! - The pure revenue split calculator
//! - Subject, enrollment, and transaction records

pub mod actor;
pub mod enrollment;
pub mod primitives;
pub mod split;
pub mod subject;
pub mod transaction;

pub use actor::{Actor, StudentAccount, TeacherAccount};
pub use enrollment::Enrollment;
pub use primitives::{Role, StudentId, SubjectId, TeacherId, TimeMs};
pub use split::{compute_split, Split};
pub use subject::{AssignedTeacher, Subject, SubjectStats, SubjectStatus};
pub use transaction::{Transaction, TransactionDraft, TransactionStatus, TransactionType};
