//! Subject purchase orchestration.
//!
//! The whole flow — validate, split, debit, credit teachers, enroll, bump
//! stats, record — commits as one storage transaction. Any failure before
//! commit rolls everything back, so the returned transaction record is the
//! only caller-visible proof of success.

use super::LedgerEngine;
use crate::domain::{
    compute_split, StudentId, SubjectId, SubjectStatus, TimeMs, Transaction, TransactionDraft,
    TransactionStatus, TransactionType,
};
use crate::error::LedgerError;
use tracing::info;

impl LedgerEngine {
    /// Purchase a subject for a student.
    ///
    /// # Errors
    /// - `NotFound` for an unknown student or subject
    /// - `Validation` for a subject that is not Active
    /// - `AlreadyEnrolled` when the pair already exists
    /// - `InsufficientFunds` when credit < price
    /// - `StorageConflict` when contention persists past the retry budget
    pub async fn purchase_subject(
        &self,
        student_id: &StudentId,
        subject_id: &SubjectId,
    ) -> Result<Transaction, LedgerError> {
        self.with_conflict_retry(|| self.try_purchase(student_id, subject_id))
            .await
    }

    async fn try_purchase(
        &self,
        student_id: &StudentId,
        subject_id: &SubjectId,
    ) -> Result<Transaction, LedgerError> {
        let mut tx = self.repo.begin().await?;

        // VALIDATING
        let subject = self
            .repo
            .get_subject_tx(&mut tx, subject_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("subject {}", subject_id)))?;

        if subject.status != SubjectStatus::Active {
            return Err(LedgerError::Validation(format!(
                "subject {} is not purchasable (status {:?})",
                subject_id, subject.status
            )));
        }

        let student = self
            .repo
            .get_student_tx(&mut tx, student_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("student {}", student_id)))?;

        if self
            .repo
            .is_enrolled_tx(&mut tx, student_id, subject_id)
            .await?
        {
            return Err(LedgerError::AlreadyEnrolled);
        }

        if student.credit < subject.price {
            return Err(LedgerError::InsufficientFunds {
                available: student.credit,
                required: subject.price,
            });
        }

        // SPLIT_COMPUTED
        let split = compute_split(subject.price, self.config.teacher_share_percent)?;

        // BALANCES_APPLIED
        let debited = self
            .repo
            .debit_student_credit(&mut tx, student_id, subject.price)
            .await?;
        if !debited {
            // The conditional UPDATE lost a race the earlier read did not see.
            return Err(LedgerError::InsufficientFunds {
                available: student.credit,
                required: subject.price,
            });
        }

        let teacher_count = subject.assigned_teachers.len();
        let shares = split.per_teacher_shares(teacher_count);
        for (assigned, share) in subject.assigned_teachers.iter().zip(&shares) {
            let credited = self
                .repo
                .credit_teacher_sale(&mut tx, &assigned.teacher_id, *share)
                .await?;
            if !credited {
                return Err(LedgerError::NotFound(format!(
                    "assigned teacher {}",
                    assigned.teacher_id
                )));
            }
        }

        // With no assigned teachers the whole cut accrues to the company.
        let (teacher_cut, company_cut) = if teacher_count == 0 {
            (0, split.total)
        } else {
            (split.teacher_cut, split.company_cut)
        };

        let now = TimeMs::now();

        // ENROLLED
        let enrolled = self
            .repo
            .insert_enrollment(&mut tx, student_id, subject_id, now)
            .await?;
        if !enrolled {
            return Err(LedgerError::AlreadyEnrolled);
        }

        // STATS_UPDATED
        self.repo
            .bump_sale_stats(&mut tx, subject_id, subject.price)
            .await?;

        // RECORDED
        let draft = TransactionDraft {
            student_id: Some(student_id.clone()),
            teacher_id: None,
            subject_id: Some(subject_id.clone()),
            amount: subject.price,
            txn_type: TransactionType::SubjectBuy,
            teacher_cut,
            company_cut,
            status: TransactionStatus::Completed,
            description: format!("Purchase of {}", subject.name),
        };
        let txn = self.repo.insert_transaction(&mut tx, &draft, now).await?;

        tx.commit().await.map_err(LedgerError::Storage)?;

        info!(
            student = %student_id,
            subject = %subject_id,
            amount = subject.price,
            teacher_cut,
            company_cut,
            "subject purchased"
        );

        Ok(txn)
    }
}
