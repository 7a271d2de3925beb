//! Withdrawal orchestration: moving withdrawable funds toward payout.

use super::LedgerEngine;
use crate::domain::{
    TeacherId, TimeMs, Transaction, TransactionDraft, TransactionStatus, TransactionType,
};
use crate::error::LedgerError;
use tracing::info;

impl LedgerEngine {
    /// Request a withdrawal of `amount` points from a teacher's
    /// withdrawable balance.
    ///
    /// Debits `withdrawable` only; `credit` and `total_earnings` reflect
    /// lifetime state and are untouched. Records a Pending Withdrawal
    /// transaction for the downstream payout process to settle.
    pub async fn request_withdrawal(
        &self,
        teacher_id: &TeacherId,
        amount: u64,
    ) -> Result<Transaction, LedgerError> {
        if amount == 0 {
            return Err(LedgerError::InvalidAmount(
                "withdrawal amount must be positive".to_string(),
            ));
        }

        self.with_conflict_retry(|| self.try_request_withdrawal(teacher_id, amount))
            .await
    }

    async fn try_request_withdrawal(
        &self,
        teacher_id: &TeacherId,
        amount: u64,
    ) -> Result<Transaction, LedgerError> {
        let mut tx = self.repo.begin().await?;

        let teacher = self
            .repo
            .get_teacher_tx(&mut tx, teacher_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("teacher {}", teacher_id)))?;

        if teacher.withdrawable < amount {
            return Err(LedgerError::InsufficientFunds {
                available: teacher.withdrawable,
                required: amount,
            });
        }

        let debited = self
            .repo
            .debit_withdrawable(&mut tx, teacher_id, amount)
            .await?;
        if !debited {
            return Err(LedgerError::InsufficientFunds {
                available: teacher.withdrawable,
                required: amount,
            });
        }

        let draft = TransactionDraft {
            student_id: None,
            teacher_id: Some(teacher_id.clone()),
            subject_id: None,
            amount,
            txn_type: TransactionType::Withdrawal,
            teacher_cut: 0,
            company_cut: 0,
            status: TransactionStatus::Pending,
            description: format!("Withdrawal request of {} points", amount),
        };
        let txn = self
            .repo
            .insert_transaction(&mut tx, &draft, TimeMs::now())
            .await?;

        tx.commit().await.map_err(LedgerError::Storage)?;

        info!(teacher = %teacher_id, amount, txn_id = txn.id, "withdrawal requested");
        Ok(txn)
    }

    /// Settle a Pending withdrawal once the payout process reports its
    /// outcome.
    ///
    /// On `Failed` or `Cancelled` the debited amount is restored to
    /// `withdrawable` in the same storage transaction as the status
    /// transition, so the funds never sit in limbo.
    pub async fn settle_withdrawal(
        &self,
        transaction_id: i64,
        outcome: TransactionStatus,
    ) -> Result<Transaction, LedgerError> {
        if outcome == TransactionStatus::Pending {
            return Err(LedgerError::Validation(
                "settlement outcome must be COMPLETED, FAILED, or CANCELLED".to_string(),
            ));
        }

        self.with_conflict_retry(|| self.try_settle_withdrawal(transaction_id, outcome))
            .await
    }

    async fn try_settle_withdrawal(
        &self,
        transaction_id: i64,
        outcome: TransactionStatus,
    ) -> Result<Transaction, LedgerError> {
        let mut tx = self.repo.begin().await?;

        let txn = self
            .repo
            .get_transaction_tx(&mut tx, transaction_id)
            .await?
            .ok_or_else(|| LedgerError::NotFound(format!("transaction {}", transaction_id)))?;

        if txn.txn_type != TransactionType::Withdrawal {
            return Err(LedgerError::Validation(format!(
                "transaction {} is not a withdrawal",
                transaction_id
            )));
        }
        if txn.status != TransactionStatus::Pending {
            return Err(LedgerError::Validation(format!(
                "transaction {} is already settled ({})",
                transaction_id,
                txn.status.as_str()
            )));
        }

        let transitioned = self
            .repo
            .settle_withdrawal_status(&mut tx, transaction_id, outcome)
            .await?;
        if !transitioned {
            return Err(LedgerError::Validation(format!(
                "transaction {} is already settled",
                transaction_id
            )));
        }

        if matches!(
            outcome,
            TransactionStatus::Failed | TransactionStatus::Cancelled
        ) {
            let teacher_id = txn.teacher_id.clone().ok_or_else(|| {
                LedgerError::Validation(format!(
                    "withdrawal transaction {} has no teacher",
                    transaction_id
                ))
            })?;
            self.repo
                .restore_withdrawable(&mut tx, &teacher_id, txn.amount)
                .await?;
        }

        tx.commit().await.map_err(LedgerError::Storage)?;

        info!(txn_id = transaction_id, outcome = outcome.as_str(), "withdrawal settled");

        Ok(Transaction {
            status: outcome,
            ..txn
        })
    }
}
