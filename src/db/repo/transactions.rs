//! The append-only transaction log.

use super::{Repository, Tx};
use crate::domain::{
    StudentId, SubjectId, TeacherId, TimeMs, Transaction, TransactionDraft, TransactionStatus,
    TransactionType,
};
use sqlx::Row;

impl Repository {
    /// Append a transaction record inside the enclosing storage
    /// transaction, assigning its id and `created_at`.
    ///
    /// # Errors
    /// A failed insert aborts the caller's whole operation; there is no
    /// silent-failure path.
    pub async fn insert_transaction(
        &self,
        tx: &mut Tx<'_>,
        draft: &TransactionDraft,
        created_at: TimeMs,
    ) -> Result<Transaction, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO transactions (
                student_id, teacher_id, subject_id, amount, type,
                teacher_cut, company_cut, status, description, created_at
            ) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(draft.student_id.as_ref().map(|id| id.as_str()))
        .bind(draft.teacher_id.as_ref().map(|id| id.as_str()))
        .bind(draft.subject_id.as_ref().map(|id| id.as_str()))
        .bind(draft.amount as i64)
        .bind(draft.txn_type.as_str())
        .bind(draft.teacher_cut as i64)
        .bind(draft.company_cut as i64)
        .bind(draft.status.as_str())
        .bind(&draft.description)
        .bind(created_at.as_ms())
        .execute(&mut **tx)
        .await?;

        Ok(Transaction {
            id: result.last_insert_rowid(),
            student_id: draft.student_id.clone(),
            teacher_id: draft.teacher_id.clone(),
            subject_id: draft.subject_id.clone(),
            amount: draft.amount,
            txn_type: draft.txn_type,
            teacher_cut: draft.teacher_cut,
            company_cut: draft.company_cut,
            status: draft.status,
            description: draft.description.clone(),
            created_at,
        })
    }

    /// Load one transaction by id.
    pub async fn get_transaction(&self, id: i64) -> Result<Option<Transaction>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, student_id, teacher_id, subject_id, amount, type,
                   teacher_cut, company_cut, status, description, created_at
            FROM transactions
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| transaction_from_row(&r)))
    }

    /// Load one transaction by id within a transaction scope.
    pub async fn get_transaction_tx(
        &self,
        tx: &mut Tx<'_>,
        id: i64,
    ) -> Result<Option<Transaction>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, student_id, teacher_id, subject_id, amount, type,
                   teacher_cut, company_cut, status, description, created_at
            FROM transactions
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&mut **tx)
        .await?;

        Ok(row.map(|r| transaction_from_row(&r)))
    }

    /// List all transactions touching an actor, in creation order
    /// (`created_at` ascending, insertion id as the tie-break).
    pub async fn list_transactions(&self, actor_id: &str) -> Result<Vec<Transaction>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT id, student_id, teacher_id, subject_id, amount, type,
                   teacher_cut, company_cut, status, description, created_at
            FROM transactions
            WHERE student_id = ? OR teacher_id = ?
            ORDER BY created_at ASC, id ASC
            "#,
        )
        .bind(actor_id)
        .bind(actor_id)
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.iter().map(transaction_from_row).collect())
    }

    /// Transition a Pending withdrawal to its terminal status.
    ///
    /// The `status = 'PENDING'` guard makes the transition exactly-once:
    /// zero rows affected means the record was already settled (or never
    /// was a pending withdrawal).
    pub async fn settle_withdrawal_status(
        &self,
        tx: &mut Tx<'_>,
        id: i64,
        outcome: TransactionStatus,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE transactions
            SET status = ?
            WHERE id = ? AND type = 'WITHDRAWAL' AND status = 'PENDING'
            "#,
        )
        .bind(outcome.as_str())
        .bind(id)
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn transaction_from_row(r: &sqlx::sqlite::SqliteRow) -> Transaction {
    let type_str: String = r.get("type");
    let status_str: String = r.get("status");

    Transaction {
        id: r.get("id"),
        student_id: r
            .get::<Option<String>, _>("student_id")
            .map(StudentId::new),
        teacher_id: r
            .get::<Option<String>, _>("teacher_id")
            .map(TeacherId::new),
        subject_id: r
            .get::<Option<String>, _>("subject_id")
            .map(SubjectId::new),
        amount: r.get::<i64, _>("amount") as u64,
        txn_type: TransactionType::parse(&type_str).unwrap_or(TransactionType::Purchase),
        teacher_cut: r.get::<i64, _>("teacher_cut") as u64,
        company_cut: r.get::<i64, _>("company_cut") as u64,
        status: TransactionStatus::parse(&status_str).unwrap_or(TransactionStatus::Completed),
        description: r.get("description"),
        created_at: TimeMs::new(r.get("created_at")),
    }
}
