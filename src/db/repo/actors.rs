//! Account and balance-store operations.

use super::{Repository, Tx};
use crate::domain::{Actor, StudentAccount, StudentId, TeacherAccount, TeacherId, TimeMs};
use sqlx::Row;

impl Repository {
    /// Create a student account seeded with the signup credit.
    ///
    /// # Errors
    /// Returns an error if the insert fails (including duplicate ids).
    pub async fn create_student(
        &self,
        id: &StudentId,
        signup_credit: u64,
        created_at: TimeMs,
    ) -> Result<StudentAccount, sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO actors (id, role, credit, created_at)
            VALUES (?, 'STUDENT', ?, ?)
            "#,
        )
        .bind(id.as_str())
        .bind(signup_credit as i64)
        .bind(created_at.as_ms())
        .execute(&self.pool)
        .await?;

        Ok(StudentAccount {
            id: id.clone(),
            credit: signup_credit,
            created_at,
        })
    }

    /// Create a teacher account with zeroed balances.
    pub async fn create_teacher(
        &self,
        id: &TeacherId,
        created_at: TimeMs,
    ) -> Result<TeacherAccount, sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO actors (id, role, credit, total_earnings, withdrawable, created_at)
            VALUES (?, 'TEACHER', 0, 0, 0, ?)
            "#,
        )
        .bind(id.as_str())
        .bind(created_at.as_ms())
        .execute(&self.pool)
        .await?;

        Ok(TeacherAccount {
            id: id.clone(),
            credit: 0,
            total_earnings: 0,
            withdrawable: 0,
            created_at,
        })
    }

    /// Look up any actor by id, discriminated by its role tag.
    pub async fn find_actor(&self, id: &str) -> Result<Option<Actor>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, role, credit, total_earnings, withdrawable, created_at
            FROM actors
            WHERE id = ?
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| actor_from_row(&r)))
    }

    /// Load a student account within a transaction.
    pub async fn get_student_tx(
        &self,
        tx: &mut Tx<'_>,
        id: &StudentId,
    ) -> Result<Option<StudentAccount>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, credit, created_at
            FROM actors
            WHERE id = ? AND role = 'STUDENT'
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&mut **tx)
        .await?;

        Ok(row.map(|r| StudentAccount {
            id: StudentId::new(r.get("id")),
            credit: r.get::<i64, _>("credit") as u64,
            created_at: TimeMs::new(r.get("created_at")),
        }))
    }

    /// Load a teacher account within a transaction.
    pub async fn get_teacher_tx(
        &self,
        tx: &mut Tx<'_>,
        id: &TeacherId,
    ) -> Result<Option<TeacherAccount>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, credit, total_earnings, withdrawable, created_at
            FROM actors
            WHERE id = ? AND role = 'TEACHER'
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&mut **tx)
        .await?;

        Ok(row.map(|r| teacher_from_row(&r)))
    }

    /// Load a teacher account from the pool.
    pub async fn get_teacher(&self, id: &TeacherId) -> Result<Option<TeacherAccount>, sqlx::Error> {
        let row = sqlx::query(
            r#"
            SELECT id, credit, total_earnings, withdrawable, created_at
            FROM actors
            WHERE id = ? AND role = 'TEACHER'
            "#,
        )
        .bind(id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(|r| teacher_from_row(&r)))
    }

    /// Conditionally debit a student's credit.
    ///
    /// Returns `false` (no mutation) when the balance is insufficient. The
    /// `credit >= ?` guard makes the read-check-write a single atomic
    /// statement, so concurrent debits can never overdraw the account.
    pub async fn debit_student_credit(
        &self,
        tx: &mut Tx<'_>,
        id: &StudentId,
        amount: u64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE actors
            SET credit = credit - ?
            WHERE id = ? AND role = 'STUDENT' AND credit >= ?
            "#,
        )
        .bind(amount as i64)
        .bind(id.as_str())
        .bind(amount as i64)
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Credit a teacher's share of a sale: credit, withdrawable, and
    /// lifetime earnings all increase by the share.
    pub async fn credit_teacher_sale(
        &self,
        tx: &mut Tx<'_>,
        id: &TeacherId,
        share: u64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE actors
            SET credit = credit + ?,
                total_earnings = total_earnings + ?,
                withdrawable = withdrawable + ?
            WHERE id = ? AND role = 'TEACHER'
            "#,
        )
        .bind(share as i64)
        .bind(share as i64)
        .bind(share as i64)
        .bind(id.as_str())
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Credit spendable points to a student or teacher account (top-up).
    pub async fn credit_actor(
        &self,
        tx: &mut Tx<'_>,
        id: &str,
        amount: u64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE actors
            SET credit = credit + ?
            WHERE id = ? AND role IN ('STUDENT', 'TEACHER')
            "#,
        )
        .bind(amount as i64)
        .bind(id)
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Conditionally debit a teacher's withdrawable balance.
    ///
    /// Returns `false` (no mutation) when `withdrawable < amount`.
    pub async fn debit_withdrawable(
        &self,
        tx: &mut Tx<'_>,
        id: &TeacherId,
        amount: u64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE actors
            SET withdrawable = withdrawable - ?
            WHERE id = ? AND role = 'TEACHER' AND withdrawable >= ?
            "#,
        )
        .bind(amount as i64)
        .bind(id.as_str())
        .bind(amount as i64)
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Restore a previously debited withdrawable amount (compensation for a
    /// failed or cancelled payout).
    pub async fn restore_withdrawable(
        &self,
        tx: &mut Tx<'_>,
        id: &TeacherId,
        amount: u64,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            UPDATE actors
            SET withdrawable = withdrawable + ?
            WHERE id = ? AND role = 'TEACHER'
            "#,
        )
        .bind(amount as i64)
        .bind(id.as_str())
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}

fn actor_from_row(r: &sqlx::sqlite::SqliteRow) -> Actor {
    let id: String = r.get("id");
    let role_str: String = r.get("role");
    match role_str.as_str() {
        "TEACHER" => Actor::Teacher(teacher_from_row(r)),
        "ADMIN" => Actor::Admin { id },
        _ => Actor::Student(StudentAccount {
            id: StudentId::new(id),
            credit: r.get::<i64, _>("credit") as u64,
            created_at: TimeMs::new(r.get("created_at")),
        }),
    }
}

fn teacher_from_row(r: &sqlx::sqlite::SqliteRow) -> TeacherAccount {
    TeacherAccount {
        id: TeacherId::new(r.get("id")),
        credit: r.get::<i64, _>("credit") as u64,
        total_earnings: r.get::<i64, _>("total_earnings") as u64,
        withdrawable: r.get::<i64, _>("withdrawable") as u64,
        created_at: TimeMs::new(r.get("created_at")),
    }
}
