//! The enrollment ledger: at most one row per (student, subject).

use super::{Repository, Tx};
use crate::domain::{Enrollment, StudentId, SubjectId, TimeMs};
use sqlx::Row;

impl Repository {
    /// Read-only enrollment check, used by collaborators to gate their own
    /// preconditions.
    pub async fn is_enrolled(
        &self,
        student_id: &StudentId,
        subject_id: &SubjectId,
    ) -> Result<bool, sqlx::Error> {
        let row = sqlx::query(
            "SELECT 1 FROM enrollments WHERE student_id = ? AND subject_id = ?",
        )
        .bind(student_id.as_str())
        .bind(subject_id.as_str())
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.is_some())
    }

    /// Enrollment check within the purchase transaction.
    pub async fn is_enrolled_tx(
        &self,
        tx: &mut Tx<'_>,
        student_id: &StudentId,
        subject_id: &SubjectId,
    ) -> Result<bool, sqlx::Error> {
        let row = sqlx::query(
            "SELECT 1 FROM enrollments WHERE student_id = ? AND subject_id = ?",
        )
        .bind(student_id.as_str())
        .bind(subject_id.as_str())
        .fetch_optional(&mut **tx)
        .await?;

        Ok(row.is_some())
    }

    /// Insert an enrollment with `progress = 0`.
    ///
    /// Returns `false` when the pair already exists (`ON CONFLICT DO
    /// NOTHING`), which the purchase engine treats as a concurrent buy and
    /// rolls back on.
    pub async fn insert_enrollment(
        &self,
        tx: &mut Tx<'_>,
        student_id: &StudentId,
        subject_id: &SubjectId,
        enrolled_at: TimeMs,
    ) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO enrollments (student_id, subject_id, enrolled_at, progress)
            VALUES (?, ?, ?, 0)
            ON CONFLICT(student_id, subject_id) DO NOTHING
            "#,
        )
        .bind(student_id.as_str())
        .bind(subject_id.as_str())
        .bind(enrolled_at.as_ms())
        .execute(&mut **tx)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    /// List a student's enrollments in enrollment order.
    pub async fn list_enrollments(
        &self,
        student_id: &StudentId,
    ) -> Result<Vec<Enrollment>, sqlx::Error> {
        let rows = sqlx::query(
            r#"
            SELECT student_id, subject_id, enrolled_at, progress
            FROM enrollments
            WHERE student_id = ?
            ORDER BY enrolled_at ASC, id ASC
            "#,
        )
        .bind(student_id.as_str())
        .fetch_all(&self.pool)
        .await?;

        let enrollments = rows
            .iter()
            .map(|r| Enrollment {
                student_id: StudentId::new(r.get("student_id")),
                subject_id: SubjectId::new(r.get("subject_id")),
                enrolled_at: TimeMs::new(r.get("enrolled_at")),
                progress: r.get("progress"),
            })
            .collect();

        Ok(enrollments)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::migrations::init_db;
    use tempfile::TempDir;

    async fn setup_test_db() -> (Repository, TempDir) {
        let temp_dir = TempDir::new().unwrap();
        let db_path = temp_dir
            .path()
            .join("test.db")
            .to_string_lossy()
            .to_string();
        let pool = init_db(&db_path).await.expect("init_db failed");
        (Repository::new(pool), temp_dir)
    }

    #[tokio::test]
    async fn test_enroll_and_query() {
        let (repo, _temp) = setup_test_db().await;

        let student = StudentId::new("s-1".to_string());
        let subject = SubjectId::new("sub-1".to_string());

        assert!(!repo.is_enrolled(&student, &subject).await.unwrap());

        let mut tx = repo.begin().await.unwrap();
        let inserted = repo
            .insert_enrollment(&mut tx, &student, &subject, TimeMs::new(1000))
            .await
            .unwrap();
        assert!(inserted);
        tx.commit().await.unwrap();

        assert!(repo.is_enrolled(&student, &subject).await.unwrap());

        let list = repo.list_enrollments(&student).await.unwrap();
        assert_eq!(list.len(), 1);
        assert_eq!(list[0].progress, 0);
        assert_eq!(list[0].enrolled_at, TimeMs::new(1000));
    }

    #[tokio::test]
    async fn test_duplicate_enrollment_ignored() {
        let (repo, _temp) = setup_test_db().await;

        let student = StudentId::new("s-1".to_string());
        let subject = SubjectId::new("sub-1".to_string());

        let mut tx = repo.begin().await.unwrap();
        assert!(repo
            .insert_enrollment(&mut tx, &student, &subject, TimeMs::new(1000))
            .await
            .unwrap());
        assert!(!repo
            .insert_enrollment(&mut tx, &student, &subject, TimeMs::new(2000))
            .await
            .unwrap());
        tx.commit().await.unwrap();

        let list = repo.list_enrollments(&student).await.unwrap();
        assert_eq!(list.len(), 1);
    }

    #[tokio::test]
    async fn test_rollback_leaves_no_enrollment() {
        let (repo, _temp) = setup_test_db().await;

        let student = StudentId::new("s-1".to_string());
        let subject = SubjectId::new("sub-1".to_string());

        {
            let mut tx = repo.begin().await.unwrap();
            repo.insert_enrollment(&mut tx, &student, &subject, TimeMs::new(1000))
                .await
                .unwrap();
            // dropped without commit
        }

        assert!(!repo.is_enrolled(&student, &subject).await.unwrap());
    }
}
