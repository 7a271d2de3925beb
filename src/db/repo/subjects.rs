//! Subject read model, sales statistics, and teacher assignment.

use super::{Repository, Tx};
use crate::domain::{
    AssignedTeacher, Subject, SubjectId, SubjectStats, SubjectStatus, TeacherId, TimeMs,
};
use sqlx::Row;

impl Repository {
    /// Create a subject. Fails on a duplicate name (UNIQUE constraint).
    pub async fn create_subject(
        &self,
        id: &SubjectId,
        name: &str,
        description: &str,
        price: u64,
        status: SubjectStatus,
    ) -> Result<Subject, sqlx::Error> {
        sqlx::query(
            r#"
            INSERT INTO subjects (id, name, description, price, status)
            VALUES (?, ?, ?, ?, ?)
            "#,
        )
        .bind(id.as_str())
        .bind(name)
        .bind(description)
        .bind(price as i64)
        .bind(status.as_str())
        .execute(&self.pool)
        .await?;

        Ok(Subject {
            id: id.clone(),
            name: name.to_string(),
            description: description.to_string(),
            price,
            status,
            assigned_teachers: Vec::new(),
            stats: SubjectStats::default(),
        })
    }

    /// Check whether a subject name is already taken.
    pub async fn subject_name_exists(&self, name: &str) -> Result<bool, sqlx::Error> {
        let row = sqlx::query("SELECT 1 FROM subjects WHERE name = ?")
            .bind(name)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.is_some())
    }

    /// Load a subject with its assigned teachers, in assignment order.
    pub async fn get_subject(&self, id: &SubjectId) -> Result<Option<Subject>, sqlx::Error> {
        let mut conn = self.pool.acquire().await?;
        get_subject_inner(&mut conn, id).await
    }

    /// Load a subject with its assigned teachers within a transaction.
    pub async fn get_subject_tx(
        &self,
        tx: &mut Tx<'_>,
        id: &SubjectId,
    ) -> Result<Option<Subject>, sqlx::Error> {
        get_subject_inner(&mut **tx, id).await
    }

    /// Assign a teacher to a subject at the next position.
    ///
    /// Returns `false` if the teacher is already assigned. Bumps
    /// `teachers_count` in the same transaction.
    pub async fn assign_teacher(
        &self,
        subject_id: &SubjectId,
        teacher_id: &TeacherId,
        assigned_at: TimeMs,
    ) -> Result<bool, sqlx::Error> {
        let mut tx = self.pool.begin().await?;

        let result = sqlx::query(
            r#"
            INSERT INTO subject_teachers (subject_id, teacher_id, position, assigned_at)
            SELECT ?, ?, COALESCE(MAX(position) + 1, 0), ?
            FROM subject_teachers
            WHERE subject_id = ?
            ON CONFLICT(subject_id, teacher_id) DO NOTHING
            "#,
        )
        .bind(subject_id.as_str())
        .bind(teacher_id.as_str())
        .bind(assigned_at.as_ms())
        .bind(subject_id.as_str())
        .execute(&mut *tx)
        .await?;

        if result.rows_affected() == 0 {
            return Ok(false);
        }

        sqlx::query("UPDATE subjects SET teachers_count = teachers_count + 1 WHERE id = ?")
            .bind(subject_id.as_str())
            .execute(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(true)
    }

    /// Apply the per-sale statistics increments inside the purchase
    /// transaction. Atomic SQL increments, never read-modify-write.
    pub async fn bump_sale_stats(
        &self,
        tx: &mut Tx<'_>,
        id: &SubjectId,
        price: u64,
    ) -> Result<(), sqlx::Error> {
        sqlx::query(
            r#"
            UPDATE subjects
            SET total_sales = total_sales + 1,
                revenue = revenue + ?,
                students_enrolled = students_enrolled + 1
            WHERE id = ?
            "#,
        )
        .bind(price as i64)
        .bind(id.as_str())
        .execute(&mut **tx)
        .await?;

        Ok(())
    }
}

async fn get_subject_inner(
    conn: &mut sqlx::SqliteConnection,
    id: &SubjectId,
) -> Result<Option<Subject>, sqlx::Error> {
    let row = sqlx::query(
        r#"
        SELECT id, name, description, price, status,
               total_sales, revenue, students_enrolled, teachers_count
        FROM subjects
        WHERE id = ?
        "#,
    )
    .bind(id.as_str())
    .fetch_optional(&mut *conn)
    .await?;

    let Some(row) = row else {
        return Ok(None);
    };

    let teacher_rows = sqlx::query(
        r#"
        SELECT teacher_id, position, assigned_at
        FROM subject_teachers
        WHERE subject_id = ?
        ORDER BY position ASC
        "#,
    )
    .bind(id.as_str())
    .fetch_all(&mut *conn)
    .await?;

    let assigned_teachers = teacher_rows
        .iter()
        .map(|r| AssignedTeacher {
            teacher_id: TeacherId::new(r.get("teacher_id")),
            position: r.get("position"),
            assigned_at: TimeMs::new(r.get("assigned_at")),
        })
        .collect();

    let status_str: String = row.get("status");
    let status = SubjectStatus::parse(&status_str).unwrap_or(SubjectStatus::Inactive);

    Ok(Some(Subject {
        id: SubjectId::new(row.get("id")),
        name: row.get("name"),
        description: row.get("description"),
        price: row.get::<i64, _>("price") as u64,
        status,
        assigned_teachers,
        stats: SubjectStats {
            total_sales: row.get("total_sales"),
            revenue: row.get("revenue"),
            students_enrolled: row.get("students_enrolled"),
            teachers_count: row.get("teachers_count"),
        },
    }))
}
