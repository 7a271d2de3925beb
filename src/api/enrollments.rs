use axum::extract::{Query, State};
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::{Enrollment, StudentId, SubjectId};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentQuery {
    pub student_id: String,
    pub subject_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentResponse {
    pub enrolled: bool,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentListResponse {
    pub count: usize,
    pub enrollments: Vec<Enrollment>,
}

/// Enrollment lookup, used by progress/rating collaborators to gate their
/// own preconditions.
///
/// With `subjectId` this is a point check for one pair; without it, the
/// student's full enrollment list in enrollment order.
pub async fn get_enrollment(
    Query(params): Query<EnrollmentQuery>,
    State(state): State<AppState>,
) -> Result<Response, AppError> {
    let student_id = StudentId::new(params.student_id);

    match params.subject_id {
        Some(subject_id) => {
            let enrolled = state
                .repo
                .is_enrolled(&student_id, &SubjectId::new(subject_id))
                .await?;
            Ok(Json(EnrollmentResponse { enrolled }).into_response())
        }
        None => {
            let enrollments = state.repo.list_enrollments(&student_id).await?;
            Ok(Json(EnrollmentListResponse {
                count: enrollments.len(),
                enrollments,
            })
            .into_response())
        }
    }
}
