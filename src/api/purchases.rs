use axum::extract::State;
use axum::Json;
use serde::Deserialize;

use crate::api::AppState;
use crate::domain::{StudentId, SubjectId, Transaction};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PurchaseRequest {
    pub student_id: String,
    pub subject_id: String,
}

pub async fn purchase_subject(
    State(state): State<AppState>,
    Json(req): Json<PurchaseRequest>,
) -> Result<Json<Transaction>, AppError> {
    if req.student_id.trim().is_empty() || req.subject_id.trim().is_empty() {
        return Err(AppError::BadRequest(
            "studentId and subjectId are required".into(),
        ));
    }

    let txn = state
        .engine
        .purchase_subject(
            &StudentId::new(req.student_id),
            &SubjectId::new(req.subject_id),
        )
        .await?;

    Ok(Json(txn))
}
