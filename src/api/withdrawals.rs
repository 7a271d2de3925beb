use axum::extract::{Path, State};
use axum::Json;
use serde::Deserialize;

use crate::api::AppState;
use crate::domain::{TeacherId, Transaction, TransactionStatus};
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WithdrawalRequest {
    pub teacher_id: String,
    pub amount: u64,
}

pub async fn request_withdrawal(
    State(state): State<AppState>,
    Json(req): Json<WithdrawalRequest>,
) -> Result<Json<Transaction>, AppError> {
    if req.teacher_id.trim().is_empty() {
        return Err(AppError::BadRequest("teacherId is required".into()));
    }

    let txn = state
        .engine
        .request_withdrawal(&TeacherId::new(req.teacher_id), req.amount)
        .await?;

    Ok(Json(txn))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SettleRequest {
    pub outcome: String,
}

pub async fn settle_withdrawal(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Json(req): Json<SettleRequest>,
) -> Result<Json<Transaction>, AppError> {
    let outcome = TransactionStatus::parse(&req.outcome).ok_or_else(|| {
        AppError::BadRequest(format!(
            "invalid outcome {:?}, expected COMPLETED, FAILED, or CANCELLED",
            req.outcome
        ))
    })?;

    let txn = state.engine.settle_withdrawal(id, outcome).await?;
    Ok(Json(txn))
}
