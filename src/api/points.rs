use axum::extract::State;
use axum::Json;
use rust_decimal::Decimal;
use serde::Deserialize;

use crate::api::AppState;
use crate::domain::Transaction;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TopUpRequest {
    pub actor_id: String,
    pub euro_amount: Decimal,
}

pub async fn purchase_points(
    State(state): State<AppState>,
    Json(req): Json<TopUpRequest>,
) -> Result<Json<Transaction>, AppError> {
    if req.actor_id.trim().is_empty() {
        return Err(AppError::BadRequest("actorId is required".into()));
    }

    let txn = state
        .engine
        .purchase_points(&req.actor_id, req.euro_amount)
        .await?;

    Ok(Json(txn))
}
