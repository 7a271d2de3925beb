use axum::extract::{Query, State};
use axum::Json;
use serde::{Deserialize, Serialize};

use crate::api::AppState;
use crate::domain::Transaction;
use crate::error::AppError;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsQuery {
    pub actor_id: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionsResponse {
    pub count: usize,
    pub transactions: Vec<Transaction>,
}

/// Audit listing for one actor, in creation order.
pub async fn get_transactions(
    Query(params): Query<TransactionsQuery>,
    State(state): State<AppState>,
) -> Result<Json<TransactionsResponse>, AppError> {
    if params.actor_id.trim().is_empty() {
        return Err(AppError::BadRequest("actorId is required".into()));
    }

    let transactions = state.repo.list_transactions(&params.actor_id).await?;

    Ok(Json(TransactionsResponse {
        count: transactions.len(),
        transactions,
    }))
}
