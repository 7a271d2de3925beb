pub mod admin;
pub mod enrollments;
pub mod health;
pub mod points;
pub mod purchases;
pub mod transactions;
pub mod withdrawals;

use crate::config::Config;
use crate::db::Repository;
use crate::engine::LedgerEngine;
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};

#[derive(Clone)]
pub struct AppState {
    pub repo: Arc<Repository>,
    pub config: Config,
    pub engine: Arc<LedgerEngine>,
}

impl AppState {
    pub fn new(repo: Arc<Repository>, config: Config, engine: Arc<LedgerEngine>) -> Self {
        Self {
            repo,
            config,
            engine,
        }
    }
}

pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health::health))
        .route("/ready", get(health::ready))
        .route("/v1/purchases", post(purchases::purchase_subject))
        .route("/v1/points/topup", post(points::purchase_points))
        .route("/v1/withdrawals", post(withdrawals::request_withdrawal))
        .route(
            "/v1/withdrawals/:id/settle",
            post(withdrawals::settle_withdrawal),
        )
        .route("/v1/enrollments", get(enrollments::get_enrollment))
        .route("/v1/transactions", get(transactions::get_transactions))
        .route("/v1/students", post(admin::create_student))
        .route("/v1/teachers", post(admin::create_teacher))
        .route("/v1/subjects", post(admin::create_subject))
        .route("/v1/subjects/:id/teachers", post(admin::assign_teacher))
        .layer(cors)
        .with_state(state)
}
