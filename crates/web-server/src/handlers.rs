use crate::{
    error::ApiError,
    params::{
        DailyParams, TopUsersParams, TransactionLimitParams, TransactionListParams,
        UserListParams,
    },
    responses::{
        DailySummary, HealthResponse, SuspiciousTransaction, TopUser, TransactionResponse,
        TransactionSummary, UserResponse, UserStats,
    },
    AppState,
};
use axum::{
    extract::{Path, Query, State},
    Json,
};
use database::repository;
use std::sync::Arc;

// Each handler follows the same lifecycle: validate parameters first (no
// storage is touched when they are rejected), check out one pooled
// connection, run the query, map rows into the public shape. The connection
// returns to the pool when `conn` drops, on every exit path.

/// # GET /health
/// Runs a no-op query on a freshly acquired connection and reports the result.
pub async fn health(State(state): State<Arc<AppState>>) -> Result<Json<HealthResponse>, ApiError> {
    let mut conn = state.db.acquire().await?;
    repository::ping(&mut conn).await?;
    Ok(Json(HealthResponse {
        status: "healthy",
        database: "connected",
    }))
}

/// # GET /users
pub async fn list_users(
    State(state): State<Arc<AppState>>,
    Query(params): Query<UserListParams>,
) -> Result<Json<Vec<UserResponse>>, ApiError> {
    let (skip, limit) = params.validate()?;
    let mut conn = state.db.acquire().await?;
    let rows = repository::list_users(&mut conn, skip, limit).await?;
    Ok(Json(rows.into_iter().map(UserResponse::from).collect()))
}

/// # GET /users/:user_id
pub async fn get_user(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
) -> Result<Json<UserResponse>, ApiError> {
    let mut conn = state.db.acquire().await?;
    let row = repository::get_user(&mut conn, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    Ok(Json(UserResponse::from(row)))
}

/// # GET /users/:user_id/transactions
pub async fn user_transactions(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
    Query(params): Query<TransactionLimitParams>,
) -> Result<Json<Vec<TransactionResponse>>, ApiError> {
    let limit = params.validate()?;
    let mut conn = state.db.acquire().await?;
    let rows = repository::list_user_transactions(&mut conn, user_id, limit).await?;
    Ok(Json(rows.into_iter().map(TransactionResponse::from).collect()))
}

/// # GET /transactions
pub async fn list_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TransactionListParams>,
) -> Result<Json<Vec<TransactionResponse>>, ApiError> {
    let (skip, limit) = params.validate()?;
    let mut conn = state.db.acquire().await?;
    let rows =
        repository::list_transactions(&mut conn, skip, limit, params.pending, params.paid).await?;
    Ok(Json(rows.into_iter().map(TransactionResponse::from).collect()))
}

/// # GET /transactions/summary
pub async fn transaction_summary(
    State(state): State<Arc<AppState>>,
) -> Result<Json<TransactionSummary>, ApiError> {
    let mut conn = state.db.acquire().await?;
    let row = repository::transaction_summary(&mut conn).await?;
    Ok(Json(TransactionSummary::from(row)))
}

/// # GET /transactions/user/:user_id/stats
pub async fn user_stats(
    State(state): State<Arc<AppState>>,
    Path(user_id): Path<i32>,
) -> Result<Json<UserStats>, ApiError> {
    let mut conn = state.db.acquire().await?;
    let row = repository::user_stats(&mut conn, user_id)
        .await?
        .ok_or_else(|| ApiError::NotFound("User not found".to_string()))?;
    Ok(Json(UserStats::from(row)))
}

/// # GET /transactions/daily
pub async fn daily_summary(
    State(state): State<Arc<AppState>>,
    Query(params): Query<DailyParams>,
) -> Result<Json<Vec<DailySummary>>, ApiError> {
    let days = params.validate()?;
    let mut conn = state.db.acquire().await?;
    let rows = repository::daily_summary(&mut conn, days).await?;
    Ok(Json(rows.into_iter().map(DailySummary::from).collect()))
}

/// # GET /transactions/pending
pub async fn pending_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TransactionLimitParams>,
) -> Result<Json<Vec<TransactionResponse>>, ApiError> {
    let limit = params.validate()?;
    let mut conn = state.db.acquire().await?;
    let rows = repository::pending_transactions(&mut conn, limit).await?;
    Ok(Json(rows.into_iter().map(TransactionResponse::from).collect()))
}

/// # GET /transactions/unpaid
pub async fn unpaid_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TransactionLimitParams>,
) -> Result<Json<Vec<TransactionResponse>>, ApiError> {
    let limit = params.validate()?;
    let mut conn = state.db.acquire().await?;
    let rows = repository::unpaid_transactions(&mut conn, limit).await?;
    Ok(Json(rows.into_iter().map(TransactionResponse::from).collect()))
}

/// # GET /reports/top-users
pub async fn top_users(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TopUsersParams>,
) -> Result<Json<Vec<TopUser>>, ApiError> {
    let limit = params.validate()?;
    let mut conn = state.db.acquire().await?;
    let rows = repository::top_users(&mut conn, limit).await?;
    Ok(Json(rows.into_iter().map(TopUser::from).collect()))
}

/// # GET /reports/suspicious-transactions
pub async fn suspicious_transactions(
    State(state): State<Arc<AppState>>,
    Query(params): Query<TransactionLimitParams>,
) -> Result<Json<Vec<SuspiciousTransaction>>, ApiError> {
    let limit = params.validate()?;
    let mut conn = state.db.acquire().await?;
    let rows = repository::suspicious_transactions(&mut conn, limit).await?;
    Ok(Json(rows.into_iter().map(SuspiciousTransaction::from).collect()))
}
