//! Withdrawal routes: client requests and the admin review queue.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use serde_json::json;
use uuid::Uuid;

use vertice_core::withdrawal::{WithdrawalInput, WithdrawalService, WithdrawalType};
use vertice_db::entities::sea_orm_active_enums::{
    WithdrawalStatus as DbWithdrawalStatus, WithdrawalType as DbWithdrawalType,
};
use vertice_db::repositories::{BalanceRepository, WithdrawalFilter, WithdrawalRepository};

use super::page_request;
use crate::{
    AppState,
    error::ApiError,
    middleware::{AdminUser, AuthUser},
};

/// Creates client withdrawal routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/withdrawals", get(list_own).post(create_withdrawal))
        .route("/withdrawals/summary", get(summary))
}

/// Creates admin withdrawal routes.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/withdrawals", get(list_all))
        .route("/admin/withdrawals/{id}/approve", post(approve))
        .route("/admin/withdrawals/{id}/reject", post(reject))
        .route("/admin/withdrawals/{id}/pay", post(pay))
}

// ============================================================================
// Request Types
// ============================================================================

/// Query for the balance summary.
#[derive(Debug, Deserialize)]
pub struct SummaryQuery {
    /// Date to evaluate capital at; today when absent.
    pub scheduled_for: Option<NaiveDate>,
}

/// Request body for a new withdrawal.
#[derive(Debug, Deserialize)]
pub struct CreateWithdrawalRequest {
    /// `CAPITAL_REDEMPTION` or `RESULT_SETTLEMENT`.
    pub withdrawal_type: String,
    /// Amount in currency units, e.g. `"150.00"`.
    pub amount: Decimal,
    /// Required for capital redemptions.
    pub scheduled_for: Option<NaiveDate>,
    /// Destination PIX key.
    #[serde(default)]
    pub pix_key: String,
}

/// Query for the admin listing.
#[derive(Debug, Deserialize)]
pub struct ListWithdrawalsQuery {
    /// Filter by status.
    pub status: Option<DbWithdrawalStatus>,
    /// Filter by type.
    pub withdrawal_type: Option<DbWithdrawalType>,
    /// Filter by owner.
    pub user_id: Option<Uuid>,
    /// Page number.
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

/// Request body for rejecting a withdrawal.
#[derive(Debug, Deserialize)]
pub struct RejectWithdrawalRequest {
    /// Reason shown to the client.
    #[serde(default)]
    pub rejection_reason: String,
    /// Internal note.
    pub admin_note: Option<String>,
}

/// Request body for marking a withdrawal as paid.
#[derive(Debug, Default, Deserialize)]
pub struct PayWithdrawalRequest {
    /// Payout reference, e.g. the PIX end-to-end id.
    pub external_ref: Option<String>,
    /// Internal note.
    pub admin_note: Option<String>,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET `/withdrawals/summary` - Balances for the caller.
///
/// Reports zeros when the store cannot be read.
async fn summary(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<SummaryQuery>,
) -> impl IntoResponse {
    let today = state.engine.calendar().today();
    let reference_date = WithdrawalService::view_reference_date(query.scheduled_for, today);

    let repo = BalanceRepository::new((*state.db).clone(), state.engine);
    let snapshot = repo.compute(auth.user_id(), reference_date).await;

    Json(snapshot)
}

/// GET `/withdrawals` - The caller's requests with availability at each request's date.
async fn list_own(
    State(state): State<AppState>,
    auth: AuthUser,
) -> Result<impl IntoResponse, ApiError> {
    let repo = WithdrawalRepository::new((*state.db).clone(), state.engine);
    let withdrawals = repo.list_for_owner(auth.user_id()).await?;

    Ok(Json(json!({ "withdrawals": withdrawals })))
}

/// POST `/withdrawals` - Request a withdrawal.
async fn create_withdrawal(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateWithdrawalRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let Some(withdrawal_type) = WithdrawalType::parse(&payload.withdrawal_type) else {
        return Err(ApiError::validation(
            "withdrawal_type",
            "withdrawal_type must be CAPITAL_REDEMPTION or RESULT_SETTLEMENT",
        ));
    };
    let amount_cents = WithdrawalService::parse_amount(payload.amount)?;

    let repo = WithdrawalRepository::new((*state.db).clone(), state.engine);
    let withdrawal = repo
        .create(
            auth.user_id(),
            WithdrawalInput {
                withdrawal_type,
                amount_cents,
                scheduled_for: payload.scheduled_for,
                pix_key: payload.pix_key,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(withdrawal)))
}

/// GET `/admin/withdrawals` - Review queue.
async fn list_all(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<ListWithdrawalsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = WithdrawalFilter {
        status: query.status,
        withdrawal_type: query.withdrawal_type,
        owner: query.user_id,
    };
    let page = page_request(query.page, query.per_page);

    let repo = WithdrawalRepository::new((*state.db).clone(), state.engine);
    let withdrawals = repo.list(&filter, &page).await?;

    Ok(Json(withdrawals))
}

/// POST `/admin/withdrawals/{id}/approve`
async fn approve(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = WithdrawalRepository::new((*state.db).clone(), state.engine);
    let withdrawal = repo.approve(id, admin.user_id()).await?;

    Ok(Json(withdrawal))
}

/// POST `/admin/withdrawals/{id}/reject`
async fn reject(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<RejectWithdrawalRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = WithdrawalRepository::new((*state.db).clone(), state.engine);
    let withdrawal = repo
        .reject(
            id,
            admin.user_id(),
            &payload.rejection_reason,
            payload.admin_note,
        )
        .await?;

    Ok(Json(withdrawal))
}

/// POST `/admin/withdrawals/{id}/pay`
async fn pay(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<PayWithdrawalRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = WithdrawalRepository::new((*state.db).clone(), state.engine);
    let withdrawal = repo
        .pay(id, admin.user_id(), payload.external_ref, payload.admin_note)
        .await?;

    Ok(Json(withdrawal))
}
