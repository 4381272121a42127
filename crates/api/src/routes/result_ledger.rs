//! Admin routes for the result ledger.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use vertice_core::ledger::{EntryDirection, ManualEntryInput};
use vertice_db::repositories::{ResultLedgerFilter, ResultLedgerRepository};

use super::page_request;
use crate::{AppState, error::ApiError, middleware::AdminUser};

/// Creates result ledger routes.
pub fn admin_routes() -> Router<AppState> {
    Router::new().route("/admin/result-ledger", get(list_entries).post(create_entry))
}

/// Query for listing entries.
#[derive(Debug, Deserialize)]
pub struct ListEntriesQuery {
    /// Filter by owner.
    pub user_id: Option<Uuid>,
    /// Filter by external reference, e.g. `perf-2026-06-01`.
    pub external_ref: Option<String>,
    /// Page number.
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

/// Request body for a manual adjustment.
#[derive(Debug, Deserialize)]
pub struct CreateEntryRequest {
    /// Owner whose result changes.
    pub user_id: Uuid,
    /// `CREDIT` or `DEBIT`.
    pub direction: EntryDirection,
    /// Unsigned amount in currency units.
    pub amount: Decimal,
    /// Reason for the adjustment.
    #[serde(default)]
    pub description: String,
    /// Optional reference.
    pub external_ref: Option<String>,
}

/// GET `/admin/result-ledger`
async fn list_entries(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<ListEntriesQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = ResultLedgerFilter {
        owner: query.user_id,
        external_ref: query.external_ref,
    };
    let page = page_request(query.page, query.per_page);

    let repo = ResultLedgerRepository::new((*state.db).clone());
    let entries = repo.list(&filter, &page).await?;

    Ok(Json(entries))
}

/// POST `/admin/result-ledger` - Credit or debit an owner's result.
async fn create_entry(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(payload): Json<CreateEntryRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let input = ManualEntryInput {
        direction: payload.direction,
        amount: payload.amount,
        description: payload.description,
        external_ref: payload.external_ref,
    };

    let repo = ResultLedgerRepository::new((*state.db).clone());
    let entry = repo
        .create_manual(payload.user_id, input, admin.user_id())
        .await?;

    Ok((StatusCode::CREATED, Json(entry)))
}
