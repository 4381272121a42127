//! Admin routes for daily performance distribution.

use axum::{
    Json, Router,
    extract::{Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::get,
};
use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::Deserialize;
use uuid::Uuid;

use vertice_core::distribution::DistributionRequest;
use vertice_db::repositories::{DistributionFilter, DistributionRepository};

use super::page_request;
use crate::{AppState, error::ApiError, middleware::AdminUser};

/// Creates distribution routes.
pub fn admin_routes() -> Router<AppState> {
    Router::new().route(
        "/admin/distributions",
        get(list_distributions).post(run_distribution),
    )
}

/// Query for listing distributions.
#[derive(Debug, Deserialize)]
pub struct ListDistributionsQuery {
    /// Filter by owner.
    pub user_id: Option<Uuid>,
    /// Filter by business date.
    pub reference_date: Option<NaiveDate>,
    /// Page number.
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

/// Request body for a distribution run.
#[derive(Debug, Deserialize)]
pub struct RunDistributionRequest {
    /// Business date; today when absent.
    pub reference_date: Option<NaiveDate>,
    /// Daily performance in percent, e.g. `"1.25"`.
    pub performance_percent: Decimal,
    /// Restrict the run to one owner.
    pub user_id: Option<Uuid>,
    /// Note stored on each row.
    pub note: Option<String>,
    /// Batch id; reuse it to retry a failed run.
    pub run_id: Option<Uuid>,
}

/// GET `/admin/distributions`
async fn list_distributions(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<ListDistributionsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = DistributionFilter {
        owner: query.user_id,
        reference_date: query.reference_date,
    };
    let page = page_request(query.page, query.per_page);

    let repo = DistributionRepository::new((*state.db).clone(), state.engine);
    let distributions = repo.list(&filter, &page).await?;

    Ok(Json(distributions))
}

/// POST `/admin/distributions` - Distribute a day's performance.
///
/// Per-owner failures are reported in the body; the run itself succeeds.
async fn run_distribution(
    State(state): State<AppState>,
    admin: AdminUser,
    Json(payload): Json<RunDistributionRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let request = DistributionRequest {
        reference_date: payload.reference_date,
        performance_percent: payload.performance_percent,
        owner: payload.user_id,
        note: payload.note,
        run_id: payload.run_id,
    };

    let repo = DistributionRepository::new((*state.db).clone(), state.engine);
    let report = repo.run(request, admin.user_id()).await?;

    Ok((StatusCode::CREATED, Json(report)))
}
