//! Investment routes: deposits, their PIX charge and admin review.

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    routing::{get, post},
};
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use vertice_core::investment::{InvestmentService, service::MAX_EXTERNAL_REF_LEN};
use vertice_core::pix::PixPayload;
use vertice_db::entities::{investments, sea_orm_active_enums::InvestmentStatus};
use vertice_db::repositories::{CreateInvestmentInput, InvestmentFilter, InvestmentRepository};
use vertice_shared::AppError;
use vertice_shared::types::cents_to_decimal;

use super::{PageQuery, page_request};
use crate::{
    AppState,
    error::ApiError,
    middleware::{AdminUser, AuthUser},
};

/// Maximum length of a BR Code transaction id.
const MAX_TXID_LEN: usize = 25;

/// Creates client investment routes.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/investments", get(list_own).post(create_investment))
        .route("/investments/{id}/pix", get(pix_charge))
}

/// Creates admin investment routes.
pub fn admin_routes() -> Router<AppState> {
    Router::new()
        .route("/admin/investments", get(list_all))
        .route("/admin/investments/{id}/approve", post(approve))
        .route("/admin/investments/{id}/reject", post(reject))
}

// ============================================================================
// Request/Response Types
// ============================================================================

/// Request body for registering a deposit.
#[derive(Debug, Deserialize)]
pub struct CreateInvestmentRequest {
    /// Amount in currency units.
    pub amount: Decimal,
    /// Payment reference.
    pub external_ref: Option<String>,
}

/// Query for the admin listing.
#[derive(Debug, Deserialize)]
pub struct ListInvestmentsQuery {
    /// Filter by status.
    pub status: Option<InvestmentStatus>,
    /// Filter by owner.
    pub user_id: Option<Uuid>,
    /// Page number.
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

/// Request body for approving a deposit.
#[derive(Debug, Default, Deserialize)]
pub struct ApproveInvestmentRequest {
    /// Settlement timestamp; keeps the stored one when absent.
    pub paid_at: Option<DateTime<Utc>>,
    /// Payment reference; keeps the stored one when absent.
    pub external_ref: Option<String>,
}

/// An investment with its amount in currency units.
#[derive(Debug, Serialize)]
pub struct InvestmentView {
    /// Stored row.
    #[serde(flatten)]
    pub investment: investments::Model,
    /// `amount_cents` as a decimal.
    pub amount: Decimal,
}

impl From<investments::Model> for InvestmentView {
    fn from(investment: investments::Model) -> Self {
        let amount = cents_to_decimal(investment.amount_cents);
        Self { investment, amount }
    }
}

/// A BR Code the client can paste into their banking app.
#[derive(Debug, Serialize)]
pub struct PixChargeView {
    /// Investment being paid.
    pub investment_id: Uuid,
    /// "Copia e cola" payload.
    pub code: String,
    /// Amount embedded in the code.
    pub amount: Decimal,
    /// Transaction id embedded in the code.
    pub txid: String,
}

// ============================================================================
// Handlers
// ============================================================================

/// GET `/investments` - The caller's deposits.
async fn list_own(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<PageQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = InvestmentFilter {
        owner: Some(auth.user_id()),
        status: None,
    };

    let repo = InvestmentRepository::new((*state.db).clone());
    let investments = repo.list(&filter, &query.page_request()).await?;

    Ok(Json(investments.map(InvestmentView::from)))
}

/// POST `/investments` - Announce a deposit.
async fn create_investment(
    State(state): State<AppState>,
    auth: AuthUser,
    Json(payload): Json<CreateInvestmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let amount_cents = InvestmentService::parse_amount(payload.amount)?;
    if payload
        .external_ref
        .as_deref()
        .is_some_and(|r| r.trim().chars().count() > MAX_EXTERNAL_REF_LEN)
    {
        return Err(ApiError::validation(
            "external_ref",
            format!("must be at most {MAX_EXTERNAL_REF_LEN} characters"),
        ));
    }

    let repo = InvestmentRepository::new((*state.db).clone());
    let investment = repo
        .create(
            auth.user_id(),
            CreateInvestmentInput {
                amount_cents,
                external_ref: payload.external_ref,
            },
        )
        .await?;

    Ok((StatusCode::CREATED, Json(InvestmentView::from(investment))))
}

/// GET `/investments/{id}/pix` - BR Code for paying a deposit.
///
/// Visible to the owner and to admins.
async fn pix_charge(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InvestmentRepository::new((*state.db).clone());
    let investment = repo
        .find_by_id(id)
        .await?
        .filter(|inv| auth.is_admin() || inv.user_id == auth.user_id())
        .ok_or(AppError::NotFound {
            resource: "investment",
            id,
        })?;

    let txid: String = investment
        .id
        .simple()
        .to_string()
        .chars()
        .take(MAX_TXID_LEN)
        .collect();
    let payload = PixPayload {
        key: state.pix.key.clone(),
        merchant_name: state.pix.merchant_name.clone(),
        merchant_city: state.pix.merchant_city.clone(),
        amount_cents: Some(investment.amount_cents),
        txid: Some(txid.clone()),
        description: None,
    };
    let code = payload.encode()?;

    Ok(Json(PixChargeView {
        investment_id: investment.id,
        code,
        amount: cents_to_decimal(investment.amount_cents),
        txid,
    }))
}

/// GET `/admin/investments` - All deposits.
async fn list_all(
    State(state): State<AppState>,
    _admin: AdminUser,
    Query(query): Query<ListInvestmentsQuery>,
) -> Result<impl IntoResponse, ApiError> {
    let filter = InvestmentFilter {
        owner: query.user_id,
        status: query.status,
    };
    let page = page_request(query.page, query.per_page);

    let repo = InvestmentRepository::new((*state.db).clone());
    let investments = repo.list(&filter, &page).await?;

    Ok(Json(investments.map(InvestmentView::from)))
}

/// POST `/admin/investments/{id}/approve`
async fn approve(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<ApproveInvestmentRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InvestmentRepository::new((*state.db).clone());
    let investment = repo
        .approve(id, admin.user_id(), payload.paid_at, payload.external_ref)
        .await?;

    Ok(Json(InvestmentView::from(investment)))
}

/// POST `/admin/investments/{id}/reject`
async fn reject(
    State(state): State<AppState>,
    admin: AdminUser,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse, ApiError> {
    let repo = InvestmentRepository::new((*state.db).clone());
    let investment = repo.reject(id, admin.user_id()).await?;

    Ok(Json(InvestmentView::from(investment)))
}
