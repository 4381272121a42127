//! API route definitions.

use axum::{Router, middleware};
use serde::Deserialize;
use vertice_shared::types::PageRequest;

use crate::{AppState, middleware::auth::auth_middleware};

pub mod distributions;
pub mod health;
pub mod investments;
pub mod notifications;
pub mod result_ledger;
pub mod withdrawals;

/// Creates the API router with protected routes that need state for middleware.
///
/// Admin routes sit behind the same authentication layer; their handlers
/// require [`AdminUser`](crate::middleware::AdminUser).
#[allow(clippy::needless_pass_by_value)]
pub fn api_routes_with_state(state: AppState) -> Router<AppState> {
    let protected_routes = Router::new()
        .merge(withdrawals::routes())
        .merge(investments::routes())
        .merge(notifications::routes())
        .merge(withdrawals::admin_routes())
        .merge(investments::admin_routes())
        .merge(result_ledger::admin_routes())
        .merge(distributions::admin_routes())
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ));

    Router::new()
        .merge(health::routes())
        .merge(protected_routes)
}

/// `page` / `per_page` query parameters.
///
/// Declared field by field in each query struct: `serde(flatten)` does not
/// survive urlencoded numbers.
#[derive(Debug, Default, Deserialize)]
pub struct PageQuery {
    /// Page number, 1-indexed.
    pub page: Option<u32>,
    /// Items per page.
    pub per_page: Option<u32>,
}

impl PageQuery {
    /// Builds a page request with defaults for missing values.
    #[must_use]
    pub fn page_request(&self) -> PageRequest {
        page_request(self.page, self.per_page)
    }
}

pub(crate) fn page_request(page: Option<u32>, per_page: Option<u32>) -> PageRequest {
    let default = PageRequest::default();
    PageRequest {
        page: page.unwrap_or(default.page),
        per_page: per_page.unwrap_or(default.per_page),
    }
}
