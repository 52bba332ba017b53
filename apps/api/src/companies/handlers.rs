use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::auth::CurrentOperator;
use crate::clients::hq::{Company, CompanyPage};
use crate::errors::AppError;
use crate::state::AppState;

const DEFAULT_PER_PAGE: u32 = 25;
const MAX_PER_PAGE: u32 = 100;

#[derive(Deserialize)]
pub struct SearchCompaniesQuery {
    pub q: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// GET /api/v1/companies/search
pub async fn handle_search_companies(
    State(state): State<AppState>,
    _operator: CurrentOperator,
    Query(params): Query<SearchCompaniesQuery>,
) -> Result<Json<CompanyPage>, AppError> {
    let q = params.q.as_deref().map(str::trim).unwrap_or_default();
    if q.is_empty() {
        return Err(AppError::Validation(
            "query parameter 'q' is required".to_string(),
        ));
    }

    let page = state
        .hq
        .search_companies(
            q,
            params.page.unwrap_or(1).max(1),
            params
                .per_page
                .unwrap_or(DEFAULT_PER_PAGE)
                .clamp(1, MAX_PER_PAGE),
        )
        .await?;
    Ok(Json(page))
}

/// GET /api/v1/companies/:id
pub async fn handle_get_company(
    State(state): State<AppState>,
    _operator: CurrentOperator,
    Path(id): Path<String>,
) -> Result<Json<Company>, AppError> {
    let company = state.hq.get_company(&id).await?;
    Ok(Json(company))
}
