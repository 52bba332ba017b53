use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::Deserialize;

use crate::auth::CurrentOperator;
use crate::clients::hq::{Person, PersonPage};
use crate::errors::AppError;
use crate::state::AppState;

const DEFAULT_PER_PAGE: u32 = 25;
const MAX_PER_PAGE: u32 = 100;

#[derive(Deserialize)]
pub struct SearchPeopleQuery {
    pub q: Option<String>,
    pub title: Option<String>,
    pub company_id: Option<String>,
    pub page: Option<u32>,
    pub per_page: Option<u32>,
}

/// GET /api/v1/people/search
pub async fn handle_search_people(
    State(state): State<AppState>,
    _operator: CurrentOperator,
    Query(params): Query<SearchPeopleQuery>,
) -> Result<Json<PersonPage>, AppError> {
    let q = params.q.as_deref().map(str::trim).unwrap_or_default();
    if q.is_empty() {
        return Err(AppError::Validation(
            "query parameter 'q' is required".to_string(),
        ));
    }

    let page = state
        .hq
        .search_people(
            q,
            params.title.as_deref(),
            params.company_id.as_deref(),
            params.page.unwrap_or(1).max(1),
            params
                .per_page
                .unwrap_or(DEFAULT_PER_PAGE)
                .clamp(1, MAX_PER_PAGE),
        )
        .await?;
    Ok(Json(page))
}

/// GET /api/v1/people/:id
pub async fn handle_get_person(
    State(state): State<AppState>,
    _operator: CurrentOperator,
    Path(id): Path<String>,
) -> Result<Json<Person>, AppError> {
    let person = state.hq.get_person(&id).await?;
    Ok(Json(person))
}
