use axum::{
    extract::{Path, Query, State},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::CurrentOperator;
use crate::clients::emailbison::Campaign;
use crate::errors::AppError;
use crate::state::AppState;
use crate::workspaces::resolve_workspace;

/// Campaign lifecycle states EmailBison recognizes. The list filter is
/// validated against this set before anything goes upstream.
const CAMPAIGN_STATUSES: [&str; 4] = ["draft", "active", "paused", "archived"];

#[derive(Deserialize)]
pub struct ListCampaignsQuery {
    pub status: Option<String>,
}

#[derive(Serialize)]
pub struct CampaignsResponse {
    pub campaigns: Vec<Campaign>,
}

#[derive(Deserialize)]
pub struct CreateCampaignRequest {
    pub name: String,
}

#[derive(Deserialize)]
pub struct UpdateCampaignRequest {
    pub name: Option<String>,
    pub daily_limit: Option<i64>,
}

/// GET /api/v1/workspaces/:slug/campaigns
pub async fn handle_list_campaigns(
    State(state): State<AppState>,
    _operator: CurrentOperator,
    Path(slug): Path<String>,
    Query(params): Query<ListCampaignsQuery>,
) -> Result<Json<CampaignsResponse>, AppError> {
    if let Some(status) = params.status.as_deref() {
        if !CAMPAIGN_STATUSES.contains(&status) {
            return Err(AppError::Validation(format!(
                "unknown status '{status}' (expected one of: {})",
                CAMPAIGN_STATUSES.join(", ")
            )));
        }
    }

    let ws = resolve_workspace(&state, &slug).await?;
    let campaigns = state
        .bison
        .list_campaigns(ws.id, params.status.as_deref())
        .await?;
    Ok(Json(CampaignsResponse { campaigns }))
}

/// POST /api/v1/workspaces/:slug/campaigns
pub async fn handle_create_campaign(
    State(state): State<AppState>,
    operator: CurrentOperator,
    Path(slug): Path<String>,
    Json(req): Json<CreateCampaignRequest>,
) -> Result<Json<Campaign>, AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation(
            "campaign name cannot be empty".to_string(),
        ));
    }

    let ws = resolve_workspace(&state, &slug).await?;
    let campaign = state.bison.create_campaign(ws.id, name).await?;
    info!(
        "Operator {} created campaign '{}' (id {}) in workspace {}",
        operator.email, campaign.name, campaign.id, ws.id
    );
    Ok(Json(campaign))
}

/// GET /api/v1/workspaces/:slug/campaigns/:id
pub async fn handle_get_campaign(
    State(state): State<AppState>,
    _operator: CurrentOperator,
    Path((slug, campaign_id)): Path<(String, i64)>,
) -> Result<Json<Campaign>, AppError> {
    let ws = resolve_workspace(&state, &slug).await?;
    let campaign = state.bison.get_campaign(ws.id, campaign_id).await?;
    Ok(Json(campaign))
}

/// PATCH /api/v1/workspaces/:slug/campaigns/:id
pub async fn handle_update_campaign(
    State(state): State<AppState>,
    _operator: CurrentOperator,
    Path((slug, campaign_id)): Path<(String, i64)>,
    Json(req): Json<UpdateCampaignRequest>,
) -> Result<Json<Campaign>, AppError> {
    if req.name.is_none() && req.daily_limit.is_none() {
        return Err(AppError::Validation(
            "provide at least one of name, daily_limit".to_string(),
        ));
    }
    if let Some(name) = req.name.as_deref() {
        if name.trim().is_empty() {
            return Err(AppError::Validation(
                "campaign name cannot be empty".to_string(),
            ));
        }
    }
    if let Some(limit) = req.daily_limit {
        if limit < 1 {
            return Err(AppError::Validation(
                "daily_limit must be at least 1".to_string(),
            ));
        }
    }

    let ws = resolve_workspace(&state, &slug).await?;
    let campaign = state
        .bison
        .update_campaign(
            ws.id,
            campaign_id,
            req.name.as_deref().map(str::trim),
            req.daily_limit,
        )
        .await?;
    Ok(Json(campaign))
}

/// POST /api/v1/workspaces/:slug/campaigns/:id/pause
pub async fn handle_pause_campaign(
    State(state): State<AppState>,
    operator: CurrentOperator,
    Path((slug, campaign_id)): Path<(String, i64)>,
) -> Result<Json<Campaign>, AppError> {
    let ws = resolve_workspace(&state, &slug).await?;
    let campaign = state.bison.pause_campaign(ws.id, campaign_id).await?;
    info!(
        "Operator {} paused campaign {} in workspace {}",
        operator.email, campaign_id, ws.id
    );
    Ok(Json(campaign))
}

/// POST /api/v1/workspaces/:slug/campaigns/:id/resume
pub async fn handle_resume_campaign(
    State(state): State<AppState>,
    operator: CurrentOperator,
    Path((slug, campaign_id)): Path<(String, i64)>,
) -> Result<Json<Campaign>, AppError> {
    let ws = resolve_workspace(&state, &slug).await?;
    let campaign = state.bison.resume_campaign(ws.id, campaign_id).await?;
    info!(
        "Operator {} resumed campaign {} in workspace {}",
        operator.email, campaign_id, ws.id
    );
    Ok(Json(campaign))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::session::test_operator;
    use crate::state::test_state;

    // Request-shape checks run before the workspace is resolved, so these
    // handlers can be driven directly with no upstream or database behind
    // them.

    #[tokio::test]
    async fn test_empty_patch_is_rejected_before_any_upstream_call() {
        let err = handle_update_campaign(
            State(test_state()),
            test_operator(),
            Path(("acme".to_string(), 7)),
            Json(UpdateCampaignRequest {
                name: None,
                daily_limit: None,
            }),
        )
        .await
        .err()
        .expect("empty patch must fail");

        match err {
            AppError::Validation(msg) => {
                assert!(msg.contains("name") && msg.contains("daily_limit"));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_zero_daily_limit_is_rejected() {
        let err = handle_update_campaign(
            State(test_state()),
            test_operator(),
            Path(("acme".to_string(), 7)),
            Json(UpdateCampaignRequest {
                name: None,
                daily_limit: Some(0),
            }),
        )
        .await
        .err()
        .expect("zero limit must fail");

        match err {
            AppError::Validation(msg) => assert!(msg.contains("daily_limit")),
            other => panic!("unexpected error: {other}"),
        }
    }
}
