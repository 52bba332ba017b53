use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::session::set_active_workspace;
use crate::auth::CurrentOperator;
use crate::clients::emailbison::Workspace;
use crate::errors::AppError;
use crate::state::AppState;
use crate::workspaces::{resolve_workspace, slug::slugify};

/// Workspace as presented to the dashboard: the upstream record plus its
/// slug and whether it is the session's active workspace.
#[derive(Serialize)]
pub struct WorkspaceView {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub active: bool,
    pub created_at: DateTime<Utc>,
}

impl WorkspaceView {
    fn new(ws: Workspace, active_id: Option<i64>) -> Self {
        WorkspaceView {
            slug: slugify(&ws.name),
            active: active_id == Some(ws.id),
            id: ws.id,
            name: ws.name,
            created_at: ws.created_at,
        }
    }
}

#[derive(Serialize)]
pub struct WorkspacesResponse {
    pub workspaces: Vec<WorkspaceView>,
}

#[derive(Deserialize)]
pub struct CreateWorkspaceRequest {
    pub name: String,
}

/// GET /api/v1/workspaces
pub async fn handle_list_workspaces(
    State(state): State<AppState>,
    operator: CurrentOperator,
) -> Result<Json<WorkspacesResponse>, AppError> {
    let workspaces = state.bison.list_workspaces().await?;
    let workspaces = workspaces
        .into_iter()
        .map(|ws| WorkspaceView::new(ws, operator.active_workspace_id))
        .collect();
    Ok(Json(WorkspacesResponse { workspaces }))
}

/// POST /api/v1/workspaces
pub async fn handle_create_workspace(
    State(state): State<AppState>,
    operator: CurrentOperator,
    Json(req): Json<CreateWorkspaceRequest>,
) -> Result<Json<WorkspaceView>, AppError> {
    let name = req.name.trim();
    if name.is_empty() {
        return Err(AppError::Validation(
            "workspace name cannot be empty".to_string(),
        ));
    }

    let ws = state.bison.create_workspace(name).await?;
    info!(
        "Operator {} created workspace '{}' (id {})",
        operator.email, ws.name, ws.id
    );
    Ok(Json(WorkspaceView::new(ws, operator.active_workspace_id)))
}

/// GET /api/v1/workspaces/:slug
pub async fn handle_get_workspace(
    State(state): State<AppState>,
    operator: CurrentOperator,
    Path(slug): Path<String>,
) -> Result<Json<WorkspaceView>, AppError> {
    let ws = resolve_workspace(&state, &slug).await?;
    Ok(Json(WorkspaceView::new(ws, operator.active_workspace_id)))
}

/// POST /api/v1/workspaces/:slug/activate
pub async fn handle_activate_workspace(
    State(state): State<AppState>,
    operator: CurrentOperator,
    Path(slug): Path<String>,
) -> Result<StatusCode, AppError> {
    let ws = resolve_workspace(&state, &slug).await?;

    set_active_workspace(&state.db, operator.token, ws.id).await?;
    info!(
        "Operator {} activated workspace '{}' (id {})",
        operator.email, ws.name, ws.id
    );

    Ok(StatusCode::NO_CONTENT)
}
