use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::CurrentOperator;
use crate::clients::emailbison::{Reply, ReplyReceipt};
use crate::errors::AppError;
use crate::state::AppState;
use crate::workspaces::resolve_workspace;

/// Bison's reply classifications; the inbox filter is validated against this
/// set before anything goes upstream.
const REPLY_TYPES: [&str; 6] = [
    "interested",
    "not_interested",
    "out_of_office",
    "auto_reply",
    "unsubscribe",
    "other",
];

#[derive(Deserialize)]
pub struct ListRepliesQuery {
    pub campaign_id: Option<i64>,
    pub reply_type: Option<String>,
    pub page: Option<u32>,
}

#[derive(Serialize)]
pub struct RepliesResponse {
    pub replies: Vec<Reply>,
    pub page: u32,
    pub total_pages: u32,
    pub total: u64,
}

#[derive(Deserialize)]
pub struct RespondRequest {
    pub body: String,
}

/// Bison pages are 1-based; `page=0` means the first page here too.
fn requested_page(params: &ListRepliesQuery) -> u32 {
    params.page.unwrap_or(1).max(1)
}

/// GET /api/v1/workspaces/:slug/replies
pub async fn handle_list_replies(
    State(state): State<AppState>,
    _operator: CurrentOperator,
    Path(slug): Path<String>,
    Query(params): Query<ListRepliesQuery>,
) -> Result<Json<RepliesResponse>, AppError> {
    if let Some(reply_type) = params.reply_type.as_deref() {
        if !REPLY_TYPES.contains(&reply_type) {
            return Err(AppError::Validation(format!(
                "unknown reply_type '{reply_type}' (expected one of: {})",
                REPLY_TYPES.join(", ")
            )));
        }
    }

    let ws = resolve_workspace(&state, &slug).await?;
    let (replies, meta) = state
        .bison
        .list_replies(
            ws.id,
            params.campaign_id,
            params.reply_type.as_deref(),
            requested_page(&params),
        )
        .await?;

    Ok(Json(RepliesResponse {
        replies,
        page: meta.current_page,
        total_pages: meta.last_page,
        total: meta.total,
    }))
}

/// POST /api/v1/workspaces/:slug/replies/:id/respond
pub async fn handle_respond_to_reply(
    State(state): State<AppState>,
    operator: CurrentOperator,
    Path((slug, reply_id)): Path<(String, i64)>,
    Json(req): Json<RespondRequest>,
) -> Result<(StatusCode, Json<ReplyReceipt>), AppError> {
    let body = req.body.trim();
    if body.is_empty() {
        return Err(AppError::Validation(
            "response body cannot be empty".to_string(),
        ));
    }

    let ws = resolve_workspace(&state, &slug).await?;
    let receipt = state.bison.respond_to_reply(ws.id, reply_id, body).await?;
    info!(
        "Operator {} responded to reply {} in workspace {}",
        operator.email, reply_id, ws.id
    );

    // Bison queues the outbound message; surface that as 202, not 200.
    Ok((StatusCode::ACCEPTED, Json(receipt)))
}
