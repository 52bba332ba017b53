use axum::{
    extract::{Path, State},
    Json,
};
use serde::Serialize;

use crate::auth::CurrentOperator;
use crate::clients::emailbison::EmailAccount;
use crate::errors::AppError;
use crate::state::AppState;
use crate::workspaces::resolve_workspace;

#[derive(Serialize)]
pub struct EmailAccountsResponse {
    pub email_accounts: Vec<EmailAccount>,
}

/// GET /api/v1/workspaces/:slug/email-accounts
pub async fn handle_list_email_accounts(
    State(state): State<AppState>,
    _operator: CurrentOperator,
    Path(slug): Path<String>,
) -> Result<Json<EmailAccountsResponse>, AppError> {
    let ws = resolve_workspace(&state, &slug).await?;
    let email_accounts = state.bison.list_email_accounts(ws.id).await?;
    Ok(Json(EmailAccountsResponse { email_accounts }))
}
