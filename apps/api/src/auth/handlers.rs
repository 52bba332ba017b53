use axum::{extract::State, http::StatusCode, Json};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::auth::credentials;
use crate::auth::session::{create_session, delete_session, CurrentOperator};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Serialize)]
pub struct LoginResponse {
    pub token: Uuid,
    pub operator_email: String,
    pub expires_at: DateTime<Utc>,
}

#[derive(Serialize)]
pub struct MeResponse {
    pub operator_email: String,
    pub active_workspace_id: Option<i64>,
    pub expires_at: DateTime<Utc>,
}

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> Result<Json<LoginResponse>, AppError> {
    if req.email.trim().is_empty() || req.password.is_empty() {
        return Err(AppError::Validation(
            "email and password are required".to_string(),
        ));
    }

    let email = credentials::verify(&state.config.operators, &req.email, &req.password)
        .ok_or(AppError::Unauthorized)?;

    let session = create_session(&state.db, &email, state.config.session_ttl_hours).await?;
    info!("Operator {email} logged in");

    Ok(Json(LoginResponse {
        token: session.token,
        operator_email: session.operator_email,
        expires_at: session.expires_at,
    }))
}

/// POST /api/v1/auth/logout
pub async fn handle_logout(
    State(state): State<AppState>,
    operator: CurrentOperator,
) -> Result<StatusCode, AppError> {
    delete_session(&state.db, operator.token).await?;
    info!("Operator {} logged out", operator.email);
    Ok(StatusCode::NO_CONTENT)
}

/// GET /api/v1/auth/me
pub async fn handle_me(operator: CurrentOperator) -> Json<MeResponse> {
    Json(MeResponse {
        operator_email: operator.email,
        active_workspace_id: operator.active_workspace_id,
        expires_at: operator.expires_at,
    })
}
