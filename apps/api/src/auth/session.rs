use async_trait::async_trait;
use axum::extract::FromRequestParts;
use axum::http::{header, request::Parts};
use chrono::{DateTime, Duration, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::session::SessionRow;
use crate::state::AppState;

/// Issues a fresh session for `email`. Sweeps the operator's expired sessions
/// on the way in so the table does not accumulate dead rows.
pub async fn create_session(
    pool: &PgPool,
    email: &str,
    ttl_hours: i64,
) -> Result<SessionRow, sqlx::Error> {
    sqlx::query("DELETE FROM sessions WHERE operator_email = $1 AND expires_at <= now()")
        .bind(email)
        .execute(pool)
        .await?;

    let expires_at = Utc::now() + Duration::hours(ttl_hours);

    sqlx::query_as::<_, SessionRow>(
        r#"
        INSERT INTO sessions (token, operator_email, expires_at)
        VALUES ($1, $2, $3)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(expires_at)
    .fetch_one(pool)
    .await
}

/// Looks up a live session. Expired rows are invisible here even before the
/// sweep in `create_session` has removed them.
pub async fn find_session(pool: &PgPool, token: Uuid) -> Result<Option<SessionRow>, sqlx::Error> {
    sqlx::query_as::<_, SessionRow>("SELECT * FROM sessions WHERE token = $1 AND expires_at > now()")
        .bind(token)
        .fetch_optional(pool)
        .await
}

pub async fn delete_session(pool: &PgPool, token: Uuid) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM sessions WHERE token = $1")
        .bind(token)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Pins the workspace the operator is currently acting in onto their session.
pub async fn set_active_workspace(
    pool: &PgPool,
    token: Uuid,
    workspace_id: i64,
) -> Result<(), sqlx::Error> {
    sqlx::query("UPDATE sessions SET active_workspace_id = $1 WHERE token = $2")
        .bind(workspace_id)
        .bind(token)
        .execute(pool)
        .await?;
    Ok(())
}

/// The authenticated operator, resolved from the `Authorization: Bearer`
/// header. Handlers take this as an argument to require a live session.
#[derive(Debug, Clone)]
pub struct CurrentOperator {
    pub email: String,
    pub token: Uuid,
    pub active_workspace_id: Option<i64>,
    pub expires_at: DateTime<Utc>,
}

#[async_trait]
impl FromRequestParts<AppState> for CurrentOperator {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(AppError::Unauthorized)?;

        let token = parse_bearer(header).ok_or(AppError::Unauthorized)?;

        let session = find_session(&state.db, token)
            .await?
            .ok_or(AppError::Unauthorized)?;

        Ok(CurrentOperator {
            email: session.operator_email,
            token: session.token,
            active_workspace_id: session.active_workspace_id,
            expires_at: session.expires_at,
        })
    }
}

/// Extracts the session token from an `Authorization` header value.
/// Anything that is not `Bearer <uuid>` is rejected.
fn parse_bearer(header: &str) -> Option<Uuid> {
    let rest = header
        .strip_prefix("Bearer ")
        .or_else(|| header.strip_prefix("bearer "))?;
    Uuid::parse_str(rest.trim()).ok()
}

#[cfg(test)]
pub(crate) fn test_operator() -> CurrentOperator {
    CurrentOperator {
        email: "ops@test.zone".to_string(),
        token: Uuid::new_v4(),
        active_workspace_id: None,
        expires_at: Utc::now() + Duration::hours(1),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bearer_accepts_uuid_token() {
        let token = Uuid::new_v4();
        let parsed = parse_bearer(&format!("Bearer {token}"));
        assert_eq!(parsed, Some(token));
    }

    #[test]
    fn test_parse_bearer_accepts_lowercase_scheme() {
        let token = Uuid::new_v4();
        assert_eq!(parse_bearer(&format!("bearer {token}")), Some(token));
    }

    #[test]
    fn test_parse_bearer_rejects_missing_scheme() {
        let token = Uuid::new_v4();
        assert_eq!(parse_bearer(&token.to_string()), None);
    }

    #[test]
    fn test_parse_bearer_rejects_non_uuid_token() {
        assert_eq!(parse_bearer("Bearer not-a-token"), None);
        assert_eq!(parse_bearer("Bearer "), None);
    }

    #[test]
    fn test_parse_bearer_rejects_other_schemes() {
        let token = Uuid::new_v4();
        assert_eq!(parse_bearer(&format!("Basic {token}")), None);
    }

    // The cases below need a running Postgres; `DATABASE_URL` must point at
    // it and each test gets its own database with migrations applied.

    #[sqlx::test]
    async fn test_find_session_hides_expired_rows(pool: PgPool) {
        let stale = create_session(&pool, "ops@test.zone", -1)
            .await
            .expect("create session");

        let found = find_session(&pool, stale.token).await.expect("lookup");
        assert!(found.is_none());
    }

    #[sqlx::test]
    async fn test_login_sweeps_expired_sessions(pool: PgPool) {
        create_session(&pool, "ops@test.zone", -1)
            .await
            .expect("stale session");
        let live = create_session(&pool, "ops@test.zone", 168)
            .await
            .expect("fresh session");

        let rows: i64 =
            sqlx::query_scalar("SELECT COUNT(*) FROM sessions WHERE operator_email = $1")
                .bind("ops@test.zone")
                .fetch_one(&pool)
                .await
                .expect("count sessions");
        assert_eq!(rows, 1);
        assert!(find_session(&pool, live.token)
            .await
            .expect("lookup")
            .is_some());
    }

    #[sqlx::test]
    async fn test_delete_session_revokes_token(pool: PgPool) {
        let session = create_session(&pool, "ops@test.zone", 168)
            .await
            .expect("create session");

        assert!(delete_session(&pool, session.token).await.expect("delete"));
        assert!(find_session(&pool, session.token)
            .await
            .expect("lookup")
            .is_none());
    }

    #[sqlx::test]
    async fn test_activate_pins_workspace_on_session(pool: PgPool) {
        let session = create_session(&pool, "ops@test.zone", 168)
            .await
            .expect("create session");
        set_active_workspace(&pool, session.token, 42)
            .await
            .expect("activate");

        let found = find_session(&pool, session.token)
            .await
            .expect("lookup")
            .expect("session is live");
        assert_eq!(found.active_workspace_id, Some(42));
    }
}
