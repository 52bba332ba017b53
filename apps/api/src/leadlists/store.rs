use sqlx::PgPool;
use uuid::Uuid;

use crate::models::lead_list::{LeadListMemberRow, LeadListRow, LeadListSummaryRow};

/// True when Postgres reports a unique-constraint violation; callers turn
/// that into a 409.
pub fn is_unique_violation(err: &sqlx::Error) -> bool {
    err.as_database_error()
        .is_some_and(|db| db.kind() == sqlx::error::ErrorKind::UniqueViolation)
}

pub async fn create_list(
    pool: &PgPool,
    workspace_id: i64,
    name: &str,
    description: Option<&str>,
) -> Result<LeadListRow, sqlx::Error> {
    sqlx::query_as::<_, LeadListRow>(
        r#"
        INSERT INTO lead_lists (id, workspace_id, name, description)
        VALUES ($1, $2, $3, $4)
        RETURNING *
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(workspace_id)
    .bind(name)
    .bind(description)
    .fetch_one(pool)
    .await
}

pub async fn list_lists(
    pool: &PgPool,
    workspace_id: i64,
) -> Result<Vec<LeadListSummaryRow>, sqlx::Error> {
    sqlx::query_as::<_, LeadListSummaryRow>(
        r#"
        SELECT l.id, l.workspace_id, l.name, l.description,
               COUNT(m.hq_person_id) AS member_count,
               l.created_at, l.updated_at
        FROM lead_lists l
        LEFT JOIN lead_list_members m ON m.list_id = l.id
        WHERE l.workspace_id = $1
        GROUP BY l.id
        ORDER BY l.created_at DESC
        "#,
    )
    .bind(workspace_id)
    .fetch_all(pool)
    .await
}

/// Fetches one list with its member count. The workspace id is part of the
/// key here: an id from another workspace comes back as None, not as a leak.
pub async fn get_list(
    pool: &PgPool,
    workspace_id: i64,
    list_id: Uuid,
) -> Result<Option<LeadListSummaryRow>, sqlx::Error> {
    sqlx::query_as::<_, LeadListSummaryRow>(
        r#"
        SELECT l.id, l.workspace_id, l.name, l.description,
               COUNT(m.hq_person_id) AS member_count,
               l.created_at, l.updated_at
        FROM lead_lists l
        LEFT JOIN lead_list_members m ON m.list_id = l.id
        WHERE l.workspace_id = $1 AND l.id = $2
        GROUP BY l.id
        "#,
    )
    .bind(workspace_id)
    .bind(list_id)
    .fetch_optional(pool)
    .await
}

/// Applies a partial update. Absent fields keep their current value.
pub async fn update_list(
    pool: &PgPool,
    workspace_id: i64,
    list_id: Uuid,
    name: Option<&str>,
    description: Option<&str>,
) -> Result<Option<LeadListRow>, sqlx::Error> {
    sqlx::query_as::<_, LeadListRow>(
        r#"
        UPDATE lead_lists
        SET name = COALESCE($3, name),
            description = COALESCE($4, description),
            updated_at = now()
        WHERE workspace_id = $1 AND id = $2
        RETURNING *
        "#,
    )
    .bind(workspace_id)
    .bind(list_id)
    .bind(name)
    .bind(description)
    .fetch_optional(pool)
    .await
}

pub async fn delete_list(
    pool: &PgPool,
    workspace_id: i64,
    list_id: Uuid,
) -> Result<bool, sqlx::Error> {
    let result = sqlx::query("DELETE FROM lead_lists WHERE workspace_id = $1 AND id = $2")
        .bind(workspace_id)
        .bind(list_id)
        .execute(pool)
        .await?;
    Ok(result.rows_affected() > 0)
}

/// Inserts memberships, silently skipping ids already in the list (and
/// repeats within the same batch). Returns how many rows were actually
/// inserted; the caller derives the duplicate count from that.
pub async fn add_members(
    pool: &PgPool,
    list_id: Uuid,
    hq_person_ids: &[String],
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        r#"
        INSERT INTO lead_list_members (list_id, hq_person_id)
        SELECT $1, UNNEST($2::text[])
        ON CONFLICT DO NOTHING
        "#,
    )
    .bind(list_id)
    .bind(hq_person_ids)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub async fn remove_members(
    pool: &PgPool,
    list_id: Uuid,
    hq_person_ids: &[String],
) -> Result<u64, sqlx::Error> {
    let result =
        sqlx::query("DELETE FROM lead_list_members WHERE list_id = $1 AND hq_person_id = ANY($2)")
            .bind(list_id)
            .bind(hq_person_ids)
            .execute(pool)
            .await?;
    Ok(result.rows_affected())
}

pub async fn list_members(
    pool: &PgPool,
    list_id: Uuid,
) -> Result<Vec<LeadListMemberRow>, sqlx::Error> {
    sqlx::query_as::<_, LeadListMemberRow>(
        r#"
        SELECT list_id, hq_person_id, added_at
        FROM lead_list_members
        WHERE list_id = $1
        ORDER BY added_at ASC, hq_person_id ASC
        "#,
    )
    .bind(list_id)
    .fetch_all(pool)
    .await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_unique_violation_ignores_other_errors() {
        assert!(!is_unique_violation(&sqlx::Error::RowNotFound));
    }

    // The cases below need a running Postgres; `DATABASE_URL` must point at
    // it and each test gets its own database with migrations applied.

    #[sqlx::test]
    async fn test_add_members_counts_only_new_rows(pool: PgPool) {
        let list = create_list(&pool, 1, "warm-intros", None)
            .await
            .expect("create list");

        let first = add_members(&pool, list.id, &["p_1".to_string(), "p_2".to_string()])
            .await
            .expect("first batch");
        assert_eq!(first, 2);

        // p_2 is already a member and p_3 repeats within the batch.
        let batch = vec!["p_2".to_string(), "p_3".to_string(), "p_3".to_string()];
        let second = add_members(&pool, list.id, &batch).await.expect("second batch");
        assert_eq!(second, 1);
        assert_eq!(batch.len() as u64 - second, 2);

        let members = list_members(&pool, list.id).await.expect("list members");
        assert_eq!(members.len(), 3);
    }

    #[sqlx::test]
    async fn test_get_list_is_scoped_to_workspace(pool: PgPool) {
        let list = create_list(&pool, 1, "q3-outreach", Some("Q3 targets"))
            .await
            .expect("create list");
        add_members(&pool, list.id, &["p_9".to_string()])
            .await
            .expect("add member");

        let own = get_list(&pool, 1, list.id).await.expect("own workspace");
        assert_eq!(own.expect("list visible").member_count, 1);

        let foreign = get_list(&pool, 2, list.id).await.expect("foreign workspace");
        assert!(foreign.is_none());
    }

    #[sqlx::test]
    async fn test_duplicate_name_is_a_unique_violation(pool: PgPool) {
        create_list(&pool, 1, "founders", None)
            .await
            .expect("first create");
        let err = create_list(&pool, 1, "founders", None)
            .await
            .expect_err("name is taken");
        assert!(is_unique_violation(&err));

        // Same name in another workspace is allowed.
        create_list(&pool, 2, "founders", None)
            .await
            .expect("other workspace");
    }
}
