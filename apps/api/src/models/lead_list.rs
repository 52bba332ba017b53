#![allow(dead_code)]

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LeadListRow {
    pub id: Uuid,
    pub workspace_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// `LeadListRow` plus the membership count, produced by the list query's
/// LEFT JOIN so the index view never needs a second round trip.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LeadListSummaryRow {
    pub id: Uuid,
    pub workspace_id: i64,
    pub name: String,
    pub description: Option<String>,
    pub member_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct LeadListMemberRow {
    pub list_id: Uuid,
    pub hq_person_id: String,
    pub added_at: DateTime<Utc>,
}
