//! EmailBison client: workspaces, campaigns, sender accounts, replies.
//!
//! ARCHITECTURAL RULE: no other module may talk to the campaign SaaS
//! directly. All EmailBison traffic goes through this client.
//!
//! Bison wraps every response in a `{"data": ...}` envelope; paged lists add
//! a Laravel-style `meta` object. The envelope stays private to this module;
//! callers see plain DTOs.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::transport::{AuthScheme, Transport};
use super::UpstreamError;

const SERVICE: &str = "emailbison";

// ────────────────────────────────────────────────────────────────────────────
// Wire types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct Data<T> {
    data: T,
}

#[derive(Debug, Deserialize)]
struct Paged<T> {
    data: Vec<T>,
    meta: PageMeta,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PageMeta {
    pub current_page: u32,
    pub last_page: u32,
    pub total: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Workspace {
    pub id: i64,
    pub name: String,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Campaign {
    pub id: i64,
    pub name: String,
    /// Upstream lifecycle state: draft, active, paused, or archived.
    pub status: String,
    pub daily_limit: i64,
    #[serde(default)]
    pub leads_count: i64,
    #[serde(default)]
    pub emails_sent: i64,
    #[serde(default)]
    pub replies_count: i64,
    #[serde(default)]
    pub bounces_count: i64,
    pub created_at: DateTime<Utc>,
}

/// A connected sender mailbox ("sender email" in Bison terms).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmailAccount {
    pub id: i64,
    pub email: String,
    pub name: Option<String>,
    pub provider: Option<String>,
    pub status: String,
    pub daily_limit: i64,
    #[serde(default)]
    pub warmup_enabled: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Reply {
    pub id: i64,
    pub campaign_id: i64,
    pub lead_email: String,
    pub subject: Option<String>,
    pub snippet: Option<String>,
    /// Bison's classification: interested, not_interested, out_of_office,
    /// auto_reply, unsubscribe, or other.
    pub reply_type: String,
    pub received_at: DateTime<Utc>,
}

/// Acknowledgement returned when an operator answers a reply.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplyReceipt {
    pub id: i64,
    pub status: String,
}

/// Lead shape accepted by the campaign lead-upload endpoint. Bison keys
/// leads on email address.
#[derive(Debug, Clone, Serialize)]
pub struct CampaignLead {
    pub email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub first_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LeadUploadReceipt {
    pub added: u64,
}

#[derive(Serialize)]
struct CreateWorkspaceBody<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct CreateCampaignBody<'a> {
    name: &'a str,
}

#[derive(Serialize)]
struct UpdateCampaignBody<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    daily_limit: Option<i64>,
}

#[derive(Serialize)]
struct RespondBody<'a> {
    message: &'a str,
}

#[derive(Serialize)]
struct UploadLeadsBody<'a> {
    leads: &'a [CampaignLead],
}

// ────────────────────────────────────────────────────────────────────────────
// Client
// ────────────────────────────────────────────────────────────────────────────

/// Typed client for the EmailBison REST API. Campaign, sender, and reply
/// endpoints are nested under the workspace they belong to.
#[derive(Clone)]
pub struct BisonClient {
    transport: Transport,
}

impl BisonClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            transport: Transport::new(SERVICE, base_url, api_key, AuthScheme::Bearer),
        }
    }

    pub async fn list_workspaces(&self) -> Result<Vec<Workspace>, UpstreamError> {
        let Data { data } = self
            .transport
            .get::<Data<Vec<Workspace>>>("/api/v1/workspaces", &[])
            .await?;
        Ok(data)
    }

    pub async fn create_workspace(&self, name: &str) -> Result<Workspace, UpstreamError> {
        let Data { data } = self
            .transport
            .post("/api/v1/workspaces", &CreateWorkspaceBody { name })
            .await?;
        Ok(data)
    }

    pub async fn list_campaigns(
        &self,
        workspace_id: i64,
        status: Option<&str>,
    ) -> Result<Vec<Campaign>, UpstreamError> {
        let mut query = Vec::new();
        if let Some(status) = status {
            query.push(("status", status.to_string()));
        }
        let Data { data } = self
            .transport
            .get(
                &format!("/api/v1/workspaces/{workspace_id}/campaigns"),
                &query,
            )
            .await?;
        Ok(data)
    }

    pub async fn get_campaign(
        &self,
        workspace_id: i64,
        campaign_id: i64,
    ) -> Result<Campaign, UpstreamError> {
        let Data { data } = self
            .transport
            .get(
                &format!("/api/v1/workspaces/{workspace_id}/campaigns/{campaign_id}"),
                &[],
            )
            .await?;
        Ok(data)
    }

    pub async fn create_campaign(
        &self,
        workspace_id: i64,
        name: &str,
    ) -> Result<Campaign, UpstreamError> {
        let Data { data } = self
            .transport
            .post(
                &format!("/api/v1/workspaces/{workspace_id}/campaigns"),
                &CreateCampaignBody { name },
            )
            .await?;
        Ok(data)
    }

    pub async fn update_campaign(
        &self,
        workspace_id: i64,
        campaign_id: i64,
        name: Option<&str>,
        daily_limit: Option<i64>,
    ) -> Result<Campaign, UpstreamError> {
        let Data { data } = self
            .transport
            .patch(
                &format!("/api/v1/workspaces/{workspace_id}/campaigns/{campaign_id}"),
                &UpdateCampaignBody { name, daily_limit },
            )
            .await?;
        Ok(data)
    }

    pub async fn pause_campaign(
        &self,
        workspace_id: i64,
        campaign_id: i64,
    ) -> Result<Campaign, UpstreamError> {
        let Data { data } = self
            .transport
            .post_empty(&format!(
                "/api/v1/workspaces/{workspace_id}/campaigns/{campaign_id}/pause"
            ))
            .await?;
        Ok(data)
    }

    pub async fn resume_campaign(
        &self,
        workspace_id: i64,
        campaign_id: i64,
    ) -> Result<Campaign, UpstreamError> {
        let Data { data } = self
            .transport
            .post_empty(&format!(
                "/api/v1/workspaces/{workspace_id}/campaigns/{campaign_id}/resume"
            ))
            .await?;
        Ok(data)
    }

    pub async fn upload_campaign_leads(
        &self,
        workspace_id: i64,
        campaign_id: i64,
        leads: &[CampaignLead],
    ) -> Result<LeadUploadReceipt, UpstreamError> {
        let Data { data } = self
            .transport
            .post(
                &format!("/api/v1/workspaces/{workspace_id}/campaigns/{campaign_id}/leads"),
                &UploadLeadsBody { leads },
            )
            .await?;
        Ok(data)
    }

    pub async fn list_email_accounts(
        &self,
        workspace_id: i64,
    ) -> Result<Vec<EmailAccount>, UpstreamError> {
        let Data { data } = self
            .transport
            .get(
                &format!("/api/v1/workspaces/{workspace_id}/sender-emails"),
                &[],
            )
            .await?;
        Ok(data)
    }

    pub async fn list_replies(
        &self,
        workspace_id: i64,
        campaign_id: Option<i64>,
        reply_type: Option<&str>,
        page: u32,
    ) -> Result<(Vec<Reply>, PageMeta), UpstreamError> {
        let mut query = vec![("page", page.to_string())];
        if let Some(id) = campaign_id {
            query.push(("campaign_id", id.to_string()));
        }
        if let Some(reply_type) = reply_type {
            query.push(("reply_type", reply_type.to_string()));
        }
        let Paged { data, meta } = self
            .transport
            .get(&format!("/api/v1/workspaces/{workspace_id}/replies"), &query)
            .await?;
        Ok((data, meta))
    }

    pub async fn respond_to_reply(
        &self,
        workspace_id: i64,
        reply_id: i64,
        message: &str,
    ) -> Result<ReplyReceipt, UpstreamError> {
        let Data { data } = self
            .transport
            .post(
                &format!("/api/v1/workspaces/{workspace_id}/replies/{reply_id}/respond"),
                &RespondBody { message },
            )
            .await?;
        Ok(data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_campaign_deserializes_from_data_envelope() {
        let json = r#"{
            "data": {
                "id": 12,
                "name": "Q3 outbound",
                "status": "active",
                "daily_limit": 200,
                "leads_count": 1450,
                "emails_sent": 3200,
                "replies_count": 41,
                "bounces_count": 12,
                "created_at": "2025-06-01T09:00:00Z"
            }
        }"#;
        let Data { data: campaign } = serde_json::from_str::<Data<Campaign>>(json).unwrap();
        assert_eq!(campaign.id, 12);
        assert_eq!(campaign.status, "active");
        assert_eq!(campaign.replies_count, 41);
    }

    #[test]
    fn test_campaign_counters_default_to_zero() {
        let json = r#"{
            "id": 1,
            "name": "fresh",
            "status": "draft",
            "daily_limit": 50,
            "created_at": "2025-06-01T09:00:00Z"
        }"#;
        let campaign: Campaign = serde_json::from_str(json).unwrap();
        assert_eq!(campaign.leads_count, 0);
        assert_eq!(campaign.emails_sent, 0);
    }

    #[test]
    fn test_paged_replies_carry_meta() {
        let json = r#"{
            "data": [{
                "id": 7,
                "campaign_id": 12,
                "lead_email": "jane@prospect.io",
                "subject": "Re: quick question",
                "snippet": "Sounds interesting, tell me more",
                "reply_type": "interested",
                "received_at": "2025-06-02T14:30:00Z"
            }],
            "meta": {"current_page": 2, "last_page": 9, "total": 171}
        }"#;
        let Paged { data, meta } = serde_json::from_str::<Paged<Reply>>(json).unwrap();
        assert_eq!(data.len(), 1);
        assert_eq!(data[0].reply_type, "interested");
        assert_eq!(meta.last_page, 9);
    }

    #[test]
    fn test_campaign_lead_omits_unset_fields() {
        let lead = CampaignLead {
            email: "jane@prospect.io".to_string(),
            first_name: Some("Jane".to_string()),
            last_name: None,
            company_name: None,
        };
        let value = serde_json::to_value(&lead).unwrap();
        assert_eq!(value["email"], "jane@prospect.io");
        assert_eq!(value["first_name"], "Jane");
        assert!(value.get("last_name").is_none());
    }
}
