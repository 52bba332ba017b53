use serde::Serialize;
use sqlx::PgPool;
use tracing::info;
use uuid::Uuid;

use crate::clients::emailbison::{BisonClient, CampaignLead};
use crate::clients::hq::{HqClient, Person};
use crate::errors::AppError;
use crate::leadlists::store;

#[derive(Debug, Serialize)]
pub struct PushReport {
    pub pushed: u64,
    pub skipped_no_email: u64,
    pub list_size: u64,
}

/// Feeds a lead list into an EmailBison campaign. Members are hydrated from
/// HQ first; persons HQ no longer knows, or that lack an email address, are
/// skipped since Bison keys leads on email.
pub async fn push_to_campaign(
    db: &PgPool,
    hq: &HqClient,
    bison: &BisonClient,
    workspace_id: i64,
    list_id: Uuid,
    campaign_id: i64,
) -> Result<PushReport, AppError> {
    let members = store::list_members(db, list_id).await?;
    if members.is_empty() {
        return Err(AppError::UnprocessableEntity(
            "lead list has no members to push".to_string(),
        ));
    }

    let ids: Vec<String> = members.iter().map(|m| m.hq_person_id.clone()).collect();
    let people = hq.get_people_bulk(&ids).await?;

    let list_size = members.len() as u64;
    let (leads, skipped_no_email) = build_leads(list_size, people);

    let pushed = if leads.is_empty() {
        0
    } else {
        bison
            .upload_campaign_leads(workspace_id, campaign_id, &leads)
            .await?
            .added
    };

    info!(
        "Pushed {pushed} of {list_size} members from list {list_id} to campaign {campaign_id} \
         ({skipped_no_email} without email)"
    );

    Ok(PushReport {
        pushed,
        skipped_no_email,
        list_size,
    })
}

/// Turns hydrated HQ records into uploadable leads, counting the members that
/// cannot be pushed: records without a usable email, plus ids HQ did not
/// return at all. The count never underflows, even if HQ hands back more
/// records than ids were asked for.
fn build_leads(list_size: u64, people: Vec<Person>) -> (Vec<CampaignLead>, u64) {
    let returned = people.len() as u64;
    let mut leads = Vec::with_capacity(people.len());
    let mut no_email = 0u64;
    for person in people {
        let Some(email) = person.email.filter(|e| !e.trim().is_empty()) else {
            no_email += 1;
            continue;
        };
        leads.push(CampaignLead {
            email,
            first_name: person.first_name,
            last_name: person.last_name,
            company_name: person.company_name,
        });
    }
    (leads, no_email + list_size.saturating_sub(returned))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person(id: &str, email: Option<&str>) -> Person {
        Person {
            id: id.to_string(),
            first_name: Some("Ada".to_string()),
            last_name: Some("Lovelace".to_string()),
            email: email.map(str::to_string),
            title: None,
            company_id: None,
            company_name: Some("Acme".to_string()),
            linkedin_url: None,
            location: None,
        }
    }

    #[test]
    fn test_build_leads_counts_unusable_members() {
        let people = vec![
            person("p_1", Some("ada@acme.io")),
            person("p_2", None),
            person("p_3", Some("   ")),
        ];
        let (leads, skipped) = build_leads(5, people);
        assert_eq!(leads.len(), 1);
        assert_eq!(leads[0].email, "ada@acme.io");
        // Two records without a usable email, two ids HQ did not return.
        assert_eq!(skipped, 4);
    }

    #[test]
    fn test_build_leads_tolerates_duplicate_hq_records() {
        let people = vec![
            person("p_1", Some("ada@acme.io")),
            person("p_1", Some("ada@acme.io")),
        ];
        let (leads, skipped) = build_leads(1, people);
        assert_eq!(leads.len(), 2);
        assert_eq!(skipped, 0);
    }
}
