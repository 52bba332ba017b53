//! HQ client: people and company master data.
//!
//! HQ is the system of record for prospects; everything here is read-only.
//! Ids are opaque strings owned by HQ. Search endpoints return a flat page
//! object (`{"people": [...], "total", "page", "per_page"}`), single records
//! come back bare.

use serde::{Deserialize, Serialize};

use super::transport::{AuthScheme, Transport};
use super::UpstreamError;

const SERVICE: &str = "hq";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Person {
    pub id: String,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
    pub email: Option<String>,
    pub title: Option<String>,
    pub company_id: Option<String>,
    pub company_name: Option<String>,
    pub linkedin_url: Option<String>,
    pub location: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Company {
    pub id: String,
    pub name: String,
    pub domain: Option<String>,
    pub industry: Option<String>,
    pub employee_count: Option<i64>,
    pub location: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct PersonPage {
    pub people: Vec<Person>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CompanyPage {
    pub companies: Vec<Company>,
    pub total: u64,
    pub page: u32,
    pub per_page: u32,
}

#[derive(Debug, Deserialize)]
struct BulkPeople {
    people: Vec<Person>,
}

#[derive(Serialize)]
struct BulkPeopleBody<'a> {
    ids: &'a [String],
}

/// Typed client for the HQ master-data API.
#[derive(Clone)]
pub struct HqClient {
    transport: Transport,
}

impl HqClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            transport: Transport::new(SERVICE, base_url, api_key, AuthScheme::Header("X-Api-Key")),
        }
    }

    pub async fn search_people(
        &self,
        q: &str,
        title: Option<&str>,
        company_id: Option<&str>,
        page: u32,
        per_page: u32,
    ) -> Result<PersonPage, UpstreamError> {
        let mut query = vec![
            ("q", q.to_string()),
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];
        if let Some(title) = title {
            query.push(("title", title.to_string()));
        }
        if let Some(company_id) = company_id {
            query.push(("company_id", company_id.to_string()));
        }
        self.transport.get("/v1/people/search", &query).await
    }

    pub async fn get_person(&self, id: &str) -> Result<Person, UpstreamError> {
        self.transport.get(&format!("/v1/people/{id}"), &[]).await
    }

    /// Fetches many people in one call. Ids HQ no longer knows are simply
    /// absent from the response.
    pub async fn get_people_bulk(&self, ids: &[String]) -> Result<Vec<Person>, UpstreamError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }
        let BulkPeople { people } = self
            .transport
            .post("/v1/people/bulk", &BulkPeopleBody { ids })
            .await?;
        Ok(people)
    }

    pub async fn search_companies(
        &self,
        q: &str,
        page: u32,
        per_page: u32,
    ) -> Result<CompanyPage, UpstreamError> {
        let query = vec![
            ("q", q.to_string()),
            ("page", page.to_string()),
            ("per_page", per_page.to_string()),
        ];
        self.transport.get("/v1/companies/search", &query).await
    }

    pub async fn get_company(&self, id: &str) -> Result<Company, UpstreamError> {
        self.transport.get(&format!("/v1/companies/{id}"), &[]).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_person_page_tolerates_sparse_records() {
        let json = r#"{
            "people": [
                {"id": "p_9f2", "first_name": "Jane", "last_name": "Doe",
                 "email": "jane@prospect.io", "title": "VP Engineering",
                 "company_id": "c_77", "company_name": "Prospect Inc",
                 "linkedin_url": null, "location": "Berlin"},
                {"id": "p_a01"}
            ],
            "total": 2, "page": 1, "per_page": 25
        }"#;
        let page: PersonPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.people.len(), 2);
        assert_eq!(page.people[0].email.as_deref(), Some("jane@prospect.io"));
        assert!(page.people[1].email.is_none());
    }

    #[test]
    fn test_company_page_deserializes() {
        let json = r#"{
            "companies": [{"id": "c_77", "name": "Prospect Inc",
                           "domain": "prospect.io", "industry": "SaaS",
                           "employee_count": 240, "location": "Berlin"}],
            "total": 1, "page": 1, "per_page": 25
        }"#;
        let page: CompanyPage = serde_json::from_str(json).unwrap();
        assert_eq!(page.companies[0].domain.as_deref(), Some("prospect.io"));
        assert_eq!(page.total, 1);
    }
}
