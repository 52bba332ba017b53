//! Modal client: sales-pipeline bookings.
//!
//! Modal returns bare JSON (no envelope): arrays for lists, objects for
//! single records. Stage names are owned by Modal and passed through
//! unvalidated beyond shape.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::transport::{AuthScheme, Transport};
use super::UpstreamError;

const SERVICE: &str = "modal";

/// A deal/booking in the sales pipeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub id: String,
    pub contact_email: String,
    pub contact_name: Option<String>,
    pub company_name: Option<String>,
    pub stage: String,
    pub value_usd: Option<f64>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Body for creating a booking.
#[derive(Debug, Serialize)]
pub struct NewBooking<'a> {
    pub contact_email: &'a str,
    pub stage: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub company_name: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_usd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<&'a str>,
}

/// Partial update for a booking. Only set fields go on the wire.
#[derive(Debug, Default, Serialize)]
pub struct BookingPatch<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stage: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value_usd: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub scheduled_at: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<&'a str>,
}

impl BookingPatch<'_> {
    pub fn is_empty(&self) -> bool {
        self.stage.is_none()
            && self.value_usd.is_none()
            && self.scheduled_at.is_none()
            && self.notes.is_none()
    }
}

/// Typed client for the Modal deals/bookings API.
#[derive(Clone)]
pub struct ModalClient {
    transport: Transport,
}

impl ModalClient {
    pub fn new(base_url: &str, api_key: &str) -> Self {
        Self {
            transport: Transport::new(SERVICE, base_url, api_key, AuthScheme::Bearer),
        }
    }

    pub async fn list_bookings(&self, stage: Option<&str>) -> Result<Vec<Booking>, UpstreamError> {
        let mut query = Vec::new();
        if let Some(stage) = stage {
            query.push(("stage", stage.to_string()));
        }
        self.transport.get("/api/bookings", &query).await
    }

    pub async fn create_booking(&self, booking: &NewBooking<'_>) -> Result<Booking, UpstreamError> {
        self.transport.post("/api/bookings", booking).await
    }

    pub async fn get_booking(&self, id: &str) -> Result<Booking, UpstreamError> {
        self.transport.get(&format!("/api/bookings/{id}"), &[]).await
    }

    pub async fn update_booking(
        &self,
        id: &str,
        patch: &BookingPatch<'_>,
    ) -> Result<Booking, UpstreamError> {
        self.transport
            .patch(&format!("/api/bookings/{id}"), patch)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_booking_deserializes_bare_object() {
        let json = r#"{
            "id": "bk_31c",
            "contact_email": "jane@prospect.io",
            "contact_name": "Jane Doe",
            "company_name": "Prospect Inc",
            "stage": "demo",
            "value_usd": 18000.0,
            "scheduled_at": "2025-07-10T15:00:00Z",
            "notes": null,
            "created_at": "2025-07-01T08:00:00Z",
            "updated_at": "2025-07-02T08:00:00Z"
        }"#;
        let booking: Booking = serde_json::from_str(json).unwrap();
        assert_eq!(booking.stage, "demo");
        assert_eq!(booking.value_usd, Some(18000.0));
        assert!(booking.notes.is_none());
    }

    #[test]
    fn test_patch_is_empty() {
        assert!(BookingPatch::default().is_empty());
        let patch = BookingPatch {
            stage: Some("proposal"),
            ..Default::default()
        };
        assert!(!patch.is_empty());
    }

    #[test]
    fn test_patch_serializes_only_set_fields() {
        let patch = BookingPatch {
            stage: Some("closed_won"),
            value_usd: Some(24000.0),
            ..Default::default()
        };
        let value = serde_json::to_value(&patch).unwrap();
        assert_eq!(value["stage"], "closed_won");
        assert!(value.get("notes").is_none());
        assert!(value.get("scheduled_at").is_none());
    }
}
