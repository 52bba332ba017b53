use axum::{
    extract::{Path, Query, State},
    Json,
};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::auth::CurrentOperator;
use crate::clients::modal::{Booking, BookingPatch, NewBooking};
use crate::errors::AppError;
use crate::state::AppState;

#[derive(Deserialize)]
pub struct ListBookingsQuery {
    pub stage: Option<String>,
}

#[derive(Serialize)]
pub struct BookingsResponse {
    pub bookings: Vec<Booking>,
}

#[derive(Deserialize)]
pub struct CreateBookingRequest {
    pub contact_email: String,
    pub stage: String,
    pub contact_name: Option<String>,
    pub company_name: Option<String>,
    pub value_usd: Option<f64>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

#[derive(Deserialize)]
pub struct UpdateBookingRequest {
    pub stage: Option<String>,
    pub value_usd: Option<f64>,
    pub scheduled_at: Option<DateTime<Utc>>,
    pub notes: Option<String>,
}

/// GET /api/v1/bookings
pub async fn handle_list_bookings(
    State(state): State<AppState>,
    _operator: CurrentOperator,
    Query(params): Query<ListBookingsQuery>,
) -> Result<Json<BookingsResponse>, AppError> {
    let bookings = state.modal.list_bookings(params.stage.as_deref()).await?;
    Ok(Json(BookingsResponse { bookings }))
}

/// POST /api/v1/bookings
pub async fn handle_create_booking(
    State(state): State<AppState>,
    operator: CurrentOperator,
    Json(req): Json<CreateBookingRequest>,
) -> Result<Json<Booking>, AppError> {
    let contact_email = req.contact_email.trim();
    if contact_email.is_empty() || !contact_email.contains('@') {
        return Err(AppError::Validation(
            "contact_email must be an email address".to_string(),
        ));
    }
    let stage = req.stage.trim();
    if stage.is_empty() {
        return Err(AppError::Validation("stage cannot be empty".to_string()));
    }

    let booking = state
        .modal
        .create_booking(&NewBooking {
            contact_email,
            stage,
            contact_name: req.contact_name.as_deref(),
            company_name: req.company_name.as_deref(),
            value_usd: req.value_usd,
            scheduled_at: req.scheduled_at,
            notes: req.notes.as_deref(),
        })
        .await?;
    info!(
        "Operator {} created booking {} ({})",
        operator.email, booking.id, booking.stage
    );
    Ok(Json(booking))
}

/// GET /api/v1/bookings/:id
pub async fn handle_get_booking(
    State(state): State<AppState>,
    _operator: CurrentOperator,
    Path(id): Path<String>,
) -> Result<Json<Booking>, AppError> {
    let booking = state.modal.get_booking(&id).await?;
    Ok(Json(booking))
}

/// PATCH /api/v1/bookings/:id
pub async fn handle_update_booking(
    State(state): State<AppState>,
    operator: CurrentOperator,
    Path(id): Path<String>,
    Json(req): Json<UpdateBookingRequest>,
) -> Result<Json<Booking>, AppError> {
    let patch = BookingPatch {
        stage: req.stage.as_deref(),
        value_usd: req.value_usd,
        scheduled_at: req.scheduled_at,
        notes: req.notes.as_deref(),
    };
    if patch.is_empty() {
        return Err(AppError::Validation(
            "provide at least one of stage, value_usd, scheduled_at, notes".to_string(),
        ));
    }
    if let Some(stage) = patch.stage {
        if stage.trim().is_empty() {
            return Err(AppError::Validation("stage cannot be empty".to_string()));
        }
    }

    let booking = state.modal.update_booking(&id, &patch).await?;
    info!(
        "Operator {} updated booking {} (stage {})",
        operator.email, booking.id, booking.stage
    );
    Ok(Json(booking))
}
