//! API routes for triaged
//!
//! Error mapping policy: validation faults surface as 4xx with a message,
//! contention outcomes surface as structured non-error responses (409 for a
//! lost slot race, a "delayed" payload for an empty dispatch pool), and
//! anything unexpected collapses to an opaque 500.

use crate::booking::{self, BookingOutcome};
use crate::intake;
use crate::queue;
use crate::server::AppState;
use crate::shifts;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use serde_json::json;
use std::sync::Arc;
use tracing::error;
use triage_common::api::{
    BookingRequest, BookingResponse, QueueDetails, QueueEntry, QueueQuery, ShiftRequest,
    ShiftView, TriageRequest, TriageResponse,
};
use triage_common::TriageError;

type AppStateArc = Arc<AppState>;

pub fn api_routes() -> Router<AppStateArc> {
    Router::new()
        .route("/api/triage", post(triage))
        .route("/api/doctor/queue", get(doctor_queue))
        .route("/api/bookings", post(create_booking))
        .route("/api/admin/shifts", post(create_shift))
        .route("/api/shifts", get(list_shifts))
        .route("/api/health", get(health))
}

type ErrorBody = (StatusCode, Json<serde_json::Value>);

fn error_response(err: TriageError) -> ErrorBody {
    let status = match &err {
        TriageError::DoctorNotFound(_)
        | TriageError::UnknownShiftDoctor(_)
        | TriageError::SlotNotFound => StatusCode::NOT_FOUND,
        TriageError::EmptySlotSelection | TriageError::MissingField(_) => {
            StatusCode::BAD_REQUEST
        }
        TriageError::Storage(_) | TriageError::Internal(_) => {
            error!("request failed: {err}");
            return (
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(json!({ "message": "Internal Server Error" })),
            );
        }
    };
    (status, Json(json!({ "message": err.to_string() })))
}

// ============================================================================
// Triage Routes
// ============================================================================

async fn triage(
    State(state): State<AppStateArc>,
    Json(req): Json<TriageRequest>,
) -> Result<(StatusCode, Json<TriageResponse>), ErrorBody> {
    let outcome = intake::intake(&state.store, state.clock.as_ref(), &req)
        .await
        .map_err(error_response)?;

    Ok((
        StatusCode::CREATED,
        Json(TriageResponse {
            message: "Triage Complete".into(),
            specialization: outcome.specialization,
            severity_level: outcome.severity,
            ambulance: outcome.ambulance,
            status: "ADDED_TO_QUEUE".into(),
            queue_details: QueueDetails {
                position: outcome.position,
                estimated_wait_mins: outcome.estimated_wait_mins,
                available_ambulances: outcome.available_ambulances,
            },
        }),
    ))
}

async fn doctor_queue(
    State(state): State<AppStateArc>,
    Query(query): Query<QueueQuery>,
) -> Result<Json<Vec<QueueEntry>>, ErrorBody> {
    let entries = queue::doctor_queue(&state.store, state.clock.as_ref(), query.doctor_id)
        .await
        .map_err(error_response)?;
    Ok(Json(entries))
}

// ============================================================================
// Booking Routes
// ============================================================================

async fn create_booking(
    State(state): State<AppStateArc>,
    Json(req): Json<BookingRequest>,
) -> Result<Response, ErrorBody> {
    let outcome = booking::book_slots(&state.store, state.clock.as_ref(), &req)
        .await
        .map_err(error_response)?;

    match outcome {
        BookingOutcome::Confirmed { booking_id } => Ok((
            StatusCode::CREATED,
            Json(BookingResponse {
                message: "Booking Successful".into(),
                booking_id,
                status: "CONFIRMED".into(),
            }),
        )
            .into_response()),
        // A lost race is an expected outcome, not a server error.
        BookingOutcome::Conflict { taken } => Ok((
            StatusCode::CONFLICT,
            Json(json!({
                "message": "One or more selected slots were just taken by another user.",
                "status": "FAILED",
                "conflictSlotIds": taken,
            })),
        )
            .into_response()),
    }
}

// ============================================================================
// Shift Routes
// ============================================================================

async fn create_shift(
    State(state): State<AppStateArc>,
    Json(req): Json<ShiftRequest>,
) -> Result<(StatusCode, Json<serde_json::Value>), ErrorBody> {
    let total_slots = shifts::create_shift(&state.store, &req)
        .await
        .map_err(error_response)?;
    Ok((
        StatusCode::CREATED,
        Json(json!({ "message": format!("Shift created with {total_slots} slots.") })),
    ))
}

async fn list_shifts(State(state): State<AppStateArc>) -> Json<Vec<ShiftView>> {
    Json(shifts::list_shifts(&state.store).await)
}

// ============================================================================
// Health
// ============================================================================

async fn health() -> Json<serde_json::Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
