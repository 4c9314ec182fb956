//! Request and response shapes for the HTTP surface.
//!
//! Field names serialize as camelCase to match the wire format the
//! dashboard and triage form consume.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::model::RowId;

/// `POST /api/triage` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageRequest {
    pub name: String,
    pub age: u32,
    #[serde(default)]
    pub weight: u32,
    #[serde(default)]
    pub height: u32,
    pub email: String,
    #[serde(default)]
    pub history: String,
    pub symptoms: String,
}

/// Queue transparency block returned with a successful triage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueDetails {
    /// 1-based position in the specialization queue.
    pub position: usize,
    pub estimated_wait_mins: i64,
    /// Advisory: may be stale by the time the client reads it.
    pub available_ambulances: usize,
}

/// `POST /api/triage` success response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TriageResponse {
    pub message: String,
    pub specialization: String,
    pub severity_level: u8,
    pub ambulance: String,
    pub status: String,
    pub queue_details: QueueDetails,
}

/// `GET /api/doctor/queue` query parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueQuery {
    pub doctor_id: RowId,
}

/// One row of a doctor's live priority queue, sorted descending by score.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QueueEntry {
    pub booking_id: RowId,
    pub patient_name: String,
    pub severity_level: u8,
    pub symptoms: String,
    pub hours_waiting: f64,
    pub priority_score: f64,
}

/// `POST /api/bookings` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingRequest {
    pub patient_name: String,
    pub patient_email: String,
    pub slot_ids: Vec<RowId>,
    #[serde(default)]
    pub risk_score: Option<u32>,
}

/// `POST /api/bookings` success response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookingResponse {
    pub message: String,
    pub booking_id: RowId,
    pub status: String,
}

/// `POST /api/admin/shifts` request body.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftRequest {
    pub doctor_id: RowId,
    pub start_time: DateTime<Utc>,
    pub duration_minutes: u32,
    #[serde(default = "default_slot_duration")]
    pub slot_duration: u32,
}

fn default_slot_duration() -> u32 {
    15
}

/// One row of `GET /api/shifts`: shift joined with its doctor.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ShiftView {
    pub shift_id: RowId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub total_slots: u32,
    pub doctor_id: RowId,
    pub doctor_name: String,
    pub specialization: String,
}
