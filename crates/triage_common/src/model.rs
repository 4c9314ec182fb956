//! Data model rows for the triage and booking service.
//!
//! Field sets mirror the relational schema: doctors, shifts, slots, patients,
//! ambulances, bookings, and the booking/slot link table.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Row identifier. Ids are allocated serially per table, starting at 1.
pub type RowId = u32;

/// Department label assigned when no specialization rule matches.
pub const GENERAL_PHYSICIAN: &str = "General Physician";

/// A registered patient. Upserted by email: a repeat email updates age and
/// history, never creates a duplicate row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Patient {
    pub name: String,
    pub age: u32,
    pub weight_kg: u32,
    pub height_cm: u32,
    pub medical_history: String,
    pub email: String,
}

/// A doctor, read-only reference data from the core's perspective.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Doctor {
    pub name: String,
    pub specialization: String,
}

/// A doctor's working interval, subdivided into slots.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Shift {
    pub doctor_id: RowId,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub total_slots: u32,
}

/// A bookable time unit within a shift. The booked flag plus link rows
/// jointly encode exclusive ownership by one booking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Slot {
    pub shift_id: RowId,
    pub start_time: DateTime<Utc>,
    pub is_booked: bool,
}

/// An ambulance unit in the dispatch pool.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Ambulance {
    pub plate_number: String,
    pub is_available: bool,
}

/// Booking lifecycle status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BookingStatus {
    Queued,
    Confirmed,
    Cancelled,
}

/// The two shapes a booking can take. Exactly one is populated per booking,
/// which the enum enforces structurally.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum BookingKind {
    /// Triage intake: the patient waits in a specialization queue.
    Queue {
        patient_id: RowId,
        severity_level: u8,
        specialization: String,
        ambulance_id: Option<RowId>,
        symptoms: String,
    },
    /// Direct slot booking: the patient holds concrete appointment slots.
    Slots {
        patient_name: String,
        patient_email: String,
        risk_score: u32,
    },
}

/// A patient's claim on either a queue position or a set of slots.
/// Never deleted, only transitioned between statuses.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Booking {
    pub status: BookingStatus,
    pub booked_at: DateTime<Utc>,
    pub kind: BookingKind,
}

/// Many-to-many link between a booking and the slots it holds. Append-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BookingSlot {
    pub booking_id: RowId,
    pub slot_id: RowId,
}
