//! Error types for the triage service.
//!
//! Contention outcomes (slots taken, no ambulance free) are NOT errors;
//! workflows report those as structured results. These variants cover
//! validation faults and system failures only.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TriageError {
    #[error("Doctor {0} not found")]
    DoctorNotFound(u32),

    #[error("Shift doctor {0} does not exist")]
    UnknownShiftDoctor(u32),

    #[error("Some slots do not exist")]
    SlotNotFound,

    #[error("No slots selected")]
    EmptySlotSelection,

    #[error("Missing required field: {0}")]
    MissingField(&'static str),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal error: {0}")]
    Internal(String),
}
