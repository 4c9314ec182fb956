//! Triage Common - shared types for the triage and booking service.
//!
//! Data model rows, API request/response shapes, error taxonomy, and the
//! clock abstraction used by wait-time scoring.

pub mod api;
pub mod clock;
pub mod error;
pub mod model;

pub use api::*;
pub use clock::{Clock, ManualClock, SystemClock};
pub use error::TriageError;
pub use model::*;
