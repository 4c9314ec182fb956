//! Intake orchestration.
//!
//! The end-to-end triage workflow as one transactional function:
//! upsert patient, classify, dispatch an ambulance when severity warrants,
//! insert the queued booking, compute the queue position, commit. Any
//! failure aborts the whole thing — patient upsert, ambulance claim, and
//! booking row are undone together, never piecemeal.

use tracing::{error, info};
use triage_common::api::TriageRequest;
use triage_common::model::{Booking, BookingKind, BookingStatus, Patient, RowId};
use triage_common::{Clock, TriageError};

use crate::dispatch::{self, ClaimedUnit, Dispatch};
use crate::queue::queued_ahead;
use crate::scoring::{estimated_wait_mins, priority_score};
use crate::store::{PatientClaim, Store};
use crate::triage;

/// Severity at which an ambulance dispatch is attempted.
pub const DISPATCH_SEVERITY: u8 = 4;

/// Result of a committed intake.
#[derive(Debug, Clone)]
pub struct TriageOutcome {
    pub specialization: String,
    pub severity: u8,
    pub ambulance: String,
    /// 1-based position in the specialization queue at commit time.
    pub position: usize,
    pub estimated_wait_mins: i64,
    /// Advisory, read without locking; may be stale.
    pub available_ambulances: usize,
}

/// Writes accumulated by an in-flight intake, in acquisition order.
/// Committing releases the locks keeping the writes; aborting undoes them
/// in reverse.
#[derive(Default)]
struct IntakeTxn {
    patient: Option<PatientClaim>,
    ambulance: Option<ClaimedUnit>,
    booking_id: Option<RowId>,
}

impl IntakeTxn {
    fn commit(self) {
        if let Some(unit) = self.ambulance {
            unit.commit();
        }
        if let Some(claim) = self.patient {
            claim.commit();
        }
    }

    async fn abort(self, store: &Store) {
        if let Some(booking_id) = self.booking_id {
            store.bookings.remove(booking_id).await;
        }
        if let Some(unit) = self.ambulance {
            unit.release();
        }
        if let Some(claim) = self.patient {
            store.undo_patient_upsert(claim).await;
        }
    }
}

/// Triage one incoming patient. All-or-nothing; a "no ambulance available"
/// outcome is informational and still commits.
pub async fn intake(
    store: &Store,
    clock: &dyn Clock,
    req: &TriageRequest,
) -> Result<TriageOutcome, TriageError> {
    let mut txn = IntakeTxn::default();
    match run(store, clock, req, &mut txn).await {
        Ok(outcome) => {
            txn.commit();
            info!(
                specialization = %outcome.specialization,
                severity = outcome.severity,
                position = outcome.position,
                "triage committed"
            );
            Ok(outcome)
        }
        Err(err) => {
            error!(%err, "triage aborted, rolling back");
            txn.abort(store).await;
            Err(err)
        }
    }
}

async fn run(
    store: &Store,
    clock: &dyn Clock,
    req: &TriageRequest,
    txn: &mut IntakeTxn,
) -> Result<TriageOutcome, TriageError> {
    if req.email.trim().is_empty() {
        return Err(TriageError::MissingField("email"));
    }
    if req.name.trim().is_empty() {
        return Err(TriageError::MissingField("name"));
    }

    // Advisory read, taken before the claim like the dashboard would see it.
    let available_ambulances = store.available_ambulances().await;

    let claim = store
        .upsert_patient(Patient {
            name: req.name.clone(),
            age: req.age,
            weight_kg: req.weight,
            height_cm: req.height,
            medical_history: req.history.clone(),
            email: req.email.clone(),
        })
        .await;
    let patient_id = claim.patient_id();
    txn.patient = Some(claim);

    let assessment = triage::assess(&req.symptoms, req.age);

    let (ambulance_id, ambulance) = if assessment.severity >= DISPATCH_SEVERITY {
        match dispatch::dispatch(store).await {
            Dispatch::Claimed(unit) => {
                let msg = format!("Unit {} Dispatched", unit.plate());
                let unit_id = unit.unit_id();
                txn.ambulance = Some(unit);
                (Some(unit_id), msg)
            }
            Dispatch::NoneAvailable => (None, String::from("Delayed (All units busy)")),
        }
    } else {
        (None, String::from("Not needed"))
    };

    let now = clock.now();
    let booking_id = store
        .bookings
        .insert(Booking {
            status: BookingStatus::Queued,
            booked_at: now,
            kind: BookingKind::Queue {
                patient_id,
                severity_level: assessment.severity,
                specialization: assessment.specialization.to_string(),
                ambulance_id,
                symptoms: req.symptoms.clone(),
            },
        })
        .await;
    txn.booking_id = Some(booking_id);

    // One timestamp serves both the booking row and the ranking read, so
    // this booking scores exactly its probe value and the strict comparison
    // leaves it out of its own count.
    let my_score = priority_score(assessment.severity, 0.0);
    let ahead = queued_ahead(store, now, assessment.specialization, my_score).await;
    let position = ahead + 1;

    Ok(TriageOutcome {
        specialization: assessment.specialization.to_string(),
        severity: assessment.severity,
        ambulance,
        position,
        estimated_wait_mins: estimated_wait_mins(position),
        available_ambulances,
    })
}
