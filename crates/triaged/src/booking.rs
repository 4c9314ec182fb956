//! Direct slot booking.
//!
//! One atomic transaction: lock exactly the requested slot rows, verify all
//! are free, then write the booking, its link rows, and the booked flags
//! before any lock is released. Either every targeted slot ends up owned by
//! the new booking, or nothing changed at all.

use tracing::{info, warn};
use triage_common::api::BookingRequest;
use triage_common::model::{Booking, BookingKind, BookingStatus, RowId};
use triage_common::{Clock, TriageError};

use crate::store::Store;

/// Terminal states of a booking attempt. `Conflict` is an expected outcome
/// of losing a race, distinct from the error paths.
#[derive(Debug)]
pub enum BookingOutcome {
    Confirmed { booking_id: RowId },
    /// Some requested slots were already booked when we locked them.
    Conflict { taken: Vec<RowId> },
}

/// Book a set of slots for a patient, all-or-nothing.
///
/// Locks are taken in ascending id order so overlapping concurrent requests
/// cannot deadlock; of two racers on the same slot, exactly one confirms
/// and the other sees `Conflict`.
pub async fn book_slots(
    store: &Store,
    clock: &dyn Clock,
    req: &BookingRequest,
) -> Result<BookingOutcome, TriageError> {
    if req.slot_ids.is_empty() {
        return Err(TriageError::EmptySlotSelection);
    }

    let mut slot_ids = req.slot_ids.clone();
    slot_ids.sort_unstable();
    slot_ids.dedup();

    let mut locks = Vec::with_capacity(slot_ids.len());
    for &slot_id in &slot_ids {
        match store.slots.lock(slot_id).await {
            Some(lock) => locks.push(lock),
            // Nothing was written yet; dropping the held locks is the
            // whole rollback.
            None => return Err(TriageError::SlotNotFound),
        }
    }

    let taken: Vec<RowId> = locks
        .iter()
        .filter(|lock| lock.row().is_booked)
        .map(|lock| lock.id())
        .collect();
    if !taken.is_empty() {
        warn!(?taken, "slot booking lost the race");
        return Ok(BookingOutcome::Conflict { taken });
    }

    let booking_id = store
        .bookings
        .insert(Booking {
            status: BookingStatus::Confirmed,
            booked_at: clock.now(),
            kind: BookingKind::Slots {
                patient_name: req.patient_name.clone(),
                patient_email: req.patient_email.clone(),
                risk_score: req.risk_score.unwrap_or(1),
            },
        })
        .await;
    store.link_slots(booking_id, &slot_ids).await;
    for lock in &mut locks {
        lock.row_mut().is_booked = true;
    }
    for lock in locks {
        lock.commit();
    }

    info!(booking_id, slots = slot_ids.len(), "booking confirmed");
    Ok(BookingOutcome::Confirmed { booking_id })
}
