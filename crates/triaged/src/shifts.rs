//! Shift and slot bookkeeping.
//!
//! Straightforward batch inserts with no contention: a shift row plus one
//! slot row per interval, and the joined listing the booking form renders.

use chrono::Duration;
use tracing::info;
use triage_common::api::{ShiftRequest, ShiftView};
use triage_common::model::{RowId, Shift, Slot};
use triage_common::TriageError;

use crate::store::Store;

/// Create a shift and generate its slots.
pub async fn create_shift(store: &Store, req: &ShiftRequest) -> Result<u32, TriageError> {
    if store.doctors.get(req.doctor_id).await.is_none() {
        return Err(TriageError::UnknownShiftDoctor(req.doctor_id));
    }

    let slot_duration = req.slot_duration.max(1);
    let total_slots = req.duration_minutes / slot_duration;
    let end_time = req.start_time + Duration::minutes(i64::from(req.duration_minutes));

    let shift_id = store
        .shifts
        .insert(Shift {
            doctor_id: req.doctor_id,
            start_time: req.start_time,
            end_time,
            total_slots,
        })
        .await;

    for i in 0..total_slots {
        store
            .slots
            .insert(Slot {
                shift_id,
                start_time: req.start_time + Duration::minutes(i64::from(i * slot_duration)),
                is_booked: false,
            })
            .await;
    }

    info!(shift_id, total_slots, "shift created");
    Ok(total_slots)
}

/// All shifts joined with their doctor, ordered by start time.
pub async fn list_shifts(store: &Store) -> Vec<ShiftView> {
    let mut views = Vec::new();
    for (shift_id, shift) in store.shifts.snapshot().await {
        let Some(doctor) = store.doctors.get(shift.doctor_id).await else {
            continue;
        };
        views.push(ShiftView {
            shift_id,
            start_time: shift.start_time,
            end_time: shift.end_time,
            total_slots: shift.total_slots,
            doctor_id: shift.doctor_id,
            doctor_name: doctor.name,
            specialization: doctor.specialization,
        });
    }
    views.sort_by_key(|v| v.start_time);
    views
}

/// Slots belonging to one shift, in start order.
pub async fn shift_slots(store: &Store, shift_id: RowId) -> Vec<(RowId, Slot)> {
    let mut slots: Vec<(RowId, Slot)> = store
        .slots
        .snapshot()
        .await
        .into_iter()
        .filter(|(_, slot)| slot.shift_id == shift_id)
        .collect();
    slots.sort_by_key(|(_, slot)| slot.start_time);
    slots
}
