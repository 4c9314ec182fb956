//! Live priority queue reads.
//!
//! No ordering is persisted: every read recomputes scores from stored
//! severity and elapsed wait at that moment, so re-reads may reorder as
//! time passes. That is the contract, not a bug.

use triage_common::api::QueueEntry;
use triage_common::model::{BookingKind, BookingStatus, RowId};
use triage_common::{Clock, TriageError};

use crate::scoring::priority_score;
use crate::store::Store;

/// How many queued patients in a specialization outrank the given score as
/// of `now`. Strictly-greater comparison: a booking probing its own score
/// with the same timestamp is not counted ahead of itself.
pub async fn queued_ahead(
    store: &Store,
    now: chrono::DateTime<chrono::Utc>,
    specialization: &str,
    score: f64,
) -> usize {
    store
        .bookings
        .snapshot()
        .await
        .into_iter()
        .filter(|(_, booking)| booking.status == BookingStatus::Queued)
        .filter_map(|(_, booking)| match booking.kind {
            BookingKind::Queue {
                severity_level,
                specialization: ref spec,
                ..
            } if spec.as_str() == specialization => {
                Some(priority_score(severity_level, hours_between(&booking.booked_at, &now)))
            }
            _ => None,
        })
        .filter(|other| *other > score)
        .count()
}

/// The live queue for one doctor's specialization, sorted descending by
/// priority score.
pub async fn doctor_queue(
    store: &Store,
    clock: &dyn Clock,
    doctor_id: RowId,
) -> Result<Vec<QueueEntry>, TriageError> {
    let doctor = store
        .doctors
        .get(doctor_id)
        .await
        .ok_or(TriageError::DoctorNotFound(doctor_id))?;

    let now = clock.now();
    let mut entries = Vec::new();
    for (booking_id, booking) in store.bookings.snapshot().await {
        if booking.status != BookingStatus::Queued {
            continue;
        }
        let (patient_id, severity_level, symptoms) = match &booking.kind {
            BookingKind::Queue {
                patient_id,
                severity_level,
                specialization,
                symptoms,
                ..
            } if *specialization == doctor.specialization => {
                (*patient_id, *severity_level, symptoms.clone())
            }
            _ => continue,
        };

        let patient_name = store
            .patients
            .get(patient_id)
            .await
            .map(|p| p.name)
            .unwrap_or_else(|| String::from("Unknown"));
        let hours_waiting = hours_between(&booking.booked_at, &now);
        entries.push(QueueEntry {
            booking_id,
            patient_name,
            severity_level,
            symptoms,
            hours_waiting,
            priority_score: priority_score(severity_level, hours_waiting),
        });
    }

    entries.sort_by(|a, b| b.priority_score.total_cmp(&a.priority_score));
    Ok(entries)
}

fn hours_between(
    from: &chrono::DateTime<chrono::Utc>,
    to: &chrono::DateTime<chrono::Utc>,
) -> f64 {
    (*to - *from).num_milliseconds() as f64 / 3_600_000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, Utc};
    use triage_common::model::{Booking, Doctor, Patient};
    use triage_common::ManualClock;

    async fn queued_booking(
        store: &Store,
        patient_id: RowId,
        severity: u8,
        spec: &str,
        at: chrono::DateTime<Utc>,
    ) -> RowId {
        store
            .bookings
            .insert(Booking {
                status: BookingStatus::Queued,
                booked_at: at,
                kind: BookingKind::Queue {
                    patient_id,
                    severity_level: severity,
                    specialization: spec.into(),
                    ambulance_id: None,
                    symptoms: "test".into(),
                },
            })
            .await
    }

    async fn patient(store: &Store, name: &str) -> RowId {
        store
            .patients
            .insert(Patient {
                name: name.into(),
                age: 30,
                weight_kg: 70,
                height_cm: 175,
                medical_history: String::new(),
                email: format!("{name}@example.com"),
            })
            .await
    }

    #[tokio::test]
    async fn unknown_doctor_is_not_found() {
        let store = Store::new();
        let clock = ManualClock::new(Utc::now());
        let err = doctor_queue(&store, &clock, 9).await.unwrap_err();
        assert!(matches!(err, TriageError::DoctorNotFound(9)));
    }

    #[tokio::test]
    async fn queue_sorts_by_live_score() {
        let store = Store::new();
        let start = Utc::now();
        let clock = ManualClock::new(start);
        let doctor_id = store
            .doctors
            .insert(Doctor {
                name: "Dr. Hart".into(),
                specialization: "Cardiology".into(),
            })
            .await;

        let p1 = patient(&store, "early-mild").await;
        let p2 = patient(&store, "late-severe").await;
        let low = queued_booking(&store, p1, 2, "Cardiology", start).await;
        let high = queued_booking(&store, p2, 5, "Cardiology", start).await;
        // Different specialization never shows up.
        let p3 = patient(&store, "other").await;
        queued_booking(&store, p3, 5, "Orthopedics", start).await;

        let entries = doctor_queue(&store, &clock, doctor_id).await.unwrap();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].booking_id, high);
        assert_eq!(entries[1].booking_id, low);
        assert_eq!(entries[0].patient_name, "late-severe");
    }

    #[tokio::test]
    async fn waiting_long_enough_overtakes_higher_severity() {
        let store = Store::new();
        let start = Utc::now();
        let clock = ManualClock::new(start);
        let doctor_id = store
            .doctors
            .insert(Doctor {
                name: "Dr. Hart".into(),
                specialization: "Cardiology".into(),
            })
            .await;

        let p1 = patient(&store, "waiting").await;
        let p2 = patient(&store, "fresh").await;
        // Severity 3 waiting since `start`; severity 4 arrives 6 hours in.
        let waiting = queued_booking(&store, p1, 3, "Cardiology", start).await;
        clock.advance(Duration::hours(6));
        let fresh = queued_booking(&store, p2, 4, "Cardiology", clock.now()).await;

        // At arrival: 30 + 12 = 42 vs 40. The long wait wins.
        let entries = doctor_queue(&store, &clock, doctor_id).await.unwrap();
        assert_eq!(entries[0].booking_id, waiting);

        // Rankings are recomputed per read; the gap only grows from here.
        clock.advance(Duration::hours(1));
        let entries = doctor_queue(&store, &clock, doctor_id).await.unwrap();
        assert_eq!(entries[0].booking_id, waiting);
        assert_eq!(entries[1].booking_id, fresh);
    }

    #[tokio::test]
    async fn queued_ahead_counts_strictly_greater() {
        let store = Store::new();
        let start = Utc::now();

        let p = patient(&store, "a").await;
        queued_booking(&store, p, 5, "Cardiology", start).await;
        queued_booking(&store, p, 3, "Cardiology", start).await;

        // Probe score equal to the severity-3 entry: only severity 5 is ahead.
        let ahead = queued_ahead(&store, start, "Cardiology", 30.0).await;
        assert_eq!(ahead, 1);
    }
}
