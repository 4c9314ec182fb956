//! In-process transactional row store.
//!
//! The relational engine is an external collaborator; this module provides
//! the contract the workflows consume from it: row-level exclusive claims
//! (blocking and skip-if-locked) with publish-on-commit writes, claim-free
//! committed reads, and an atomic patient upsert keyed by email. All
//! exclusion between concurrent requests happens here — there is no other
//! shared mutable state in the process.

pub mod table;

use std::collections::HashMap;

use tokio::sync::RwLock;

use triage_common::model::{
    Ambulance, Booking, BookingSlot, Doctor, Patient, RowId, Shift, Slot,
};

pub use table::{RowLock, Table, TryLock};

/// All tables of the service, plus the patient email uniqueness index.
pub struct Store {
    pub doctors: Table<Doctor>,
    pub shifts: Table<Shift>,
    pub slots: Table<Slot>,
    pub patients: Table<Patient>,
    pub ambulances: Table<Ambulance>,
    pub bookings: Table<Booking>,
    booking_slots: RwLock<Vec<BookingSlot>>,
    patient_emails: RwLock<HashMap<String, RowId>>,
}

/// A patient row claimed by an in-flight intake transaction. The row lock
/// is held until commit or undo, so concurrent submissions of the same
/// email serialize on this one row.
pub enum PatientClaim {
    /// The email was already registered; age and history were overwritten.
    Existing(RowLock<Patient>),
    /// A fresh row was inserted for a first-time email.
    Created(RowLock<Patient>),
}

impl PatientClaim {
    pub fn patient_id(&self) -> RowId {
        match self {
            PatientClaim::Existing(lock) | PatientClaim::Created(lock) => lock.id(),
        }
    }

    /// Publish the upserted values and release the row.
    pub fn commit(self) {
        match self {
            PatientClaim::Existing(lock) | PatientClaim::Created(lock) => lock.commit(),
        }
    }
}

impl Store {
    pub fn new() -> Self {
        Self {
            doctors: Table::new(),
            shifts: Table::new(),
            slots: Table::new(),
            patients: Table::new(),
            ambulances: Table::new(),
            bookings: Table::new(),
            booking_slots: RwLock::new(Vec::new()),
            patient_emails: RwLock::new(HashMap::new()),
        }
    }

    /// Insert-or-update a patient keyed by email. Last writer wins on age
    /// and history. The returned claim holds the row lock; the caller must
    /// either `commit` it or hand it to `undo_patient_upsert`.
    pub async fn upsert_patient(&self, profile: Patient) -> PatientClaim {
        loop {
            let mut index = self.patient_emails.write().await;
            match index.get(&profile.email).copied() {
                Some(id) => {
                    drop(index);
                    // The row can vanish if the transaction that inserted it
                    // aborts while we wait on its lock; go back through the
                    // index when that happens.
                    let Some(mut lock) = self.patients.lock(id).await else {
                        continue;
                    };
                    let still_indexed = self
                        .patient_emails
                        .read()
                        .await
                        .get(&profile.email)
                        .copied()
                        == Some(id);
                    if !still_indexed {
                        drop(lock);
                        continue;
                    }
                    let row = lock.row_mut();
                    row.age = profile.age;
                    row.medical_history = profile.medical_history.clone();
                    return PatientClaim::Existing(lock);
                }
                None => {
                    let id = self.patients.alloc_id();
                    // The row enters the table with its claim already held,
                    // so nothing can touch it before this transaction
                    // commits or aborts.
                    let lock = self.patients.insert_claimed(id, profile.clone()).await;
                    index.insert(profile.email.clone(), id);
                    drop(index);
                    return PatientClaim::Created(lock);
                }
            }
        }
    }

    /// Undo an upsert: discard the unpublished update, or remove a row
    /// that a first-time submission inserted.
    pub async fn undo_patient_upsert(&self, claim: PatientClaim) {
        match claim {
            PatientClaim::Existing(lock) => lock.rollback(),
            PatientClaim::Created(lock) => {
                let id = lock.id();
                let email = lock.row().email.clone();
                let mut index = self.patient_emails.write().await;
                index.remove(&email);
                drop(lock);
                self.patients.remove(id).await;
            }
        }
    }

    /// Look up a patient id by email without claiming the row.
    pub async fn patient_id_by_email(&self, email: &str) -> Option<RowId> {
        self.patient_emails.read().await.get(email).copied()
    }

    /// Append link rows binding a booking to its slots.
    pub async fn link_slots(&self, booking_id: RowId, slot_ids: &[RowId]) {
        let mut links = self.booking_slots.write().await;
        links.extend(slot_ids.iter().map(|&slot_id| BookingSlot {
            booking_id,
            slot_id,
        }));
    }

    /// Bookings linked to a slot. One entry at most for a consistent store.
    pub async fn bookings_for_slot(&self, slot_id: RowId) -> Vec<RowId> {
        self.booking_slots
            .read()
            .await
            .iter()
            .filter(|link| link.slot_id == slot_id)
            .map(|link| link.booking_id)
            .collect()
    }

    /// Slots held by a booking.
    pub async fn slots_for_booking(&self, booking_id: RowId) -> Vec<RowId> {
        self.booking_slots
            .read()
            .await
            .iter()
            .filter(|link| link.booking_id == booking_id)
            .map(|link| link.slot_id)
            .collect()
    }

    /// Advisory count of free ambulance units. A committed-state read that
    /// takes no claims, so it can never make a concurrent skip-if-locked
    /// dispatch pass over a free unit. In-flight claims are invisible until
    /// they commit; the answer may be stale by the time the caller reads it.
    pub async fn available_ambulances(&self) -> usize {
        self.ambulances
            .snapshot()
            .await
            .into_iter()
            .filter(|(_, unit)| unit.is_available)
            .count()
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::new()
    }
}
