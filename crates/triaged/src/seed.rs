//! Demo seed data.
//!
//! Three specialist doctors and two ambulance units, inserted only into an
//! empty store so restarts stay idempotent.

use tracing::info;
use triage_common::model::{Ambulance, Doctor};

use crate::store::Store;

pub async fn seed_demo(store: &Store) {
    if store.doctors.is_empty().await {
        for (name, specialization) in [
            ("Dr. Bones", "Orthopedics"),
            ("Dr. Hart", "Cardiology"),
            ("Dr. Cure", "Oncology"),
        ] {
            store
                .doctors
                .insert(Doctor {
                    name: name.into(),
                    specialization: specialization.into(),
                })
                .await;
        }
        info!("seeded demo doctors");
    }

    if store.ambulances.is_empty().await {
        for plate in ["AMB-01", "AMB-02"] {
            store
                .ambulances
                .insert(Ambulance {
                    plate_number: plate.into(),
                    is_available: true,
                })
                .await;
        }
        info!("seeded demo ambulances");
    }
}
