//! End-to-end intake flows against a seeded store.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tokio::sync::Barrier;

use triage_common::api::TriageRequest;
use triage_common::ManualClock;
use triaged::intake::intake;
use triaged::queue::doctor_queue;
use triaged::seed::seed_demo;
use triaged::store::Store;

fn request(name: &str, email: &str, age: u32, symptoms: &str) -> TriageRequest {
    TriageRequest {
        name: name.into(),
        age,
        weight: 70,
        height: 175,
        email: email.into(),
        history: "none".into(),
        symptoms: symptoms.into(),
    }
}

#[tokio::test]
async fn critical_patient_reaches_cardiology_queue() {
    let store = Store::new();
    seed_demo(&store).await;
    let clock = ManualClock::new(Utc::now());

    let outcome = intake(
        &store,
        &clock,
        &request("Ada", "ada@example.com", 70, "severe chest pain"),
    )
    .await
    .unwrap();

    assert_eq!(outcome.specialization, "Cardiology");
    assert_eq!(outcome.severity, 5);
    assert!(outcome.ambulance.starts_with("Unit AMB-"));
    assert_eq!(outcome.position, 1);

    // Dr. Hart (Cardiology) is doctor 2 in the demo seed.
    let entries = doctor_queue(&store, &clock, 2).await.unwrap();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].patient_name, "Ada");
    assert_eq!(entries[0].severity_level, 5);
    assert_eq!(entries[0].priority_score, 50.0);

    // One of the two seeded units is now out.
    assert_eq!(store.available_ambulances().await, 1);
}

#[tokio::test]
async fn queue_ranking_shifts_as_time_passes() {
    let store = Store::new();
    seed_demo(&store).await;
    let clock = ManualClock::new(Utc::now());

    // Two severity-3 orthopedic cases, six hours apart.
    intake(
        &store,
        &clock,
        &request("Old", "old@example.com", 40, "fracture"),
    )
    .await
    .unwrap();
    clock.advance(Duration::hours(6));
    let late = intake(
        &store,
        &clock,
        &request("New", "new@example.com", 40, "broken wrist joint"),
    )
    .await
    .unwrap();

    // 30 + 12 = 42 already outranks the newcomer's 30.
    assert_eq!(late.position, 2);

    // Dr. Bones (Orthopedics) sees the long waiter first.
    let entries = doctor_queue(&store, &clock, 1).await.unwrap();
    assert_eq!(entries[0].patient_name, "Old");
    assert!(entries[0].hours_waiting > 5.9);
    assert_eq!(entries[1].patient_name, "New");
}

#[tokio::test(flavor = "multi_thread", worker_threads = 8)]
async fn concurrent_critical_intakes_share_the_pool_cleanly() {
    const PATIENTS: usize = 6;

    let store = Arc::new(Store::new());
    seed_demo(&store).await; // two units
    let clock = Arc::new(ManualClock::new(Utc::now()));

    let barrier = Arc::new(Barrier::new(PATIENTS));
    let mut handles = Vec::new();
    for i in 0..PATIENTS {
        let store = Arc::clone(&store);
        let clock = Arc::clone(&clock);
        let barrier = Arc::clone(&barrier);
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            intake(
                &store,
                clock.as_ref(),
                &request(
                    &format!("P{i}"),
                    &format!("p{i}@example.com"),
                    50,
                    "unconscious after a heart attack",
                ),
            )
            .await
            .unwrap()
        }));
    }

    let mut dispatched = 0;
    let mut delayed = 0;
    for handle in handles {
        let outcome = handle.await.unwrap();
        if outcome.ambulance.contains("Dispatched") {
            dispatched += 1;
        } else {
            assert_eq!(outcome.ambulance, "Delayed (All units busy)");
            delayed += 1;
        }
    }

    assert_eq!(dispatched, 2, "exactly the seeded pool size");
    assert_eq!(delayed, PATIENTS - 2);
    assert_eq!(store.available_ambulances().await, 0);
    // Every intake committed, delayed ones included.
    assert_eq!(store.bookings.len().await, PATIENTS);
    assert_eq!(store.patients.len().await, PATIENTS);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn same_email_race_never_duplicates_the_patient() {
    const RACERS: usize = 8;

    let store = Arc::new(Store::new());
    let clock = Arc::new(ManualClock::new(Utc::now()));
    let barrier = Arc::new(Barrier::new(RACERS));

    let mut handles = Vec::new();
    for i in 0..RACERS {
        let store = Arc::clone(&store);
        let clock = Arc::clone(&clock);
        let barrier = Arc::clone(&barrier);
        handles.push(tokio::spawn(async move {
            barrier.wait().await;
            intake(
                &store,
                clock.as_ref(),
                &request("Same", "same@example.com", 30 + i as u32, "flu"),
            )
            .await
            .unwrap()
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    assert_eq!(store.patients.len().await, 1);
    assert_eq!(store.bookings.len().await, RACERS);
}
