//! Ambulance dispatch.
//!
//! Claims one available unit with a lock-and-skip policy: a candidate row
//! that is mid-claim by a concurrent transaction is skipped, never waited
//! on. Only transactions hold row claims — plain reads such as the advisory
//! availability count go to committed state — so a skip always means a real
//! competing claim, never a passing reader. Dispatch runs for severity >= 4,
//! so queuing behind one contended row is exactly what this path must avoid.

use tracing::{info, warn};
use triage_common::model::{Ambulance, RowId};

use crate::store::{RowLock, Store, TryLock};

/// Outcome of one dispatch attempt. `NoneAvailable` is a normal terminal
/// state, not an error; the surrounding transaction still commits.
pub enum Dispatch {
    Claimed(ClaimedUnit),
    NoneAvailable,
}

/// A claimed unit. The row lock rides along so the owning transaction
/// decides the claim's fate: `commit` keeps the unit marked busy,
/// `release` undoes the claim on abort.
pub struct ClaimedUnit {
    lock: RowLock<Ambulance>,
}

impl ClaimedUnit {
    pub fn unit_id(&self) -> RowId {
        self.lock.id()
    }

    pub fn plate(&self) -> &str {
        &self.lock.row().plate_number
    }

    pub fn commit(self) {
        self.lock.commit();
    }

    pub fn release(self) {
        self.lock.rollback();
    }
}

/// Try to claim one available unit. Two concurrent calls never claim the
/// same unit: the claim flips `is_available` under the row lock, and a row
/// someone else holds is skipped rather than waited on.
pub async fn dispatch(store: &Store) -> Dispatch {
    for id in store.ambulances.ids().await {
        match store.ambulances.try_lock(id).await {
            TryLock::Acquired(mut lock) => {
                if !lock.row().is_available {
                    continue;
                }
                lock.row_mut().is_available = false;
                info!(unit = id, plate = %lock.row().plate_number, "ambulance claimed");
                return Dispatch::Claimed(ClaimedUnit { lock });
            }
            // Mid-claim elsewhere; by the time it unlocks it will not be
            // available, so move straight to the next candidate.
            TryLock::Busy => continue,
            TryLock::Missing => continue,
        }
    }
    warn!("no ambulance available, reporting delayed");
    Dispatch::NoneAvailable
}
