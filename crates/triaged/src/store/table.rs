//! Row-locked table primitive.
//!
//! Each row pairs a claim mutex with its committed value. A transaction
//! acquires the claim (blocking `lock` or skip-if-locked `try_lock`) and
//! works on a private copy; `commit` publishes the copy, dropping the lock
//! discards it. Plain reads go straight to the committed value and never
//! touch the claim mutex, so readers do not block claimants and — more
//! importantly — cannot make a skip-if-locked claimant skip a free row.
//! The only holders of a claim mutex are transactions.
//!
//! This mirrors exclusive row selection with and without skip-locked
//! semantics in a relational store, where reads take no row locks and
//! uncommitted writes are invisible.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::sync::RwLock as StdRwLock;

use tokio::sync::{Mutex, OwnedMutexGuard, RwLock};

use triage_common::model::RowId;

struct RowCell<T> {
    claim: Arc<Mutex<()>>,
    committed: StdRwLock<T>,
}

impl<T: Clone> RowCell<T> {
    fn new(value: T) -> Self {
        Self {
            claim: Arc::new(Mutex::new(())),
            committed: StdRwLock::new(value),
        }
    }

    fn read_committed(&self) -> T {
        self.committed.read().unwrap().clone()
    }
}

/// An exclusively claimed row plus the transaction's working copy.
pub struct RowLock<T: Clone> {
    id: RowId,
    cell: Arc<RowCell<T>>,
    working: T,
    _guard: OwnedMutexGuard<()>,
}

impl<T: Clone> RowLock<T> {
    pub fn id(&self) -> RowId {
        self.id
    }

    pub fn row(&self) -> &T {
        &self.working
    }

    pub fn row_mut(&mut self) -> &mut T {
        &mut self.working
    }

    /// Publish the working copy as the committed value, then release.
    pub fn commit(self) {
        *self.cell.committed.write().unwrap() = self.working;
    }

    /// Discard the working copy and release. Equivalent to dropping the
    /// lock; named for call sites where the abort is the point.
    pub fn rollback(self) {}
}

/// Outcome of a skip-if-locked acquisition attempt.
pub enum TryLock<T: Clone> {
    Acquired(RowLock<T>),
    /// Mid-claim by a concurrent transaction; the caller should move on.
    Busy,
    /// No row with that id.
    Missing,
}

/// A table of rows with serial id allocation.
///
/// The map lock is only ever held briefly; callers must not wait on a
/// claim mutex while holding it. Workflows that claim several rows do so
/// in ascending id order, which rules out lock cycles between them.
pub struct Table<T> {
    rows: RwLock<BTreeMap<RowId, Arc<RowCell<T>>>>,
    next_id: AtomicU32,
}

impl<T: Clone + Send + 'static> Table<T> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(BTreeMap::new()),
            next_id: AtomicU32::new(1),
        }
    }

    pub fn alloc_id(&self) -> RowId {
        self.next_id.fetch_add(1, Ordering::Relaxed)
    }

    /// Insert a committed row and return its id.
    pub async fn insert(&self, value: T) -> RowId {
        let id = self.alloc_id();
        self.rows
            .write()
            .await
            .insert(id, Arc::new(RowCell::new(value)));
        id
    }

    /// Insert a row under a pre-allocated id with its claim already held,
    /// so no other transaction can touch the row before the inserting one
    /// commits or aborts.
    pub async fn insert_claimed(&self, id: RowId, value: T) -> RowLock<T> {
        let claim = Arc::new(Mutex::new(()));
        // Uncontended: the mutex is not shared yet.
        let guard = Arc::clone(&claim).lock_owned().await;
        let cell = Arc::new(RowCell {
            claim,
            committed: StdRwLock::new(value.clone()),
        });
        self.rows.write().await.insert(id, Arc::clone(&cell));
        RowLock {
            id,
            cell,
            working: value,
            _guard: guard,
        }
    }

    /// Remove a row. Only used to undo an aborted insert; established rows
    /// are never deleted, only transitioned.
    pub async fn remove(&self, id: RowId) -> bool {
        self.rows.write().await.remove(&id).is_some()
    }

    /// Exclusively claim a row, waiting if a concurrent transaction holds
    /// it. The working copy is read after the claim, so it reflects
    /// whatever the previous holder committed.
    pub async fn lock(&self, id: RowId) -> Option<RowLock<T>> {
        let cell = self.rows.read().await.get(&id).cloned()?;
        let guard = Arc::clone(&cell.claim).lock_owned().await;
        let working = cell.read_committed();
        Some(RowLock {
            id,
            cell,
            working,
            _guard: guard,
        })
    }

    /// Exclusively claim a row, skipping instead of waiting when it is held.
    pub async fn try_lock(&self, id: RowId) -> TryLock<T> {
        let cell = match self.rows.read().await.get(&id).cloned() {
            Some(cell) => cell,
            None => return TryLock::Missing,
        };
        match Arc::clone(&cell.claim).try_lock_owned() {
            Ok(guard) => {
                let working = cell.read_committed();
                TryLock::Acquired(RowLock {
                    id,
                    cell,
                    working,
                    _guard: guard,
                })
            }
            Err(_) => TryLock::Busy,
        }
    }

    /// Read the committed value of a row. Takes no claim, so an in-flight
    /// transaction neither blocks this nor shows its uncommitted writes.
    pub async fn get(&self, id: RowId) -> Option<T> {
        let cell = self.rows.read().await.get(&id).cloned()?;
        Some(cell.read_committed())
    }

    /// All row ids in ascending order.
    pub async fn ids(&self) -> Vec<RowId> {
        self.rows.read().await.keys().copied().collect()
    }

    /// Committed values of every row. Claim-free, like `get`.
    pub async fn snapshot(&self) -> Vec<(RowId, T)> {
        self.rows
            .read()
            .await
            .iter()
            .map(|(id, cell)| (*id, cell.read_committed()))
            .collect()
    }

    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

impl<T: Clone + Send + 'static> Default for Table<T> {
    fn default() -> Self {
        Self::new()
    }
}
