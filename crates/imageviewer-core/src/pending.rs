//! Shared bookkeeping for in-flight operations.
//!
//! [`PendingState`] is a monitor: one mutex guards the global in-flight
//! counter, the per-file rotation accumulation table and the set of files
//! with a rotation round in flight. A condition variable wakes drain waiters
//! once the counter is zero and the all-complete notification it triggered
//! has been delivered.
//!
//! Nothing in this module blocks or does I/O while the lock is held.

use std::collections::{HashMap, HashSet};
use std::ops::{Deref, DerefMut};
use std::time::{Duration, Instant};

use parking_lot::{Condvar, Mutex, MutexGuard};

use crate::models::ResourceKey;
use crate::utils::error::{AppError, AppResult};

/// State protected by the [`PendingState`] lock.
#[derive(Debug, Default)]
pub struct PendingTable {
    in_flight: usize,
    notifying: usize,
    rotations: HashMap<ResourceKey, i64>,
    active_rounds: HashSet<ResourceKey>,
}

impl PendingTable {
    /// Count one more dispatched worker.
    pub fn begin_operation(&mut self) {
        self.in_flight += 1;
    }

    pub fn is_idle(&self) -> bool {
        self.in_flight == 0
    }

    /// Idle, and no all-complete notification is still being delivered.
    pub fn is_drained(&self) -> bool {
        self.in_flight == 0 && self.notifying == 0
    }

    /// Hold drain waiters until [`PendingState::end_notification`].
    ///
    /// Called in the same critical section that brought the counter to zero.
    pub fn begin_notification(&mut self) {
        self.notifying += 1;
    }

    pub fn in_flight(&self) -> usize {
        self.in_flight
    }

    /// Add `delta` to the key's accumulated angle.
    ///
    /// Returns the total before the addition, `None` if the key had no entry.
    pub fn accumulate(&mut self, key: &ResourceKey, delta: i64) -> Option<i64> {
        match self.rotations.get_mut(key) {
            Some(total) => {
                let prior = *total;
                *total += delta;
                Some(prior)
            }
            None => {
                self.rotations.insert(key.clone(), delta);
                None
            }
        }
    }

    pub fn peek(&self, key: &ResourceKey) -> Option<i64> {
        self.rotations.get(key).copied()
    }

    /// Claim the accumulated angle for `key`, removing the entry. Returns 0 when absent.
    pub fn take_and_clear(&mut self, key: &ResourceKey) -> i64 {
        self.rotations.remove(key).unwrap_or(0)
    }

    /// Drop any accumulated angle for `key`.
    pub fn clear(&mut self, key: &ResourceKey) -> Option<i64> {
        self.rotations.remove(key)
    }

    /// Mark a rotation round as running for `key`.
    ///
    /// Returns false if one already is.
    pub fn start_round(&mut self, key: &ResourceKey) -> bool {
        self.active_rounds.insert(key.clone())
    }

    pub fn is_round_active(&self, key: &ResourceKey) -> bool {
        self.active_rounds.contains(key)
    }

    pub fn finish_round(&mut self, key: &ResourceKey) {
        self.active_rounds.remove(key);
    }
}

/// Lock guard over [`PendingTable`].
///
/// Decrementing goes through the guard so that reaching zero wakes drain waiters.
pub struct PendingGuard<'a> {
    table: MutexGuard<'a, PendingTable>,
    idle: &'a Condvar,
}

impl PendingGuard<'_> {
    /// Count one finished worker.
    ///
    /// Fails with [`AppError::Logic`] instead of going below zero; the counter
    /// is left untouched in that case.
    pub fn end_operation(&mut self) -> AppResult<usize> {
        if self.table.in_flight == 0 {
            return Err(AppError::Logic(
                "end_operation called with no operation in flight".to_string(),
            ));
        }
        self.table.in_flight -= 1;
        if self.table.is_drained() {
            self.idle.notify_all();
        }
        Ok(self.table.in_flight)
    }
}

impl Deref for PendingGuard<'_> {
    type Target = PendingTable;

    fn deref(&self) -> &Self::Target {
        &self.table
    }
}

impl DerefMut for PendingGuard<'_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        &mut self.table
    }
}

/// Monitor owning the pending-operation bookkeeping.
#[derive(Debug, Default)]
pub struct PendingState {
    table: Mutex<PendingTable>,
    idle: Condvar,
}

impl PendingState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Acquire the lock for a compound update.
    pub fn lock(&self) -> PendingGuard<'_> {
        PendingGuard {
            table: self.table.lock(),
            idle: &self.idle,
        }
    }

    pub fn begin_operation(&self) {
        self.lock().begin_operation();
    }

    pub fn end_operation(&self) -> AppResult<usize> {
        self.lock().end_operation()
    }

    pub fn is_idle(&self) -> bool {
        self.table.lock().is_idle()
    }

    /// Release a hold taken with [`PendingTable::begin_notification`].
    pub fn end_notification(&self) -> AppResult<()> {
        let mut table = self.table.lock();
        if table.notifying == 0 {
            return Err(AppError::Logic(
                "end_notification called with no notification pending".to_string(),
            ));
        }
        table.notifying -= 1;
        if table.is_drained() {
            self.idle.notify_all();
        }
        Ok(())
    }

    pub fn in_flight(&self) -> usize {
        self.table.lock().in_flight()
    }

    pub fn accumulate(&self, key: &ResourceKey, delta: i64) -> Option<i64> {
        self.table.lock().accumulate(key, delta)
    }

    pub fn peek(&self, key: &ResourceKey) -> Option<i64> {
        self.table.lock().peek(key)
    }

    pub fn take_and_clear(&self, key: &ResourceKey) -> i64 {
        self.table.lock().take_and_clear(key)
    }

    pub fn clear(&self, key: &ResourceKey) -> Option<i64> {
        self.table.lock().clear(key)
    }

    /// Block until the in-flight counter is zero and no all-complete
    /// notification is being delivered.
    pub fn wait_until_idle(&self) {
        let mut table = self.table.lock();
        while !table.is_drained() {
            self.idle.wait(&mut table);
        }
    }

    /// Like [`wait_until_idle`](Self::wait_until_idle) with a deadline.
    ///
    /// Returns true if idle was observed before `timeout` elapsed.
    pub fn wait_until_idle_timeout(&self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        let mut table = self.table.lock();
        while !table.is_drained() {
            if self.idle.wait_until(&mut table, deadline).timed_out() {
                return table.is_drained();
            }
        }
        true
    }
}
