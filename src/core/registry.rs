//! # Subscription registry: the table behind the center's lock.
//!
//! Maps an event kind's `TypeId` to its ordered subscription records.
//!
//! ## Architecture
//! ```text
//! TypeId(StringEvent) → [sub#1, sub#4, sub#7]   (insertion order = delivery order)
//! TypeId(IntEvent)    → [sub#2]
//! ```
//!
//! ## Rules
//! - Plain data; the caller holds the lock around every call.
//! - Order is only ever changed by `retain`, which keeps relative order.
//! - Removing a record sets its tombstone before dropping it from the table.
//! - Records leaving the table are moved into the caller's `garbage` vector and must
//!   be dropped after the lock is released: dropping a callback runs arbitrary code.
//! - Empty buckets are dropped from the map.

use std::any::TypeId;
use std::collections::HashMap;
use std::sync::Arc;

use crate::observers::Subscription;

/// Records taken out of the table, to be dropped outside the lock.
pub(crate) type Garbage = Vec<Arc<Subscription>>;

#[derive(Default)]
pub(crate) struct Registry {
    buckets: HashMap<TypeId, Vec<Arc<Subscription>>>,
}

impl Registry {
    /// Appends `sub` under `kind`, reaping dead records of that bucket into `garbage`.
    pub(crate) fn insert(&mut self, kind: TypeId, sub: Arc<Subscription>, garbage: &mut Garbage) {
        let bucket = self.buckets.entry(kind).or_default();
        Self::reap(bucket, garbage);
        bucket.push(sub);
    }

    /// Records of `kind` in delivery order.
    ///
    /// With `prune = true` dead records are moved into `garbage` first; with
    /// `prune = false` they stay in the table and in the snapshot.
    pub(crate) fn snapshot(
        &mut self,
        kind: TypeId,
        prune: bool,
        garbage: &mut Garbage,
    ) -> Vec<Arc<Subscription>> {
        let Some(bucket) = self.buckets.get_mut(&kind) else {
            return Vec::new();
        };

        if prune {
            Self::reap(bucket, garbage);
        }

        let subs = bucket.clone();
        if subs.is_empty() {
            self.buckets.remove(&kind);
        }
        subs
    }

    /// Removes records of `kind` owned by the observer at `addr`. Returns how many.
    pub(crate) fn remove(&mut self, kind: TypeId, addr: usize, garbage: &mut Garbage) -> usize {
        let Some(bucket) = self.buckets.get_mut(&kind) else {
            return 0;
        };
        let removed = Self::remove_from(bucket, addr, garbage);
        if bucket.is_empty() {
            self.buckets.remove(&kind);
        }
        removed
    }

    /// Removes records of every kind owned by the observer at `addr`. Returns how many.
    pub(crate) fn remove_all(&mut self, addr: usize, garbage: &mut Garbage) -> usize {
        let mut removed = 0;
        for bucket in self.buckets.values_mut() {
            removed += Self::remove_from(bucket, addr, garbage);
        }
        self.buckets.retain(|_, b| !b.is_empty());
        removed
    }

    /// Reaps dead records of every kind. Returns how many.
    pub(crate) fn purge(&mut self, garbage: &mut Garbage) -> usize {
        let before = garbage.len();
        for bucket in self.buckets.values_mut() {
            Self::reap(bucket, garbage);
        }
        self.buckets.retain(|_, b| !b.is_empty());
        garbage.len() - before
    }

    /// Drops every record. Returns how many were live.
    pub(crate) fn clear(&mut self, garbage: &mut Garbage) -> usize {
        let mut live = 0;
        for sub in self.buckets.drain().flat_map(|(_, b)| b) {
            if sub.is_live() {
                live += 1;
            }
            sub.mark_removed();
            garbage.push(sub);
        }
        live
    }

    /// Live records of `kind`.
    pub(crate) fn count(&self, kind: TypeId) -> usize {
        self.buckets
            .get(&kind)
            .map_or(0, |b| b.iter().filter(|s| s.is_live()).count())
    }

    /// Live records of every kind.
    pub(crate) fn len(&self) -> usize {
        self.buckets
            .values()
            .flat_map(|b| b.iter())
            .filter(|s| s.is_live())
            .count()
    }

    // ---- Helpers ----

    fn reap(bucket: &mut Vec<Arc<Subscription>>, garbage: &mut Garbage) {
        bucket.retain(|s| {
            if s.is_live() {
                true
            } else {
                garbage.push(Arc::clone(s));
                false
            }
        });
    }

    /// Also reaps dead records of the bucket.
    fn remove_from(bucket: &mut Vec<Arc<Subscription>>, addr: usize, garbage: &mut Garbage) -> usize {
        let mut removed = 0;
        bucket.retain(|s| {
            if s.observer().is(addr) {
                s.mark_removed();
                removed += 1;
            } else if s.is_live() {
                return true;
            }
            garbage.push(Arc::clone(s));
            false
        });
        removed
    }
}
