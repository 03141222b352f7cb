use slab::Slab;
use std::{cell::Cell, cmp::Ordering, collections::BTreeSet, fmt::Debug, ops::Bound};

use crate::segment::{compare_at, Segment};

/// Internal representation used in the ordered status set.
///
/// Comparisons evaluate the sweep comparator at the current sweep
/// position, read through the `sweep_x` pointer, so the order of the
/// whole set moves with the sweep line.
pub(crate) struct Active {
    key: usize,
    storage: *const Slab<Segment>,
    sweep_x: *const Cell<f64>,
}

impl Debug for Active {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Active")
            .field("key", &self.key)
            .field("segment", &self.get())
            .finish()
    }
}

impl Active {
    /// Create a new active handle pointing to the given storage.
    ///
    /// # Safety
    ///
    /// This function is unsafe. Caller must ensure that:
    ///
    /// 1. the `storage` and `sweep_x` references are valid
    /// _through-out_ the lifetime of the created object
    ///
    /// 2. all co-existing active handles are consistently ordered at
    /// the current sweep position, and the ordering of handles stored
    /// in a collection does not change while they remain stored.
    /// Violating this will not lead to a memory-UB, but may cause
    /// panics or incorrect output.
    unsafe fn new(key: usize, storage: &Slab<Segment>, sweep_x: &Cell<f64>) -> Self {
        Active {
            key,
            storage: storage as *const _,
            sweep_x: sweep_x as *const _,
        }
    }

    fn get(&self) -> &Segment {
        // Safety: reference is guaranteed to be valid by the `new`
        // method.
        let slab = unsafe { &*self.storage as &Slab<_> };
        unsafe { slab.get_unchecked(self.key) }
    }

    fn sweep_x(&self) -> f64 {
        // Safety: reference is guaranteed to be valid by the `new`
        // method.
        unsafe { &*self.sweep_x }.get()
    }
}

/// Partial equality based on key.
///
/// This is consistent with the `Ord` impl: `compare_at` falls back to
/// the key once geometry ties.
impl PartialEq for Active {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.key == other.key
    }
}

/// Assert total equality.
impl Eq for Active {}

impl PartialOrd for Active {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Vertical order at the current sweep position.
impl Ord for Active {
    #[inline]
    fn cmp(&self, other: &Self) -> Ordering {
        compare_at(self.get(), other.get(), self.sweep_x())
    }
}

/// The sweep-line status: all segments currently crossed by the sweep
/// line, in vertical order at the current sweep position.
///
/// The sweep position is the comparison context of the whole set; it
/// must be moved via [`ActiveSet::set_sweep_x`] before any other
/// operation at a new event coordinate.
#[derive(Debug)]
pub(crate) struct ActiveSet {
    tree: BTreeSet<Active>,
    sweep_x: Box<Cell<f64>>,
}

impl ActiveSet {
    pub(crate) fn new() -> Self {
        ActiveSet {
            tree: BTreeSet::new(),
            sweep_x: Box::new(Cell::new(f64::NEG_INFINITY)),
        }
    }

    /// Move the sweep line to `x`. The order of every stored segment
    /// is evaluated at this position.
    pub(crate) fn set_sweep_x(&self, x: f64) {
        self.sweep_x.set(x);
    }

    /// The current sweep position.
    pub(crate) fn sweep_x(&self) -> f64 {
        self.sweep_x.get()
    }

    /// Insert the segment at `key` into the status.
    ///
    /// # Safety
    ///
    /// The caller must ensure `storage` is not moved or dropped while
    /// the key remains in the set, and that the relative order of
    /// stored segments at the current sweep position is unchanged
    /// since they were inserted.
    pub(crate) unsafe fn add(&mut self, key: usize, storage: &Slab<Segment>) {
        debug_assert!(storage.contains(key));
        self.tree.insert(Active::new(key, storage, &self.sweep_x));
    }

    /// Remove the segment at `key`; `false` if it was not present.
    ///
    /// Absent keys are tolerated: a same-point batch re-insert may
    /// race an end event that fired an epsilon early.
    pub(crate) fn remove(&mut self, key: usize, storage: &Slab<Segment>) -> bool {
        // Safety: the temporary handle is valid as we're holding a
        // reference to `storage` and `self` for the duration.
        let handle = unsafe { Active::new(key, storage, &self.sweep_x) };
        self.tree.remove(&handle)
    }

    /// The in-order neighbors `(above, below)` of the segment at
    /// `key` under the current order.
    ///
    /// Returns `(None, None)` if the key is not in the status.
    pub(crate) fn neighbors(
        &self,
        key: usize,
        storage: &Slab<Segment>,
    ) -> (Option<usize>, Option<usize>) {
        // Safety: the temporary handle is valid as we're holding a
        // reference to `storage` and `self` for the duration.
        let handle = unsafe { Active::new(key, storage, &self.sweep_x) };
        if !self.tree.contains(&handle) {
            return (None, None);
        }
        let above = self
            .tree
            .range((Bound::Excluded(&handle), Bound::Unbounded))
            .next()
            .map(|a| a.key);
        let below = self
            .tree
            .range((Bound::Unbounded, Bound::Excluded(&handle)))
            .next_back()
            .map(|a| a.key);
        (above, below)
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.tree.is_empty()
    }
}
