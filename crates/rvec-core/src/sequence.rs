#![forbid(unsafe_code)]

//! The observable dynamic array.
//!
//! # Design
//!
//! [`ReactiveVec<T>`] owns a `Vec<T>` and a [`SignalEmitter<T>`] handle.
//! Every mutating method finishes the storage change first, then builds one
//! [`VectorEvent`] and dispatches it synchronously before returning. New
//! values in an event borrow the storage; old values borrow a local that
//! the method drops (or returns) after dispatch.
//!
//! No `&mut T` is ever handed out, so the only way to change an element is
//! through a method that reports it.
//!
//! # Failure Modes
//!
//! - **Re-entrant mutation**: mutating methods take `&mut self` and keep
//!   the storage borrowed while observers run, so a callback cannot reach
//!   the same sequence mutably. A sequence shared through `Rc<RefCell<..>>`
//!   panics on the nested `borrow_mut` instead of corrupting the payload.
//! - **Bad positions**: [`ReactiveVec::remove`] and [`ReactiveVec::insert`]
//!   panic on out-of-range indices, exactly like `Vec`.

use std::fmt;
use std::ops::Index;

use tracing::trace;

use crate::config::ReactiveVecConfig;
use crate::emitter::{SignalEmitter, Subscription};
use crate::error::OutOfRange;
use crate::event::{EventKinds, VectorEvent};

/// A `Vec<T>` that publishes a [`VectorEvent`] for every change.
///
/// # Invariants
///
/// 1. `len()` always equals the storage length between calls.
/// 2. An event is published iff the observable state changed; no-op calls
///    (`clear` on empty, same-length `resize`, already-satisfied `reserve`,
///    out-of-range `update_at`, `pop` on empty) publish nothing.
/// 3. `version()` increments by exactly 1 per published event.
/// 4. Construction and drop publish nothing.
pub struct ReactiveVec<T> {
    vec: Vec<T>,
    emitter: SignalEmitter<T>,
    version: u64,
}

impl<T: 'static> ReactiveVec<T> {
    /// Create an empty sequence with a fresh emitter.
    #[must_use]
    pub fn new() -> Self {
        Self::from_parts(Vec::new(), SignalEmitter::new())
    }

    /// Create an empty sequence publishing through `emitter`.
    ///
    /// Subscribers already registered on `emitter` see every mutation.
    #[must_use]
    pub fn with_emitter(emitter: SignalEmitter<T>) -> Self {
        Self::from_parts(Vec::new(), emitter)
    }

    /// Create an empty sequence with room for `capacity` elements.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self::from_parts(Vec::with_capacity(capacity), SignalEmitter::new())
    }

    /// Create an empty sequence sized and instrumented from `config`.
    #[must_use]
    pub fn with_config(config: &ReactiveVecConfig) -> Self {
        Self::from_parts(
            Vec::with_capacity(config.initial_capacity),
            SignalEmitter::with_config(config),
        )
    }

    /// Create a sequence holding `n` clones of `value`.
    #[must_use]
    pub fn from_elem(n: usize, value: T) -> Self
    where
        T: Clone,
    {
        Self::from_parts(vec![value; n], SignalEmitter::new())
    }

    fn from_parts(vec: Vec<T>, emitter: SignalEmitter<T>) -> Self {
        Self {
            vec,
            emitter,
            version: 0,
        }
    }

    // ── Observers ─────────────────────────────────────────────────────────

    /// The publish point. Clone it to share subscribers with other code.
    #[must_use]
    pub fn emitter(&self) -> &SignalEmitter<T> {
        &self.emitter
    }

    /// Shorthand for `self.emitter().subscribe(kinds, callback)`.
    pub fn subscribe<F>(&self, kinds: EventKinds, callback: F) -> Subscription
    where
        F: Fn(&VectorEvent<'_, T>) + 'static,
    {
        self.emitter.subscribe(kinds, callback)
    }

    /// Number of events published since construction.
    #[must_use]
    pub fn version(&self) -> u64 {
        self.version
    }

    // ── Queries ───────────────────────────────────────────────────────────

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.vec.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.vec.len()
    }

    #[must_use]
    pub fn capacity(&self) -> usize {
        self.vec.capacity()
    }

    #[must_use]
    pub fn get(&self, index: usize) -> Option<&T> {
        self.vec.get(index)
    }

    /// Bounds-checked read.
    pub fn at(&self, index: usize) -> Result<&T, OutOfRange> {
        self.vec.get(index).ok_or(OutOfRange {
            index,
            len: self.vec.len(),
        })
    }

    #[must_use]
    pub fn first(&self) -> Option<&T> {
        self.vec.first()
    }

    #[must_use]
    pub fn last(&self) -> Option<&T> {
        self.vec.last()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[T] {
        &self.vec
    }

    /// Iterate elements front to back. The iterator is `Clone`, so it can
    /// be restarted from any point.
    pub fn iter(&self) -> std::slice::Iter<'_, T> {
        self.vec.iter()
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Append `value`. Publishes `Inserted { index: len - 1 }`.
    pub fn push(&mut self, value: T) {
        self.vec.push(value);
        self.publish_inserted(self.vec.len() - 1);
    }

    /// Append the value built by `make`, returning a reference to it.
    /// Publishes `Inserted { index: len - 1 }`.
    pub fn push_with<F>(&mut self, make: F) -> &T
    where
        F: FnOnce() -> T,
    {
        self.vec.push(make());
        let index = self.vec.len() - 1;
        self.publish_inserted(index);
        &self.vec[index]
    }

    /// Insert `value` at `index`, shifting later elements right.
    /// Publishes `Inserted { index }`.
    ///
    /// # Panics
    ///
    /// Panics if `index > len`.
    pub fn insert(&mut self, index: usize, value: T) {
        self.vec.insert(index, value);
        self.publish_inserted(index);
    }

    /// Remove and return the last element. Publishes
    /// `Erased { index: old_len - 1 }`; an empty sequence publishes nothing.
    pub fn pop(&mut self) -> Option<T> {
        let Some(old_value) = self.vec.pop() else {
            trace!("pop on empty sequence; nothing published");
            return None;
        };
        let index = self.vec.len();
        self.publish(&VectorEvent::Erased {
            index,
            old_value: &old_value,
        });
        Some(old_value)
    }

    /// Remove and return the element at `index`, shifting later elements
    /// left. Publishes `Erased { index }`.
    ///
    /// # Panics
    ///
    /// Panics if `index >= len`.
    pub fn remove(&mut self, index: usize) -> T {
        let old_value = self.vec.remove(index);
        self.publish(&VectorEvent::Erased {
            index,
            old_value: &old_value,
        });
        old_value
    }

    /// Replace the element at `index` if it exists.
    ///
    /// Returns `false` and leaves everything untouched when `index` is out
    /// of range. Otherwise publishes `Updated { index, old_value, new_value }`.
    pub fn update_at(&mut self, index: usize, value: T) -> bool {
        if index >= self.vec.len() {
            trace!(index, len = self.vec.len(), "update_at out of range");
            return false;
        }
        let old_value = std::mem::replace(&mut self.vec[index], value);
        self.version += 1;
        self.emitter.emit(&VectorEvent::Updated {
            index,
            old_value: &old_value,
            new_value: &self.vec[index],
        });
        true
    }

    /// Remove every element. Publishes `Cleared` unless already empty.
    pub fn clear(&mut self) {
        if self.vec.is_empty() {
            return;
        }
        self.vec.clear();
        self.publish(&VectorEvent::Cleared);
    }

    /// Grow capacity to at least `new_capacity` elements in total.
    ///
    /// Publishes `Reserved { new_capacity }` with the resulting capacity,
    /// only if the capacity actually changed.
    pub fn reserve(&mut self, new_capacity: usize) {
        let old_capacity = self.vec.capacity();
        if new_capacity > old_capacity {
            self.vec.reserve_exact(new_capacity - self.vec.len());
        }
        let capacity = self.vec.capacity();
        if capacity == old_capacity {
            trace!(requested = new_capacity, capacity, "reserve already satisfied");
            return;
        }
        self.publish(&VectorEvent::Reserved {
            new_capacity: capacity,
        });
    }

    /// Set the length to `new_len`, filling new slots with clones of `fill`
    /// or truncating. Publishes `Resized` only if the length changed.
    pub fn resize(&mut self, new_len: usize, fill: T)
    where
        T: Clone,
    {
        let old_size = self.vec.len();
        if new_len == old_size {
            return;
        }
        self.vec.resize(new_len, fill);
        self.publish(&VectorEvent::Resized {
            old_size,
            new_size: new_len,
        });
    }

    fn publish_inserted(&mut self, index: usize) {
        self.version += 1;
        self.emitter.emit(&VectorEvent::Inserted {
            index,
            value: &self.vec[index],
        });
    }

    fn publish(&mut self, event: &VectorEvent<'_, T>) {
        self.version += 1;
        self.emitter.emit(event);
    }
}

impl<T: 'static> Default for ReactiveVec<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: fmt::Debug> fmt::Debug for ReactiveVec<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ReactiveVec")
            .field("values", &self.vec)
            .field("version", &self.version)
            .field("emitter", &self.emitter)
            .finish()
    }
}

/// Compares contents only; emitters and versions are ignored.
impl<T: PartialEq> PartialEq for ReactiveVec<T> {
    fn eq(&self, other: &Self) -> bool {
        self.vec == other.vec
    }
}

impl<T: Eq> Eq for ReactiveVec<T> {}

impl<T: PartialEq> PartialEq<[T]> for ReactiveVec<T> {
    fn eq(&self, other: &[T]) -> bool {
        self.vec == other
    }
}

impl<T: PartialEq, const N: usize> PartialEq<[T; N]> for ReactiveVec<T> {
    fn eq(&self, other: &[T; N]) -> bool {
        self.vec == other
    }
}

impl<T> Index<usize> for ReactiveVec<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if `index >= len`; use [`ReactiveVec::at`] for a checked read.
    fn index(&self, index: usize) -> &T {
        &self.vec[index]
    }
}

impl<'a, T> IntoIterator for &'a ReactiveVec<T> {
    type Item = &'a T;
    type IntoIter = std::slice::Iter<'a, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.vec.iter()
    }
}

impl<T: 'static> From<Vec<T>> for ReactiveVec<T> {
    fn from(vec: Vec<T>) -> Self {
        Self::from_parts(vec, SignalEmitter::new())
    }
}

impl<T: 'static, const N: usize> From<[T; N]> for ReactiveVec<T> {
    fn from(values: [T; N]) -> Self {
        Self::from(Vec::from(values))
    }
}

impl<T: 'static> FromIterator<T> for ReactiveVec<T> {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::from(iter.into_iter().collect::<Vec<_>>())
    }
}

/// Appends one element at a time; each append publishes its own `Inserted`.
impl<T: 'static> Extend<T> for ReactiveVec<T> {
    fn extend<I: IntoIterator<Item = T>>(&mut self, iter: I) {
        for value in iter {
            self.push(value);
        }
    }
}
