#![forbid(unsafe_code)]

//! Kind-filtered publish point for [`VectorEvent`]s.
//!
//! # Design
//!
//! [`SignalEmitter<T>`] keeps its subscriber list in shared, reference-counted
//! storage (`Rc<RefCell<..>>`). Cloning the emitter yields another handle to
//! the same list, which is how a [`ReactiveVec`](crate::ReactiveVec) can be
//! built around an emitter the caller already holds.
//!
//! Each subscriber carries an [`EventKinds`] selector. [`SignalEmitter::emit`]
//! snapshots the matching callbacks, releases the borrow, then invokes them
//! in registration order.
//!
//! # Performance
//!
//! | Operation       | Complexity                     |
//! |-----------------|--------------------------------|
//! | `subscribe()`   | O(1) amortized                 |
//! | `unsubscribe()` | O(S) where S = subscribers     |
//! | `emit()`        | O(S)                           |
//!
//! # Failure Modes
//!
//! - **Re-entrant subscribe/unsubscribe**: allowed. The snapshot keeps the
//!   in-flight dispatch intact; a subscription cancelled mid-dispatch is
//!   skipped for the remaining callbacks, and one added mid-dispatch first
//!   sees the next event.
//! - **Subscriber leak**: [`Subscription`] guards kept forever accumulate
//!   callbacks. The emitter logs a single warning once the count exceeds
//!   [`ReactiveVecConfig::subscriber_warn_threshold`].

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::{Rc, Weak};

use tracing::{trace, warn};

use crate::config::ReactiveVecConfig;
use crate::event::{EventKinds, VectorEvent};

type Callback<T> = Rc<dyn Fn(&VectorEvent<'_, T>)>;

struct Slot<T> {
    id: u64,
    kinds: EventKinds,
    callback: Callback<T>,
    /// Shared with the [`Subscription`]; cleared on cancel so a pending
    /// dispatch snapshot skips the callback.
    live: Rc<Cell<bool>>,
}

struct EmitterInner<T> {
    slots: Vec<Slot<T>>,
    next_id: u64,
    warn_threshold: usize,
    warned: bool,
    trace_events: bool,
}

/// Removes a subscriber by id without naming the event payload type.
trait Detach {
    fn detach(&self, id: u64) -> bool;
}

impl<T> Detach for RefCell<EmitterInner<T>> {
    fn detach(&self, id: u64) -> bool {
        // The removed slot drops after the borrow ends: its callback may own
        // other guards whose drop re-enters this emitter.
        let removed = {
            let mut inner = self.borrow_mut();
            inner
                .slots
                .iter()
                .position(|slot| slot.id == id)
                .map(|pos| inner.slots.remove(pos))
        };
        match removed {
            Some(slot) => {
                slot.live.set(false);
                true
            }
            None => false,
        }
    }
}

/// Shared registry of event observers.
///
/// # Invariants
///
/// 1. Callbacks run in registration order.
/// 2. A callback only receives kinds its selector accepts.
/// 3. A cancelled subscription is never invoked again, including later in a
///    dispatch that was already in progress.
pub struct SignalEmitter<T> {
    inner: Rc<RefCell<EmitterInner<T>>>,
}

// Manual Clone: shares the same Rc.
impl<T> Clone for SignalEmitter<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Rc::clone(&self.inner),
        }
    }
}

impl<T> fmt::Debug for SignalEmitter<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let inner = self.inner.borrow();
        f.debug_struct("SignalEmitter")
            .field("subscriber_count", &inner.slots.len())
            .field("trace_events", &inner.trace_events)
            .finish()
    }
}

impl<T: 'static> Default for SignalEmitter<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: 'static> SignalEmitter<T> {
    /// Create an emitter with default configuration and no subscribers.
    #[must_use]
    pub fn new() -> Self {
        Self::with_config(&ReactiveVecConfig::default())
    }

    /// Create an emitter using the logging knobs from `config`.
    #[must_use]
    pub fn with_config(config: &ReactiveVecConfig) -> Self {
        Self {
            inner: Rc::new(RefCell::new(EmitterInner {
                slots: Vec::new(),
                next_id: 0,
                warn_threshold: config.subscriber_warn_threshold,
                warned: false,
                trace_events: config.trace_events,
            })),
        }
    }

    /// Register `callback` for every event kind in `kinds`.
    ///
    /// Returns a [`Subscription`] guard. Dropping the guard unsubscribes.
    pub fn subscribe<F>(&self, kinds: EventKinds, callback: F) -> Subscription
    where
        F: Fn(&VectorEvent<'_, T>) + 'static,
    {
        let live = Rc::new(Cell::new(true));
        let id = {
            let mut inner = self.inner.borrow_mut();
            let id = inner.next_id;
            inner.next_id += 1;
            inner.slots.push(Slot {
                id,
                kinds,
                callback: Rc::new(callback),
                live: Rc::clone(&live),
            });
            let count = inner.slots.len();
            if count > inner.warn_threshold && !inner.warned {
                inner.warned = true;
                warn!(
                    subscribers = count,
                    threshold = inner.warn_threshold,
                    "subscriber count exceeds threshold; guards may be leaking"
                );
            }
            id
        };
        let detach: Rc<dyn Detach> = self.inner.clone();
        Subscription {
            id,
            live,
            emitter: Some(Rc::downgrade(&detach)),
        }
    }

    /// Register `callback` for all event kinds.
    pub fn subscribe_all<F>(&self, callback: F) -> Subscription
    where
        F: Fn(&VectorEvent<'_, T>) + 'static,
    {
        self.subscribe(EventKinds::all(), callback)
    }

    /// Cancel `subscription` if this emitter issued it.
    ///
    /// Returns `false` if it was already detached or belongs to another
    /// emitter; a foreign guard is left untouched. Safe to call from inside
    /// a callback, including for a subscription other than the one being
    /// dispatched.
    pub fn unsubscribe(&self, subscription: &Subscription) -> bool {
        if !subscription.is_from(self) {
            return false;
        }
        subscription.live.set(false);
        // Ids are never reused, so the guard's later drop finds nothing.
        self.inner.detach(subscription.id)
    }

    /// Deliver `event` to every matching subscriber, in registration order.
    ///
    /// Returns the number of callbacks invoked.
    pub fn emit(&self, event: &VectorEvent<'_, T>) -> usize {
        let kind = event.kind();
        // Collect targets first so callbacks run without a live borrow.
        let targets: Vec<(Callback<T>, Rc<Cell<bool>>)> = {
            let inner = self.inner.borrow();
            if inner.trace_events {
                trace!(
                    kind = kind.as_str(),
                    index = ?event.index(),
                    subscribers = inner.slots.len(),
                    "dispatch vector event"
                );
            }
            inner
                .slots
                .iter()
                .filter(|slot| slot.kinds.accepts(kind))
                .map(|slot| (Rc::clone(&slot.callback), Rc::clone(&slot.live)))
                .collect()
        };

        let mut delivered = 0;
        for (callback, live) in &targets {
            if live.get() {
                callback(event);
                delivered += 1;
            }
        }
        delivered
    }

    /// Number of registered subscribers.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.inner.borrow().slots.len()
    }

    /// True when no subscribers are registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.inner.borrow().slots.is_empty()
    }
}

/// RAII guard for a registered callback.
///
/// Dropping the guard removes the callback from its emitter. If the emitter
/// is already gone the drop is a no-op.
pub struct Subscription {
    id: u64,
    live: Rc<Cell<bool>>,
    emitter: Option<Weak<dyn Detach>>,
}

impl Subscription {
    /// Whether the callback is still registered.
    #[must_use]
    pub fn is_active(&self) -> bool {
        self.live.get()
    }

    /// Detach now. Returns `false` if the emitter was dropped or the
    /// callback was already removed.
    pub fn cancel(mut self) -> bool {
        self.detach()
    }

    /// Whether this guard was issued by `emitter` (or a clone of it).
    #[must_use]
    pub fn is_from<T>(&self, emitter: &SignalEmitter<T>) -> bool {
        self.emitter
            .as_ref()
            .is_some_and(|weak| std::ptr::addr_eq(weak.as_ptr(), Rc::as_ptr(&emitter.inner)))
    }

    fn detach(&mut self) -> bool {
        self.live.set(false);
        match self.emitter.take().and_then(|weak| weak.upgrade()) {
            Some(emitter) => emitter.detach(self.id),
            None => false,
        }
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.detach();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("id", &self.id)
            .field("active", &self.live.get())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::event::EventKind;

    fn inserted(index: usize, value: &i32) -> VectorEvent<'_, i32> {
        VectorEvent::Inserted { index, value }
    }

    #[test]
    fn emit_without_subscribers() {
        let emitter = SignalEmitter::<i32>::new();
        assert!(emitter.is_empty());
        assert_eq!(emitter.emit(&VectorEvent::Cleared), 0);
    }

    #[test]
    fn subscriber_receives_event() {
        let emitter = SignalEmitter::new();
        let seen = Rc::new(Cell::new(None));
        let seen_clone = Rc::clone(&seen);

        let _sub = emitter.subscribe_all(move |event: &VectorEvent<'_, i32>| {
            if let VectorEvent::Inserted { index, value } = event {
                seen_clone.set(Some((*index, **value)));
            }
        });

        assert_eq!(emitter.emit(&inserted(3, &7)), 1);
        assert_eq!(seen.get(), Some((3, 7)));
    }

    #[test]
    fn selector_filters_kinds() {
        let emitter = SignalEmitter::<i32>::new();
        let count = Rc::new(Cell::new(0u32));
        let count_clone = Rc::clone(&count);

        let _sub = emitter.subscribe(EventKinds::CLEARED, move |_| {
            count_clone.set(count_clone.get() + 1);
        });

        assert_eq!(emitter.emit(&inserted(0, &1)), 0);
        assert_eq!(emitter.emit(&VectorEvent::Cleared), 1);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn notification_order_is_registration_order() {
        let emitter = SignalEmitter::<i32>::new();
        let log = Rc::new(RefCell::new(Vec::new()));

        let log1 = Rc::clone(&log);
        let _s1 = emitter.subscribe_all(move |_| log1.borrow_mut().push('A'));
        let log2 = Rc::clone(&log);
        let _s2 = emitter.subscribe_all(move |_| log2.borrow_mut().push('B'));
        let log3 = Rc::clone(&log);
        let _s3 = emitter.subscribe_all(move |_| log3.borrow_mut().push('C'));

        emitter.emit(&VectorEvent::Cleared);
        assert_eq!(*log.borrow(), vec!['A', 'B', 'C']);
    }

    #[test]
    fn drop_unsubscribes() {
        let emitter = SignalEmitter::<i32>::new();
        let count = Rc::new(Cell::new(0u32));
        let count_clone = Rc::clone(&count);

        let sub = emitter.subscribe_all(move |_| count_clone.set(count_clone.get() + 1));
        emitter.emit(&VectorEvent::Cleared);
        drop(sub);
        emitter.emit(&VectorEvent::Cleared);

        assert_eq!(count.get(), 1);
        assert_eq!(emitter.subscriber_count(), 0);
    }

    #[test]
    fn unsubscribe_reports_registration() {
        let emitter = SignalEmitter::<i32>::new();
        let sub = emitter.subscribe_all(|_| {});
        assert!(sub.is_active());
        assert!(sub.is_from(&emitter));
        assert!(emitter.unsubscribe(&sub));
        assert!(!sub.is_active());
        assert!(emitter.is_empty());
        assert!(!emitter.unsubscribe(&sub));
        assert!(!sub.cancel());
    }

    #[test]
    fn unsubscribe_rejects_foreign_subscription() {
        let a = SignalEmitter::<i32>::new();
        let b = SignalEmitter::<i32>::new();
        let count = Rc::new(Cell::new(0u32));
        let count_clone = Rc::clone(&count);
        let sub = a.subscribe_all(move |_| count_clone.set(count_clone.get() + 1));

        assert!(!b.unsubscribe(&sub));
        assert!(sub.is_active());
        assert_eq!(a.subscriber_count(), 1);

        a.emit(&VectorEvent::Cleared);
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn cancel_after_emitter_dropped() {
        let emitter = SignalEmitter::<i32>::new();
        let sub = emitter.subscribe_all(|_| {});
        drop(emitter);
        assert!(!sub.cancel());
    }

    #[test]
    fn is_from_other_emitter() {
        let a = SignalEmitter::<i32>::new();
        let b = SignalEmitter::<i32>::new();
        let sub = a.subscribe_all(|_| {});
        assert!(sub.is_from(&a.clone()));
        assert!(!sub.is_from(&b));
    }

    #[test]
    fn clone_shares_subscribers() {
        let emitter = SignalEmitter::<i32>::new();
        let count = Rc::new(Cell::new(0u32));
        let count_clone = Rc::clone(&count);
        let _sub = emitter.subscribe_all(move |_| count_clone.set(count_clone.get() + 1));

        let other = emitter.clone();
        other.emit(&VectorEvent::Cleared);
        assert_eq!(count.get(), 1);
        assert_eq!(other.subscriber_count(), 1);
    }

    #[test]
    fn unsubscribe_other_during_dispatch_skips_it() {
        let emitter = SignalEmitter::<i32>::new();
        let log = Rc::new(RefCell::new(Vec::new()));
        let victim: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));

        let log1 = Rc::clone(&log);
        let victim1 = Rc::clone(&victim);
        let _s1 = emitter.subscribe_all(move |_| {
            log1.borrow_mut().push('A');
            if let Some(sub) = victim1.borrow_mut().take() {
                assert!(sub.cancel());
            }
        });
        let log2 = Rc::clone(&log);
        *victim.borrow_mut() = Some(emitter.subscribe_all(move |_| log2.borrow_mut().push('B')));
        let log3 = Rc::clone(&log);
        let _s3 = emitter.subscribe_all(move |_| log3.borrow_mut().push('C'));

        assert_eq!(emitter.emit(&VectorEvent::Cleared), 2);
        assert_eq!(*log.borrow(), vec!['A', 'C']);
        assert_eq!(emitter.subscriber_count(), 2);
    }

    #[test]
    fn subscribe_during_dispatch_sees_next_event() {
        let emitter = SignalEmitter::<i32>::new();
        let late_count = Rc::new(Cell::new(0u32));
        let held: Rc<RefCell<Vec<Subscription>>> = Rc::new(RefCell::new(Vec::new()));

        let handle = emitter.clone();
        let late = Rc::clone(&late_count);
        let held_clone = Rc::clone(&held);
        let _s1 = emitter.subscribe(EventKinds::CLEARED, move |_| {
            let late = Rc::clone(&late);
            let sub = handle.subscribe(EventKinds::RESIZED, move |_| late.set(late.get() + 1));
            held_clone.borrow_mut().push(sub);
        });

        emitter.emit(&VectorEvent::Cleared);
        assert_eq!(late_count.get(), 0);
        emitter.emit(&VectorEvent::Resized {
            old_size: 0,
            new_size: 1,
        });
        assert_eq!(late_count.get(), 1);
    }

    #[test]
    fn self_cancel_during_dispatch() {
        let emitter = SignalEmitter::<i32>::new();
        let slot: Rc<RefCell<Option<Subscription>>> = Rc::new(RefCell::new(None));
        let count = Rc::new(Cell::new(0u32));

        let slot_clone = Rc::clone(&slot);
        let count_clone = Rc::clone(&count);
        *slot.borrow_mut() = Some(emitter.subscribe_all(move |_| {
            count_clone.set(count_clone.get() + 1);
            slot_clone.borrow_mut().take();
        }));

        emitter.emit(&VectorEvent::Cleared);
        emitter.emit(&VectorEvent::Cleared);
        assert_eq!(count.get(), 1);
        assert!(emitter.is_empty());
    }

    #[test]
    fn callback_owning_guard_can_be_dropped() {
        let emitter = SignalEmitter::<i32>::new();
        let inner_sub = emitter.subscribe_all(|_| {});
        let outer = emitter.subscribe_all(move |_| {
            let _ = &inner_sub;
        });
        assert_eq!(emitter.subscriber_count(), 2);
        // Dropping the outer callback drops the captured guard, which
        // detaches from the same emitter.
        drop(outer);
        assert!(emitter.is_empty());
    }

    #[test]
    fn debug_format() {
        let emitter = SignalEmitter::<i32>::new();
        let _sub = emitter.subscribe(EventKind::Erased.into(), |_| {});
        let dbg = format!("{emitter:?}");
        assert!(dbg.contains("SignalEmitter"));
        assert!(dbg.contains("subscriber_count: 1"));
    }

    #[test]
    fn leak_threshold_warns_once_and_keeps_working() {
        let config = ReactiveVecConfig {
            subscriber_warn_threshold: 1,
            ..ReactiveVecConfig::default()
        };
        let emitter = SignalEmitter::<i32>::with_config(&config);
        let subs: Vec<_> = (0..3).map(|_| emitter.subscribe_all(|_| {})).collect();
        assert_eq!(emitter.emit(&VectorEvent::Cleared), 3);
        drop(subs);
        assert!(emitter.is_empty());
    }
}
