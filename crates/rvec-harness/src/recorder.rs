#![forbid(unsafe_code)]

//! Event recorders.
//!
//! [`EventRecorder`] copies every matching event out of the dispatch window
//! so tests can assert on the exact sequence after the fact.
//! [`DispatchTrace`] records which labelled observer ran, in what order.

use std::cell::RefCell;
use std::rc::Rc;

use rvec_core::{EventKind, EventKinds, OwnedVectorEvent, SignalEmitter, Subscription};

/// Records owned snapshots of events published through an emitter.
///
/// Recording stops when the recorder (and with it the subscription) is
/// dropped or [`detach`](Self::detach)ed.
#[derive(Debug)]
pub struct EventRecorder<T> {
    events: Rc<RefCell<Vec<OwnedVectorEvent<T>>>>,
    subscription: Subscription,
}

impl<T: Clone + 'static> EventRecorder<T> {
    /// Record every event kind.
    #[must_use]
    pub fn attach(emitter: &SignalEmitter<T>) -> Self {
        Self::attach_kinds(emitter, EventKinds::all())
    }

    /// Record only the kinds in `kinds`.
    #[must_use]
    pub fn attach_kinds(emitter: &SignalEmitter<T>, kinds: EventKinds) -> Self {
        let events = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&events);
        let subscription = emitter.subscribe(kinds, move |event| {
            sink.borrow_mut().push(event.to_owned_event());
        });
        Self {
            events,
            subscription,
        }
    }

    /// Copy of everything recorded so far.
    #[must_use]
    pub fn events(&self) -> Vec<OwnedVectorEvent<T>> {
        self.events.borrow().clone()
    }

    /// Drain recorded events, leaving the recorder attached.
    pub fn take(&self) -> Vec<OwnedVectorEvent<T>> {
        std::mem::take(&mut *self.events.borrow_mut())
    }

    /// Kinds of the recorded events, in order.
    #[must_use]
    pub fn kinds(&self) -> Vec<EventKind> {
        self.events.borrow().iter().map(OwnedVectorEvent::kind).collect()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.events.borrow().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.borrow().is_empty()
    }

    /// Whether the recorder is still subscribed.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        self.subscription.is_active()
    }

    /// Stop recording and return what was captured.
    pub fn detach(self) -> Vec<OwnedVectorEvent<T>> {
        self.subscription.cancel();
        std::mem::take(&mut *self.events.borrow_mut())
    }
}

/// Shared log of `(label, kind)` pairs, one per observer invocation.
#[derive(Debug, Clone, Default)]
pub struct DispatchTrace {
    calls: Rc<RefCell<Vec<(&'static str, EventKind)>>>,
}

impl DispatchTrace {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Subscribe a labelled observer that appends to this trace.
    #[must_use]
    pub fn observe<T: 'static>(
        &self,
        emitter: &SignalEmitter<T>,
        label: &'static str,
        kinds: EventKinds,
    ) -> Subscription {
        let calls = Rc::clone(&self.calls);
        emitter.subscribe(kinds, move |event| {
            calls.borrow_mut().push((label, event.kind()));
        })
    }

    /// Labels in invocation order.
    #[must_use]
    pub fn labels(&self) -> Vec<&'static str> {
        self.calls.borrow().iter().map(|(label, _)| *label).collect()
    }

    /// Full `(label, kind)` log.
    #[must_use]
    pub fn calls(&self) -> Vec<(&'static str, EventKind)> {
        self.calls.borrow().clone()
    }

    pub fn clear(&self) {
        self.calls.borrow_mut().clear();
    }
}
