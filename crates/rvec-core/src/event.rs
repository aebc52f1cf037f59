#![forbid(unsafe_code)]

//! Mutation events published by [`ReactiveVec`](crate::ReactiveVec).
//!
//! # Design
//!
//! [`VectorEvent`] is a sum type with one variant per mutation kind. Value
//! fields are borrowed for `'a`, the dispatch window: they point either into
//! the sequence's storage (new values) or at a local held by the mutating
//! call (old values). Observers receive `&VectorEvent<'_, T>` through a
//! higher-ranked callback, so the compiler rejects any attempt to keep the
//! borrow past the call. Observers that need the data later copy it out with
//! [`VectorEvent::to_owned_event`].
//!
//! # Field semantics
//!
//! | Variant    | Fields                                  |
//! |------------|-----------------------------------------|
//! | `Inserted` | final resting index, new value          |
//! | `Updated`  | index, value before, value after        |
//! | `Erased`   | index before removal, removed value     |
//! | `Cleared`  | none                                    |
//! | `Reserved` | capacity after the reservation          |
//! | `Resized`  | length before, length after             |

use std::fmt;

/// A completed mutation, valid for the duration of one dispatch.
#[derive(Debug, PartialEq, Eq)]
pub enum VectorEvent<'a, T> {
    /// An element was added at `index`.
    Inserted { index: usize, value: &'a T },
    /// The element at `index` was replaced.
    Updated {
        index: usize,
        old_value: &'a T,
        new_value: &'a T,
    },
    /// The element previously at `index` was removed.
    Erased { index: usize, old_value: &'a T },
    /// Every element was removed.
    Cleared,
    /// Capacity grew to `new_capacity`.
    Reserved { new_capacity: usize },
    /// Length changed from `old_size` to `new_size`.
    Resized { old_size: usize, new_size: usize },
}

// Manual impls: only the references are copied, so `T` needs no bounds.
impl<T> Clone for VectorEvent<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for VectorEvent<'_, T> {}

impl<'a, T> VectorEvent<'a, T> {
    /// The fieldless tag of this event.
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Inserted { .. } => EventKind::Inserted,
            Self::Updated { .. } => EventKind::Updated,
            Self::Erased { .. } => EventKind::Erased,
            Self::Cleared => EventKind::Cleared,
            Self::Reserved { .. } => EventKind::Reserved,
            Self::Resized { .. } => EventKind::Resized,
        }
    }

    /// The element index this event refers to, if any.
    #[must_use]
    pub const fn index(&self) -> Option<usize> {
        match self {
            Self::Inserted { index, .. }
            | Self::Updated { index, .. }
            | Self::Erased { index, .. } => Some(*index),
            Self::Cleared | Self::Reserved { .. } | Self::Resized { .. } => None,
        }
    }

    /// Copy the payload out of the dispatch window.
    #[must_use]
    pub fn to_owned_event(&self) -> OwnedVectorEvent<T>
    where
        T: Clone,
    {
        match *self {
            Self::Inserted { index, value } => OwnedVectorEvent::Inserted {
                index,
                value: value.clone(),
            },
            Self::Updated {
                index,
                old_value,
                new_value,
            } => OwnedVectorEvent::Updated {
                index,
                old_value: old_value.clone(),
                new_value: new_value.clone(),
            },
            Self::Erased { index, old_value } => OwnedVectorEvent::Erased {
                index,
                old_value: old_value.clone(),
            },
            Self::Cleared => OwnedVectorEvent::Cleared,
            Self::Reserved { new_capacity } => OwnedVectorEvent::Reserved { new_capacity },
            Self::Resized { old_size, new_size } => OwnedVectorEvent::Resized { old_size, new_size },
        }
    }
}

/// An owned snapshot of a [`VectorEvent`], safe to store.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum OwnedVectorEvent<T> {
    Inserted {
        index: usize,
        value: T,
    },
    Updated {
        index: usize,
        old_value: T,
        new_value: T,
    },
    Erased {
        index: usize,
        old_value: T,
    },
    Cleared,
    Reserved {
        new_capacity: usize,
    },
    Resized {
        old_size: usize,
        new_size: usize,
    },
}

impl<T> OwnedVectorEvent<T> {
    #[must_use]
    pub const fn kind(&self) -> EventKind {
        match self {
            Self::Inserted { .. } => EventKind::Inserted,
            Self::Updated { .. } => EventKind::Updated,
            Self::Erased { .. } => EventKind::Erased,
            Self::Cleared => EventKind::Cleared,
            Self::Reserved { .. } => EventKind::Reserved,
            Self::Resized { .. } => EventKind::Resized,
        }
    }
}

/// Tag identifying a [`VectorEvent`] variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EventKind {
    Inserted,
    Updated,
    Erased,
    Cleared,
    Reserved,
    Resized,
}

impl EventKind {
    /// Every kind, in declaration order.
    pub const ALL: [EventKind; 6] = [
        Self::Inserted,
        Self::Updated,
        Self::Erased,
        Self::Cleared,
        Self::Reserved,
        Self::Resized,
    ];

    /// Stable lowercase name, used in logs and JSONL fixtures.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Inserted => "inserted",
            Self::Updated => "updated",
            Self::Erased => "erased",
            Self::Cleared => "cleared",
            Self::Reserved => "reserved",
            Self::Resized => "resized",
        }
    }

    /// The single-bit selector matching this kind.
    #[must_use]
    pub const fn as_set(self) -> EventKinds {
        match self {
            Self::Inserted => EventKinds::INSERTED,
            Self::Updated => EventKinds::UPDATED,
            Self::Erased => EventKinds::ERASED,
            Self::Cleared => EventKinds::CLEARED,
            Self::Reserved => EventKinds::RESERVED,
            Self::Resized => EventKinds::RESIZED,
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

bitflags::bitflags! {
    /// Subscription selector: the set of event kinds a callback receives.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct EventKinds: u8 {
        const INSERTED = 1 << 0;
        const UPDATED = 1 << 1;
        const ERASED = 1 << 2;
        const CLEARED = 1 << 3;
        const RESERVED = 1 << 4;
        const RESIZED = 1 << 5;
        /// Events that change element values or positions.
        const CONTENT = Self::INSERTED.bits() | Self::UPDATED.bits() | Self::ERASED.bits();
    }
}

impl EventKinds {
    /// Whether this selector accepts events of `kind`.
    #[inline]
    #[must_use]
    pub const fn accepts(self, kind: EventKind) -> bool {
        self.contains(kind.as_set())
    }
}

impl From<EventKind> for EventKinds {
    fn from(kind: EventKind) -> Self {
        kind.as_set()
    }
}
