#![forbid(unsafe_code)]

//! Core: an observable dynamic array and its mutation-event protocol.
//!
//! # Role in rvec
//! `rvec-core` owns [`ReactiveVec`], a contiguous growable sequence that
//! reports every shape or value change through a [`SignalEmitter`]. The
//! test harness (`rvec-harness`) builds recorders on top of the emitter.
//!
//! # Primary responsibilities
//! - **ReactiveVec**: `Vec<T>` storage plus synchronous event publication.
//! - **VectorEvent**: one borrowed payload per mutation kind.
//! - **SignalEmitter**: kind-filtered subscriber registry with RAII
//!   [`Subscription`] guards.
//! - **ReactiveVecConfig**: env-overridable tuning knobs.
//!
//! # Example
//!
//! ```
//! use std::cell::RefCell;
//! use std::rc::Rc;
//! use rvec_core::{EventKinds, ReactiveVec, VectorEvent};
//!
//! let mut vec = ReactiveVec::new();
//! let seen = Rc::new(RefCell::new(Vec::new()));
//! let sink = Rc::clone(&seen);
//! let _sub = vec.subscribe(EventKinds::INSERTED, move |event: &VectorEvent<'_, i32>| {
//!     if let VectorEvent::Inserted { index, value } = event {
//!         sink.borrow_mut().push((*index, **value));
//!     }
//! });
//!
//! vec.push(42);
//! assert_eq!(*seen.borrow(), vec![(0, 42)]);
//! ```

pub mod config;
pub mod emitter;
pub mod error;
pub mod event;
pub mod logging;
pub mod sequence;

pub use config::{ConfigError, ConfigParse, ReactiveVecConfig};
pub use emitter::{SignalEmitter, Subscription};
pub use error::OutOfRange;
pub use event::{EventKind, EventKinds, OwnedVectorEvent, VectorEvent};
pub use sequence::ReactiveVec;
