#![forbid(unsafe_code)]

//! Test harness for `rvec-core` observers.
//!
//! - [`recorder`]: subscribe to an emitter and keep owned copies of events.
//! - [`event_log`]: render recorded events as JSONL for golden fixtures.

pub mod event_log;
pub mod recorder;

pub use event_log::{read_event_log_jsonl, write_event_log_jsonl};
pub use recorder::{DispatchTrace, EventRecorder};
